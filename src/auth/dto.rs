use serde::{Deserialize, Serialize};

use crate::auth::{claims::PapelGlobal, repo_types::Usuario};

/// Corpo de `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Corpo de `POST /auth/registro`.
#[derive(Debug, Deserialize)]
pub struct RegistroRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Deserialize)]
pub struct ReenviarVerificacaoRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SolicitarRecuperacaoRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RedefinirSenhaRequest {
    pub token: String,
    #[serde(rename = "novaSenha")]
    pub nova_senha: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificarEmailQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
}

/// Parte pública do usuário devolvida ao cliente.
#[derive(Debug, Serialize)]
pub struct UsuarioPublico {
    pub id: i64,
    pub nome: String,
    pub email: String,
    #[serde(rename = "papelGlobal")]
    pub papel_global: PapelGlobal,
    #[serde(rename = "fotoPerfilUrl")]
    pub foto_perfil_url: Option<String>,
}

impl From<&Usuario> for UsuarioPublico {
    fn from(u: &Usuario) -> Self {
        Self {
            id: u.id,
            nome: u.nome.clone(),
            email: u.email.clone(),
            papel_global: u.papel_global,
            foto_perfil_url: u.foto_perfil_url.clone(),
        }
    }
}

/// Resposta de login/registro/callback: token de sessão + dados públicos.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub usuario: UsuarioPublico,
}

#[derive(Debug, Serialize)]
pub struct MensagemResponse {
    pub message: String,
}

impl MensagemResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usuario_publico_usa_campos_do_frontend() {
        let publico = UsuarioPublico {
            id: 1,
            nome: "Ana".into(),
            email: "ana@x.com".into(),
            papel_global: PapelGlobal::Usuario,
            foto_perfil_url: None,
        };
        let json = serde_json::to_string(&publico).unwrap();
        assert!(json.contains("\"papelGlobal\":\"USUARIO\""));
        assert!(json.contains("\"fotoPerfilUrl\":null"));
    }

    #[test]
    fn redefinir_senha_aceita_nova_senha_camel_case() {
        let req: RedefinirSenhaRequest =
            serde_json::from_str(r#"{"token":"abc","novaSenha":"nova12345"}"#).unwrap();
        assert_eq!(req.nova_senha, "nova12345");
    }
}
