use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::{claims::PapelGlobal, repo_types::Usuario};

/// Visão administrativa/completa de um usuário.
#[derive(Debug, Serialize)]
pub struct UsuarioDetalhes {
    pub id: i64,
    pub nome: String,
    pub email: String,
    #[serde(rename = "papelGlobal")]
    pub papel_global: PapelGlobal,
    #[serde(rename = "fotoPerfilUrl")]
    pub foto_perfil_url: Option<String>,
    #[serde(rename = "emailVerificado")]
    pub email_verificado: bool,
    #[serde(rename = "criadoEm", with = "time::serde::rfc3339")]
    pub criado_em: OffsetDateTime,
    #[serde(rename = "atualizadoEm", with = "time::serde::rfc3339")]
    pub atualizado_em: OffsetDateTime,
}

impl From<&Usuario> for UsuarioDetalhes {
    fn from(u: &Usuario) -> Self {
        Self {
            id: u.id,
            nome: u.nome.clone(),
            email: u.email.clone(),
            papel_global: u.papel_global,
            foto_perfil_url: u.foto_perfil_url.clone(),
            email_verificado: u.email_verificado,
            criado_em: u.criado_em,
            atualizado_em: u.atualizado_em,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaginacaoQuery {
    #[serde(default = "pagina_padrao")]
    pub pagina: i64,
    #[serde(default = "limite_padrao")]
    pub limite: i64,
}

fn pagina_padrao() -> i64 {
    1
}

fn limite_padrao() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct Paginacao {
    #[serde(rename = "paginaAtual")]
    pub pagina_atual: i64,
    #[serde(rename = "itensPorPagina")]
    pub itens_por_pagina: i64,
    #[serde(rename = "totalItens")]
    pub total_itens: i64,
    #[serde(rename = "totalPaginas")]
    pub total_paginas: i64,
}

#[derive(Debug, Serialize)]
pub struct ListaUsuariosResponse {
    pub dados: Vec<UsuarioDetalhes>,
    pub paginacao: Paginacao,
}

#[derive(Debug, Deserialize)]
pub struct AtualizarPerfilRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlterarSenhaRequest {
    #[serde(rename = "senhaAtual")]
    pub senha_atual: String,
    #[serde(rename = "novaSenha")]
    pub nova_senha: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginacao_tem_padroes_do_frontend() {
        let q: PaginacaoQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.pagina, 1);
        assert_eq!(q.limite, 10);
    }

    #[test]
    fn alterar_senha_aceita_campos_camel_case() {
        let req: AlterarSenhaRequest =
            serde_json::from_str(r#"{"senhaAtual":"antiga123","novaSenha":"nova12345"}"#).unwrap();
        assert_eq!(req.senha_atual, "antiga123");
        assert_eq!(req.nova_senha, "nova12345");
    }
}
