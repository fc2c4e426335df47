use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, MensagemResponse, UsuarioPublico},
        google::GoogleUser,
        jwt::JwtKeys,
        password::{hash_senha_async, verificar_senha_async},
        repo_types::Usuario,
        tokens::gerar_token_opaco,
    },
    error::{violacao_unicidade, ApiError},
    state::AppState,
};

/// Resposta fixa de recuperação de senha. A mesma mensagem é devolvida
/// exista a conta ou não, para não permitir enumeração de emails.
pub const MSG_RECUPERACAO: &str = "Se o email existir, um link de recuperação será enviado.";

pub(crate) fn email_valido(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn resposta_autenticada(state: &AppState, usuario: &Usuario) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys
        .emitir(usuario.id, &usuario.email, usuario.papel_global)
        .map_err(ApiError::Interno)?;
    Ok(AuthResponse {
        access_token,
        usuario: UsuarioPublico::from(usuario),
    })
}

/// Autentica por email/senha e emite um token de sessão.
///
/// Email desconhecido e senha incorreta produzem a mesma mensagem, para
/// não revelar quais contas existem.
pub async fn login(state: &AppState, email: &str, senha: &str) -> Result<AuthResponse, ApiError> {
    let Some(usuario) = Usuario::buscar_por_email(&state.db, email).await? else {
        warn!(email, "tentativa de login com email inexistente");
        return Err(ApiError::Autenticacao("Email ou senha inválidos".into()));
    };

    let Some(hash) = usuario.senha_hash.as_deref() else {
        warn!(email, "tentativa de login com senha em conta Google");
        return Err(ApiError::Autenticacao("Esta conta usa login com Google".into()));
    };

    if !verificar_senha_async(senha.to_string(), hash.to_string()).await? {
        warn!(email, usuario_id = usuario.id, "tentativa de login com senha incorreta");
        return Err(ApiError::Autenticacao("Email ou senha inválidos".into()));
    }

    info!(usuario_id = usuario.id, "login bem-sucedido");
    resposta_autenticada(state, &usuario)
}

/// Cria uma conta local, dispara o email de verificação (melhor esforço) e
/// devolve uma sessão ativa imediatamente; a verificação de email não
/// bloqueia o login neste desenho.
pub async fn registro(
    state: &AppState,
    nome: &str,
    email: &str,
    senha: &str,
) -> Result<AuthResponse, ApiError> {
    if !email_valido(email) {
        return Err(ApiError::Validacao("Email inválido".into()));
    }
    if senha.len() < 8 {
        return Err(ApiError::Validacao(
            "Senha deve ter pelo menos 8 caracteres".into(),
        ));
    }

    if Usuario::buscar_por_email(&state.db, email).await?.is_some() {
        warn!(email, "tentativa de registro com email já existente");
        return Err(ApiError::Conflito("Email já cadastrado".into()));
    }

    let senha_hash = hash_senha_async(senha.to_string()).await?;
    let token_verificacao = gerar_token_opaco();

    let usuario = match Usuario::criar_local(&state.db, nome, email, &senha_hash, &token_verificacao)
        .await
    {
        Ok(u) => u,
        // registro concorrente com o mesmo email: a constraint UNIQUE decide
        Err(e) if violacao_unicidade(&e) => {
            warn!(email, "registro perdeu corrida de inserção");
            return Err(ApiError::Conflito("Email já cadastrado".into()));
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = state
        .email
        .enviar_verificacao(&usuario.email, &usuario.nome, &token_verificacao)
        .await
    {
        // a conta já existe; o usuário pode pedir reenvio depois
        warn!(error = %e, email = %usuario.email, "falha ao enviar email de verificação");
    }

    info!(usuario_id = usuario.id, email = %usuario.email, "novo usuário registrado");
    resposta_autenticada(state, &usuario)
}

/// Resolve o login via Google: por google_id, depois por email (vinculando
/// a conta local em vigor), e por fim criando uma conta nova sem senha.
pub async fn login_com_google(
    state: &AppState,
    google_user: GoogleUser,
) -> Result<AuthResponse, ApiError> {
    let mut usuario = Usuario::buscar_por_google_id(&state.db, &google_user.google_id).await?;

    if usuario.is_none() {
        if let Some(existente) = Usuario::buscar_por_email(&state.db, &google_user.email).await? {
            let vinculado = Usuario::vincular_google(
                &state.db,
                existente.id,
                &google_user.google_id,
                google_user.foto_perfil_url.as_deref(),
                google_user.email_verificado,
            )
            .await?;
            info!(email = %vinculado.email, "conta existente vinculada ao Google");
            usuario = Some(vinculado);
        }
    }

    let usuario = match usuario {
        Some(u) => {
            info!(email = %u.email, "login via Google");
            u
        }
        None => {
            let criado = Usuario::criar_google(
                &state.db,
                &google_user.nome,
                &google_user.email,
                &google_user.google_id,
                google_user.foto_perfil_url.as_deref(),
                google_user.email_verificado,
            )
            .await?;
            info!(email = %criado.email, "nova conta criada via Google");
            criado
        }
    };

    resposta_autenticada(state, &usuario)
}

/// Consome o token de verificação: marca o email como verificado e limpa o
/// token na mesma escrita, depois envia o email de boas-vindas.
pub async fn verificar_email(state: &AppState, token: &str) -> Result<MensagemResponse, ApiError> {
    let Some(usuario) = Usuario::buscar_por_token_verificacao(&state.db, token).await? else {
        return Err(ApiError::Validacao("Token de verificação inválido".into()));
    };

    if usuario.email_verificado {
        return Err(ApiError::Validacao("Email já verificado".into()));
    }

    Usuario::marcar_email_verificado(&state.db, usuario.id).await?;

    if let Err(e) = state
        .email
        .enviar_boas_vindas(&usuario.email, &usuario.nome)
        .await
    {
        warn!(error = %e, email = %usuario.email, "falha ao enviar email de boas-vindas");
    }

    info!(email = %usuario.email, "email verificado");
    Ok(MensagemResponse::new("Email verificado com sucesso!"))
}

/// Regenera o token de verificação e reenvia o email.
pub async fn reenviar_verificacao(
    state: &AppState,
    email: &str,
) -> Result<MensagemResponse, ApiError> {
    let Some(usuario) = Usuario::buscar_por_email(&state.db, email).await? else {
        return Err(ApiError::Validacao("Usuário não encontrado".into()));
    };

    if usuario.email_verificado {
        return Err(ApiError::Validacao("Email já verificado".into()));
    }

    if usuario.senha_hash.is_none() {
        return Err(ApiError::Validacao(
            "Usuários que fazem login com Google não precisam verificar email".into(),
        ));
    }

    let token_verificacao = gerar_token_opaco();
    Usuario::atualizar_token_verificacao(&state.db, usuario.id, &token_verificacao).await?;

    if let Err(e) = state
        .email
        .enviar_verificacao(&usuario.email, &usuario.nome, &token_verificacao)
        .await
    {
        warn!(error = %e, email = %usuario.email, "falha ao reenviar email de verificação");
    }

    info!(email, "email de verificação reenviado");
    Ok(MensagemResponse::new(
        "Email de verificação reenviado com sucesso!",
    ))
}

/// Inicia a recuperação de senha. Para email inexistente devolve a mesma
/// mensagem genérica, sem qualquer efeito colateral.
pub async fn solicitar_recuperacao_senha(
    state: &AppState,
    email: &str,
) -> Result<MensagemResponse, ApiError> {
    let Some(usuario) = Usuario::buscar_por_email(&state.db, email).await? else {
        return Ok(MensagemResponse::new(MSG_RECUPERACAO));
    };

    if usuario.senha_hash.is_none() {
        return Err(ApiError::Validacao(
            "Usuários que fazem login com Google não podem recuperar senha".into(),
        ));
    }

    let token = gerar_token_opaco();
    let expira = OffsetDateTime::now_utc() + Duration::hours(1);
    Usuario::definir_token_recuperacao(&state.db, usuario.id, &token, expira).await?;

    if let Err(e) = state
        .email
        .enviar_recuperacao(&usuario.email, &usuario.nome, &token)
        .await
    {
        warn!(error = %e, email = %usuario.email, "falha ao enviar email de recuperação");
    }

    info!(email, "email de recuperação de senha enviado");
    Ok(MensagemResponse::new(MSG_RECUPERACAO))
}

/// Redefine a senha a partir de um token de recuperação válido e ainda
/// dentro da validade de 1 hora. O token é de uso único: a escrita da nova
/// senha limpa token e expiração.
pub async fn redefinir_senha(
    state: &AppState,
    token: &str,
    nova_senha: &str,
) -> Result<MensagemResponse, ApiError> {
    if nova_senha.len() < 8 {
        return Err(ApiError::Validacao(
            "Senha deve ter pelo menos 8 caracteres".into(),
        ));
    }

    let Some(usuario) = Usuario::buscar_por_token_recuperacao(&state.db, token).await? else {
        return Err(ApiError::Validacao("Token de recuperação inválido".into()));
    };

    let valido = usuario
        .token_recuperacao_expira
        .is_some_and(|expira| expira > OffsetDateTime::now_utc());
    if !valido {
        return Err(ApiError::Validacao("Token de recuperação expirado".into()));
    }

    let senha_hash = hash_senha_async(nova_senha.to_string()).await?;
    Usuario::redefinir_senha(&state.db, usuario.id, &senha_hash).await?;

    info!(email = %usuario.email, "senha redefinida com sucesso");
    Ok(MensagemResponse::new("Senha redefinida com sucesso!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_valido_aceita_formatos_comuns() {
        assert!(email_valido("ana@x.com"));
        assert!(email_valido("joao.silva@exemplo.com.br"));
        assert!(!email_valido("sem-arroba"));
        assert!(!email_valido("a@b"));
        assert!(!email_valido("com espaco@x.com"));
    }

    #[test]
    fn mensagem_de_recuperacao_e_uniforme() {
        // propriedade de resistência a enumeração: a literal usada para
        // contas existentes e inexistentes é a mesma constante
        assert_eq!(
            MSG_RECUPERACAO,
            "Se o email existir, um link de recuperação será enviado."
        );
    }
}
