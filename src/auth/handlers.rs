use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            AuthResponse, GoogleCallbackQuery, LoginRequest, MensagemResponse,
            RedefinirSenhaRequest, ReenviarVerificacaoRequest, RegistroRequest,
            SolicitarRecuperacaoRequest, UsuarioPublico, VerificarEmailQuery,
        },
        extractors::UsuarioAtual,
        google,
        repo_types::Usuario,
        service,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/registro", post(registro))
        .route("/auth/perfil", get(perfil))
        .route("/auth/verificar-email", get(verificar_email))
        .route("/auth/reenviar-verificacao", post(reenviar_verificacao))
        .route(
            "/auth/solicitar-recuperacao-senha",
            post(solicitar_recuperacao_senha),
        )
        .route("/auth/redefinir-senha", post(redefinir_senha))
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let resposta = service::login(&state, &payload.email, &payload.senha).await?;
    Ok(Json(resposta))
}

#[instrument(skip(state, payload))]
pub async fn registro(
    State(state): State<AppState>,
    Json(payload): Json<RegistroRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let resposta =
        service::registro(&state, &payload.nome, &payload.email, &payload.senha).await?;
    Ok((StatusCode::CREATED, Json(resposta)))
}

/// Dados do usuário logado. O id vem do token; os dados devolvidos são os
/// atuais do banco.
#[instrument(skip(state))]
pub async fn perfil(
    State(state): State<AppState>,
    atual: UsuarioAtual,
) -> Result<Json<UsuarioPublico>, ApiError> {
    let usuario = Usuario::buscar_por_id(&state.db, atual.id)
        .await?
        .ok_or_else(|| ApiError::Autenticacao("Usuário não encontrado".into()))?;
    Ok(Json(UsuarioPublico::from(&usuario)))
}

#[instrument(skip(state, query))]
pub async fn verificar_email(
    State(state): State<AppState>,
    Query(query): Query<VerificarEmailQuery>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let msg = service::verificar_email(&state, &query.token).await?;
    Ok(Json(msg))
}

#[instrument(skip(state, payload))]
pub async fn reenviar_verificacao(
    State(state): State<AppState>,
    Json(payload): Json<ReenviarVerificacaoRequest>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let msg = service::reenviar_verificacao(&state, &payload.email).await?;
    Ok(Json(msg))
}

#[instrument(skip(state, payload))]
pub async fn solicitar_recuperacao_senha(
    State(state): State<AppState>,
    Json(payload): Json<SolicitarRecuperacaoRequest>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let msg = service::solicitar_recuperacao_senha(&state, &payload.email).await?;
    Ok(Json(msg))
}

#[instrument(skip(state, payload))]
pub async fn redefinir_senha(
    State(state): State<AppState>,
    Json(payload): Json<RedefinirSenhaRequest>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let msg = service::redefinir_senha(&state, &payload.token, &payload.nova_senha).await?;
    Ok(Json(msg))
}

/// Redireciona para a tela de consentimento do Google.
#[instrument(skip(state))]
pub async fn google_login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&google::url_consentimento(&state.config.google))
}

/// Processa o retorno do Google: troca o código por um perfil e resolve a
/// conta (login, vínculo ou criação).
#[instrument(skip(state, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<Json<AuthResponse>, ApiError> {
    let google_user = google::trocar_codigo(&state.http, &state.config.google, &query.code).await?;
    let resposta = service::login_com_google(&state, google_user).await?;
    Ok(Json(resposta))
}
