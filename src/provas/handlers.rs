use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::extractors::UsuarioAtual,
    error::ApiError,
    provas::{
        dto::{GerarQuestoesRequest, GerarQuestoesResponse},
        service,
    },
    state::AppState,
};

pub fn provas_routes() -> Router<AppState> {
    Router::new().route("/provas/gerar-questoes", post(gerar_questoes))
}

/// Geração de questões por IA. O acesso é restrito pela tabela de
/// políticas a ADMIN_CLUBE e MASTER.
#[instrument(skip(state, payload))]
pub async fn gerar_questoes(
    State(state): State<AppState>,
    atual: UsuarioAtual,
    Json(payload): Json<GerarQuestoesRequest>,
) -> Result<Json<GerarQuestoesResponse>, ApiError> {
    let resposta = service::gerar_questoes(&state, payload).await?;
    info!(
        usuario_id = atual.id,
        usuario = %atual.email,
        questoes = resposta.questoes.len(),
        url_validada = resposta.url_validada,
        "questões geradas por IA"
    );
    Ok(Json(resposta))
}
