use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{dto::MensagemResponse, extractors::UsuarioAtual},
    error::ApiError,
    state::AppState,
    usuarios::{
        dto::{
            AlterarSenhaRequest, AtualizarPerfilRequest, ListaUsuariosResponse, PaginacaoQuery,
            UsuarioDetalhes,
        },
        service,
    },
};

pub fn usuarios_routes() -> Router<AppState> {
    Router::new()
        .route("/usuarios", get(listar))
        .route("/usuarios/perfil", put(atualizar_perfil))
        .route("/usuarios/alterar-senha", put(alterar_senha))
        .route("/usuarios/:id", get(buscar_por_id))
}

/// Listagem administrativa. A tabela de políticas restringe a MASTER.
#[instrument(skip(state))]
pub async fn listar(
    State(state): State<AppState>,
    Query(p): Query<PaginacaoQuery>,
) -> Result<Json<ListaUsuariosResponse>, ApiError> {
    let lista = service::listar_todos(&state, p.pagina, p.limite).await?;
    Ok(Json(lista))
}

#[instrument(skip(state))]
pub async fn buscar_por_id(
    State(state): State<AppState>,
    _atual: UsuarioAtual,
    Path(id): Path<i64>,
) -> Result<Json<UsuarioDetalhes>, ApiError> {
    let usuario = service::buscar_por_id(&state, id).await?;
    Ok(Json(usuario))
}

#[instrument(skip(state, payload))]
pub async fn atualizar_perfil(
    State(state): State<AppState>,
    atual: UsuarioAtual,
    Json(payload): Json<AtualizarPerfilRequest>,
) -> Result<Json<UsuarioDetalhes>, ApiError> {
    let usuario = service::atualizar_perfil(&state, atual.id, payload).await?;
    Ok(Json(usuario))
}

#[instrument(skip(state, payload))]
pub async fn alterar_senha(
    State(state): State<AppState>,
    atual: UsuarioAtual,
    Json(payload): Json<AlterarSenhaRequest>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let msg =
        service::alterar_senha(&state, atual.id, &payload.senha_atual, &payload.nova_senha).await?;
    Ok(Json(msg))
}
