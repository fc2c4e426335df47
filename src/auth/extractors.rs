use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{auth::claims::PapelGlobal, error::ApiError};

/// Identidade resolvida para a requisição corrente.
///
/// Populada uma única vez pelo middleware de autorização a partir do token
/// de sessão e lida pelos handlers via extractor; nunca re-derivada.
#[derive(Debug, Clone)]
pub struct UsuarioAtual {
    pub id: i64,
    pub email: String,
    pub papel_global: PapelGlobal,
}

#[async_trait]
impl<S> FromRequestParts<S> for UsuarioAtual
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UsuarioAtual>()
            .cloned()
            // handler protegido alcançado sem passar pelo middleware
            .ok_or_else(|| {
                ApiError::Autorizacao(
                    "Usuário não autenticado no contexto da requisição".into(),
                )
            })
    }
}
