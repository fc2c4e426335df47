use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Erro de domínio retornado pelos serviços e handlers.
///
/// Toda variante carrega uma mensagem segura para o cliente; detalhes
/// internos ficam apenas no log do servidor.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Credenciais ou token de sessão inválidos (401).
    #[error("{0}")]
    Autenticacao(String),
    /// Identidade resolvida sem permissão para a operação (403).
    #[error("{0}")]
    Autorizacao(String),
    /// Entrada rejeitada: token opaco inválido/expirado, URL malformada,
    /// tipo de conta não permitido para a operação (400).
    #[error("{0}")]
    Validacao(String),
    /// Violação de unicidade, tipicamente email duplicado (409).
    #[error("{0}")]
    Conflito(String),
    /// Recurso inexistente (404).
    #[error("{0}")]
    NaoEncontrado(String),
    /// Falha de infraestrutura. Nunca exposta ao cliente.
    #[error(transparent)]
    Interno(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Interno(anyhow::Error::new(e))
    }
}

/// Violação de unicidade do Postgres (código 23505). As constraints UNIQUE
/// do banco são o único mecanismo contra corridas de escrita concorrentes,
/// então o perdedor da corrida precisa ser traduzido para 409.
pub fn violacao_unicidade(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Autenticacao(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::Autorizacao(m) => (StatusCode::FORBIDDEN, m),
            ApiError::Validacao(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Conflito(m) => (StatusCode::CONFLICT, m),
            ApiError::NaoEncontrado(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Interno(e) => {
                error!(error = %e, "erro interno");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
        };
        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variantes_mapeiam_para_status_esperado() {
        let casos: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::Autenticacao("Email ou senha inválidos".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Autorizacao("sem permissão".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::Validacao("Token de verificação inválido".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Conflito("Email já cadastrado".into()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::NaoEncontrado("Usuário com ID 7 não encontrado".into()),
                StatusCode::NOT_FOUND,
            ),
        ];
        for (erro, esperado) in casos {
            assert_eq!(erro.into_response().status(), esperado);
        }
    }

    #[test]
    fn erro_interno_nao_vaza_detalhes() {
        let erro = ApiError::Interno(anyhow::anyhow!("pool timeout em 10.0.0.5:5432"));
        let resp = erro.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
