use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::claims::PapelGlobal;

/// Registro de usuário no banco.
///
/// `senha_hash` é NULL para contas criadas via Google; `google_id` é NULL
/// para contas locais. Pelo menos um dos dois está presente (constraint).
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub senha_hash: Option<String>,
    pub papel_global: PapelGlobal,
    pub foto_perfil_url: Option<String>,
    pub email_verificado: bool,
    pub token_verificacao: Option<String>,
    pub token_recuperacao_senha: Option<String>,
    pub token_recuperacao_expira: Option<OffsetDateTime>,
    pub google_id: Option<String>,
    pub criado_em: OffsetDateTime,
    pub atualizado_em: OffsetDateTime,
}
