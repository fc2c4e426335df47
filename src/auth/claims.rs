use serde::{Deserialize, Serialize};

/// Papel global do usuário na plataforma. Embutido no token de sessão e
/// usado pelo middleware de autorização.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "papel_global", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PapelGlobal {
    Usuario,
    AdminClube,
    Master,
}

impl std::fmt::Display for PapelGlobal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PapelGlobal::Usuario => "USUARIO",
            PapelGlobal::AdminClube => "ADMIN_CLUBE",
            PapelGlobal::Master => "MASTER",
        };
        f.write_str(s)
    }
}

/// Payload do token de sessão.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // ID do usuário
    pub email: String,
    #[serde(rename = "papelGlobal")]
    pub papel_global: PapelGlobal,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn papel_serializa_em_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&PapelGlobal::AdminClube).unwrap(),
            "\"ADMIN_CLUBE\""
        );
        assert_eq!(
            serde_json::from_str::<PapelGlobal>("\"MASTER\"").unwrap(),
            PapelGlobal::Master
        );
    }

    #[test]
    fn claims_usam_nome_de_campo_do_frontend() {
        let claims = Claims {
            sub: 1,
            email: "ana@x.com".into(),
            papel_global: PapelGlobal::Usuario,
            iat: 0,
            exp: 10,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"papelGlobal\":\"USUARIO\""));
        assert!(json.contains("\"sub\":1"));
    }
}
