use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_horas: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Base pública da aplicação, usada nos links de email.
    pub app_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub google: GoogleConfig,
    pub openai_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            expires_horas: std::env::var("JWT_EXPIRES_HORAS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        let mail = MailConfig {
            host: std::env::var("MAIL_HOST").unwrap_or_else(|_| "localhost".into()),
            port: std::env::var("MAIL_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            user: std::env::var("MAIL_USER").ok(),
            pass: std::env::var("MAIL_PASS").ok(),
            from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "nao-responda@desbravaprovas.com.br".into()),
        };
        let google = GoogleConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            callback_url: std::env::var("GOOGLE_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/auth/google/callback".into()),
        };
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        Ok(Self {
            database_url,
            app_url,
            jwt,
            mail,
            google,
            openai_api_key,
        })
    }
}
