use serde::Deserialize;
use tracing::warn;

use crate::{config::GoogleConfig, error::ApiError};

const URL_AUTORIZACAO: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const URL_TOKEN: &str = "https://oauth2.googleapis.com/token";
const URL_USERINFO: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Perfil mínimo entregue pelo Google ao fim do fluxo OAuth2.
#[derive(Debug, Clone)]
pub struct GoogleUser {
    pub google_id: String,
    pub nome: String,
    pub email: String,
    pub foto_perfil_url: Option<String>,
    pub email_verificado: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PerfilGoogle {
    id: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    verified_email: bool,
}

/// URL da tela de consentimento para onde `GET /auth/google` redireciona.
pub fn url_consentimento(cfg: &GoogleConfig) -> String {
    let mut url = reqwest::Url::parse(URL_AUTORIZACAO).expect("URL de autorização fixa");
    url.query_pairs_mut()
        .append_pair("client_id", &cfg.client_id)
        .append_pair("redirect_uri", &cfg.callback_url)
        .append_pair("response_type", "code")
        .append_pair("scope", "email profile");
    url.to_string()
}

fn falha_google(e: reqwest::Error) -> ApiError {
    warn!(error = %e, "falha na comunicação com o Google");
    ApiError::Autenticacao("Falha na autenticação com Google".into())
}

/// Troca o código de autorização por um access token e busca o perfil do
/// usuário no endpoint de userinfo.
pub async fn trocar_codigo(
    http: &reqwest::Client,
    cfg: &GoogleConfig,
    code: &str,
) -> Result<GoogleUser, ApiError> {
    let params = [
        ("code", code),
        ("client_id", cfg.client_id.as_str()),
        ("client_secret", cfg.client_secret.as_str()),
        ("redirect_uri", cfg.callback_url.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let resp = http
        .post(URL_TOKEN)
        .form(&params)
        .send()
        .await
        .map_err(falha_google)?;
    if !resp.status().is_success() {
        warn!(status = %resp.status(), "Google recusou o código de autorização");
        return Err(ApiError::Autenticacao(
            "Falha na autenticação com Google".into(),
        ));
    }
    let token: TokenResponse = resp.json().await.map_err(falha_google)?;

    let resp = http
        .get(URL_USERINFO)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(falha_google)?;
    if !resp.status().is_success() {
        warn!(status = %resp.status(), "Google recusou o access token no userinfo");
        return Err(ApiError::Autenticacao(
            "Falha na autenticação com Google".into(),
        ));
    }
    let perfil: PerfilGoogle = resp.json().await.map_err(falha_google)?;

    Ok(GoogleUser {
        google_id: perfil.id,
        nome: perfil.name.unwrap_or_else(|| perfil.email.clone()),
        email: perfil.email,
        foto_perfil_url: perfil.picture,
        email_verificado: perfil.verified_email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GoogleConfig {
        GoogleConfig {
            client_id: "cliente-123".into(),
            client_secret: "segredo".into(),
            callback_url: "http://localhost:3000/auth/google/callback".into(),
        }
    }

    #[test]
    fn url_de_consentimento_carrega_cliente_e_callback() {
        let url = url_consentimento(&cfg());
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=cliente-123"));
        assert!(url.contains("response_type=code"));
        // redirect_uri precisa sair percent-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
    }

    #[test]
    fn perfil_sem_nome_usa_email_como_nome() {
        let perfil = PerfilGoogle {
            id: "g-1".into(),
            email: "pedro@gmail.com".into(),
            name: None,
            picture: None,
            verified_email: true,
        };
        let user = GoogleUser {
            google_id: perfil.id,
            nome: perfil.name.unwrap_or_else(|| perfil.email.clone()),
            email: perfil.email,
            foto_perfil_url: perfil.picture,
            email_verificado: perfil.verified_email,
        };
        assert_eq!(user.nome, "pedro@gmail.com");
    }
}
