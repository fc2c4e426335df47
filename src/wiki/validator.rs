use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{header::LOCATION, redirect, StatusCode, Url};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ApiError;

const WIKI_BASE_URL: &str = "https://mda.wiki.br/";
const USER_AGENT: &str = "DesbravadorProvas/0.1.0 (Educational Tool)";
const TIMEOUT: Duration = Duration::from_secs(5);

/// URL do MDA Wiki que passou por todas as checagens de `validar_url`.
///
/// Só este módulo constrói o tipo, então `extrair_info` não pode ser
/// chamada com uma URL que tenha pulado a validação.
#[derive(Debug, Clone)]
pub struct UrlWikiValidada {
    url: Url,
    slug: String,
}

impl UrlWikiValidada {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

#[derive(Debug)]
pub struct ResultadoValidacao {
    pub valida: bool,
    pub url_completa: String,
    /// Presente apenas quando `valida` é true.
    pub url: Option<UrlWikiValidada>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoEspecialidade {
    pub nome: String,
    pub descricao: Option<String>,
}

/// Valida e derreferencia com segurança URLs do MDA Wiki fornecidas por
/// usuários, impedindo que o processo sirva de proxy SSRF.
pub struct WikiValidator {
    http: reqwest::Client,
    base: Url,
}

impl WikiValidator {
    pub fn new() -> anyhow::Result<Self> {
        // redirects nunca são seguidos automaticamente: o destino de um
        // 3xx é inspecionado manualmente contra a base confiável
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()?;
        let base = Url::parse(WIKI_BASE_URL)?;
        Ok(Self { http, base })
    }

    /// Checagens locais (passos sem rede): formato do slug, resolução
    /// contra a base confiável, origem e faixas de rede internas.
    fn resolver(&self, slug: &str) -> Result<Url, ApiError> {
        if !slug_valido(slug) {
            return Err(ApiError::Validacao("Formato de slug inválido".into()));
        }

        let url = self
            .base
            .join(slug)
            .map_err(|_| ApiError::Validacao("Formato de slug inválido".into()))?;

        // um slug com "//" ou "../" pode resolver para fora da base
        if !url.as_str().starts_with(WIKI_BASE_URL) {
            return Err(ApiError::Validacao("URL deve ser do MDA Wiki".into()));
        }

        let host = url.host_str().unwrap_or_default();
        if host_interno(host) {
            return Err(ApiError::Validacao(
                "Acesso a recursos internos não permitido".into(),
            ));
        }

        Ok(url)
    }

    /// Confirma que o slug aponta para um recurso real e alcançável do
    /// MDA Wiki: HEAD com timeout curto e tratamento manual de redirect.
    pub async fn validar_url(&self, slug: &str) -> Result<ResultadoValidacao, ApiError> {
        let url = self.resolver(slug)?;
        let url_completa = url.to_string();

        info!(host = %url.host_str().unwrap_or_default(), "validando URL do MDA Wiki");

        let resp = match self.http.head(url.clone()).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                error!("timeout ao validar URL do MDA Wiki");
                return Err(ApiError::Validacao("Timeout ao validar URL".into()));
            }
            Err(e) => {
                error!(error = %e, "erro ao validar URL do MDA Wiki");
                return Ok(ResultadoValidacao {
                    valida: false,
                    url_completa,
                    url: None,
                });
            }
        };

        if resp.status().is_redirection() {
            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if !location.starts_with(WIKI_BASE_URL) {
                return Err(ApiError::Validacao(
                    "URL redireciona para fora do MDA Wiki".into(),
                ));
            }
        }

        let valida = resp.status().is_success();
        if valida {
            info!(url = %url_completa, "URL válida");
        } else if resp.status() == StatusCode::NOT_FOUND {
            warn!(url = %url_completa, "URL não encontrada");
        } else {
            warn!(status = %resp.status(), url = %url_completa, "resposta inesperada");
        }

        Ok(ResultadoValidacao {
            valida,
            url: valida.then(|| UrlWikiValidada {
                url,
                slug: slug.to_string(),
            }),
            url_completa,
        })
    }

    /// Extrai título/descrição da página, melhor esforço: devolve `None`
    /// em qualquer falha.
    pub async fn extrair_info(&self, validada: &UrlWikiValidada) -> Option<InfoEspecialidade> {
        lazy_static! {
            static ref TITULO_RE: Regex = Regex::new(r"(?i)<title>([^<]+)</title>").unwrap();
            static ref DESCRICAO_RE: Regex =
                Regex::new(r#"(?i)<meta\s+name="description"\s+content="([^"]+)""#).unwrap();
        }

        info!(url = %validada.as_str(), "extraindo informações da especialidade");

        let resp = match self.http.get(validada.url.clone()).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(status = %r.status(), url = %validada.as_str(), "falha ao buscar página");
                return None;
            }
            Err(e) => {
                error!(error = %e, url = %validada.as_str(), "erro ao extrair informações");
                return None;
            }
        };

        let html = resp.text().await.ok()?;

        let nome = TITULO_RE
            .captures(&html)
            .map(|c| c[1].replace(" - MDA Wiki", "").trim().to_string())
            .unwrap_or_else(|| nome_do_slug(&validada.slug));

        let descricao = DESCRICAO_RE.captures(&html).map(|c| c[1].to_string());

        info!(nome = %nome, "informações extraídas");
        Some(InfoEspecialidade { nome, descricao })
    }
}

fn slug_valido(slug: &str) -> bool {
    lazy_static! {
        static ref SLUG_RE: Regex = Regex::new(r"^[a-zA-Z0-9_\-%/]+/$").unwrap();
    }
    SLUG_RE.is_match(slug)
}

/// Hosts que nunca podem ser alvo de uma requisição de validação:
/// loopback, faixas RFC 1918, link-local e o endereço de metadados da AWS.
fn host_interno(host: &str) -> bool {
    const INTERNOS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "169.254.169.254"];

    INTERNOS.iter().any(|h| host.contains(h))
        || host.starts_with("192.168.")
        || host.starts_with("10.")
        || (16..=31).any(|i| host.starts_with(&format!("172.{i}.")))
}

/// Nome legível derivado do próprio slug quando a página não tem título.
fn nome_do_slug(slug: &str) -> String {
    let decodificado = decodificar_percentual(slug);
    let limpo = decodificado
        .strip_prefix("Especialidade_de_")
        .unwrap_or(&decodificado)
        .replace('_', " ")
        .trim_end_matches('/')
        .trim()
        .to_string();

    let mut chars = limpo.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => limpo,
    }
}

fn decodificar_percentual(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut saida = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(b) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                saida.push(b);
                i += 3;
                continue;
            }
        }
        saida.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&saida).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> WikiValidator {
        WikiValidator::new().expect("cliente http")
    }

    #[test]
    fn slug_aceita_apenas_o_padrao_estrito() {
        assert!(slug_valido("Primeiros_Socorros/"));
        assert!(slug_valido("Especialidade_de_N%C3%B3s/"));
        assert!(slug_valido("a-b/c_d/"));

        assert!(!slug_valido("Primeiros_Socorros")); // sem barra final
        assert!(!slug_valido("https://evil.com/")); // ':' fora do padrão
        assert!(!slug_valido("pagina?x=1/"));
        assert!(!slug_valido("pagina#frag/"));
        assert!(!slug_valido(""));
        assert!(!slug_valido("espaço aqui/"));
    }

    #[test]
    fn hosts_internos_sao_detectados_sem_rede() {
        for host in [
            "localhost",
            "127.0.0.1",
            "0.0.0.0",
            "169.254.169.254",
            "192.168.1.10",
            "10.0.0.5",
            "172.16.0.1",
            "172.31.255.255",
        ] {
            assert!(host_interno(host), "{host} deveria ser interno");
        }
        for host in ["mda.wiki.br", "8.8.8.8", "172.32.0.1", "172.15.0.1"] {
            assert!(!host_interno(host), "{host} não deveria ser interno");
        }
    }

    #[tokio::test]
    async fn resolucao_mantem_a_origem_confiavel() {
        let v = validator();
        let url = v.resolver("Primeiros_Socorros/").expect("slug válido");
        assert_eq!(url.as_str(), "https://mda.wiki.br/Primeiros_Socorros/");
    }

    #[tokio::test]
    async fn injecao_de_url_absoluta_e_rejeitada() {
        let v = validator();
        // slug com esquema ou "../" não passa do padrão estrito
        for slug in ["https://evil.com/", "../Especialidade/"] {
            let err = v.resolver(slug).unwrap_err();
            assert!(matches!(err, ApiError::Validacao(m) if m == "Formato de slug inválido"));
        }

        // "//host/" passa no padrão mas resolve para outra origem e cai na
        // checagem de base
        let err = v.resolver("//evilhost/pagina/").unwrap_err();
        assert!(matches!(err, ApiError::Validacao(m) if m == "URL deve ser do MDA Wiki"));
    }

    #[test]
    fn nome_do_slug_limpa_prefixo_e_codificacao() {
        assert_eq!(
            nome_do_slug("Especialidade_de_Primeiros_Socorros_-_b%C3%A1sico/"),
            "Primeiros Socorros - básico"
        );
        assert_eq!(nome_do_slug("nos_e_amarras/"), "Nos e amarras");
    }

    #[test]
    fn decodificacao_percentual_cobre_utf8() {
        assert_eq!(decodificar_percentual("b%C3%A1sico"), "básico");
        assert_eq!(decodificar_percentual("sem_codificacao"), "sem_codificacao");
        // sequência malformada fica como está
        assert_eq!(decodificar_percentual("50%"), "50%");
    }
}
