use axum::{
    extract::{FromRef, MatchedPath, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    auth::{claims::PapelGlobal, extractors::UsuarioAtual, jwt::JwtKeys},
    error::ApiError,
    state::AppState,
};

/// Política de acesso de uma rota: pública, apenas autenticada, ou
/// restrita a um conjunto de papéis.
#[derive(Debug, Clone, Copy)]
pub struct PoliticaRota {
    pub publica: bool,
    pub papeis: &'static [PapelGlobal],
}

const PUBLICA: PoliticaRota = PoliticaRota {
    publica: true,
    papeis: &[],
};

const AUTENTICADA: PoliticaRota = PoliticaRota {
    publica: false,
    papeis: &[],
};

/// Tabela explícita de rota → política, consultada por um único
/// middleware. Rotas ausentes exigem autenticação sem papel específico.
const POLITICAS: &[(&str, PoliticaRota)] = &[
    ("/health", PUBLICA),
    ("/auth/login", PUBLICA),
    ("/auth/registro", PUBLICA),
    ("/auth/verificar-email", PUBLICA),
    ("/auth/reenviar-verificacao", PUBLICA),
    ("/auth/solicitar-recuperacao-senha", PUBLICA),
    ("/auth/redefinir-senha", PUBLICA),
    ("/auth/google", PUBLICA),
    ("/auth/google/callback", PUBLICA),
    ("/auth/perfil", AUTENTICADA),
    (
        "/usuarios",
        PoliticaRota {
            publica: false,
            papeis: &[PapelGlobal::Master],
        },
    ),
    (
        "/provas/gerar-questoes",
        PoliticaRota {
            publica: false,
            papeis: &[PapelGlobal::AdminClube, PapelGlobal::Master],
        },
    ),
];

pub fn politica_para(rota: &str) -> PoliticaRota {
    POLITICAS
        .iter()
        .find(|(r, _)| *r == rota)
        .map(|(_, p)| *p)
        .unwrap_or(AUTENTICADA)
}

fn extrair_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware único de autenticação + autorização.
///
/// Rota pública: segue sem resolver identidade. Caso contrário, verifica o
/// bearer token, anexa `UsuarioAtual` às extensões da requisição e aplica
/// o conjunto de papéis exigido pela tabela de políticas.
pub async fn autorizar(
    State(state): State<AppState>,
    matched: Option<MatchedPath>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let rota = matched
        .as_ref()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| req.uri().path());
    let politica = politica_para(rota);

    if politica.publica {
        return Ok(next.run(req).await);
    }

    let Some(token) = extrair_bearer(req.headers()) else {
        return Err(ApiError::Autenticacao("Token inválido ou expirado".into()));
    };

    let claims = JwtKeys::from_ref(&state).verificar(token)?;
    let atual = UsuarioAtual {
        id: claims.sub,
        email: claims.email,
        papel_global: claims.papel_global,
    };

    if !politica.papeis.is_empty() && !politica.papeis.contains(&atual.papel_global) {
        let necessarios = politica
            .papeis
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        warn!(usuario_id = atual.id, rota, papel = %atual.papel_global, "acesso negado por papel");
        return Err(ApiError::Autorizacao(format!(
            "Você não tem permissão para acessar este recurso. Papéis necessários: {necessarios}"
        )));
    }

    req.extensions_mut().insert(atual);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn rotas_de_autenticacao_sao_publicas() {
        for rota in [
            "/auth/login",
            "/auth/registro",
            "/auth/verificar-email",
            "/auth/solicitar-recuperacao-senha",
            "/auth/google/callback",
            "/health",
        ] {
            assert!(politica_para(rota).publica, "{rota} deveria ser pública");
        }
    }

    #[test]
    fn rota_desconhecida_exige_autenticacao_sem_papel() {
        let politica = politica_para("/qualquer/coisa");
        assert!(!politica.publica);
        assert!(politica.papeis.is_empty());
    }

    #[test]
    fn listagem_de_usuarios_exige_master() {
        let politica = politica_para("/usuarios");
        assert!(!politica.publica);
        assert_eq!(politica.papeis, &[PapelGlobal::Master]);
        assert!(!politica.papeis.contains(&PapelGlobal::Usuario));
    }

    #[test]
    fn geracao_de_questoes_aceita_lideres() {
        let politica = politica_para("/provas/gerar-questoes");
        assert!(politica.papeis.contains(&PapelGlobal::AdminClube));
        assert!(politica.papeis.contains(&PapelGlobal::Master));
        assert!(!politica.papeis.contains(&PapelGlobal::Usuario));
    }

    #[test]
    fn extrai_token_do_cabecalho_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extrair_bearer(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(extrair_bearer(&headers), None);

        headers.remove(AUTHORIZATION);
        assert_eq!(extrair_bearer(&headers), None);
    }
}
