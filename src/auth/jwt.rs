use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{Claims, PapelGlobal},
    error::ApiError,
    state::AppState,
};

/// Chaves de assinatura/verificação do token de sessão.
///
/// A validade é puramente criptográfica + expiração: não há lista de
/// revogação nem rotação de chave.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl_horas: i64,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl_horas: cfg.expires_horas,
        }
    }
}

impl JwtKeys {
    /// Emite um token de sessão autocontido com id/email/papel do usuário.
    pub fn emitir(
        &self,
        usuario_id: i64,
        email: &str,
        papel_global: PapelGlobal,
    ) -> anyhow::Result<String> {
        let agora = OffsetDateTime::now_utc();
        let expira = agora + Duration::hours(self.ttl_horas);
        let claims = Claims {
            sub: usuario_id,
            email: email.to_string(),
            papel_global,
            iat: agora.unix_timestamp() as usize,
            exp: expira.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(usuario_id, "token de sessão emitido");
        Ok(token)
    }

    /// Verifica assinatura e expiração, devolvendo o payload embutido.
    pub fn verificar(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Autenticacao("Token inválido ou expirado".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chaves(secret: &str, ttl_horas: i64) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_horas,
        }
    }

    #[test]
    fn emitir_e_verificar_devolve_payload_embutido() {
        let keys = chaves("segredo-dev", 24);
        let token = keys
            .emitir(42, "ana@x.com", PapelGlobal::Usuario)
            .expect("emitir");
        let claims = keys.verificar(&token).expect("verificar");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.papel_global, PapelGlobal::Usuario);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_adulterado_falha_com_erro_de_autenticacao() {
        let keys = chaves("segredo-dev", 24);
        let token = keys
            .emitir(1, "ana@x.com", PapelGlobal::Master)
            .expect("emitir");
        let mut adulterado = token.clone();
        // troca o último caractere da assinatura
        let ultimo = if adulterado.ends_with('A') { 'B' } else { 'A' };
        adulterado.pop();
        adulterado.push(ultimo);
        let err = keys.verificar(&adulterado).unwrap_err();
        assert!(matches!(err, ApiError::Autenticacao(m) if m == "Token inválido ou expirado"));
    }

    #[test]
    fn token_com_segredo_diferente_e_rejeitado() {
        let emissor = chaves("segredo-a", 24);
        let verificador = chaves("segredo-b", 24);
        let token = emissor
            .emitir(1, "ana@x.com", PapelGlobal::Usuario)
            .expect("emitir");
        assert!(verificador.verificar(&token).is_err());
    }

    #[tokio::test]
    async fn from_ref_usa_a_config_do_estado() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys
            .emitir(7, "ana@x.com", PapelGlobal::Usuario)
            .expect("emitir");
        assert_eq!(keys.verificar(&token).expect("verificar").sub, 7);
    }

    #[test]
    fn token_expirado_e_rejeitado() {
        // TTL negativo coloca exp bem no passado, além da tolerância padrão
        let keys = chaves("segredo-dev", -2);
        let token = keys
            .emitir(1, "ana@x.com", PapelGlobal::Usuario)
            .expect("emitir");
        let err = keys.verificar(&token).unwrap_err();
        assert!(matches!(err, ApiError::Autenticacao(_)));
    }
}
