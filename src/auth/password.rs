use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Gera o hash Argon2 (salted) de uma senha em texto claro.
pub fn hash_senha(senha: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(senha.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "falha ao gerar hash argon2");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Compara uma senha em texto claro com o hash armazenado.
pub fn verificar_senha(senha: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "hash argon2 armazenado é inválido");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(senha.as_bytes(), &parsed)
        .is_ok())
}

/// O hash Argon2 é CPU-bound; fora do pool de bloqueio ele travaria o
/// event loop durante dezenas de milissegundos.
pub async fn hash_senha_async(senha: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_senha(&senha)).await?
}

pub async fn verificar_senha_async(senha: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verificar_senha(&senha, &hash)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn versao_assincrona_preserva_o_resultado() {
        let hash = hash_senha_async("abc12345".into()).await.expect("hash");
        assert!(verificar_senha_async("abc12345".into(), hash.clone())
            .await
            .expect("verificação"));
        assert!(!verificar_senha_async("outra-senha".into(), hash)
            .await
            .expect("verificação"));
    }

    #[test]
    fn hash_e_verificacao_fecham_o_ciclo() {
        let senha = "abc12345";
        let hash = hash_senha(senha).expect("hash deve funcionar");
        assert!(verificar_senha(senha, &hash).expect("verificação deve funcionar"));
    }

    #[test]
    fn senha_errada_e_recusada() {
        let hash = hash_senha("senha-correta").expect("hash deve funcionar");
        assert!(!verificar_senha("senha-errada", &hash).expect("verificação não deve falhar"));
    }

    #[test]
    fn hash_malformado_gera_erro() {
        let err = verificar_senha("qualquer", "nao-e-um-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn hashes_da_mesma_senha_diferem_pelo_salt() {
        let a = hash_senha("abc12345").unwrap();
        let b = hash_senha("abc12345").unwrap();
        assert_ne!(a, b);
    }
}
