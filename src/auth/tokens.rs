use rand::RngCore;

/// Gera um token opaco de uso único (verificação de email / recuperação de
/// senha): 32 bytes aleatórios do CSPRNG do sistema, em hexadecimal.
pub fn gerar_token_opaco() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_tem_64_caracteres_hex() {
        let token = gerar_token_opaco();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_consecutivos_sao_distintos() {
        assert_ne!(gerar_token_opaco(), gerar_token_opaco());
    }
}
