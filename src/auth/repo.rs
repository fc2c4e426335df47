use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::repo_types::Usuario;

impl Usuario {
    pub async fn buscar_por_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn buscar_por_email(db: &PgPool, email: &str) -> sqlx::Result<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn buscar_por_google_id(
        db: &PgPool,
        google_id: &str,
    ) -> sqlx::Result<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE google_id = $1")
            .bind(google_id)
            .fetch_optional(db)
            .await
    }

    pub async fn buscar_por_token_verificacao(
        db: &PgPool,
        token: &str,
    ) -> sqlx::Result<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE token_verificacao = $1")
            .bind(token)
            .fetch_optional(db)
            .await
    }

    pub async fn buscar_por_token_recuperacao(
        db: &PgPool,
        token: &str,
    ) -> sqlx::Result<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE token_recuperacao_senha = $1")
            .bind(token)
            .fetch_optional(db)
            .await
    }

    /// Cria uma conta local (senha + token de verificação pendente).
    pub async fn criar_local(
        db: &PgPool,
        nome: &str,
        email: &str,
        senha_hash: &str,
        token_verificacao: &str,
    ) -> sqlx::Result<Usuario> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nome, email, senha_hash, token_verificacao, email_verificado)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(token_verificacao)
        .fetch_one(db)
        .await
    }

    /// Cria uma conta via Google, sem senha.
    pub async fn criar_google(
        db: &PgPool,
        nome: &str,
        email: &str,
        google_id: &str,
        foto_perfil_url: Option<&str>,
        email_verificado: bool,
    ) -> sqlx::Result<Usuario> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nome, email, google_id, foto_perfil_url, email_verificado)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(email)
        .bind(google_id)
        .bind(foto_perfil_url)
        .bind(email_verificado)
        .fetch_one(db)
        .await
    }

    /// Vincula o id do Google a uma conta local existente.
    ///
    /// `email_verificado` só sobe de false para true e a foto só é
    /// preenchida quando ainda ausente; nunca rebaixa o que já existe.
    pub async fn vincular_google(
        db: &PgPool,
        id: i64,
        google_id: &str,
        foto_perfil_url: Option<&str>,
        email_verificado: bool,
    ) -> sqlx::Result<Usuario> {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET google_id = $2,
                email_verificado = email_verificado OR $3,
                foto_perfil_url = COALESCE(foto_perfil_url, $4),
                atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(google_id)
        .bind(email_verificado)
        .bind(foto_perfil_url)
        .fetch_one(db)
        .await
    }

    /// Marca o email como verificado e consome o token na mesma escrita.
    pub async fn marcar_email_verificado(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE usuarios
            SET email_verificado = TRUE, token_verificacao = NULL, atualizado_em = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn atualizar_token_verificacao(
        db: &PgPool,
        id: i64,
        token: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE usuarios SET token_verificacao = $2, atualizado_em = now() WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn definir_token_recuperacao(
        db: &PgPool,
        id: i64,
        token: &str,
        expira: OffsetDateTime,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE usuarios
            SET token_recuperacao_senha = $2, token_recuperacao_expira = $3, atualizado_em = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(expira)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Grava a nova senha e limpa token + expiração de recuperação.
    pub async fn redefinir_senha(db: &PgPool, id: i64, senha_hash: &str) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE usuarios
            SET senha_hash = $2,
                token_recuperacao_senha = NULL,
                token_recuperacao_expira = NULL,
                atualizado_em = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(senha_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn atualizar_senha(db: &PgPool, id: i64, senha_hash: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE usuarios SET senha_hash = $2, atualizado_em = now() WHERE id = $1")
            .bind(id)
            .bind(senha_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn listar(db: &PgPool, limite: i64, offset: i64) -> sqlx::Result<Vec<Usuario>> {
        sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios ORDER BY criado_em DESC LIMIT $1 OFFSET $2",
        )
        .bind(limite)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn contar(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM usuarios")
            .fetch_one(db)
            .await
    }

    /// Atualiza nome/email do perfil. A troca de email invalida a
    /// verificação anterior.
    pub async fn atualizar_perfil(
        db: &PgPool,
        id: i64,
        nome: &str,
        email: &str,
        email_alterado: bool,
    ) -> sqlx::Result<Usuario> {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nome = $2,
                email = $3,
                email_verificado = CASE WHEN $4 THEN FALSE ELSE email_verificado END,
                token_verificacao = CASE WHEN $4 THEN NULL ELSE token_verificacao END,
                atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(email)
        .bind(email_alterado)
        .fetch_one(db)
        .await
    }
}
