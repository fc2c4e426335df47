use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::MailConfig;

/// Despacho de email. Os serviços dependem do trait para que os testes
/// injetem um transporte falso.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn enviar_verificacao(&self, para: &str, nome: &str, token: &str) -> anyhow::Result<()>;
    async fn enviar_boas_vindas(&self, para: &str, nome: &str) -> anyhow::Result<()>;
    async fn enviar_recuperacao(&self, para: &str, nome: &str, token: &str) -> anyhow::Result<()>;
}

/// Transporte SMTP real (STARTTLS) com os três modelos de mensagem da
/// plataforma.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    app_url: String,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig, app_url: &str) -> anyhow::Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?.port(cfg.port);
        if let (Some(user), Some(pass)) = (&cfg.user, &cfg.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let from: Mailbox = format!("Desbrava Provas <{}>", cfg.from).parse()?;
        info!(host = %cfg.host, port = cfg.port, "transporte SMTP configurado");
        Ok(Self {
            transport: builder.build(),
            from,
            app_url: app_url.to_string(),
        })
    }

    async fn enviar(&self, para: &str, assunto: &str, html: String) -> anyhow::Result<()> {
        let mensagem = Message::builder()
            .from(self.from.clone())
            .to(para.parse()?)
            .subject(assunto)
            .header(ContentType::TEXT_HTML)
            .body(html)?;
        self.transport.send(mensagem).await?;
        info!(para, assunto, "email enviado");
        Ok(())
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn enviar_verificacao(&self, para: &str, nome: &str, token: &str) -> anyhow::Result<()> {
        let url = link_verificacao(&self.app_url, token);
        self.enviar(
            para,
            "Verifique seu email - Desbrava Provas",
            modelo_verificacao(nome, &url),
        )
        .await
    }

    async fn enviar_boas_vindas(&self, para: &str, nome: &str) -> anyhow::Result<()> {
        self.enviar(
            para,
            "Bem-vindo ao Desbrava Provas!",
            modelo_boas_vindas(nome, &self.app_url),
        )
        .await
    }

    async fn enviar_recuperacao(&self, para: &str, nome: &str, token: &str) -> anyhow::Result<()> {
        let url = link_recuperacao(&self.app_url, token);
        self.enviar(
            para,
            "Recuperação de senha - Desbrava Provas",
            modelo_recuperacao(nome, &url),
        )
        .await
    }
}

fn link_verificacao(app_url: &str, token: &str) -> String {
    format!("{app_url}/auth/verificar-email?token={token}")
}

fn link_recuperacao(app_url: &str, token: &str) -> String {
    format!("{app_url}/redefinir-senha?token={token}")
}

fn modelo_verificacao(nome: &str, url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; overflow: hidden;">
    <div style="background-color: #2563eb; padding: 40px; text-align: center;">
      <h1 style="margin: 0; color: #ffffff;">Desbrava Provas</h1>
    </div>
    <div style="padding: 40px;">
      <h2 style="color: #1f2937;">Olá, {nome}!</h2>
      <p style="color: #4b5563; line-height: 1.6;">
        Bem-vindo ao <strong>Desbrava Provas</strong>! Para começar a usar sua conta,
        precisamos verificar seu endereço de email. Clique no botão abaixo para confirmar:
      </p>
      <p style="text-align: center;">
        <a href="{url}" style="display: inline-block; padding: 16px 32px; background-color: #2563eb; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold;">
          Verificar Email
        </a>
      </p>
      <p style="color: #6b7280; font-size: 14px;">
        Se você não criou uma conta no Desbrava Provas, ignore este email.
      </p>
      <p style="color: #2563eb; font-size: 12px; word-break: break-all;">{url}</p>
    </div>
  </div>
</body>
</html>"#
    )
}

fn modelo_boas_vindas(nome: &str, app_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; overflow: hidden;">
    <div style="background-color: #10b981; padding: 40px; text-align: center;">
      <h1 style="margin: 0; color: #ffffff;">Bem-vindo!</h1>
    </div>
    <div style="padding: 40px;">
      <h2 style="color: #1f2937;">Olá, {nome}!</h2>
      <p style="color: #4b5563; line-height: 1.6;">
        Seu email foi verificado com sucesso! Agora você tem acesso completo à
        plataforma <strong>Desbrava Provas</strong>. Explore e comece a criar e
        resolver provas de especialidades.
      </p>
      <p style="text-align: center;">
        <a href="{app_url}" style="display: inline-block; padding: 16px 32px; background-color: #10b981; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold;">
          Acessar Plataforma
        </a>
      </p>
    </div>
  </div>
</body>
</html>"#
    )
}

fn modelo_recuperacao(nome: &str, url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; overflow: hidden;">
    <div style="background-color: #dc2626; padding: 40px; text-align: center;">
      <h1 style="margin: 0; color: #ffffff;">Recuperação de Senha</h1>
    </div>
    <div style="padding: 40px;">
      <h2 style="color: #1f2937;">Olá, {nome}!</h2>
      <p style="color: #4b5563; line-height: 1.6;">
        Recebemos uma solicitação para redefinir a senha da sua conta. O link
        abaixo é válido por <strong>1 hora</strong>:
      </p>
      <p style="text-align: center;">
        <a href="{url}" style="display: inline-block; padding: 16px 32px; background-color: #dc2626; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold;">
          Redefinir Senha
        </a>
      </p>
      <p style="color: #6b7280; font-size: 14px;">
        Se você não solicitou a redefinição, ignore este email; sua senha continua a mesma.
      </p>
      <p style="color: #dc2626; font-size: 12px; word-break: break-all;">{url}</p>
    </div>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_apontam_para_a_aplicacao() {
        assert_eq!(
            link_verificacao("http://localhost:3000", "tok123"),
            "http://localhost:3000/auth/verificar-email?token=tok123"
        );
        assert_eq!(
            link_recuperacao("http://localhost:3000", "tok456"),
            "http://localhost:3000/redefinir-senha?token=tok456"
        );
    }

    #[test]
    fn modelos_carregam_nome_e_link() {
        let html = modelo_verificacao("Ana", "http://x/verificar?token=t");
        assert!(html.contains("Olá, Ana!"));
        assert!(html.contains("http://x/verificar?token=t"));

        let html = modelo_recuperacao("Ana", "http://x/redefinir?token=t");
        assert!(html.contains("1 hora"));
    }
}
