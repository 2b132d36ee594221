// src/notify/email.rs
use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::Dispatcher;
use crate::config::EmailSecrets;

pub struct EmailDispatcher {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailDispatcher {
    pub fn new(secrets: &EmailSecrets) -> Result<Self> {
        let creds = Credentials::new(secrets.user.clone(), secrets.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&secrets.host)
            .with_context(|| format!("invalid SMTP_HOST {:?}", secrets.host))?
            .credentials(creds)
            .build();

        let from = secrets
            .from
            .parse()
            .with_context(|| format!("invalid DIGEST_EMAIL_FROM {:?}", secrets.from))?;
        let to = secrets
            .to
            .parse()
            .with_context(|| format!("invalid DIGEST_EMAIL_TO {:?}", secrets.to))?;

        Ok(Self { mailer, from, to })
    }
}

#[async_trait::async_trait]
impl Dispatcher for EmailDispatcher {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(target: "notify", to = %self.to, "digest emailed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
