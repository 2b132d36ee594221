// src/notify/push.rs
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use super::Dispatcher;

/// Push-notification endpoint taking a bearer token and a form field `message`
/// (the LINE Notify shape).
pub struct PushDispatcher {
    url: String,
    token: String,
    client: Client,
}

impl PushDispatcher {
    pub fn new(url: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building push http client")?;
        Ok(Self { url, token, client })
    }
}

/// Push endpoints have no subject line; it leads the message instead.
pub fn push_message(subject: &str, body: &str) -> String {
    format!("{subject}\n\n{body}")
}

#[async_trait::async_trait]
impl Dispatcher for PushDispatcher {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = push_message(subject, body);
        self.client
            .post(&self.url)
            .bearer_auth(&self.token)
            .form(&[("message", message.as_str())])
            .send()
            .await
            .context("push post")?
            .error_for_status()
            .context("push non-2xx")?;
        tracing::info!(target: "notify", url = %self.url, "digest pushed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "push"
    }
}
