// src/config/secrets.rs
use anyhow::{anyhow, Result};

use super::settings::{Settings, SummarizerProvider};
use crate::notify::Channel;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";
pub const ENV_EMAIL_FROM: &str = "DIGEST_EMAIL_FROM";
pub const ENV_EMAIL_TO: &str = "DIGEST_EMAIL_TO";
pub const ENV_PUSH_TOKEN: &str = "PUSH_TOKEN";

#[derive(Clone)]
pub struct EmailSecrets {
    pub host: String,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub to: String,
}

/// Credentials needed by the configured collaborators. Only the ones the
/// settings actually use are required.
#[derive(Clone, Default)]
pub struct Secrets {
    pub openai_api_key: Option<String>,
    pub email: Option<EmailSecrets>,
    pub push_token: Option<String>,
}

// Never print secret values.
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|k| k.len()))
            .field("email", &self.email.as_ref().map(|e| e.host.as_str()))
            .field("push_token", &self.push_token.is_some())
            .finish()
    }
}

impl Secrets {
    pub fn from_env(settings: &Settings) -> Result<Self> {
        Self::from_lookup(settings, |k| std::env::var(k).ok())
    }

    /// Resolve secrets through `lookup` (env in production, a map in tests).
    /// Blank values count as missing.
    pub fn from_lookup<F>(settings: &Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("Missing {key} env var"))
        };

        let mut out = Secrets::default();

        if settings.summarizer.provider == SummarizerProvider::Openai {
            out.openai_api_key = Some(require(ENV_OPENAI_API_KEY)?);
        }

        match settings.dispatch.channel {
            Channel::Email => {
                out.email = Some(EmailSecrets {
                    host: require(ENV_SMTP_HOST)?,
                    user: require(ENV_SMTP_USER)?,
                    pass: require(ENV_SMTP_PASS)?,
                    from: require(ENV_EMAIL_FROM)?,
                    to: require(ENV_EMAIL_TO)?,
                });
            }
            Channel::Push => out.push_token = Some(require(ENV_PUSH_TOKEN)?),
            Channel::Stdout => {}
        }

        Ok(out)
    }
}
