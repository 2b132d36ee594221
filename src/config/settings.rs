// src/config/settings.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::digest::DEFAULT_SUBJECT_PREFIX;
use crate::ingest::rss::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::notify::Channel;
use crate::select::{DedupBasis, InterestConfig};
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

fn default_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}
fn default_subject_prefix() -> String {
    DEFAULT_SUBJECT_PREFIX.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Everything a run needs besides secrets. Loaded once at start, read-only after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Primary feeds, keyword-filtered, read in this order.
    pub rss_urls: Vec<String>,
    /// Fallback feed (typically a popularity ranking), never keyword-filtered.
    pub ranking_rss_url: String,
    pub num_articles: usize,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// `{title}`, `{link}` and `{content}` are substituted per item.
    pub prompt_template: String,
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f32,
    #[serde(default)]
    pub dedup_basis: DedupBasis,
    /// Scrape the `<article>` body of each item for `{content}`.
    #[serde(default)]
    pub fetch_article_body: bool,
    #[serde(default)]
    pub summarizer: SummarizerSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    #[default]
    Openai,
    Mock,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizerSettings {
    #[serde(default)]
    pub provider: SummarizerProvider,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    #[serde(default)]
    pub channel: Channel,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Required when `channel = "push"`.
    pub push_url: Option<String>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            channel: Channel::default(),
            subject_prefix: default_subject_prefix(),
            push_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn check_url(field: &str, raw: &str) -> Result<()> {
    let u = url::Url::parse(raw.trim()).with_context(|| format!("{field}: invalid URL {raw:?}"))?;
    match u.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("{field}: unsupported scheme {other:?} in {raw:?}")),
    }
}

impl Settings {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rss_urls.is_empty() {
            bail!("rss_urls: at least one feed is required");
        }
        for u in &self.rss_urls {
            check_url("rss_urls", u)?;
        }
        check_url("ranking_rss_url", &self.ranking_rss_url)?;
        if self.num_articles == 0 {
            bail!("num_articles must be greater than 0");
        }
        let t = self.similarity_threshold;
        if !(t.is_finite() && t > 0.0 && t <= 1.0) {
            bail!("similarity_threshold must be in (0, 1], got {t}");
        }
        if self.prompt_template.trim().is_empty() {
            bail!("prompt_template must not be empty");
        }
        if self.dispatch.channel == Channel::Push {
            let url = self
                .dispatch
                .push_url
                .as_deref()
                .ok_or_else(|| anyhow!("dispatch.push_url is required for channel \"push\""))?;
            check_url("dispatch.push_url", url)?;
        }
        if self.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn interest(&self) -> InterestConfig {
        InterestConfig::new(&self.keywords, self.num_articles)
            .with_threshold(self.similarity_threshold)
            .with_dedup_basis(self.dedup_basis)
    }
}
