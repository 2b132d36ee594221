// src/ingest/article.rs
//! Best-effort article body scraping: the first `<article>` element of a page.

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::ingest::normalize_text;

#[async_trait]
pub trait ArticleScraper: Send + Sync {
    /// Plain text of the article at `url`, or an empty string when nothing usable was found.
    async fn article_text(&self, url: &str) -> String;
}

/// Extract the text of the first `<article>` element from an HTML page.
pub fn extract_article_text(html: &str) -> String {
    static RE_ARTICLE: OnceCell<regex::Regex> = OnceCell::new();
    static RE_NOISE: OnceCell<regex::Regex> = OnceCell::new();
    let re_article = RE_ARTICLE
        .get_or_init(|| regex::Regex::new(r"(?is)<article\b[^>]*>(.*?)</article>").unwrap());
    let re_noise = RE_NOISE.get_or_init(|| {
        regex::Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
            .unwrap()
    });

    let Some(caps) = re_article.captures(html) else {
        return String::new();
    };
    let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    normalize_text(&re_noise.replace_all(inner, " "))
}

pub struct HttpArticleScraper {
    client: reqwest::Client,
}

impl HttpArticleScraper {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building article http client")?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let html = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .context("article non-2xx")?
            .text()
            .await
            .context("article body .text()")?;
        Ok(extract_article_text(&html))
    }
}

#[async_trait]
impl ArticleScraper for HttpArticleScraper {
    async fn article_text(&self, url: &str) -> String {
        match self.fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(target: "ingest", error = ?e, %url, "article scrape failed");
                String::new()
            }
        }
    }
}
