// src/enrich/mod.rs
//! Per-item summary generation through an external summarizer.

pub mod openai;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::digest::SelectedItem;
use crate::ingest::article::ArticleScraper;
use crate::ingest::types::FeedItem;

pub use openai::OpenAiSummarizer;

/// Substituted when the summarizer fails or returns nothing.
pub const SUMMARY_UNAVAILABLE: &str = "summary unavailable";

/// Template used when the configuration does not override it.
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "Summarize the following news article in at most three sentences.\nTitle: {title}\nURL: {link}\n\n{content}";

/// Single request/response summarization backend.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub type DynSummarizer = Arc<dyn Summarizer>;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_summary_failures_total",
            "Summaries replaced by the placeholder text."
        );
    });
}

/// Fill `{title}`, `{link}` and `{content}` into the template in one pass.
/// Braces inside the substituted values are left alone.
pub fn build_prompt(template: &str, item: &FeedItem, content: &str) -> String {
    static RE_SLOT: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_SLOT.get_or_init(|| regex::Regex::new(r"\{(title|link|content)\}").unwrap());
    re.replace_all(template, |caps: &regex::Captures<'_>| match &caps[1] {
        "title" => item.title.clone(),
        "link" => item.link.clone(),
        _ => content.to_string(),
    })
    .into_owned()
}

pub struct Enricher {
    summarizer: DynSummarizer,
    template: String,
    scraper: Option<Arc<dyn ArticleScraper>>,
}

impl Enricher {
    pub fn new(summarizer: DynSummarizer, template: impl Into<String>) -> Self {
        Self {
            summarizer,
            template: template.into(),
            scraper: None,
        }
    }

    /// Fetch the article body for `{content}` before summarizing.
    pub fn with_scraper(mut self, scraper: Arc<dyn ArticleScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// Summary for one item, or `None` when the call failed.
    pub async fn try_enrich(&self, item: &FeedItem) -> Option<String> {
        let content = match &self.scraper {
            Some(s) => {
                let body = s.article_text(&item.link).await;
                if body.is_empty() {
                    item.title.clone()
                } else {
                    body
                }
            }
            None => item.title.clone(),
        };
        let prompt = build_prompt(&self.template, item, &content);

        let res = self
            .summarizer
            .summarize(&prompt)
            .await
            .and_then(|s| {
                let s = s.trim().to_string();
                if s.is_empty() {
                    Err(anyhow!("empty summary"))
                } else {
                    Ok(s)
                }
            });

        match res {
            Ok(summary) => Some(summary),
            Err(e) => {
                ensure_metrics_described();
                counter!("digest_summary_failures_total").increment(1);
                tracing::warn!(
                    target: "enrich",
                    error = ?e,
                    link = %item.link,
                    summarizer = self.summarizer.name(),
                    "summary failed, using placeholder"
                );
                None
            }
        }
    }

    /// Summary for one item; failures become `SUMMARY_UNAVAILABLE`.
    pub async fn enrich(&self, item: &FeedItem) -> String {
        self.try_enrich(item)
            .await
            .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string())
    }

    /// Enrich items one after another; output order equals input order.
    pub async fn enrich_all(&self, items: &[FeedItem]) -> Vec<SelectedItem> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let summary = self.try_enrich(item).await;
            out.push(SelectedItem::new(item.clone(), summary));
        }
        out
    }
}

/// Deterministic summarizer for tests and offline runs.
/// Echoes the prompt (or a fixed text) and fails on prompts containing a marker.
#[derive(Default)]
pub struct MockSummarizer {
    fixed: Option<String>,
    fail_on: Vec<String>,
    calls: AtomicUsize,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed(mut self, text: impl Into<String>) -> Self {
        self.fixed = Some(text.into());
        self
    }

    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_on.push(marker.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(m) = self.fail_on.iter().find(|m| prompt.contains(m.as_str())) {
            return Err(anyhow!("mock failure on {m:?}"));
        }
        Ok(self
            .fixed
            .clone()
            .unwrap_or_else(|| prompt.trim().to_string()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
