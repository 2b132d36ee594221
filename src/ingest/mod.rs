// src/ingest/mod.rs
pub mod article;
pub mod rss;
pub mod types;

use crate::ingest::types::{FeedItem, FeedReader, RawItem, SourcePool};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashMap;

/// Hard cap on normalized text length (chars). Article bodies get cut here
/// before they go into a prompt.
pub const MAX_TEXT_CHARS: usize = 4_000;

/// One-time metrics registration (so series show up in the exported text).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_items_read_total",
            "Items read from feeds, labelled by pool."
        );
        describe_counter!(
            "digest_feed_errors_total",
            "Feed fetch/parse errors swallowed as empty feeds."
        );
    });
}

/// Normalize text: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (includes NBSP)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out
}

/// Read one feed for the given pool. Never fails: an unreachable or malformed
/// feed counts as a feed with zero items.
pub async fn read_feed(reader: &dyn FeedReader, url: &str, pool: SourcePool) -> Vec<FeedItem> {
    ensure_metrics_described();

    match reader.read(url).await {
        Ok(raw) => {
            let label = pool_label(pool);
            counter!("digest_items_read_total", "pool" => label).increment(raw.len() as u64);
            tracing::debug!(target: "ingest", %url, pool = label, items = raw.len(), "feed read");
            raw.into_iter()
                .map(|r| FeedItem::from_raw(r, pool))
                .collect()
        }
        Err(e) => {
            tracing::warn!(target: "ingest", error = ?e, %url, reader = reader.name(), "feed error, treating as empty");
            counter!("digest_feed_errors_total").increment(1);
            Vec::new()
        }
    }
}

/// Read every feed in list order and concatenate, keeping per-feed arrival order.
pub async fn read_pool(reader: &dyn FeedReader, urls: &[String], pool: SourcePool) -> Vec<FeedItem> {
    let mut out = Vec::new();
    for url in urls {
        let mut items = read_feed(reader, url, pool).await;
        out.append(&mut items);
    }
    out
}

pub(crate) fn pool_label(pool: SourcePool) -> &'static str {
    match pool {
        SourcePool::Primary => "primary",
        SourcePool::Fallback => "fallback",
    }
}

/// In-memory reader over frozen feed snapshots. Unknown URLs are errors,
/// which `read_feed` turns into empty feeds like any other failure.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedReader {
    feeds: HashMap<String, Vec<RawItem>>,
}

impl StaticFeedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: impl Into<String>, items: Vec<RawItem>) -> Self {
        self.feeds.insert(url.into(), items);
        self
    }
}

#[async_trait::async_trait]
impl FeedReader for StaticFeedReader {
    async fn read(&self, url: &str) -> anyhow::Result<Vec<RawItem>> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no snapshot for {url}"))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_collapses_ws_and_entities() {
        let s = "  Hello,&nbsp;&nbsp; world!  ";
        assert_eq!(normalize_text(s), "Hello, world!");
    }

    #[test]
    fn normalize_text_strips_tags_between_words() {
        let s = "<p>Markets</p><p>rally</p>";
        assert_eq!(normalize_text(s), "Markets rally");
    }

    #[tokio::test]
    async fn unknown_feed_reads_as_empty() {
        let reader = StaticFeedReader::new();
        let items = read_feed(&reader, "https://nowhere.example/rss", SourcePool::Primary).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn pool_concatenates_in_list_order() {
        let reader = StaticFeedReader::new()
            .with_feed("a", vec![RawItem::new("a1", "l1"), RawItem::new("a2", "l2")])
            .with_feed("b", vec![RawItem::new("b1", "l3")]);
        let urls = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        let items = read_pool(&reader, &urls, SourcePool::Primary).await;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b1", "a1", "a2"]);
        assert!(items.iter().all(|i| i.pool == SourcePool::Primary));
    }
}
