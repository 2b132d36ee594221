// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One entry as returned by a feed, before it is assigned to a pool.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published_at: None,
        }
    }
}

/// Which pool an item was drawn from.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourcePool {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub pool: SourcePool,
}

impl FeedItem {
    pub fn from_raw(raw: RawItem, pool: SourcePool) -> Self {
        Self {
            title: raw.title,
            link: raw.link,
            published_at: raw.published_at,
            pool,
        }
    }
}

/// Narrow interface over "give me the entries of this feed".
/// Errors are allowed here; `ingest::read_feed` turns them into an empty pool.
#[async_trait::async_trait]
pub trait FeedReader: Send + Sync {
    async fn read(&self, url: &str) -> Result<Vec<RawItem>>;
    fn name(&self) -> &'static str;
}
