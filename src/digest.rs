// src/digest.rs
//! Rendering of the final digest text. Pure: same input, same output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enrich::SUMMARY_UNAVAILABLE;
use crate::ingest::types::{FeedItem, SourcePool};

pub const ADVISORY_NOTE: &str =
    "Note: no items matched your keywords today, so these are the unfiltered headlines.";
pub const NO_ITEMS_NOTE: &str = "No news items today.";
pub const DEFAULT_SUBJECT_PREFIX: &str = "News digest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedItem {
    pub title: String,
    pub link: String,
    pub pool: SourcePool,
    pub summary: String,
    /// The summarizer failed and `summary` holds the placeholder.
    #[serde(default)]
    pub summary_failed: bool,
}

impl SelectedItem {
    /// `None` means the summary could not be generated.
    pub fn new(item: FeedItem, summary: Option<String>) -> Self {
        let summary_failed = summary.is_none();
        Self {
            title: item.title,
            link: item.link,
            pool: item.pool,
            summary: summary.unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string()),
            summary_failed,
        }
    }
}

/// Outcome of one run, in selection order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Digest {
    pub advisory: bool,
    pub items: Vec<SelectedItem>,
}

impl Digest {
    pub fn body(&self) -> String {
        compose(&self.items, self.advisory)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose summary failed.
    pub fn placeholders(&self) -> usize {
        self.items.iter().filter(|it| it.summary_failed).count()
    }
}

/// Blocks of `title / link / summary`, blank line between blocks.
/// The advisory, when set, comes first on its own paragraph.
pub fn compose(items: &[SelectedItem], advisory: bool) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(items.len() + 1);
    if advisory {
        parts.push(ADVISORY_NOTE.to_string());
    }
    if items.is_empty() {
        parts.push(NO_ITEMS_NOTE.to_string());
    } else {
        parts.extend(
            items
                .iter()
                .map(|it| format!("{}\n{}\n{}", it.title, it.link, it.summary)),
        );
    }
    parts.join("\n\n")
}

/// Subject line such as `News digest 2025-06-10`.
pub fn subject(prefix: &str, date: NaiveDate) -> String {
    let prefix = prefix.trim();
    let prefix = if prefix.is_empty() {
        DEFAULT_SUBJECT_PREFIX
    } else {
        prefix
    };
    format!("{} {}", prefix, date.format("%Y-%m-%d"))
}
