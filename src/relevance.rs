// src/relevance.rs
//! Keyword relevance filter over item titles.

use crate::ingest::types::FeedItem;

/// Result of filtering a pool against the interest keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub items: Vec<FeedItem>,
    /// Number of items whose title matched at least one keyword.
    pub matched: usize,
    /// Keywords were configured but nothing matched, so `items` is the unfiltered input.
    pub fell_back: bool,
}

/// Lowercase, trim, drop empties and duplicates. Order of first appearance is kept.
pub fn normalize_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for k in raw {
        let k = k.as_ref().trim().to_lowercase();
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

/// Case-insensitive substring match of any keyword in `title`.
/// `keywords` are expected to be lowercase already (see `normalize_keywords`).
pub fn title_matches(title: &str, keywords: &[String]) -> bool {
    let folded = title.to_lowercase();
    keywords.iter().any(|k| folded.contains(k.as_str()))
}

/// Keep the items whose title contains a keyword.
///
/// - no keywords: pass-through
/// - zero matches: the input is returned unchanged and `fell_back` is set,
///   so a topical miss never empties the digest
pub fn filter(items: Vec<FeedItem>, keywords: &[String]) -> FilterOutcome {
    if keywords.is_empty() {
        return FilterOutcome {
            items,
            matched: 0,
            fell_back: false,
        };
    }

    let kept: Vec<FeedItem> = items
        .iter()
        .filter(|it| title_matches(&it.title, keywords))
        .cloned()
        .collect();

    if kept.is_empty() {
        tracing::info!(
            target: "relevance",
            pool = items.len(),
            keywords = keywords.len(),
            "no keyword match, using unfiltered pool"
        );
        return FilterOutcome {
            items,
            matched: 0,
            fell_back: true,
        };
    }

    FilterOutcome {
        matched: kept.len(),
        items: kept,
        fell_back: false,
    }
}
