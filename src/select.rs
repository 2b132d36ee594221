// src/select.rs
//! Article selection: keyword filter over the primary pool, similarity-based
//! acceptance, then replenishment from the fallback feed.
//!
//! Acceptance order is pool order. The primary pool is exhausted (or the target
//! reached) before the fallback feed is even read, and nothing is re-sorted.

use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::digest::{Digest, SelectedItem};
use crate::enrich::Enricher;
use crate::ingest::types::{FeedItem, FeedReader, SourcePool};
use crate::ingest::{pool_label, read_feed, read_pool};
use crate::relevance::{self, normalize_keywords};
use crate::similarity::{AcceptedSet, DEFAULT_SIMILARITY_THRESHOLD};

/// Text an item is compared by when checking for duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupBasis {
    /// Compare titles before any summarizer call; only accepted items get summarized.
    #[default]
    Title,
    /// Summarize each candidate and compare summaries; the summary is reused in the digest.
    Summary,
}

/// What the reader is interested in, fixed for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestConfig {
    /// Lowercased, trimmed, deduplicated.
    pub keywords: Vec<String>,
    pub target_count: usize,
    pub similarity_threshold: f32,
    pub dedup_basis: DedupBasis,
}

impl InterestConfig {
    pub fn new<S: AsRef<str>>(keywords: &[S], target_count: usize) -> Self {
        Self {
            keywords: normalize_keywords(keywords),
            target_count,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            dedup_basis: DedupBasis::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_dedup_basis(mut self, basis: DedupBasis) -> Self {
        self.dedup_basis = basis;
        self
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_items_selected_total",
            "Items accepted into a digest, labelled by pool."
        );
        describe_counter!(
            "digest_duplicates_skipped_total",
            "Candidates rejected as near-duplicates."
        );
    });
}

/// Step-wise acceptance: a text is accepted while there is room and it is not
/// a near-duplicate of anything accepted before it.
#[derive(Debug, Clone)]
pub struct Selector {
    accepted: AcceptedSet,
    target_count: usize,
    threshold: f32,
    skipped: usize,
}

impl Selector {
    pub fn new(interest: &InterestConfig) -> Self {
        Self {
            accepted: AcceptedSet::new(),
            target_count: interest.target_count,
            threshold: interest.similarity_threshold,
            skipped: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.accepted.len() >= self.target_count
    }

    pub fn accepted(&self) -> usize {
        self.accepted.len()
    }

    /// Number of candidates rejected as duplicates so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns true and records `text` if it is accepted.
    pub fn offer(&mut self, text: &str) -> bool {
        if self.is_full() {
            return false;
        }
        if self.accepted.is_duplicate(text, self.threshold) {
            self.skipped += 1;
            tracing::debug!(target: "select", text, "near-duplicate skipped");
            return false;
        }
        self.accepted.insert(text);
        true
    }
}

/// Offer each item's title in order until the selector is full.
pub fn take_distinct(selector: &mut Selector, pool: Vec<FeedItem>, out: &mut Vec<FeedItem>) {
    for item in pool {
        if selector.is_full() {
            break;
        }
        if selector.offer(&item.title) {
            out.push(item);
        }
    }
}

/// Reads feeds, selects, and enriches. One instance per run.
pub struct Pipeline {
    reader: Arc<dyn FeedReader>,
    enricher: Enricher,
}

impl Pipeline {
    pub fn new(reader: Arc<dyn FeedReader>, enricher: Enricher) -> Self {
        Self { reader, enricher }
    }

    /// Produce the digest. Never fails: missing or short feeds just yield fewer items.
    pub async fn select(
        &self,
        primary_urls: &[String],
        fallback_url: &str,
        interest: &InterestConfig,
    ) -> Digest {
        ensure_metrics_described();

        let primary = read_pool(self.reader.as_ref(), primary_urls, SourcePool::Primary).await;
        let primary_len = primary.len();
        let outcome = relevance::filter(primary, &interest.keywords);
        tracing::info!(
            target: "select",
            primary = primary_len,
            matched = outcome.matched,
            fell_back = outcome.fell_back,
            "primary pool filtered"
        );

        let mut selector = Selector::new(interest);
        let mut digest = Digest {
            advisory: outcome.fell_back,
            items: Vec::with_capacity(interest.target_count),
        };

        self.accept_from(&mut selector, outcome.items, interest.dedup_basis, &mut digest.items)
            .await;

        if !selector.is_full() {
            let fallback = read_feed(self.reader.as_ref(), fallback_url, SourcePool::Fallback).await;
            tracing::info!(
                target: "select",
                accepted = selector.accepted(),
                wanted = interest.target_count,
                fallback = fallback.len(),
                "replenishing from fallback feed"
            );
            self.accept_from(&mut selector, fallback, interest.dedup_basis, &mut digest.items)
                .await;
        }

        for it in &digest.items {
            counter!("digest_items_selected_total", "pool" => pool_label(it.pool)).increment(1);
        }
        counter!("digest_duplicates_skipped_total").increment(selector.skipped() as u64);

        tracing::info!(
            target: "select",
            selected = digest.items.len(),
            skipped = selector.skipped(),
            advisory = digest.advisory,
            "selection done"
        );
        digest
    }

    async fn accept_from(
        &self,
        selector: &mut Selector,
        pool: Vec<FeedItem>,
        basis: DedupBasis,
        out: &mut Vec<SelectedItem>,
    ) {
        match basis {
            DedupBasis::Title => {
                let mut accepted = Vec::new();
                take_distinct(selector, pool, &mut accepted);
                out.extend(self.enricher.enrich_all(&accepted).await);
            }
            DedupBasis::Summary => {
                for item in pool {
                    if selector.is_full() {
                        break;
                    }
                    let summary = self.enricher.try_enrich(&item).await;
                    // A failed summary would make every failed item look alike; compare by title instead.
                    let text = summary.as_deref().unwrap_or(item.title.as_str());
                    if selector.offer(text) {
                        out.push(SelectedItem::new(item, summary));
                    }
                }
            }
        }
    }
}
