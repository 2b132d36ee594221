// tests/metrics_textfile.rs
// One test per binary: the Prometheus recorder is process-global.
use std::fs;
use std::sync::Arc;

use news_digest::enrich::{Enricher, MockSummarizer};
use news_digest::ingest::StaticFeedReader;
use news_digest::telemetry::Metrics;
use news_digest::{InterestConfig, Pipeline, RawItem};

#[tokio::test]
async fn run_counters_land_in_the_textfile() {
    let metrics = Metrics::init().expect("recorder installs once");

    let reader = StaticFeedReader::new()
        .with_feed(
            "https://primary.example/rss",
            vec![
                RawItem::new("Harbour bridge reopens", "https://primary.example/1"),
                RawItem::new("harbour bridge reopens today", "https://primary.example/2"),
                RawItem::new("Fail-me: council vote", "https://primary.example/3"),
            ],
        );
    let pipeline = Pipeline::new(
        Arc::new(reader),
        Enricher::new(Arc::new(MockSummarizer::new().failing_on("Fail-me")), "{title}"),
    );

    let urls = vec!["https://primary.example/rss".to_string()];
    // The ranking feed has no snapshot, so it counts as a feed error.
    let digest = pipeline
        .select(&urls, "https://ranking.example/rss", &InterestConfig::new::<&str>(&[], 5))
        .await;
    assert_eq!(digest.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("digest.prom");
    metrics.write_textfile(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    for needle in [
        "digest_items_read_total",
        "digest_feed_errors_total",
        "digest_items_selected_total",
        "digest_duplicates_skipped_total",
        "digest_summary_failures_total",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
    assert!(!path.with_extension("prom.tmp").exists(), "tmp file renamed away");
}
