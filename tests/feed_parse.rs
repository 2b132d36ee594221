// tests/feed_parse.rs
use news_digest::ingest::rss::parse_feed;
use news_digest::ingest::types::SourcePool;
use news_digest::ingest::{read_feed, StaticFeedReader};
use std::fs;

#[test]
fn parses_rss_fixture() {
    let xml = fs::read_to_string("tests/fixtures/primary_rss.xml").expect("fixture");
    let items = parse_feed(&xml).expect("ok");

    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Rust 1.90 released with faster builds",
            "Chipmaker profits beat estimates",
            "Open source AI model tops benchmark",
        ],
        "blank titles are skipped, markup and entities cleaned"
    );
    assert_eq!(items[0].link, "https://techwire.example/rust-190");
    assert_eq!(
        items[1].published_at.map(|d| d.to_rfc3339()),
        Some("2025-06-09T23:15:00+00:00".to_string())
    );
    assert!(items[2].published_at.is_none());
}

#[test]
fn parses_atom_fixture() {
    let xml = fs::read_to_string("tests/fixtures/atom.xml").expect("fixture");
    let items = parse_feed(&xml).expect("ok");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Telescope spots new comet");
    assert_eq!(items[0].link, "https://science.example/comet", "alternate link wins");
    assert_eq!(
        items[0].published_at.map(|d| d.to_rfc3339()),
        Some("2025-06-10T04:30:00+00:00".to_string())
    );
    assert_eq!(items[1].link, "https://science.example/glacier");
    assert!(items[1].published_at.is_some(), "updated used when published is absent");
}

#[test]
fn malformed_feed_is_an_error_for_the_parser() {
    let xml = fs::read_to_string("tests/fixtures/malformed.xml").expect("fixture");
    assert!(parse_feed(&xml).is_err());
}

#[tokio::test]
async fn unreachable_feed_reads_as_empty_pool() {
    let reader = StaticFeedReader::new();
    let items = read_feed(&reader, "https://down.example/rss", SourcePool::Fallback).await;
    assert!(items.is_empty());
}
