// tests/digest_golden.rs
use news_digest::digest::{compose, ADVISORY_NOTE, NO_ITEMS_NOTE};
use news_digest::{SelectedItem, SourcePool};

fn sel(title: &str, link: &str, summary: &str, pool: SourcePool) -> SelectedItem {
    SelectedItem {
        title: title.into(),
        link: link.into(),
        pool,
        summary: summary.into(),
        summary_failed: summary == "summary unavailable",
    }
}

fn two_items() -> Vec<SelectedItem> {
    vec![
        sel(
            "Rust 1.90 released",
            "https://techwire.example/rust-190",
            "Faster builds and a new lint.",
            SourcePool::Primary,
        ),
        sel(
            "Heatwave grips the capital",
            "https://ranking.example/1",
            "summary unavailable",
            SourcePool::Fallback,
        ),
    ]
}

#[test]
fn items_render_in_order_separated_by_blank_line() {
    let body = compose(&two_items(), false);
    let expected = "\
Rust 1.90 released
https://techwire.example/rust-190
Faster builds and a new lint.

Heatwave grips the capital
https://ranking.example/1
summary unavailable";
    assert_eq!(body, expected);
}

#[test]
fn advisory_is_prepended() {
    let body = compose(&two_items(), true);
    assert!(body.starts_with(&format!("{ADVISORY_NOTE}\n\nRust 1.90 released\n")));
    assert!(body.ends_with("summary unavailable"));
}

#[test]
fn empty_digest_is_the_fixed_message() {
    assert_eq!(compose(&[], false), NO_ITEMS_NOTE);
    assert_eq!(compose(&[], true), format!("{ADVISORY_NOTE}\n\n{NO_ITEMS_NOTE}"));
}

#[test]
fn rendering_is_deterministic() {
    let items = two_items();
    assert_eq!(compose(&items, true), compose(&items.clone(), true));
}
