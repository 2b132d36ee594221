// src/ingest/rss.rs
//! HTTP feed reader: RSS 2.0 `<channel><item>` and Atom `<feed><entry>` documents.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::ingest::normalize_text;
use crate::ingest::types::{FeedReader, RawItem};

pub const DEFAULT_USER_AGENT: &str = "news-digest/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

fn parse_rfc3339(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Some feeds ship HTML entities that are not valid XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

fn clean_item(title: Option<&str>, link: Option<&str>) -> Option<(String, String)> {
    let title = normalize_text(title.unwrap_or_default());
    let link = link.unwrap_or_default().trim().to_string();
    if title.is_empty() || link.is_empty() {
        return None;
    }
    Some((title, link))
}

fn parse_rss(xml: &str) -> Result<Vec<RawItem>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    Ok(rss
        .channel
        .item
        .into_iter()
        .filter_map(|it| {
            let (title, link) = clean_item(it.title.as_deref(), it.link.as_deref())?;
            Some(RawItem {
                title,
                link,
                published_at: it.pub_date.as_deref().and_then(parse_rfc2822),
            })
        })
        .collect())
}

fn parse_atom(xml: &str) -> Result<Vec<RawItem>> {
    let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
    Ok(feed
        .entry
        .into_iter()
        .filter_map(|e| {
            let link = e
                .links
                .iter()
                .find(|l| l.rel.as_deref().unwrap_or("alternate") == "alternate")
                .or_else(|| e.links.first())
                .map(|l| l.href.as_str());
            let title = e.title.as_ref().map(|t| t.value.as_str());
            let (title, link) = clean_item(title, link)?;
            let published_at = e
                .published
                .as_deref()
                .or(e.updated.as_deref())
                .and_then(parse_rfc3339);
            Some(RawItem {
                title,
                link,
                published_at,
            })
        })
        .collect())
}

/// Parse a feed document. Atom is detected by its root element; everything
/// else is treated as RSS 2.0.
pub fn parse_feed(content: &str) -> Result<Vec<RawItem>> {
    let xml = scrub_html_entities_for_xml(content);
    let head = xml.chars().take(512).collect::<String>().to_ascii_lowercase();
    if head.contains("<feed") && !head.contains("<rss") {
        parse_atom(&xml)
    } else {
        parse_rss(&xml)
    }
}

pub struct HttpFeedReader {
    client: reqwest::Client,
}

impl HttpFeedReader {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building feed http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn read(&self, url: &str) -> Result<Vec<RawItem>> {
        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("feed {url} answered {status}"));
        }
        let body = resp.text().await.context("feed body .text()")?;
        let items = parse_feed(&body).with_context(|| format!("feed {url}"))?;
        tracing::debug!(
            target: "ingest",
            %url,
            items = items.len(),
            ms = t0.elapsed().as_millis() as u64,
            "fetched feed"
        );
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
