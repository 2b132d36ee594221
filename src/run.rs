// src/run.rs
//! One digest run: wire collaborators from settings, select, compose, dispatch.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use metrics::{counter, describe_counter};

use crate::config::{Secrets, Settings, SummarizerProvider};
use crate::digest::{self, Digest};
use crate::enrich::{DynSummarizer, Enricher, MockSummarizer, OpenAiSummarizer};
use crate::ingest::article::HttpArticleScraper;
use crate::ingest::rss::HttpFeedReader;
use crate::notify::{Channel, Dispatcher, DynDispatcher, EmailDispatcher, PushDispatcher, StdoutDispatcher};
use crate::select::Pipeline;

/// What a run produced and delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub subject: String,
    pub digest: Digest,
    /// Items carrying the placeholder instead of a summary.
    pub placeholders: usize,
}

pub fn build_summarizer(settings: &Settings, secrets: &Secrets) -> Result<DynSummarizer> {
    match settings.summarizer.provider {
        SummarizerProvider::Openai => {
            let key = secrets
                .openai_api_key
                .clone()
                .ok_or_else(|| anyhow!("openai summarizer needs OPENAI_API_KEY"))?;
            let s = OpenAiSummarizer::new(
                key,
                settings.summarizer.model.as_deref(),
                settings.summarizer.api_base.as_deref(),
            )?;
            Ok(Arc::new(s))
        }
        SummarizerProvider::Mock => Ok(Arc::new(MockSummarizer::new())),
    }
}

pub fn build_dispatcher(settings: &Settings, secrets: &Secrets) -> Result<DynDispatcher> {
    match settings.dispatch.channel {
        Channel::Email => {
            let email = secrets
                .email
                .as_ref()
                .ok_or_else(|| anyhow!("email channel needs SMTP credentials"))?;
            Ok(Arc::new(EmailDispatcher::new(email)?))
        }
        Channel::Push => {
            let url = settings
                .dispatch
                .push_url
                .clone()
                .ok_or_else(|| anyhow!("push channel needs dispatch.push_url"))?;
            let token = secrets
                .push_token
                .clone()
                .ok_or_else(|| anyhow!("push channel needs PUSH_TOKEN"))?;
            Ok(Arc::new(PushDispatcher::new(url, token)?))
        }
        Channel::Stdout => Ok(Arc::new(StdoutDispatcher)),
    }
}

/// Build the HTTP-backed pipeline described by `settings`. No network I/O happens here.
pub fn build_pipeline(settings: &Settings, summarizer: DynSummarizer) -> Result<Pipeline> {
    let http = &settings.http;
    let reader = HttpFeedReader::new(&http.user_agent, http.timeout_secs)?;
    let mut enricher = Enricher::new(summarizer, settings.prompt_template.clone());
    if settings.fetch_article_body {
        let scraper = HttpArticleScraper::new(&http.user_agent, http.timeout_secs)?;
        enricher = enricher.with_scraper(Arc::new(scraper));
    }
    Ok(Pipeline::new(Arc::new(reader), enricher))
}

/// Select, compose and deliver one digest. Only a dispatch failure is an error;
/// empty feeds and failed summaries still produce (and send) a digest.
pub async fn run_once(
    settings: &Settings,
    pipeline: &Pipeline,
    dispatcher: &dyn Dispatcher,
    today: NaiveDate,
) -> Result<RunReport> {
    describe_counter!("digest_runs_total", "Digest runs, labelled by outcome.");

    let interest = settings.interest();
    let digest = pipeline
        .select(&settings.rss_urls, &settings.ranking_rss_url, &interest)
        .await;

    let subject = digest::subject(&settings.dispatch.subject_prefix, today);
    let body = digest.body();
    let placeholders = digest.placeholders();

    tracing::info!(
        target: "notify",
        channel = dispatcher.name(),
        items = digest.len(),
        placeholders,
        advisory = digest.advisory,
        "dispatching digest"
    );

    if let Err(e) = dispatcher.send(&subject, &body).await {
        counter!("digest_runs_total", "outcome" => "dispatch_failed").increment(1);
        return Err(e).with_context(|| format!("dispatching digest via {}", dispatcher.name()));
    }
    counter!("digest_runs_total", "outcome" => "sent").increment(1);

    Ok(RunReport {
        subject,
        digest,
        placeholders,
    })
}
