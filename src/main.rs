//! news-digest binary entrypoint.
//! Loads settings and secrets, runs one digest, exits non-zero on a fatal error.
//!
//! Scheduling is left to cron / CI; each invocation is one stateless run.

use std::path::PathBuf;

use anyhow::Context;
use news_digest::config::{load_settings_default, Secrets};
use news_digest::telemetry::{Metrics, ENV_METRICS_PATH};
use news_digest::run::{build_dispatcher, build_pipeline, build_summarizer, run_once};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `DIGEST_LOG_FORMAT=json` for line-delimited JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news_digest=info,warn"));

    let json = std::env::var("DIGEST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Everything fatal about configuration surfaces here, before any network I/O.
    let settings = load_settings_default().context("loading settings")?;
    let secrets = Secrets::from_env(&settings).context("reading secrets")?;
    tracing::info!(
        feeds = settings.rss_urls.len(),
        keywords = settings.keywords.len(),
        num_articles = settings.num_articles,
        channel = %settings.dispatch.channel,
        "settings loaded"
    );

    let metrics = Metrics::init()?;
    let summarizer = build_summarizer(&settings, &secrets)?;
    let dispatcher = build_dispatcher(&settings, &secrets)?;
    let pipeline = build_pipeline(&settings, summarizer)?;

    let today = chrono::Local::now().date_naive();
    let result = run_once(&settings, &pipeline, dispatcher.as_ref(), today).await;

    if let Ok(p) = std::env::var(ENV_METRICS_PATH) {
        if let Err(e) = metrics.write_textfile(&PathBuf::from(p)) {
            tracing::warn!(error = ?e, "could not write metrics file");
        }
    }

    let report = result?;
    tracing::info!(
        subject = %report.subject,
        items = report.digest.len(),
        placeholders = report.placeholders,
        "digest delivered"
    );
    Ok(())
}
