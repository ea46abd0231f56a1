// src/ingest/mod.rs
//! Ingestion pipeline: fetch → normalize → summarize → persist.
//!
//! Feed-level errors abort the run; everything after the fetch is isolated
//! per article and only ever logged and counted.

pub mod normalize;
pub mod providers;
pub mod scheduler;
pub mod types;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::ingest::types::{DynFeedProvider, FeedError, FeedProvider, SkipReason};
use crate::model::Article;
use crate::store::{DynStore, Store};
use crate::summarize::{DynSummarizer, SummarizeError, Summarizer};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_runs_total", "Ingestion runs started.");
        describe_counter!("ingest_feed_errors_total", "Runs aborted by a feed error.");
        describe_counter!("ingest_fetched_total", "Raw records returned by the feed.");
        describe_counter!("ingest_skipped_total", "Records skipped by normalization.");
        describe_counter!(
            "ingest_summarize_failed_total",
            "Articles dropped because summarization failed."
        );
        describe_counter!("ingest_store_failed_total", "Articles the store rejected.");
        describe_counter!("ingest_stored_total", "Articles persisted.");
        describe_gauge!("ingest_last_run_ts", "Unix ts when the last run finished.");
        describe_histogram!("summarize_ms", "Summarizer round-trip in milliseconds.");
    });
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Stored on every article of the run and passed to the feed as filter.
    pub category: String,
    /// Articles normalized + summarized at once; outcomes still apply in feed order.
    pub concurrency: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            category: "business".to_string(),
            concurrency: 1,
        }
    }
}

impl From<&AppConfig> for IngestOptions {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            category: cfg.feed.category.clone(),
            concurrency: cfg.ingest.concurrency.max(1),
        }
    }
}

/// Per-run tally. Logged and exported; never returned to HTTP callers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub fetched: usize,
    pub skipped: usize,
    pub summarize_failed: usize,
    pub store_failed: usize,
    pub stored: usize,
}

enum Prepared {
    Ready(Article),
    Skipped(SkipReason),
    SummaryFailed { url: String, error: SummarizeError },
}

async fn prepare(
    feed: &dyn FeedProvider,
    summarizer: &dyn Summarizer,
    raw: &Value,
    category: &str,
) -> Prepared {
    let mut article = match feed.normalize(raw, category) {
        Ok(a) => a,
        Err(reason) => return Prepared::Skipped(reason),
    };
    match summarizer.summarize(&article.content).await {
        Ok(summary) => {
            article.content = summary;
            Prepared::Ready(article)
        }
        Err(error) => Prepared::SummaryFailed {
            url: article.url,
            error,
        },
    }
}

/// Run one ingestion cycle over a single feed call.
pub async fn run_once(
    feed: &dyn FeedProvider,
    summarizer: &dyn Summarizer,
    store: &dyn Store,
    opts: &IngestOptions,
) -> Result<IngestReport, FeedError> {
    ensure_metrics_described();
    counter!("ingest_runs_total").increment(1);
    let provider = feed.name();

    let raw = match feed.fetch_raw(&opts.category).await {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(provider, error = %e, "feed fetch failed; aborting ingestion run");
            counter!("ingest_feed_errors_total").increment(1);
            return Err(e);
        }
    };

    let mut report = IngestReport {
        fetched: raw.len(),
        ..Default::default()
    };
    let category = opts.category.as_str();

    // Item futures are boxed: the run must stay `Send` for `tokio::spawn` and axum handlers.
    let mut prepared = stream::iter(raw.into_iter().enumerate())
        .map(move |(idx, rec)| {
            async move { (idx, prepare(feed, summarizer, &rec, category).await) }.boxed()
        })
        .buffered(opts.concurrency.max(1));

    while let Some((idx, outcome)) = prepared.next().await {
        match outcome {
            Prepared::Skipped(reason) => {
                report.skipped += 1;
                tracing::warn!(provider, index = idx, reason = %reason, "skipping article");
            }
            Prepared::SummaryFailed { url, error } => {
                report.summarize_failed += 1;
                tracing::warn!(
                    provider,
                    index = idx,
                    url = %url,
                    error = %error,
                    "summarization failed; article not stored"
                );
            }
            Prepared::Ready(article) => {
                let url = article.url.clone();
                match store.create_article(article).await {
                    Ok(row) => {
                        report.stored += 1;
                        tracing::debug!(
                            provider,
                            index = idx,
                            id = row.id,
                            url = %url,
                            "article stored"
                        );
                    }
                    Err(e) => {
                        report.store_failed += 1;
                        tracing::warn!(
                            provider,
                            index = idx,
                            url = %url,
                            error = ?e,
                            "storing article failed"
                        );
                    }
                }
            }
        }
    }

    counter!("ingest_fetched_total").increment(report.fetched as u64);
    counter!("ingest_skipped_total").increment(report.skipped as u64);
    counter!("ingest_summarize_failed_total").increment(report.summarize_failed as u64);
    counter!("ingest_store_failed_total").increment(report.store_failed as u64);
    counter!("ingest_stored_total").increment(report.stored as u64);
    gauge!("ingest_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    tracing::info!(
        target: "ingest",
        provider,
        summarizer = summarizer.name(),
        fetched = report.fetched,
        skipped = report.skipped,
        summarize_failed = report.summarize_failed,
        store_failed = report.store_failed,
        stored = report.stored,
        "ingestion run finished"
    );
    Ok(report)
}

/// Everything one run needs, bundled for the HTTP layer and the scheduler.
#[derive(Clone)]
pub struct Ingestor {
    feed: DynFeedProvider,
    summarizer: DynSummarizer,
    store: DynStore,
    options: IngestOptions,
}

impl Ingestor {
    pub fn new(
        feed: DynFeedProvider,
        summarizer: DynSummarizer,
        store: DynStore,
        options: IngestOptions,
    ) -> Self {
        Self {
            feed,
            summarizer,
            store,
            options,
        }
    }

    pub async fn run(&self) -> Result<IngestReport, FeedError> {
        run_once(
            self.feed.as_ref(),
            self.summarizer.as_ref(),
            self.store.as_ref(),
            &self.options,
        )
        .await
    }
}
