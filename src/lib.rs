// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod personalize;
pub mod store;
pub mod summarize;

pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::ingest::{run_once, IngestOptions, IngestReport, Ingestor};
pub use crate::model::{Article, Stored, UserInteraction, UserPreference};

use tracing::info;

/// Wire store, feed provider and summarizer from configuration.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let store = store::open(cfg.database_url.as_deref()).await?;
    let feed = ingest::providers::build_provider(&cfg.feed);
    let summarizer = summarize::build_summarizer(&cfg.summarizer);
    info!(
        feed = feed.name(),
        summarizer = summarizer.name(),
        category = %cfg.feed.category,
        feed_key = cfg.feed.api_key.is_some(),
        summarizer_key = cfg.summarizer.api_key.is_some(),
        summary_on_read = ?cfg.summary_on_read,
        "service configured"
    );
    let ingestor = Ingestor::new(feed, summarizer.clone(), store.clone(), IngestOptions::from(cfg));
    Ok(AppState {
        store,
        summarizer,
        ingestor,
        summary_on_read: cfg.summary_on_read,
    })
}

/// Build the HTTP app from the process configuration (no metrics, no background jobs).
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::load()?;
    Ok(router(build_state(&cfg).await?))
}
