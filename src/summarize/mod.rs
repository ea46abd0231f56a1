// src/summarize/mod.rs
//! Summarizer abstraction + concrete upstream clients.

pub mod huggingface;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{SummarizerConfig, SummarizerKind};

pub use huggingface::HuggingFaceSummarizer;
pub use openai::OpenAiSummarizer;

/// Fixed per-call bound for summarization requests.
pub const SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer API key is not configured")]
    ConfigurationMissing,

    #[error("article content is empty")]
    EmptyInput,

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("unexpected status code {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("no summary returned")]
    EmptySummary,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense `text` into a non-empty summary.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
    fn name(&self) -> &'static str;
}

pub type DynSummarizer = Arc<dyn Summarizer>;

/// Factory: one concrete client per upstream, selected by configuration.
pub fn build_summarizer(cfg: &SummarizerConfig) -> DynSummarizer {
    match cfg.kind {
        SummarizerKind::HuggingFace => Arc::new(HuggingFaceSummarizer::new(cfg)),
        SummarizerKind::OpenAi => Arc::new(OpenAiSummarizer::new(cfg)),
    }
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("personal-news-service/", env!("CARGO_PKG_VERSION")))
        .timeout(SUMMARIZE_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Shared checks performed before any request goes out.
pub(crate) fn precheck<'a>(api_key: Option<&'a str>, text: &str) -> Result<&'a str, SummarizeError> {
    let key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(SummarizeError::ConfigurationMissing)?;
    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyInput);
    }
    Ok(key)
}

/// Send a prepared request and return the body of a successful response.
pub(crate) async fn send(req: reqwest::RequestBuilder) -> Result<String, SummarizeError> {
    let t0 = std::time::Instant::now();
    let resp = req
        .send()
        .await
        .map_err(|e| SummarizeError::TransportFailure(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| SummarizeError::TransportFailure(e.to_string()))?;
    metrics::histogram!("summarize_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    tracing::debug!(status = status.as_u16(), bytes = body.len(), "summarizer response");
    if !status.is_success() {
        return Err(SummarizeError::UpstreamError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Trimmed summary, or `EmptySummary` when nothing usable is left.
pub(crate) fn usable(text: Option<&str>) -> Result<String, SummarizeError> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(SummarizeError::EmptySummary),
    }
}
