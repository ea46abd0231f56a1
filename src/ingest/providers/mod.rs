// src/ingest/providers/mod.rs
pub mod guardian;
pub mod newsapi;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::{FeedConfig, FeedKind};
use crate::ingest::types::{DynFeedProvider, FeedError};

pub use guardian::GuardianProvider;
pub use newsapi::NewsApiProvider;

/// Factory: the active feed is picked by configuration.
pub fn build_provider(cfg: &FeedConfig) -> DynFeedProvider {
    match cfg.kind {
        FeedKind::NewsApi => Arc::new(NewsApiProvider::new(cfg)),
        FeedKind::Guardian => Arc::new(GuardianProvider::new(cfg)),
    }
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("personal-news-service/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default()
}

/// GET + status check + top-level JSON decode. Any failure here is fatal for the run.
pub(crate) async fn fetch_json(
    req: reqwest::RequestBuilder,
    provider: &'static str,
) -> Result<Value, FeedError> {
    let resp = req
        .send()
        .await
        .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(provider, status = status.as_u16(), "feed returned non-success status");
        return Err(FeedError::Status {
            status: status.as_u16(),
        });
    }
    let body = resp
        .text()
        .await
        .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;
    tracing::debug!(provider, bytes = body.len(), "feed response received");
    serde_json::from_str(&body).map_err(|e| FeedError::Malformed(e.to_string()))
}

/// Take the article array found at `path`.
pub(crate) fn records_at(mut doc: Value, path: &[&str]) -> Result<Vec<Value>, FeedError> {
    for key in path {
        doc = match doc {
            Value::Object(mut o) => o.remove(*key).unwrap_or(Value::Null),
            _ => Value::Null,
        };
    }
    match doc {
        Value::Array(items) => Ok(items),
        other => Err(FeedError::Malformed(format!(
            "`{}` is not an array (got {})",
            path.join("."),
            json_kind(&other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
