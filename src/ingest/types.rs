// src/ingest/types.rs
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::Article;

/// Feed-level failure: aborts the whole ingestion run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0} API key is not set")]
    MissingApiKey(&'static str),

    #[error("feed request failed: {0}")]
    Transport(String),

    #[error("feed returned status {status}")]
    Status { status: u16 },

    #[error("malformed feed response: {0}")]
    Malformed(String),
}

/// Why a single raw record was not turned into an article.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),
}

/// One upstream news feed: fetches raw records and knows its own record shape.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Raw article records for `category`, untouched.
    async fn fetch_raw(&self, category: &str) -> Result<Vec<Value>, FeedError>;

    /// Map one raw record into an article, or say why it has to be skipped.
    fn normalize(&self, raw: &Value, category: &str) -> Result<Article, SkipReason>;

    fn name(&self) -> &'static str;
}

pub type DynFeedProvider = Arc<dyn FeedProvider>;
