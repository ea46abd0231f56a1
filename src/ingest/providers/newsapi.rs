// src/ingest/providers/newsapi.rs
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use super::{fetch_json, http_client, records_at};
use crate::config::FeedConfig;
use crate::ingest::normalize::{str_at, text_at};
use crate::ingest::types::{FeedError, FeedProvider, SkipReason};
use crate::model::Article;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Substituted when a record carries no description.
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available.";

/// Shape A, decoded: `{title, description, source: {name}, url}`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NewsApiRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source_name: Option<String>,
    pub url: Option<String>,
}

impl NewsApiRecord {
    pub fn decode(raw: &Value) -> Result<Self, SkipReason> {
        if !raw.is_object() {
            return Err(SkipReason::NotAnObject);
        }
        Ok(Self {
            title: text_at(raw, &["title"]),
            description: text_at(raw, &["description"]),
            source_name: str_at(raw, &["source", "name"]),
            url: str_at(raw, &["url"]),
        })
    }

    pub fn into_article(self, category: &str) -> Result<Article, SkipReason> {
        let title = self.title.ok_or(SkipReason::MissingField("title"))?;
        let url = self.url.ok_or(SkipReason::MissingField("url"))?;
        let source = self
            .source_name
            .ok_or(SkipReason::MissingField("source.name"))?;
        Ok(Article {
            title,
            content: self
                .description
                .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
            category: category.to_string(),
            source,
            url,
        })
    }
}

/// NewsAPI top-headlines feed. Requires `NEWSAPI_KEY`.
pub struct NewsApiProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    country: String,
}

impl NewsApiProvider {
    pub fn new(cfg: &FeedConfig) -> Self {
        Self {
            http: http_client(),
            api_key: cfg.api_key.clone(),
            base_url: cfg
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            country: cfg.country.clone(),
        }
    }
}

impl fmt::Debug for NewsApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiProvider")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .finish()
    }
}

#[async_trait]
impl FeedProvider for NewsApiProvider {
    async fn fetch_raw(&self, category: &str) -> Result<Vec<Value>, FeedError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(FeedError::MissingApiKey("NewsAPI"))?;
        let req = self
            .http
            .get(format!("{}/v2/top-headlines", self.base_url))
            .query(&[
                ("country", self.country.as_str()),
                ("category", category),
                ("apiKey", key),
            ]);
        let doc = fetch_json(req, self.name()).await?;
        records_at(doc, &["articles"])
    }

    fn normalize(&self, raw: &Value, category: &str) -> Result<Article, SkipReason> {
        NewsApiRecord::decode(raw)?.into_article(category)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}
