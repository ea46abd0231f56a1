// src/ingest/providers/guardian.rs
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use super::{fetch_json, http_client, records_at};
use crate::config::FeedConfig;
use crate::ingest::normalize::{str_at, text_at};
use crate::ingest::types::{FeedError, FeedProvider, SkipReason};
use crate::model::Article;

const DEFAULT_BASE_URL: &str = "https://content.guardianapis.com";

pub const GUARDIAN_SOURCE: &str = "The Guardian";

/// Shape B, decoded: `{webUrl, fields: {headline, bodyText}}`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GuardianRecord {
    pub headline: Option<String>,
    pub web_url: Option<String>,
    pub body_text: Option<String>,
}

impl GuardianRecord {
    pub fn decode(raw: &Value) -> Result<Self, SkipReason> {
        if !raw.is_object() {
            return Err(SkipReason::NotAnObject);
        }
        Ok(Self {
            headline: text_at(raw, &["fields", "headline"]),
            web_url: str_at(raw, &["webUrl"]),
            body_text: text_at(raw, &["fields", "bodyText"]),
        })
    }

    /// Body text is mandatory here: no placeholder.
    pub fn into_article(self, category: &str) -> Result<Article, SkipReason> {
        let title = self
            .headline
            .ok_or(SkipReason::MissingField("fields.headline"))?;
        let url = self.web_url.ok_or(SkipReason::MissingField("webUrl"))?;
        let content = self
            .body_text
            .ok_or(SkipReason::MissingField("fields.bodyText"))?;
        Ok(Article {
            title,
            content,
            category: category.to_string(),
            source: GUARDIAN_SOURCE.to_string(),
            url,
        })
    }
}

/// Guardian content API, one section per category. Requires `GUARDIAN_API_KEY`.
pub struct GuardianProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GuardianProvider {
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
        }
    }
}

impl fmt::Debug for GuardianProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardianProvider")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl FeedProvider for GuardianProvider {
    async fn fetch_raw(&self, category: &str) -> Result<Vec<Value>, FeedError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(FeedError::MissingApiKey("Guardian"))?;
        let req = self.http.get(format!("{}/search", self.base_url)).query(&[
            ("section", category),
            ("show-fields", "headline,bodyText"),
            ("api-key", key),
        ]);
        let doc = fetch_json(req, self.name()).await?;
        records_at(doc, &["response", "results"])
    }

    fn normalize(&self, raw: &Value, category: &str) -> Result<Article, SkipReason> {
        GuardianRecord::decode(raw)?.into_article(category)
    }

    fn name(&self) -> &'static str {
        "guardian"
    }
}
