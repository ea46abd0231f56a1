// src/config/feed.rs
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    #[default]
    NewsApi,
    Guardian,
}

impl FromStr for FeedKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "newsapi" => Ok(Self::NewsApi),
            "guardian" => Ok(Self::Guardian),
            other => Err(anyhow!("unsupported feed provider: {other}")),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    #[serde(rename = "provider")]
    pub kind: FeedKind,
    pub api_key: Option<String>,
    /// Overrides the provider's public endpoint (tests, proxies).
    pub base_url: Option<String>,
    pub category: String,
    pub country: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: FeedKind::default(),
            api_key: None,
            base_url: None,
            category: "business".to_string(),
            country: "us".to_string(),
        }
    }
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("category", &self.category)
            .field("country", &self.country)
            .finish()
    }
}
