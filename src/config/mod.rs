// src/config/mod.rs
//! Process configuration, built once at start-up and handed to each component.
//!
//! Precedence (lowest first): built-in defaults, optional TOML file
//! (`$APP_CONFIG_PATH`, else `config/app.toml`), environment variables.

pub mod feed;
pub mod summarizer;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use feed::{FeedConfig, FeedKind};
pub use summarizer::{SummarizerConfig, SummarizerKind};

use crate::personalize::SummaryOnRead;

const ENV_PATH: &str = "APP_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/app.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Articles normalized + summarized at once within one run.
    pub concurrency: usize,
    pub on_start: bool,
    /// `0` means no periodic runs, same as unset.
    pub interval_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            on_start: true,
            interval_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub summarizer: SummarizerConfig,
    pub ingest: IngestConfig,
    pub summary_on_read: SummaryOnRead,
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Load from the default file location (if any) and the process environment.
    pub fn load() -> Result<Self> {
        let base = match std::env::var(ENV_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("APP_CONFIG_PATH points to non-existent path"));
                }
                Self::from_file(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_PATH);
                if pb.exists() {
                    Self::from_file(&pb)?
                } else {
                    Self::default()
                }
            }
        };
        base.with_overrides(|k| std::env::var(k).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply key/value overrides (normally the environment) on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("FEED_PROVIDER") {
            self.feed.kind = v.parse()?;
        }
        let feed_key = match self.feed.kind {
            FeedKind::NewsApi => "NEWSAPI_KEY",
            FeedKind::Guardian => "GUARDIAN_API_KEY",
        };
        if let Some(v) = get(feed_key) {
            self.feed.api_key = Some(v);
        }
        if let Some(v) = get("FEED_BASE_URL") {
            self.feed.base_url = Some(v);
        }
        if let Some(v) = get("FEED_CATEGORY") {
            self.feed.category = v;
        }
        if let Some(v) = get("FEED_COUNTRY") {
            self.feed.country = v;
        }

        if let Some(v) = get("SUMMARIZER_PROVIDER") {
            self.summarizer.kind = v.parse()?;
        }
        let summarizer_key = match self.summarizer.kind {
            SummarizerKind::HuggingFace => "HUGGINGFACE_API_KEY",
            SummarizerKind::OpenAi => "OPENAI_API_KEY",
        };
        if let Some(v) = get(summarizer_key) {
            self.summarizer.api_key = Some(v);
        }
        if let Some(v) = get("SUMMARIZER_BASE_URL") {
            self.summarizer.base_url = Some(v);
        }
        if let Some(v) = get("SUMMARIZER_MODEL") {
            self.summarizer.model = Some(v);
        }

        if let Some(v) = get("SUMMARY_ON_READ") {
            self.summary_on_read = v.parse()?;
        }
        if let Some(v) = get("INGEST_CONCURRENCY") {
            self.ingest.concurrency = v
                .parse()
                .with_context(|| format!("INGEST_CONCURRENCY={v}"))?;
        }
        if let Some(v) = get("INGEST_ON_START") {
            self.ingest.on_start = parse_bool(&v)?;
        }
        if let Some(v) = get("INGEST_INTERVAL_SECS") {
            let secs: u64 = v
                .parse()
                .with_context(|| format!("INGEST_INTERVAL_SECS={v}"))?;
            self.ingest.interval_secs = (secs > 0).then_some(secs);
        }
        if let Some(v) = get("DATABASE_URL") {
            self.database_url = Some(v);
        }

        self.ingest.concurrency = self.ingest.concurrency.max(1);
        self.ingest.interval_secs = self.ingest.interval_secs.filter(|s| *s > 0);
        Ok(self)
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("not a boolean: {other}")),
    }
}
