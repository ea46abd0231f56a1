// src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical article record produced by a feed provider's normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String, // summary once the pipeline has run
    pub category: String,
    pub source: String,
    pub url: String,
}

impl Article {
    /// Every field must carry text before the article may be persisted.
    pub fn is_persistable(&self) -> bool {
        [
            &self.title,
            &self.content,
            &self.category,
            &self.source,
            &self.url,
        ]
        .iter()
        .all(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreference {
    pub user_id: u64,
    pub category: String,
    #[serde(default)]
    pub frequency: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInteraction {
    pub user_id: u64,
    pub news_id: u64,
    pub action: String, // e.g. "click", "like"
    #[serde(default)]
    pub duration_seconds: i64,
}

/// A record as held by the store: auto-assigned id and creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stored<T> {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: T,
}
