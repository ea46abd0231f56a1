// src/store/mod.rs
//! Record store: create + query-by-field for articles, preferences and interactions.

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Article, Stored, UserInteraction, UserPreference};

pub use memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Persist an article; rejects articles with an empty required field.
    async fn create_article(&self, article: Article) -> Result<Stored<Article>>;

    /// Articles whose category is one of `categories`, oldest first.
    async fn articles_in_categories(&self, categories: &[String]) -> Result<Vec<Stored<Article>>>;

    async fn create_preference(&self, pref: UserPreference) -> Result<Stored<UserPreference>>;

    async fn preferences_for_user(&self, user_id: u64) -> Result<Vec<Stored<UserPreference>>>;

    async fn create_interaction(
        &self,
        interaction: UserInteraction,
    ) -> Result<Stored<UserInteraction>>;

    async fn interactions_for_user(&self, user_id: u64) -> Result<Vec<Stored<UserInteraction>>>;
}

pub type DynStore = Arc<dyn Store>;

/// Pick the backend from configuration: SQLite when a database URL is set
/// (and the `sqlite` feature is enabled), memory otherwise.
pub async fn open(database_url: Option<&str>) -> Result<DynStore> {
    match database_url {
        #[cfg(feature = "sqlite")]
        Some(url) => Ok(Arc::new(SqliteStore::connect(url).await?)),
        #[cfg(not(feature = "sqlite"))]
        Some(_) => {
            tracing::warn!("DATABASE_URL set but built without `sqlite`; using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        None => Ok(Arc::new(InMemoryStore::new())),
    }
}

pub(crate) fn ensure_persistable(article: &Article) -> Result<()> {
    if article.is_persistable() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "article '{}' has an empty required field",
            article.url
        ))
    }
}
