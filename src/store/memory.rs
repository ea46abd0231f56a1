// src/store/memory.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ensure_persistable, Store};
use crate::model::{Article, Stored, UserInteraction, UserPreference};

#[derive(Default)]
struct Tables {
    next_id: u64,
    articles: Vec<Stored<Article>>,
    preferences: Vec<Stored<UserPreference>>,
    interactions: Vec<Stored<UserInteraction>>,
}

impl Tables {
    fn wrap<T>(&mut self, record: T) -> Stored<T> {
        self.next_id += 1;
        Stored {
            id: self.next_id,
            created_at: Utc::now(),
            record,
        }
    }
}

/// Process-local store; writes are serialized by the lock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn article_count(&self) -> usize {
        self.tables.read().await.articles.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_article(&self, article: Article) -> Result<Stored<Article>> {
        ensure_persistable(&article)?;
        let mut t = self.tables.write().await;
        let row = t.wrap(article);
        t.articles.push(row.clone());
        Ok(row)
    }

    async fn articles_in_categories(&self, categories: &[String]) -> Result<Vec<Stored<Article>>> {
        let t = self.tables.read().await;
        Ok(t.articles
            .iter()
            .filter(|a| categories.iter().any(|c| *c == a.record.category))
            .cloned()
            .collect())
    }

    async fn create_preference(&self, pref: UserPreference) -> Result<Stored<UserPreference>> {
        let mut t = self.tables.write().await;
        let row = t.wrap(pref);
        t.preferences.push(row.clone());
        Ok(row)
    }

    async fn preferences_for_user(&self, user_id: u64) -> Result<Vec<Stored<UserPreference>>> {
        let t = self.tables.read().await;
        Ok(t.preferences
            .iter()
            .filter(|p| p.record.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_interaction(
        &self,
        interaction: UserInteraction,
    ) -> Result<Stored<UserInteraction>> {
        let mut t = self.tables.write().await;
        let row = t.wrap(interaction);
        t.interactions.push(row.clone());
        Ok(row)
    }

    async fn interactions_for_user(&self, user_id: u64) -> Result<Vec<Stored<UserInteraction>>> {
        let t = self.tables.read().await;
        Ok(t.interactions
            .iter()
            .filter(|i| i.record.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(category: &str, url: &str) -> Article {
        Article {
            title: "t".into(),
            content: "summary".into(),
            category: category.into(),
            source: "s".into(),
            url: url.into(),
        }
    }

    #[tokio::test]
    async fn ids_increase_and_category_query_filters() {
        let store = InMemoryStore::new();
        let a = store.create_article(article("business", "u1")).await.unwrap();
        let b = store.create_article(article("sports", "u2")).await.unwrap();
        assert!(b.id > a.id);

        let got = store
            .articles_in_categories(&["business".to_string()])
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].record.url, "u1");
        assert!(store.articles_in_categories(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_article_with_empty_content() {
        let store = InMemoryStore::new();
        let mut a = article("business", "u1");
        a.content.clear();
        assert!(store.create_article(a).await.is_err());
        assert_eq!(store.article_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_preferences_are_kept() {
        let store = InMemoryStore::new();
        for freq in [1, 3] {
            store
                .create_preference(UserPreference {
                    user_id: 9,
                    category: "business".into(),
                    frequency: freq,
                })
                .await
                .unwrap();
        }
        let prefs = store.preferences_for_user(9).await.unwrap();
        assert_eq!(prefs.len(), 2);
        assert!(store.preferences_for_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn interactions_are_per_user() {
        let store = InMemoryStore::new();
        store
            .create_interaction(UserInteraction {
                user_id: 1,
                news_id: 4,
                action: "click".into(),
                duration_seconds: 12,
            })
            .await
            .unwrap();
        assert_eq!(store.interactions_for_user(1).await.unwrap().len(), 1);
        assert!(store.interactions_for_user(2).await.unwrap().is_empty());
    }
}
