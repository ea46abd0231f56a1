// src/personalize.rs
//! Category-filtered article delivery. Not a ranking engine.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::model::{Article, Stored};
use crate::store::Store;
use crate::summarize::Summarizer;

/// What happens to the stored summary when articles are read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryOnRead {
    /// Summarize the stored content again on every read; keep it on failure.
    #[default]
    Resummarize,
    /// Serve the summary written at ingestion time.
    Cached,
}

impl FromStr for SummaryOnRead {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "resummarize" => Ok(Self::Resummarize),
            "cached" => Ok(Self::Cached),
            other => Err(anyhow!("unsupported summary-on-read policy: {other}")),
        }
    }
}

/// Stored articles in any of `categories`. An empty list yields nothing.
pub async fn personalized_news(
    store: &dyn Store,
    summarizer: &dyn Summarizer,
    categories: &[String],
    policy: SummaryOnRead,
) -> Result<Vec<Stored<Article>>> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }
    let mut news = store.articles_in_categories(categories).await?;

    if policy == SummaryOnRead::Resummarize {
        for item in news.iter_mut() {
            match summarizer.summarize(&item.record.content).await {
                Ok(summary) => item.record.content = summary,
                Err(e) => tracing::warn!(
                    id = item.id,
                    title = %item.record.title,
                    error = %e,
                    "re-summarization failed; serving stored content"
                ),
            }
        }
    }
    Ok(news)
}

/// Resolve the user's preferred categories (first-seen order, no repeats)
/// and serve [`personalized_news`] for them.
pub async fn news_for_user(
    store: &dyn Store,
    summarizer: &dyn Summarizer,
    user_id: u64,
    policy: SummaryOnRead,
) -> Result<Vec<Stored<Article>>> {
    let prefs = store.preferences_for_user(user_id).await?;
    let mut categories: Vec<String> = Vec::with_capacity(prefs.len());
    for p in prefs {
        if !categories.contains(&p.record.category) {
            categories.push(p.record.category);
        }
    }
    tracing::debug!(user_id, categories = ?categories, "personalized news query");
    personalized_news(store, summarizer, &categories, policy).await
}
