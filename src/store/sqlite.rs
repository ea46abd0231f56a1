// src/store/sqlite.rs
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::{ensure_persistable, Store};
use crate::model::{Article, Stored, UserInteraction, UserPreference};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT NOT NULL,
        source TEXT NOT NULL,
        url TEXT NOT NULL
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_articles_category ON articles (category)"#,
    r#"
    CREATE TABLE IF NOT EXISTS user_preferences (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        user_id INTEGER NOT NULL,
        category TEXT NOT NULL,
        frequency INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_interactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        user_id INTEGER NOT NULL,
        news_id INTEGER NOT NULL,
        action TEXT NOT NULL,
        duration_seconds INTEGER NOT NULL
    )
    "#,
];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect (creating the file if needed) and run migrations.
    pub async fn connect(url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("parsing database url {url}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .context("connecting to sqlite")?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .with_context(|| format!("running migration {i}"))?;
        }
        Ok(Self { pool })
    }

    /// Insert one row; `created_at` is bound first, then `binds` in order.
    async fn insert(&self, sql: &str, binds: Vec<Bind<'_>>) -> Result<(u64, DateTime<Utc>)> {
        let created_at = Utc::now();
        let mut q = sqlx::query(sql).bind(created_at.to_rfc3339());
        for b in binds {
            q = match b {
                Bind::Text(s) => q.bind(s),
                Bind::Int(i) => q.bind(i),
            };
        }
        let res = q.execute(&self.pool).await.context("insert")?;
        let id = u64::try_from(res.last_insert_rowid()).context("negative rowid")?;
        Ok((id, created_at))
    }
}

enum Bind<'a> {
    Text(&'a str),
    Int(i64),
}

fn to_i64(v: u64) -> Result<i64> {
    i64::try_from(v).context("id out of range for sqlite")
}

fn meta(row: &SqliteRow) -> Result<(u64, DateTime<Utc>)> {
    let id: i64 = row.try_get("id")?;
    let ts: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&ts)
        .with_context(|| format!("parsing created_at {ts}"))?
        .with_timezone(&Utc);
    Ok((u64::try_from(id)?, created_at))
}

fn article_row(row: &SqliteRow) -> Result<Stored<Article>> {
    let (id, created_at) = meta(row)?;
    Ok(Stored {
        id,
        created_at,
        record: Article {
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            category: row.try_get("category")?,
            source: row.try_get("source")?,
            url: row.try_get("url")?,
        },
    })
}

fn preference_row(row: &SqliteRow) -> Result<Stored<UserPreference>> {
    let (id, created_at) = meta(row)?;
    let user_id: i64 = row.try_get("user_id")?;
    let frequency: i64 = row.try_get("frequency")?;
    Ok(Stored {
        id,
        created_at,
        record: UserPreference {
            user_id: u64::try_from(user_id)?,
            category: row.try_get("category")?,
            frequency: i32::try_from(frequency)?,
        },
    })
}

fn interaction_row(row: &SqliteRow) -> Result<Stored<UserInteraction>> {
    let (id, created_at) = meta(row)?;
    let user_id: i64 = row.try_get("user_id")?;
    let news_id: i64 = row.try_get("news_id")?;
    Ok(Stored {
        id,
        created_at,
        record: UserInteraction {
            user_id: u64::try_from(user_id)?,
            news_id: u64::try_from(news_id)?,
            action: row.try_get("action")?,
            duration_seconds: row.try_get("duration_seconds")?,
        },
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_article(&self, article: Article) -> Result<Stored<Article>> {
        ensure_persistable(&article)?;
        let sql = "INSERT INTO articles (created_at, title, content, category, source, url) \
                   VALUES (?, ?, ?, ?, ?, ?)";
        let binds = vec![
            Bind::Text(&article.title),
            Bind::Text(&article.content),
            Bind::Text(&article.category),
            Bind::Text(&article.source),
            Bind::Text(&article.url),
        ];
        let (id, created_at) = self.insert(sql, binds).await?;
        Ok(Stored {
            id,
            created_at,
            record: article,
        })
    }

    async fn articles_in_categories(&self, categories: &[String]) -> Result<Vec<Stored<Article>>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; categories.len()].join(", ");
        let sql = format!("SELECT * FROM articles WHERE category IN ({placeholders}) ORDER BY id");
        let mut q = sqlx::query(&sql);
        for c in categories {
            q = q.bind(c.as_str());
        }
        let rows = q.fetch_all(&self.pool).await.context("query articles")?;
        rows.iter().map(article_row).collect()
    }

    async fn create_preference(&self, pref: UserPreference) -> Result<Stored<UserPreference>> {
        let sql = "INSERT INTO user_preferences (created_at, user_id, category, frequency) \
                   VALUES (?, ?, ?, ?)";
        let binds = vec![
            Bind::Int(to_i64(pref.user_id)?),
            Bind::Text(&pref.category),
            Bind::Int(i64::from(pref.frequency)),
        ];
        let (id, created_at) = self.insert(sql, binds).await?;
        Ok(Stored {
            id,
            created_at,
            record: pref,
        })
    }

    async fn preferences_for_user(&self, user_id: u64) -> Result<Vec<Stored<UserPreference>>> {
        let rows = sqlx::query("SELECT * FROM user_preferences WHERE user_id = ? ORDER BY id")
            .bind(to_i64(user_id)?)
            .fetch_all(&self.pool)
            .await
            .context("query preferences")?;
        rows.iter().map(preference_row).collect()
    }

    async fn create_interaction(
        &self,
        interaction: UserInteraction,
    ) -> Result<Stored<UserInteraction>> {
        let sql = "INSERT INTO user_interactions \
                   (created_at, user_id, news_id, action, duration_seconds) VALUES (?, ?, ?, ?, ?)";
        let binds = vec![
            Bind::Int(to_i64(interaction.user_id)?),
            Bind::Int(to_i64(interaction.news_id)?),
            Bind::Text(&interaction.action),
            Bind::Int(interaction.duration_seconds),
        ];
        let (id, created_at) = self.insert(sql, binds).await?;
        Ok(Stored {
            id,
            created_at,
            record: interaction,
        })
    }

    async fn interactions_for_user(&self, user_id: u64) -> Result<Vec<Stored<UserInteraction>>> {
        let rows = sqlx::query("SELECT * FROM user_interactions WHERE user_id = ? ORDER BY id")
            .bind(to_i64(user_id)?)
            .fetch_all(&self.pool)
            .await
            .context("query interactions")?;
        rows.iter().map(interaction_row).collect()
    }
}
