// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use personal_news::summarize::{SummarizeError, Summarizer};
use personal_news::Article;

/// Serve `app` on an ephemeral local port; returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    format!("http://{addr}")
}

/// Prefixes every input with "summary: "; fails on inputs containing `fail_marker`.
pub struct ScriptedSummarizer {
    pub fail_marker: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedSummarizer {
    pub fn ok() -> Self {
        Self {
            fail_marker: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail_marker.is_some_and(|m| text.contains(m)) {
            return Err(SummarizeError::UpstreamError {
                status: 503,
                body: "model loading".into(),
            });
        }
        Ok(format!("summary: {text}"))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Always fails, the way an unconfigured summarizer does.
pub struct UnconfiguredSummarizer;

#[async_trait]
impl Summarizer for UnconfiguredSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String, SummarizeError> {
        Err(SummarizeError::ConfigurationMissing)
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

pub fn article(title: &str, category: &str, content: &str) -> Article {
    Article {
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        source: "Wire".to_string(),
        url: format!("https://example.test/{title}"),
    }
}
