// src/summarize/huggingface.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{http_client, precheck, send, usable, SummarizeError, Summarizer};
use crate::config::SummarizerConfig;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

#[derive(Serialize)]
struct Req<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    summary_text: Option<String>,
}

/// The inference API answers either with one object or a list of candidates.
#[derive(Deserialize)]
#[serde(untagged)]
enum Resp {
    Many(Vec<Candidate>),
    One(Candidate),
}

/// Hugging Face inference endpoint (summarization models). Requires `HUGGINGFACE_API_KEY`.
pub struct HuggingFaceSummarizer {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl HuggingFaceSummarizer {
    pub fn new(cfg: &SummarizerConfig) -> Self {
        let base = cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let model = cfg.model.as_deref().unwrap_or(DEFAULT_MODEL);
        Self {
            http: http_client(),
            api_key: cfg.api_key.clone(),
            endpoint: format!("{}/models/{}", base.trim_end_matches('/'), model),
        }
    }

    fn parse(body: &str) -> Result<String, SummarizeError> {
        let resp: Resp = serde_json::from_str(body)
            .map_err(|e| SummarizeError::MalformedResponse(e.to_string()))?;
        let first = match resp {
            Resp::Many(v) => v.into_iter().next(),
            Resp::One(c) => Some(c),
        };
        usable(first.as_ref().and_then(|c| c.summary_text.as_deref()))
    }
}

impl fmt::Debug for HuggingFaceSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceSummarizer")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let key = precheck(self.api_key.as_deref(), text)?;
        let req = self
            .http
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&Req { inputs: text });
        let body = send(req).await?;
        Self::parse(&body)
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
