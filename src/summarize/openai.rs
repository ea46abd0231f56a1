// src/summarize/openai.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{http_client, precheck, send, usable, SummarizeError, Summarizer};
use crate::config::SummarizerConfig;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMsg>,
    // legacy completions endpoint
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI provider (Chat Completions API). Requires `OPENAI_API_KEY`.
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(cfg: &SummarizerConfig) -> Self {
        let base = cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Self {
            http: http_client(),
            api_key: cfg.api_key.clone(),
            endpoint: format!("{}/v1/chat/completions", base.trim_end_matches('/')),
            model: cfg.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn parse(body: &str) -> Result<String, SummarizeError> {
        let resp: Resp = serde_json::from_str(body)
            .map_err(|e| SummarizeError::MalformedResponse(e.to_string()))?;
        let first = resp.choices.into_iter().next();
        let text = first.and_then(|c| {
            c.message
                .and_then(|m| m.content)
                .or(c.text)
        });
        usable(text.as_deref())
    }
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let key = precheck(self.api_key.as_deref(), text)?;
        let prompt = format!("Summarize the following article: {text}");
        let req = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: &prompt,
            }],
            temperature: 0.7,
            max_tokens: 150,
        };
        let body = send(self.http.post(&self.endpoint).bearer_auth(key).json(&req)).await?;
        Self::parse(&body)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
