// src/config/summarizer.rs
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerKind {
    #[default]
    #[serde(alias = "hf")]
    HuggingFace,
    OpenAi,
}

impl FromStr for SummarizerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "openai" => Ok(Self::OpenAi),
            other => Err(anyhow!("unsupported summarizer provider: {other}")),
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    #[serde(rename = "provider")]
    pub kind: SummarizerKind,
    /// Missing key is not a load error; summarization reports it per call.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
