#![doc = "Summariser integration: the OpenAI-compatible chat completions client behind the `Summarizer` trait."]
//
//! Construct [`OpenAiSummarizer`] from a loaded [`SummarizerConfig`]; the API
//! key is injected into the config from `OPENAI_API_KEY` by
//! [`crate::load_config`]. Any endpoint that speaks the chat completions
//! protocol can be targeted through `OPENAI_BASE_URL`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;
use crate::contract::Summarizer;
use crate::error::{ScrapeError, SummarizeError};

pub struct OpenAiSummarizer {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(model: &'a str, temperature: f64, instruction: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            temperature,
        }
    }
}

impl ChatResponse {
    /// Trimmed text of the first choice.
    pub(crate) fn into_summary(self) -> Result<String, SummarizeError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .ok_or(SummarizeError::EmptyResponse)
    }
}

impl OpenAiSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self, ScrapeError> {
        if config.api_key.is_empty() {
            return Err(ScrapeError::Config(
                "summariser API key is empty".to_string(),
            ));
        }
        let http = Client::builder()
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized OpenAiSummarizer"
        );
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, instruction: &str, content: &str) -> Result<String, SummarizeError> {
        let body = ChatRequest::new(&self.model, self.temperature, instruction, content);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            tracing::error!(status = %status, "Summarisation service returned error");
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed.into_summary()
    }
}
