use crate::content::ContentItem;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000/v1";
pub const DEFAULT_MODEL: &str = "qwen3-vl";
pub const DEFAULT_API_KEY: &str = "EMPTY";

#[derive(Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a [ContentItem],
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("model server error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected model response")]
    UnexpectedResponse,
    #[error("model server unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for an OpenAI-compatible chat completions server (vLLM, etc.)
#[derive(Clone)]
pub struct OpenAICompatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAICompatClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the items as a single user turn and return the first choice's text
    pub async fn complete(&self, items: &[ContentItem]) -> Result<String, UpstreamError> {
        let request = OpenAIRequest {
            model: &self.model,
            messages: vec![OpenAIMessage {
                role: "user",
                content: items,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        // Anything but 200 counts as a model server failure
        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|_| UpstreamError::UnexpectedResponse)?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(UpstreamError::UnexpectedResponse)
    }
}
