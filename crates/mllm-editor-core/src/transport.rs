use crate::content::ContentSequence;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:9000/chat";

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub items: ContentSequence,
}

/// Body of a successful `/chat` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request task failed: {0}")]
    Task(String),
}

/// Anything that can deliver a prompt to the model backend
pub trait Transport {
    fn send(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, TransportError>> + Send;
}

/// HTTP client for the editor backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: String,
}

impl BackendClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for BackendClient {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, TransportError> {
        tracing::info!(endpoint = %self.endpoint, items = request.items.len(), "sending prompt");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        let reply: ChatReply = response.json().await?;
        Ok(reply)
    }
}
