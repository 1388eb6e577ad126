//! Send lifecycle for one editing session
//!
//! `Idle -> Sending -> Idle | Failed`. Extraction runs synchronously inside
//! the transition into `Sending`; only the transport call is awaited.

use crate::document::DocumentTree;
use crate::extract::extract_content;
use crate::transcript::{ChatMessage, Transcript};
use crate::transport::{ChatReply, ChatRequest, Transport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("nothing to send: add text or an image first")]
    EmptyContent,
    #[error("a message is already being sent")]
    AlreadySending,
    #[error("failed to reach backend: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Default)]
pub struct Session {
    transcript: Transcript,
    state: SendState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == SendState::Sending
    }

    /// Capture the document, record the user's turn, and build the request.
    ///
    /// Rejected sends leave both the state and the transcript untouched.
    pub fn begin_send<D: DocumentTree>(&mut self, document: &D) -> Result<ChatRequest, SendError> {
        if self.is_sending() {
            return Err(SendError::AlreadySending);
        }

        let items = extract_content(document);
        if items.is_empty() {
            return Err(SendError::EmptyContent);
        }

        self.transcript.push_user(items.flatten());
        self.state = SendState::Sending;
        Ok(ChatRequest { items })
    }

    /// Record the outcome of the request started by [`Session::begin_send`].
    pub fn finish_send(
        &mut self,
        result: Result<ChatReply, TransportError>,
    ) -> Result<&ChatMessage, SendError> {
        match result {
            Ok(reply) => {
                self.state = SendState::Idle;
                Ok(self.transcript.push_assistant(reply.reply))
            }
            Err(e) => {
                tracing::warn!(error = %e, "send failed");
                self.state = SendState::Failed;
                Err(SendError::Transport(e))
            }
        }
    }

    /// Run a whole send against `transport` and return the model's reply.
    pub async fn send<D, T>(&mut self, transport: &T, document: &D) -> Result<&ChatMessage, SendError>
    where
        D: DocumentTree,
        T: Transport,
    {
        let request = self.begin_send(document)?;
        let result = transport.send(request).await;
        self.finish_send(result)
    }
}
