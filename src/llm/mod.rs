//! Chat-completions client used for AI-assisted message drafting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod deepseek;

pub use deepseek::DeepSeekClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI drafting is not configured")]
    Disabled,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no completion returned")]
    EmptyResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Seam over the hosted chat-completions API.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the assistant's reply to the conversation.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

/// Used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLlm;

#[async_trait]
impl ChatCompletion for DisabledLlm {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

#[cfg(any(test, feature = "test-mocks"))]
mockall::mock! {
    pub Llm {}

    #[async_trait]
    impl ChatCompletion for Llm {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
    }
}
