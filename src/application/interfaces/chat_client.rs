use async_trait::async_trait;

use crate::domain::{ChatCompletion, ChatRequest, DomainError};

/// An interface for sending chat-style prompts to an LLM and receiving text responses.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. The search pipeline only ever sees the raw completion text and the
/// finish reason, so it can be driven by stub text in tests.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the role-tagged messages and return the assistant's reply.
    ///
    /// Network, authentication and rate-limit failures are reported as
    /// [`DomainError::Upstream`].
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, DomainError>;

    /// Provider name, for logging.
    fn provider(&self) -> &str;
}
