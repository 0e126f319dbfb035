use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{ChatCompletion, ChatRequest, DomainError, FinishReason};

enum Script {
    Reply(String, FinishReason),
    Fail(String),
}

/// Offline [`ChatClient`] that answers every request with the same scripted
/// reply. Used by `--mock-llm` and in tests.
pub struct ScriptedChatClient {
    script: Script,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedChatClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self::from_script(Script::Reply(reply.into(), FinishReason::Stop))
    }

    /// Replies with `{}`, which matches every product.
    pub fn match_all() -> Self {
        Self::new("{}")
    }

    /// Reply flagged as cut off by the token limit.
    pub fn truncated(reply: impl Into<String>) -> Self {
        Self::from_script(Script::Reply(reply.into(), FinishReason::Length))
    }

    /// Every call fails with [`DomainError::Upstream`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_script(Script::Fail(message.into()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            "ScriptedChatClient: {} messages for model {}",
            request.messages.len(),
            request.model
        );

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.script {
            Script::Reply(text, finish) => Ok(ChatCompletion::new(text.clone(), finish.clone())),
            Script::Fail(message) => Err(DomainError::upstream(message.clone())),
        }
    }

    fn provider(&self) -> &str {
        "scripted"
    }
}
