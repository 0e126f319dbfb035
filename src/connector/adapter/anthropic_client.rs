use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{ChatCompletion, ChatRequest, ChatRole, DomainError, FinishReason};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// HTTP client for the Anthropic Messages API.
///
/// The Messages API has no `system` role; system messages are joined and sent
/// in the top-level `system` field.
///
/// | Variable             | Default                     |
/// |----------------------|-----------------------------|
/// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com` |
/// | `ANTHROPIC_API_KEY`  | `""`                        |
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{MESSAGES_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            url,
        }
    }

    pub fn from_env(timeout: Duration) -> Self {
        let base = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        if key.is_empty() {
            warn!("ANTHROPIC_API_KEY is not set; requests to {} will likely be rejected", base);
        }
        Self::new(key, base, timeout)
    }
}

fn build_body<'a>(request: &'a ChatRequest, system: &'a str) -> ApiRequest<'a> {
    ApiRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system,
        messages: request
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| ApiMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, DomainError> {
        let system = request.system_prompt();
        let body = build_body(request, &system);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("AnthropicClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "AnthropicClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("AnthropicClient: failed to parse response: {e}"))
        })?;

        debug!("AnthropicClient: stop_reason={:?}", api_response.stop_reason);
        let text: String = api_response
            .content
            .into_iter()
            .map(|b| b.text)
            .collect();

        Ok(ChatCompletion::new(
            text,
            FinishReason::from_anthropic(api_response.stop_reason.as_deref()),
        ))
    }

    fn provider(&self) -> &str {
        "anthropic"
    }
}
