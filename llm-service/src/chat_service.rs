//! Non-streaming chat-completion client for a hosted model deployment.
//!
//! The request URL is derived from [`ChatModelConfig`]:
//! `POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}`
//!
//! Constructor validation:
//! - `cfg.api_key` must be non-empty
//! - `cfg.deployment` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.temperature`, if set, must lie in `0.0..=2.0`
//!
//! Errors are normalized via the unified types in `error_handler`.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::ChatModelConfig,
    error_handler::{
        ConfigError, HttpError, LlmError, ProviderError, make_snippet, validate_range_f32,
    },
};

/// Interface for chat completion against a `(system, user)` message pair.
///
/// Implement this trait to plug in a different backend, or a stub in tests.
pub trait ChatCompletion: Send + Sync {
    /// Async completion returning the assistant's text.
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;
}

/// Thin client for a deployment-scoped chat-completion endpoint.
///
/// Constructed from a complete [`ChatModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` with the `api-key` default header and a
/// request timeout, plus the fully resolved completion URL.
#[derive(Debug)]
pub struct ChatService {
    client: reqwest::Client,
    cfg: ChatModelConfig,
    url_chat: String,
}

impl ChatService {
    /// Creates a new [`ChatService`] from the given config.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is empty
    /// - [`LlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`LlmError::Config`] with `EmptyDeployment` if `cfg.deployment` is empty
    /// - [`LlmError::Config`] with `OutOfRange` if `cfg.temperature` is invalid
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: ChatModelConfig) -> Result<Self, LlmError> {
        if cfg.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey.into());
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        if cfg.deployment.trim().is_empty() {
            return Err(ConfigError::EmptyDeployment.into());
        }

        if let Some(t) = cfg.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(&cfg.api_key).map_err(|e| {
                ProviderError::Decode(format!("invalid API key header: {e}"))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            cfg.deployment,
            cfg.api_version
        );

        info!(
            deployment = %cfg.deployment,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(30),
            "ChatService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// Sends a two-message array (system instruction, user prompt) together
    /// with `temperature` and `max_tokens` from the config. The deployment is
    /// addressed by the URL, so no model field is sent.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`LlmError::HttpTransport`] for client/network failures and timeouts
    /// - [`LlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`LlmError::Provider`] with `EmptyChoices` if no choices are returned
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, system, user);

        debug!(
            deployment = %self.cfg.deployment,
            prompt_len = user.len(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                deployment = %self.cfg.deployment,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    deployment = %self.cfg.deployment,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                ))
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(ProviderError::EmptyChoices)?;

        info!(
            deployment = %self.cfg.deployment,
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

impl ChatCompletion for ChatService {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(system, user))
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for a deployment-scoped chat completion.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a ChatModelConfig, system: &'a str, user: &'a str) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response shape; anything beyond the first choice is ignored.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
