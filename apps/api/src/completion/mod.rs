//! Completion client — the single point of entry for all completion-provider
//! calls in Shotwright.
//!
//! ARCHITECTURAL RULE: no other module may talk to a provider directly. The
//! pipeline consumes the `CompletionClient` trait and never inspects which
//! implementation is behind it (direct Anthropic call or internal gateway).
//!
//! Backoff lives here, in the collaborator layer: the pipeline itself never
//! retries a provider failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all completion calls in Shotwright.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Provider failure taxonomy. Exactly these three surface to the pipeline;
/// transport-level trouble (DNS, timeouts, malformed bodies) reads as a
/// service error carrying the details.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("completion provider rejected the credential")]
    Unauthorized,

    #[error("completion provider is rate limiting requests")]
    RateLimited,

    #[error("completion provider error: {0}")]
    Service(String),
}

/// Token accounting returned by the provider, when available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// One provider completion: the raw text plus optional accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
}

/// The completion capability the pipeline consumes: system instructions plus
/// assembled user content in, raw completion text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user_content: &str,
        max_output_tokens: u32,
    ) -> Result<Completion, ProviderError>;
}

/// Maps a provider HTTP status onto the failure taxonomy.
fn classify_status(status: u16, message: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::Unauthorized,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Service(format!("status {status}: {message}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: TokenUsage,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Direct Anthropic Messages API client. This process holds the provider
/// credential; the rendering layer never sees it.
/// Retries 429 and 5xx responses with exponential backoff before giving up.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(
        &self,
        system: &str,
        user_content: &str,
        max_output_tokens: u32,
    ) -> Result<Completion, ProviderError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: max_output_tokens,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: user_content,
            }],
        };

        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "completion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ProviderError::Service(format!("transport: {e}")));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("provider returned {}: {}", status, body);
                last_error = Some(classify_status(status.as_u16(), body));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(classify_status(status.as_u16(), message));
            }

            let parsed: AnthropicResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Service(format!("malformed provider response: {e}")))?;

            debug!(
                "completion succeeded: input_tokens={}, output_tokens={}",
                parsed.usage.input_tokens, parsed.usage.output_tokens
            );

            let text = parsed
                .text()
                .ok_or_else(|| ProviderError::Service("provider returned no text content".into()))?
                .to_string();

            return Ok(Completion {
                text,
                model: parsed.model,
                usage: Some(parsed.usage),
            });
        }

        Err(last_error.unwrap_or(ProviderError::RateLimited))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    system: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    content: String,
    usage: Option<TokenUsage>,
    model: Option<String>,
}

/// Client for deployments that front the provider with a privileged internal
/// proxy: POSTs `{system, prompt, max_tokens}` and reads `{content, usage,
/// model}`. Single-shot — the gateway owns its own backoff policy.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    endpoint: String,
}

impl GatewayClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
        }
    }
}

#[async_trait]
impl CompletionClient for GatewayClient {
    async fn complete(
        &self,
        system: &str,
        user_content: &str,
        max_output_tokens: u32,
    ) -> Result<Completion, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GatewayRequest {
                system,
                prompt: user_content,
                max_tokens: max_output_tokens,
            })
            .send()
            .await
            .map_err(|e| ProviderError::Service(format!("transport: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(status.as_u16(), message));
        }

        let parsed: GatewayResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Service(format!("malformed gateway response: {e}")))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "gateway completion succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(Completion {
            text: parsed.content,
            usage: parsed.usage,
            model: parsed.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_unauthorized() {
        assert!(matches!(
            classify_status(401, String::new()),
            ProviderError::Unauthorized
        ));
        assert!(matches!(
            classify_status(403, String::new()),
            ProviderError::Unauthorized
        ));
    }

    #[test]
    fn test_classify_status_rate_limited() {
        assert!(matches!(
            classify_status(429, String::new()),
            ProviderError::RateLimited
        ));
    }

    #[test]
    fn test_classify_status_service_error_carries_details() {
        let err = classify_status(500, "overloaded".to_string());
        match err {
            ProviderError::Service(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("overloaded"));
            }
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[test]
    fn test_anthropic_request_serializes_expected_shape() {
        let request = AnthropicRequest {
            model: MODEL,
            max_tokens: 8192,
            system: "be precise",
            messages: vec![AnthropicMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], MODEL);
        assert_eq!(json["max_tokens"], 8192);
        assert_eq!(json["system"], "be precise");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_anthropic_response_text_extraction() {
        let raw = r#"{
            "content": [
                {"type": "thinking", "text": null},
                {"type": "text", "text": "{\"ok\": true}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5},
            "model": "claude-sonnet-4-5"
        }"#;
        let parsed: AnthropicResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text(), Some("{\"ok\": true}"));
        assert_eq!(parsed.usage.input_tokens, 10);
        assert_eq!(parsed.usage.output_tokens, 5);
    }

    #[test]
    fn test_gateway_request_matches_transport_envelope() {
        let request = GatewayRequest {
            system: "sys",
            prompt: "user text",
            max_tokens: 4096,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"], "sys");
        assert_eq!(json["prompt"], "user text");
        assert_eq!(json["max_tokens"], 4096);
    }

    #[test]
    fn test_error_envelope_parses_provider_message() {
        let raw = r#"{"error": {"type": "invalid_request_error", "message": "bad field"}}"#;
        let parsed: ErrorEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.message, "bad field");
    }
}
