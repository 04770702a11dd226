//! LLM Client: the only module in the optimizer that talks to the Anthropic API.
//!
//! The rewriter, both project analyzers and the bullet generator all go through
//! `LlmClient::call_json`; none of them build HTTP requests themselves.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Model used for every optimizer call. Kept in code so rewrite quality does
/// not silently change with deployment config.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 8192;
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Concatenates every text block; the model occasionally splits long
    /// JSON documents across blocks.
    pub fn text(&self) -> Option<String> {
        let joined: String = self
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        (!joined.trim().is_empty()).then_some(joined)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Shared Anthropic client. Cheap to clone; the inner `reqwest::Client` pools
/// connections.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, request_timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, api_key })
    }

    /// Sends one user prompt with a system prompt. 429 and 5xx responses and
    /// transport errors are retried with exponential backoff; other 4xx
    /// responses fail immediately.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying LLM call"
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(MESSAGES_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if is_retryable(status) {
                let message = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "LLM API returned retryable status");
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                    .map(|e| e.error.message)
                    .unwrap_or(raw);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: LlmResponse = response.json().await?;
            debug!(
                input_tokens = parsed.usage.input_tokens,
                output_tokens = parsed.usage.output_tokens,
                "LLM call succeeded"
            );
            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }

    /// Calls the model and deserializes its text reply as `T`. Prompts sent
    /// through here must ask for a bare JSON document.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(strip_json_fences(&text))?)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1))
}

/// Removes a surrounding ```json / ``` fence if the model added one anyway.
fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    let rest = rest.trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"title\": \"Cache\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"title\": \"Cache\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n[\"a\", \"b\"]\n```";
        assert_eq!(strip_json_fences(input), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_strip_json_fences_unterminated_fence() {
        let input = "```json\n{\"a\": 1}";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fences_plain_json() {
        assert_eq!(strip_json_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let response: LlmResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "{\"a\":"},
                    {"type": "tool_use"},
                    {"type": "text", "text": " 1}"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_response_text_empty_is_none() {
        let response: LlmResponse = serde_json::from_str(
            r#"{"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}"#,
        )
        .unwrap();
        assert!(response.text().is_none());
    }
}
