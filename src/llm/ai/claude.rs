//! Claude API client implementation.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AiClient, AiClientMetadata, DEFAULT_MAX_TOKENS};
use crate::llm::error::LlmError;

/// Public Anthropic endpoint.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Model used when none is configured.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-5";

/// Claude API request message.
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Claude API request body.
#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: i32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

/// Claude API response content.
#[derive(Deserialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

/// Claude API response.
#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

/// Claude API client implementation.
pub struct ClaudeAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeAiClient {
    /// Creates a new Claude AI client against the public endpoint.
    pub fn new(model: String, api_key: String) -> Result<Self> {
        Self::with_base_url(model, api_key, ANTHROPIC_BASE_URL.to_string())
    }

    /// Creates a Claude AI client against a custom endpoint.
    pub fn with_base_url(model: String, api_key: String, base_url: String) -> Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            api_key,
            model,
            base_url,
        })
    }
}

impl AiClient for ClaudeAiClient {
    fn send_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                system_prompt_len = system_prompt.len(),
                user_prompt_len = user_prompt.len(),
                model = %self.model,
                "Preparing Claude API request"
            );

            let request = ClaudeRequest {
                model: self.model.clone(),
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: 0.0,
                system: system_prompt.to_string(),
                messages: vec![Message {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                }],
            };

            let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
            info!(url = %url, model = %self.model, "Sending request to Claude API");

            let response = self
                .client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| LlmError::NetworkError(e.to_string()))?;
            let response = super::check_error_response(response).await?;

            let claude_response: ClaudeResponse = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponseFormat(e.to_string()))?;

            debug!(
                content_count = claude_response.content.len(),
                "Received Claude API response"
            );

            let result: Result<String> = claude_response
                .content
                .into_iter()
                .find(|c| c.content_type == "text")
                .map(|c| c.text)
                .ok_or_else(|| {
                    LlmError::InvalidResponseFormat("No text content in response".to_string())
                        .into()
                });

            super::log_response_success("Claude", &result);
            result
        })
    }

    fn get_metadata(&self) -> AiClientMetadata {
        AiClientMetadata {
            provider: "Anthropic".to_string(),
            model: self.model.clone(),
            max_response_length: DEFAULT_MAX_TOKENS as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn extracts_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    {"type": "tool_use"},
                    {"type": "text", "text": "El ingreso anual es 180,000"}
                ]
            })))
            .mount(&server)
            .await;

        let client =
            ClaudeAiClient::with_base_url("m".to_string(), "key".to_string(), server.uri())
                .unwrap();
        let text = client.send_request("sys", "q").await.unwrap();
        assert_eq!(text, "El ingreso anual es 180,000");
    }

    #[tokio::test]
    async fn missing_text_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": []})),
            )
            .mount(&server)
            .await;

        let client =
            ClaudeAiClient::with_base_url("m".to_string(), "key".to_string(), server.uri())
                .unwrap();
        let err = client.send_request("sys", "q").await.unwrap_err();
        assert!(err.to_string().contains("No text content"));
    }

    #[test]
    fn metadata_reports_anthropic() {
        let client = ClaudeAiClient::new("m".to_string(), "key".to_string()).unwrap();
        let meta = client.get_metadata();
        assert_eq!(meta.provider, "Anthropic");
        assert_eq!(meta.model, "m");
    }
}
