//! Anthropic Messages API client
//!
//! Sends one search turn with the server-side web search tool enabled.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::AgentConfig;
use crate::error::SearchError;
use crate::search::AgentTransport;

/// Current Anthropic API version header value.
const API_VERSION: &str = "2023-06-01";

const WEB_SEARCH_TOOL_TYPE: &str = "web_search_20250305";

/// Reusable Anthropic client (connection-pooled)
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl AnthropicClient {
    pub fn new(config: &AgentConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AgentTransport for AnthropicClient {
    async fn create_message(&self, request: &MessagesRequest) -> crate::Result<MessagesResponse> {
        if self.api_key.is_empty() {
            return Err(SearchError::Config(
                "ANTHROPIC_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}/v1/messages", self.api_base);

        info!(model = %request.model, "Calling Anthropic Messages API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Anthropic API request failed: {}", e);
                SearchError::LlmError(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Anthropic API error response: {}", body);
            return Err(SearchError::LlmError(describe_error(status, &body)));
        }

        let message: MessagesResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Anthropic response: {}", e);
            SearchError::LlmError(format!("Anthropic response parse error: {}", e))
        })?;

        info!(
            blocks = message.content.len(),
            stop_reason = ?message.stop_reason,
            "Anthropic response received"
        );

        Ok(message)
    }
}

/// Render a non-2xx response. Provider error types such as `rate_limit_error`
/// are kept in the message so callers can match on them.
fn describe_error(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ApiErrorResponse>(body) {
        return format!(
            "Anthropic API error ({}): {}",
            err.error.error_type, err.error.message
        );
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return format!("Anthropic API error (rate_limit_error): HTTP {}", status);
    }

    format!("Anthropic API error (HTTP {}): {}", status, body)
}

//
// ================= Wire types =================
//

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub tools: Vec<ToolSpec>,
    pub messages: Vec<ApiMessage>,
}

impl MessagesRequest {
    /// Single user turn with the web search tool capped at `max_searches` uses.
    pub fn search_turn(config: &AgentConfig, system: &str, user_prompt: String) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system: system.to_string(),
            tools: vec![ToolSpec::web_search(config.max_searches)],
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: user_prompt,
            }],
        }
    }
}

/// Server-side tool granted to the agent
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub max_uses: u32,
}

impl ToolSpec {
    pub fn web_search(max_uses: u32) -> Self {
        Self {
            tool_type: WEB_SEARCH_TOOL_TYPE.to_string(),
            name: "web_search".to_string(),
            max_uses,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

/// Full agent response. Search runs interleave `server_tool_use` and
/// `web_search_tool_result` blocks with the text blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl MessagesResponse {
    /// Plain response made of the given text blocks.
    pub fn from_text<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: texts.into_iter().map(ContentBlock::text).collect(),
            stop_reason: Some("end_turn".to_string()),
        }
    }

    pub fn block_types(&self) -> Vec<String> {
        self.content.iter().map(|b| b.block_type.clone()).collect()
    }

    /// Concatenation of every text block, in order.
    pub fn collect_text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect()
    }
}

/// One content block. Only `text` blocks carry a payload we read; every other
/// kind is kept for its type tag.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::SYSTEM_PROMPT;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> MessagesRequest {
        MessagesRequest::search_turn(
            &AgentConfig::new("test-key".to_string()),
            SYSTEM_PROMPT,
            "Today is 2025-01-01.".to_string(),
        )
    }

    fn client_for(server: &MockServer) -> AnthropicClient {
        let config = AgentConfig::new("test-key".to_string()).with_api_base(server.uri());
        AnthropicClient::new(&config).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_value(sample_request()).unwrap();

        assert_eq!(json["model"], "claude-haiku-4-5-20251001");
        assert_eq!(json["max_tokens"], 16_000);
        assert_eq!(json["tools"][0]["type"], "web_search_20250305");
        assert_eq!(json["tools"][0]["name"], "web_search");
        assert_eq!(json["tools"][0]["max_uses"], 5);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Today is 2025-01-01.");
        assert!(json["system"].as_str().unwrap().contains("WATCHLIST"));
    }

    #[test]
    fn test_response_with_mixed_blocks() {
        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "Searching. " },
                { "type": "server_tool_use", "id": "srvtoolu_1", "name": "web_search", "input": { "query": "VP Sales wealthtech" } },
                { "type": "web_search_tool_result", "tool_use_id": "srvtoolu_1", "content": [] },
                { "type": "text", "text": "[]" }
            ],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 10, "output_tokens": 5 }
        }))
        .unwrap();

        assert_eq!(
            response.block_types(),
            vec!["text", "server_tool_use", "web_search_tool_result", "text"]
        );
        assert_eq!(response.collect_text(), "Searching. []");
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_describe_error() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"Too many tokens"}}"#;
        assert_eq!(
            describe_error(StatusCode::TOO_MANY_REQUESTS, body),
            "Anthropic API error (rate_limit_error): Too many tokens"
        );

        let message = describe_error(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(message.contains("rate_limit"));

        let message = describe_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(message, "Anthropic API error (HTTP 502 Bad Gateway): upstream down");
    }

    #[tokio::test]
    async fn test_create_message_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{ "type": "text", "text": "[{\"company\":\"Orion\"}]" }],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .create_message(&sample_request())
            .await
            .unwrap();

        assert_eq!(response.collect_text(), "[{\"company\":\"Orion\"}]");
    }

    #[tokio::test]
    async fn test_create_message_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "type": "error",
                "error": {
                    "type": "rate_limit_error",
                    "message": "This request would exceed the rate limit"
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_message(&sample_request())
            .await
            .unwrap_err();

        assert!(err.is_rate_limited(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_create_message_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "type": "error",
                "error": { "type": "api_error", "message": "Internal server error" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_message(&sample_request())
            .await
            .unwrap_err();

        assert!(!err.is_rate_limited());
        assert_eq!(err.to_string(), "Anthropic API error (api_error): Internal server error");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = AnthropicClient::new(&AgentConfig::new(String::new())).unwrap();
        let err = client.create_message(&sample_request()).await.unwrap_err();

        assert!(matches!(err, SearchError::Config(_)));
    }
}
