//! OpenAI-compatible HTTP client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use statefulchat_core::config::ProviderConfig;
use std::collections::HashMap;
use tracing::debug;

use crate::base::{LLMProvider, LLMResponse, Message, ProviderError, ProviderResult};

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: i64,
    #[serde(default)]
    completion_tokens: i64,
    #[serde(default)]
    total_tokens: i64,
}

/// Client for any endpoint speaking the `/chat/completions` protocol
pub struct OpenAICompatClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    default_model: String,
    extra_headers: HashMap<String, String>,
}

impl OpenAICompatClient {
    /// Create a new client
    pub fn new(
        api_key: Option<String>,
        api_base: impl Into<String>,
        default_model: impl Into<String>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            default_model: default_model.into(),
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    /// Create a client from the provider section of the configuration
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            Some(config.api_key.clone()),
            config.api_base.clone(),
            config.model.clone(),
            Some(config.extra_headers.clone()),
        )
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn parse_response(&self, response: ChatCompletionResponse) -> ProviderResult<LLMResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        let mut usage = HashMap::new();
        usage.insert("prompt_tokens".to_string(), response.usage.prompt_tokens);
        usage.insert(
            "completion_tokens".to_string(),
            response.usage.completion_tokens,
        );
        usage.insert("total_tokens".to_string(), response.usage.total_tokens);

        Ok(LLMResponse {
            content: choice.message.content,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }

    fn apply_headers(&self, mut req_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }

        req_builder
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatClient {
    async fn chat(
        &self,
        messages: Vec<Message>,
        model: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult<LLMResponse> {
        let model = model.unwrap_or_else(|| self.default_model.clone());
        let request = ChatCompletionRequest {
            model: model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        debug!(
            "Sending chat request to {} with model {} ({} messages)",
            self.api_base,
            model,
            request.messages.len()
        );

        let url = format!("{}/chat/completions", self.api_base);
        let req_builder = self.apply_headers(self.client.post(&url).json(&request));

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response_data: ChatCompletionResponse = response.json().await?;
        self.parse_response(response_data)
    }

    fn get_default_model(&self) -> String {
        self.default_model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn messages() -> Vec<Message> {
        vec![
            Message::new("system", "be brief"),
            Message::new("user", "hi, how are you?"),
        ]
    }

    #[test]
    fn test_trailing_slash_and_blank_key_are_normalized() {
        let client = OpenAICompatClient::new(Some("  ".to_string()), "http://x/v1/", "m", None);
        assert_eq!(client.api_base(), "http://x/v1");
        assert!(client.api_key.is_none());
    }

    #[tokio::test]
    async fn test_chat_sends_history_and_parses_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("x-team", "chat")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi, how are you?"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":" Fine, thanks! "},"finish_reason":"stop"}],
                    "usage":{"prompt_tokens":12,"completion_tokens":3,"total_tokens":15}}"#,
            )
            .create_async()
            .await;

        let mut headers = HashMap::new();
        headers.insert("x-team".to_string(), "chat".to_string());
        let client = OpenAICompatClient::new(
            Some("sk-test".to_string()),
            server.url(),
            "gpt-4o-mini",
            Some(headers),
        );

        let response = client.chat(messages(), None, 256, 0.7).await.unwrap();
        mock.assert_async().await;
        assert_eq!(response.reply_text(), Some("Fine, thanks!"));
        assert_eq!(response.usage.get("total_tokens"), Some(&15));
    }

    #[tokio::test]
    async fn test_http_error_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let client = OpenAICompatClient::new(None, server.url(), "gpt-4o-mini", None);
        let err = client.chat(messages(), None, 256, 0.7).await.unwrap_err();

        match err {
            ProviderError::ApiError(text) => {
                assert!(text.contains("401"));
                assert!(text.contains("invalid api key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAICompatClient::new(None, server.url(), "gpt-4o-mini", None);
        let err = client.chat(messages(), None, 256, 0.7).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
