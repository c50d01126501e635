//! OpenAI chat-completion backend
//!
//! Talks to `{base_url}/v1/chat/completions` with a bearer token. Any server
//! implementing the same schema works by overriding `OPENAI_BASE_URL`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::AssistantConfig;
use crate::error::{Error, Result};

use super::types::{ChatRequest, ChatResponse};
use super::ChatBackend;

#[derive(Clone)]
pub struct OpenAIBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIBackend {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build from config; `Error::Config` when no API key is set
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OPENAI_API_KEY manquant".into()))?;

        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            ..Self::new(&config.base_url, api_key)
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAIBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, |t| t.len()),
            "Sending chat completion"
        );

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::ChatMessage;
    use crate::test_utils::MockChatServer;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::user(text)],
            tools: None,
            tool_choice: None,
            temperature: Some(0.4),
            response_format: None,
        }
    }

    #[test]
    fn test_backend_trims_trailing_slash() {
        let backend = OpenAIBackend::new("http://localhost:8080/", "sk-test");
        assert_eq!(backend.host(), "http://localhost:8080");
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = OpenAIBackend::from_config(&AssistantConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY manquant"));
    }

    #[tokio::test]
    async fn test_complete_against_mock() {
        let server = MockChatServer::start().await;
        let backend = OpenAIBackend::new(&server.url(), "sk-test");

        let response = backend.complete(&request("Bonjour")).await.unwrap();
        let message = response.into_first_message().unwrap();
        assert_eq!(message.role, "assistant");
        assert!(message.text().is_some());

        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_rejected_key_is_upstream_error() {
        let server = MockChatServer::start().await;
        let backend = OpenAIBackend::new(&server.url(), "rejected");

        let err = backend.complete(&request("Bonjour")).await.unwrap_err();
        match err {
            Error::Upstream(msg) => assert!(msg.starts_with("OpenAI API error 401")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let backend = OpenAIBackend::new("http://127.0.0.1:1", "sk-test");
        let err = backend.complete(&request("Bonjour")).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
