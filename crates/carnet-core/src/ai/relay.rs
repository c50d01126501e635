//! Assistant relay: one model call, optional web searches, one follow-up
//!
//! The first call declares the `web_search` tool. When the model asks for
//! it, every requested search runs in order, each result is appended as a
//! `tool` message, and a single follow-up call (without tools) produces the
//! answer. There is no further loop and no retry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use crate::search::{SearchOutcome, WebSearch, WebSearchClient};
use crate::tools::{parse_arguments, web_search_tool, WEB_SEARCH_TOOL};

use super::openai::OpenAIBackend;
use super::types::{ChatMessage, ChatRequest, ResponseFormat};
use super::ChatBackend;

pub const ASSISTANT_TEMPERATURE: f32 = 0.4;

/// Default system prompt for clients that do not bring their own
pub const DEFAULT_SYSTEM_PROMPT: &str = "Tu es l'assistant Carnet. Tu peux faire des recherches web via l'outil 'web_search' quand c'est pertinent. Réponds en français.";

pub struct AssistantRelay {
    backend: Arc<dyn ChatBackend>,
    search: Arc<dyn WebSearch>,
    model: String,
}

impl AssistantRelay {
    pub fn new(backend: Arc<dyn ChatBackend>, search: Arc<dyn WebSearch>, model: &str) -> Self {
        Self {
            backend,
            search,
            model: model.to_string(),
        }
    }

    /// Relay backed by the hosted API and the configured search provider
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let backend = OpenAIBackend::from_config(config)?;
        let search = WebSearchClient::new(config.search.clone())?;
        info!(
            host = backend.host(),
            model = %config.model,
            search = search.provider(),
            "Assistant relay configured"
        );
        Ok(Self::new(Arc::new(backend), Arc::new(search), &config.model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, messages: Vec<ChatMessage>, with_tools: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            tools: with_tools.then(|| vec![web_search_tool()]),
            tool_choice: with_tools.then(|| "auto".to_string()),
            temperature: Some(ASSISTANT_TEMPERATURE),
            response_format: Some(ResponseFormat::text()),
        }
    }

    /// Answer a conversation
    ///
    /// The returned message always carries displayable text: when the model
    /// gives no text content, the content is the message itself rendered as
    /// pretty JSON.
    pub async fn respond(&self, messages: Vec<ChatMessage>) -> Result<ChatMessage> {
        debug!(messages = messages.len(), "Relaying conversation");

        let first = self
            .backend
            .complete(&self.request(messages.clone(), true))
            .await?
            .into_first_message()
            .ok_or_else(|| Error::EmptyResponse("Aucun choix renvoyé par le modèle.".into()))?;

        let tool_calls = first.requested_tools().to_vec();
        let final_message = if tool_calls.is_empty() {
            first
        } else {
            let mut conversation = messages;
            conversation.push(first);

            for call in &tool_calls {
                let content = if call.function.name == WEB_SEARCH_TOOL {
                    let request = parse_arguments(&call.function.arguments);
                    debug!(
                        call_id = %call.id,
                        query = %request.query,
                        max_results = request.max_results,
                        "Model requested web search"
                    );
                    let outcome = self.search.search(&request).await?;
                    serde_json::to_string(&outcome)?
                } else {
                    warn!(tool = %call.function.name, "Model requested an unknown tool");
                    serde_json::to_string(&SearchOutcome::error(format!(
                        "Outil inconnu: {}",
                        call.function.name
                    )))?
                };
                conversation.push(ChatMessage::tool(&call.id, content));
            }

            self.backend
                .complete(&self.request(conversation, false))
                .await?
                .into_first_message()
                .ok_or_else(|| Error::EmptyResponse("Réponse finale vide du modèle.".into()))?
        };

        with_displayable_content(final_message)
    }
}

fn with_displayable_content(mut message: ChatMessage) -> Result<ChatMessage> {
    if message.text().is_none() {
        message.content = Some(serde_json::to_string_pretty(&message)?);
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::{ChatResponse, ToolCall};
    use crate::ai::MockBackend;
    use crate::search::{SearchHit, SearchRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Search double that records queries
    #[derive(Default)]
    struct RecordingSearch {
        seen: Mutex<Vec<SearchRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl WebSearch for RecordingSearch {
        async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
            self.seen.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(Error::Upstream("Tavily error 502 Bad Gateway: ".into()));
            }
            Ok(SearchOutcome::Results {
                provider: "tavily".into(),
                answer: None,
                results: vec![SearchHit {
                    title: "Banque du Canada".into(),
                    url: "https://example.org/boc".into(),
                    snippet: "Taux directeur maintenu".into(),
                }],
            })
        }
    }

    fn tool_call_message(calls: Vec<ToolCall>) -> ChatMessage {
        ChatMessage {
            content: None,
            tool_calls: Some(calls),
            ..ChatMessage::assistant("")
        }
    }

    fn relay(backend: &MockBackend, search: Arc<RecordingSearch>) -> AssistantRelay {
        AssistantRelay::new(Arc::new(backend.clone()), search, "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_direct_answer_uses_one_call() {
        let backend = MockBackend::scripted([ChatResponse::single(ChatMessage::assistant("Bonjour !"))]);
        let search = Arc::new(RecordingSearch::default());

        let reply = relay(&backend, search.clone())
            .respond(vec![ChatMessage::user("Salut")])
            .await
            .unwrap();

        assert_eq!(reply.content.as_deref(), Some("Bonjour !"));
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tool_choice.as_deref(), Some("auto"));
        assert_eq!(requests[0].temperature, Some(ASSISTANT_TEMPERATURE));
        assert_eq!(requests[0].tools.as_ref().unwrap()[0].function.name, "web_search");
        assert!(search.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tool_call_then_follow_up() {
        let backend = MockBackend::scripted([
            ChatResponse::single(tool_call_message(vec![ToolCall::function(
                "call_1",
                "web_search",
                r#"{"query":"taux directeur","maxResults":40,"timeRange":"d7"}"#,
            )])),
            ChatResponse::single(ChatMessage::assistant("Le taux est maintenu.")),
        ]);
        let search = Arc::new(RecordingSearch::default());

        let reply = relay(&backend, search.clone())
            .respond(vec![ChatMessage::user("Quel est le taux directeur ?")])
            .await
            .unwrap();
        assert_eq!(reply.content.as_deref(), Some("Le taux est maintenu."));

        let seen = search.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query, "taux directeur");
        assert_eq!(seen[0].max_results, 10);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        let follow_up = &requests[1];
        assert!(follow_up.tools.is_none());
        assert!(follow_up.tool_choice.is_none());
        assert_eq!(follow_up.messages.len(), 3);
        let tool_msg = &follow_up.messages[2];
        assert_eq!(tool_msg.role, "tool");
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_msg.content.as_deref().unwrap().contains("Banque du Canada"));
    }

    #[tokio::test]
    async fn test_unknown_tool_gets_error_message() {
        let backend = MockBackend::scripted([
            ChatResponse::single(tool_call_message(vec![ToolCall::function(
                "call_9",
                "get_weather",
                "{}",
            )])),
            ChatResponse::single(ChatMessage::assistant("Je ne peux pas.")),
        ]);
        let search = Arc::new(RecordingSearch::default());

        relay(&backend, search.clone())
            .respond(vec![ChatMessage::user("Météo ?")])
            .await
            .unwrap();

        let requests = backend.requests();
        let tool_msg = &requests[1].messages[2];
        assert_eq!(
            tool_msg.content.as_deref(),
            Some(r#"{"error":"Outil inconnu: get_weather"}"#)
        );
        assert!(search.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_choice_is_empty_response() {
        let backend = MockBackend::scripted([ChatResponse { choices: vec![] }]);
        let err = relay(&backend, Arc::new(RecordingSearch::default()))
            .respond(vec![ChatMessage::user("Salut")])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Empty response: Aucun choix renvoyé par le modèle.");
    }

    #[tokio::test]
    async fn test_empty_follow_up_is_empty_response() {
        let backend = MockBackend::scripted([
            ChatResponse::single(tool_call_message(vec![ToolCall::function(
                "call_1",
                "web_search",
                r#"{"query":"x"}"#,
            )])),
            ChatResponse { choices: vec![] },
        ]);
        let err = relay(&backend, Arc::new(RecordingSearch::default()))
            .respond(vec![ChatMessage::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(ref m) if m == "Réponse finale vide du modèle."));
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let backend = MockBackend::scripted([ChatResponse::single(tool_call_message(vec![
            ToolCall::function("call_1", "web_search", r#"{"query":"x"}"#),
        ]))]);
        let search = Arc::new(RecordingSearch {
            fail: true,
            ..Default::default()
        });

        let err = relay(&backend, search)
            .respond(vec![ChatMessage::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_content_falls_back_to_json() {
        let backend = MockBackend::scripted([ChatResponse::single(ChatMessage::assistant("  "))]);
        let reply = relay(&backend, Arc::new(RecordingSearch::default()))
            .respond(vec![ChatMessage::user("x")])
            .await
            .unwrap();

        let content = reply.content.unwrap();
        assert!(content.contains("\"role\": \"assistant\""));
    }

    #[tokio::test]
    async fn test_end_to_end_over_http() {
        use crate::config::SearchConfig;
        use crate::test_utils::{MockChatServer, MockSearchServer};

        let chat = MockChatServer::start().await;
        let search = MockSearchServer::start().await;
        let config = AssistantConfig {
            api_key: Some("sk-test".into()),
            search: SearchConfig {
                tavily_api_key: Some("tvly-test".into()),
                tavily_base_url: search.url(),
                ..SearchConfig::default()
            },
            ..AssistantConfig::default()
        }
        .with_base_url(&chat.url());

        let relay = AssistantRelay::from_config(&config).unwrap();
        let reply = relay
            .respond(vec![
                ChatMessage::system(DEFAULT_SYSTEM_PROMPT),
                ChatMessage::user("Fais une recherche sur le taux directeur"),
            ])
            .await
            .unwrap();

        assert_eq!(
            reply.content.as_deref(),
            Some("D'après la recherche: Résultat 1, Résultat 2, Résultat 3")
        );
        assert_eq!(chat.requests().len(), 2);
    }

    #[test]
    fn test_from_config_without_key() {
        let err = AssistantRelay::from_config(&AssistantConfig::default()).err().unwrap();
        assert!(matches!(err, Error::Config(ref m) if m == "OPENAI_API_KEY manquant"));
    }
}
