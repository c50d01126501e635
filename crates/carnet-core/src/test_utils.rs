//! Test utilities for carnet-core
//!
//! In-process axum servers standing in for the chat-completion API and the
//! search providers, so the HTTP clients can be exercised end to end.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::{ChatMessage, ChatRequest, ChatResponse, ToolCall};

/// API key both mock servers refuse
pub const REJECTED_KEY: &str = "rejected";

async fn spawn(app: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

/// Mock chat-completion server
///
/// Behaviour, driven by the last message of each request:
/// - a `tool` message: answers with a summary of the tool output
/// - user text containing "recherche" while tools are offered: asks for `web_search`
/// - user text containing "vide": returns no choices
/// - anything else: echoes the user text
pub struct MockChatServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockChatServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(requests.clone());

        let (addr, shutdown_tx) = spawn(app).await;
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            requests,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn bearer_rejected(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", REJECTED_KEY))
}

async fn handle_chat(
    State(requests): State<Arc<Mutex<Vec<ChatRequest>>>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    if bearer_rejected(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        )
            .into_response();
    }

    requests.lock().unwrap().push(request.clone());

    let Some(last) = request.messages.last() else {
        return Json(ChatResponse { choices: vec![] }).into_response();
    };
    let text = last.content.clone().unwrap_or_default();

    let response = if last.role == "tool" {
        let snippets: Vec<String> = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("results").and_then(Value::as_array).cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.get("title").and_then(Value::as_str).map(str::to_string))
            .collect();
        ChatResponse::single(ChatMessage::assistant(format!(
            "D'après la recherche: {}",
            snippets.join(", ")
        )))
    } else if text.contains("vide") {
        ChatResponse { choices: vec![] }
    } else if text.contains("recherche") && request.tools.is_some() {
        let arguments = json!({"query": text, "maxResults": 3}).to_string();
        ChatResponse::single(ChatMessage {
            content: None,
            tool_calls: Some(vec![ToolCall::function("call_mock_1", "web_search", arguments)]),
            ..ChatMessage::assistant("")
        })
    } else {
        ChatResponse::single(ChatMessage::assistant(format!("Réponse: {}", text)))
    };

    Json(response).into_response()
}

/// Mock Tavily and SerpAPI endpoints on one server
///
/// Tavily returns exactly `max_results` hits; SerpAPI always returns ten
/// organic results so client-side slicing can be checked.
pub struct MockSearchServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockSearchServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/search", post(handle_tavily))
            .route("/search.json", get(handle_serpapi));

        let (addr, shutdown_tx) = spawn(app).await;
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockSearchServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct TavilyRequest {
    query: String,
    #[serde(default)]
    max_results: usize,
}

async fn handle_tavily(headers: HeaderMap, Json(request): Json<TavilyRequest>) -> Response {
    let key = headers
        .get("x-tavily-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if key.is_empty() || key == REJECTED_KEY {
        return (StatusCode::BAD_GATEWAY, "invalid api key").into_response();
    }

    let results: Vec<Value> = (1..=request.max_results.max(1))
        .map(|i| {
            json!({
                "title": format!("Résultat {}", i),
                "url": format!("https://example.com/{}", i),
                "content": format!("Extrait {} sur {}", i, request.query),
                "score": 0.9,
            })
        })
        .collect();

    Json(json!({
        "query": request.query,
        "answer": format!("Réponse pour: {}", request.query),
        "results": results,
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct SerpApiQuery {
    q: String,
    api_key: String,
}

async fn handle_serpapi(Query(query): Query<SerpApiQuery>) -> Response {
    if query.api_key == REJECTED_KEY {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid API key"})))
            .into_response();
    }

    let organic: Vec<Value> = (1..=10)
        .map(|i| {
            json!({
                "position": i,
                "title": format!("{} #{}", query.q, i),
                "link": format!("https://example.org/{}", i),
                "snippet": format!("Extrait {}", i),
            })
        })
        .collect();

    Json(json!({"organic_results": organic})).into_response()
}
