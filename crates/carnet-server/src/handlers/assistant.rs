//! Assistant relay handler

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AppError, AppState};
use carnet_core::ai::ChatMessage;

#[derive(Debug, Default, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub message: ChatMessage,
}

/// POST /api/assistant - Relay a conversation to the model
///
/// A body that is not a JSON object with a `messages` array is treated as
/// an empty conversation.
pub async fn ask_assistant(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AssistantResponse>, AppError> {
    let request: AssistantRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        warn!(error = %e, "Unreadable assistant request, relaying an empty conversation");
        AssistantRequest::default()
    });

    let relay = state
        .relay
        .as_ref()
        .ok_or_else(|| AppError::internal("OPENAI_API_KEY manquant"))?;

    let message = relay.respond(request.messages).await?;
    Ok(Json(AssistantResponse { message }))
}
