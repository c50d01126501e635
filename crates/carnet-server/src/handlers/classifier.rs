//! Category suggestion and learning handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use carnet_core::models::SuggestionHint;

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub description: String,
    #[serde(default, alias = "montant")]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub category: String,
    pub score: f64,
    pub hint: SuggestionHint,
}

/// POST /api/suggest - Suggest a category for a description
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    let suggestion = state.ledger()?.suggest(&req.description, req.amount);
    Ok(Json(SuggestResponse {
        hint: suggestion.hint(),
        category: suggestion.category,
        score: suggestion.score,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LearnRequest {
    pub description: String,
    #[serde(alias = "categorie")]
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct LearnResponse {
    pub learned_tokens: usize,
}

/// POST /api/learn - Associate a description's tokens with a category
pub async fn learn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LearnRequest>,
) -> Result<Json<LearnResponse>, AppError> {
    let learned_tokens = state.ledger()?.learn(&req.description, &req.category)?;
    Ok(Json(LearnResponse { learned_tokens }))
}
