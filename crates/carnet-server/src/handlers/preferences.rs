//! Theme preference handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use carnet_core::models::Theme;

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// GET /api/theme - Current theme (light when unset)
pub async fn get_theme(State(state): State<Arc<AppState>>) -> Result<Json<ThemeBody>, AppError> {
    let theme = state.ledger()?.theme();
    Ok(Json(ThemeBody { theme }))
}

/// PUT /api/theme - Store the theme
pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, AppError> {
    state.ledger()?.set_theme(body.theme)?;
    Ok(Json(body))
}
