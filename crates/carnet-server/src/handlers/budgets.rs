//! Budget and advice handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::FilterQuery;
use crate::{AppError, AppState};
use carnet_core::advice::Advice;
use carnet_core::models::{Budget, NewBudget, Period};
use carnet_core::{BudgetReport, UpsertOutcome};

#[derive(Serialize)]
pub struct BudgetListResponse {
    pub period: Period,
    /// Sorted by category name
    pub budgets: Vec<Budget>,
}

/// GET /api/budgets - Budgets of a month window
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<BudgetListResponse>, AppError> {
    let period = params.to_filter()?.period;
    let budgets = state.ledger()?.budgets_for(period);
    Ok(Json(BudgetListResponse { period, budgets }))
}

/// POST /api/budgets - Create a budget, or replace the cap of an existing one
pub async fn upsert_budget(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewBudget>,
) -> Result<(StatusCode, Json<UpsertOutcome>), AppError> {
    let outcome = state.ledger()?.upsert_budget(input)?;
    let status = match outcome {
        UpsertOutcome::Created(id) => {
            info!(id, "Budget created");
            StatusCode::CREATED
        }
        UpsertOutcome::Replaced(id) => {
            info!(id, "Budget cap replaced");
            StatusCode::OK
        }
    };
    Ok((status, Json(outcome)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    #[serde(alias = "montant")]
    pub amount: f64,
    #[serde(default, alias = "categorie")]
    pub category: Option<String>,
}

/// PUT /api/budgets/:id - Change a budget's cap (and optionally its category)
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBudgetRequest>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.ledger()?.update_budget(id, req.amount, req.category)?;
    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Remove a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.ledger()?.remove_budget(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/budgets/usage - Usage rows and alert banner for a window
pub async fn budget_usage(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<BudgetReport>, AppError> {
    let filter = params.to_filter()?;
    let report = state.ledger()?.budget_report(&filter);
    Ok(Json(report))
}

/// GET /api/advice - Top spenders, overages and recommended actions
pub async fn get_advice(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Advice>, AppError> {
    let filter = params.to_filter()?;
    let advice = state.ledger()?.advice(&filter);
    Ok(Json(advice))
}
