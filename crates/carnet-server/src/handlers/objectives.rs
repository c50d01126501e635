//! Savings objective handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use carnet_core::models::{NewObjective, Objective};

#[derive(Serialize)]
pub struct ObjectiveView {
    #[serde(flatten)]
    pub objective: Objective,
    /// saved / target, 0 when the target is not positive
    pub progress: f64,
}

impl From<Objective> for ObjectiveView {
    fn from(objective: Objective) -> Self {
        Self {
            progress: objective.progress(),
            objective,
        }
    }
}

/// GET /api/objectives - List objectives
pub async fn list_objectives(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ObjectiveView>>, AppError> {
    let objectives = state
        .ledger()?
        .objectives()
        .all()
        .iter()
        .cloned()
        .map(ObjectiveView::from)
        .collect();
    Ok(Json(objectives))
}

/// POST /api/objectives - Create an objective
pub async fn create_objective(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewObjective>,
) -> Result<(StatusCode, Json<ObjectiveView>), AppError> {
    let objective = state.ledger()?.add_objective(input)?;
    Ok((StatusCode::CREATED, Json(objective.into())))
}

#[derive(Debug, Deserialize)]
pub struct UpdateObjectiveRequest {
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(alias = "cible")]
    pub target: f64,
    #[serde(alias = "epargne")]
    pub saved: f64,
}

/// PUT /api/objectives/:id - Edit name, target and saved amount
pub async fn update_objective(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateObjectiveRequest>,
) -> Result<Json<ObjectiveView>, AppError> {
    let objective = state
        .ledger()?
        .edit_objective(id, req.name, req.target, req.saved)?;
    Ok(Json(objective.into()))
}

/// DELETE /api/objectives/:id - Remove an objective
pub async fn delete_objective(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.ledger()?.remove_objective(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    pub delta: f64,
}

#[derive(Serialize)]
pub struct ContributeResponse {
    /// false when `delta` was zero and nothing changed
    pub applied: bool,
    pub objective: Option<ObjectiveView>,
}

/// POST /api/objectives/:id/contribute - Add to (or withdraw from) the saved amount
pub async fn contribute_objective(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ContributeRequest>,
) -> Result<Json<ContributeResponse>, AppError> {
    let updated = state.ledger()?.contribute(id, req.delta)?;
    Ok(Json(ContributeResponse {
        applied: updated.is_some(),
        objective: updated.map(ObjectiveView::from),
    }))
}
