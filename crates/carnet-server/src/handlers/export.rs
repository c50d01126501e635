//! CSV export and import handlers

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, Request, State},
    http::{header, Response, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::FilterQuery;
use crate::{AppError, AppState, MAX_UPLOAD_SIZE};
use carnet_core::ImportSummary;

fn csv_response(csv: String, filename: &str) -> Result<Response<Body>, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// GET /api/export/transactions - Export transactions to CSV
///
/// Without `year`/`month` every transaction is exported; with them, only
/// the filtered window.
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Response<Body>, AppError> {
    let filtered = params.year.is_some() || params.month.is_some();
    let csv = {
        let ledger = state.ledger()?;
        if filtered {
            ledger.export_transactions(Some(&params.to_filter()?))?
        } else {
            ledger.export_transactions(None)?
        }
    };

    let rows = csv.lines().count().saturating_sub(1);
    info!("Exported {} transactions to CSV", rows);
    csv_response(csv, "transactions.csv")
}

/// GET /api/export/objectives - Export objectives to CSV
pub async fn export_objectives(
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, AppError> {
    let csv = state.ledger()?.export_objectives()?;
    csv_response(csv, "objectifs.csv")
}

#[derive(Serialize)]
pub struct ImportResponse {
    /// false when the file had no data row and nothing changed
    pub replaced: bool,
    pub imported: usize,
}

impl From<Option<ImportSummary>> for ImportResponse {
    fn from(summary: Option<ImportSummary>) -> Self {
        Self {
            replaced: summary.is_some(),
            imported: summary.map_or(0, |s| s.imported),
        }
    }
}

async fn read_upload(request: Request) -> Result<Bytes, AppError> {
    axum::body::to_bytes(request.into_body(), MAX_UPLOAD_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body or file too large (max 10MB)"))
}

/// POST /api/import/transactions - Replace transactions with a CSV file (raw body)
pub async fn import_transactions(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ImportResponse>, AppError> {
    let body = read_upload(request).await?;
    let summary = state.ledger()?.import_transactions(body.as_ref())?;
    Ok(Json(summary.into()))
}

/// POST /api/import/objectives - Replace objectives with a CSV file (raw body)
pub async fn import_objectives(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ImportResponse>, AppError> {
    let body = read_upload(request).await?;
    let summary = state.ledger()?.import_objectives(body.as_ref())?;
    Ok(Json(summary.into()))
}
