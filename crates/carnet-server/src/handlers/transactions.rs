//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use carnet_core::models::{Category, Period, Transaction};
use carnet_core::stores::{CategoryTotal, MonthSummary, TransactionFilter};
use carnet_core::TransactionInput;

/// Query parameters selecting a month window and optional filters
///
/// Year and month default to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Case-insensitive description search
    pub search: Option<String>,
    /// Exact category ("Toutes" for all)
    pub category: Option<String>,
}

impl FilterQuery {
    pub fn to_filter(&self) -> Result<TransactionFilter, AppError> {
        let current = Period::current();
        let period = Period::new(
            self.year.unwrap_or(current.year),
            self.month.unwrap_or(current.month),
        )?;

        let mut filter = TransactionFilter::new(period);
        if let Some(search) = &self.search {
            filter = filter.with_search(search.as_str());
        }
        if let Some(category) = &self.category {
            filter = filter.with_category(category.as_str());
        }
        Ok(filter)
    }
}

#[derive(Serialize)]
pub struct TransactionListResponse {
    pub period: Period,
    pub transactions: Vec<Transaction>,
    /// Sum of signed amounts of the listed transactions
    pub balance: f64,
}

/// GET /api/transactions - List transactions of a month window
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let filter = params.to_filter()?;
    let ledger = state.ledger()?;

    let transactions = ledger.filtered(&filter);
    let balance = carnet_core::stores::balance(&transactions);

    Ok(Json(TransactionListResponse {
        period: filter.period,
        transactions,
        balance,
    }))
}

/// POST /api/transactions - Create a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(mut input): Json<TransactionInput>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    input.edit_id = None;
    let tx = state.ledger()?.commit_transaction(input)?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// PUT /api/transactions/:id - Edit a transaction in place
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(mut input): Json<TransactionInput>,
) -> Result<Json<Transaction>, AppError> {
    input.edit_id = Some(id);
    let tx = state.ledger()?.commit_transaction(input)?;
    Ok(Json(tx))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.ledger()?.delete_transaction(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    /// Fixed categories followed by custom ones in use
    pub categories: Vec<String>,
    /// Fixed categories only, in form order
    pub fixed: Vec<&'static str>,
}

/// GET /api/categories - List categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = state.ledger()?.categories();
    let fixed = Category::ALL.iter().map(Category::as_str).collect();
    Ok(Json(CategoriesResponse { categories, fixed }))
}

#[derive(Serialize)]
pub struct YearsResponse {
    /// Newest first
    pub years: Vec<i32>,
}

/// GET /api/years - Years offered by the period selector
pub async fn list_years(State(state): State<Arc<AppState>>) -> Result<Json<YearsResponse>, AppError> {
    let years = state.ledger()?.available_years();
    Ok(Json(YearsResponse { years }))
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Serialize)]
pub struct AnnualSummaryResponse {
    pub year: i32,
    pub months: Vec<MonthSummary>,
}

/// GET /api/summary/year - Income, expense and balance per month
pub async fn annual_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearQuery>,
) -> Result<Json<AnnualSummaryResponse>, AppError> {
    let year = params
        .year
        .unwrap_or_else(|| chrono::Local::now().year());
    let months = state.ledger()?.annual_summary(year);
    Ok(Json(AnnualSummaryResponse { year, months }))
}

#[derive(Serialize)]
pub struct CategorySummaryResponse {
    pub period: Period,
    pub categories: Vec<CategoryTotal>,
}

/// GET /api/summary/categories - Net total per category for a window
pub async fn category_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<CategorySummaryResponse>, AppError> {
    let filter = params.to_filter()?;
    let categories = state.ledger()?.category_recap(&filter);
    Ok(Json(CategorySummaryResponse {
        period: filter.period,
        categories,
    }))
}
