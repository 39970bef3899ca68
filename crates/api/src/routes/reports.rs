//! Financial report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use obrador_core::reports::ReportError;
use obrador_db::ReportRepository;
use serde::Deserialize;
use tracing::info;

use super::ledger::RangeQuery;
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/income-statement", get(income_statement))
}

/// Query parameters for the balance sheet.
#[derive(Debug, Deserialize)]
pub struct BalanceSheetQuery {
    /// Cut-off date (YYYY-MM-DD), inclusive.
    pub as_of: Option<NaiveDate>,
}

/// GET /reports/trial-balance - Debits and credits per account for a range.
async fn trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = query.range()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.trial_balance(range).await?;

    info!(
        start = %range.start,
        end = %range.end,
        balanced = report.totals.is_balanced,
        user_id = %auth.user_id(),
        "Trial balance generated"
    );

    Ok(Json(report))
}

/// GET /reports/balance-sheet - Position as of a date.
async fn balance_sheet(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<BalanceSheetQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let as_of = query.as_of.ok_or(ReportError::MissingDateRange)?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.balance_sheet(as_of).await?;
    Ok(Json(report))
}

/// GET /reports/income-statement - Income less expenses for a range.
async fn income_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = query.range()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.income_statement(range).await?;
    Ok(Json(report))
}
