//! Account ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use obrador_core::ledger::DateRange;
use obrador_db::LedgerRepository;
use obrador_shared::types::AccountId;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the ledger routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger", get(all_ledgers))
        .route("/ledger/{account_id}", get(account_ledger))
}

/// Query parameters shared by ranged reads.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// First day included (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    /// Both bounds, or `INVALID_DATE_RANGE`.
    pub fn range(&self) -> Result<DateRange, ApiError> {
        Ok(DateRange::from_bounds(self.from, self.to)?)
    }
}

/// GET /ledger/{account_id} - Running balance of one account.
async fn account_ledger(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = query.range()?;
    let repo = LedgerRepository::new((*state.db).clone());
    let ledger = repo
        .project_account(AccountId::from_uuid(account_id), range)
        .await?;
    Ok(Json(ledger))
}

/// GET /ledger - Ledgers of every active postable account.
async fn all_ledgers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = query.range()?;
    let repo = LedgerRepository::new((*state.db).clone());
    let ledgers = repo.project_all(range).await?;
    Ok(Json(ledgers))
}
