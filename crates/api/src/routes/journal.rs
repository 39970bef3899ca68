//! Journal entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use obrador_core::journal::{CreateEntryInput, EntryLineInput, EntryStatus, EntryType};
use obrador_core::ledger::DateRange;
use obrador_core::sales::{PaymentMethod, SaleInvoice};
use obrador_db::repositories::{EntryWithLines, LineWithAccount};
use obrador_shared::types::{AccountId, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the journal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", post(create_entry))
        .route("/journal-entries/sales", post(create_sale_entry))
        .route("/journal-entries/{entry_id}", get(get_entry))
        .route("/journal-entries/{entry_id}/approve", post(approve_entry))
        .route("/journal-entries/{entry_id}/void", post(void_entry))
        .route("/journal-book", get(journal_book))
}

/// Request body for one entry line.
#[derive(Debug, Deserialize)]
pub struct EntryLineRequest {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount (default 0).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (default 0).
    #[serde(default)]
    pub credit: Decimal,
    /// Line memo.
    pub description: Option<String>,
}

/// Request body for creating a journal entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Accounting date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry type such as OPENING, OPERATION or CLOSING (default: OPERATION).
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// Originating document kind.
    pub reference_type: Option<String>,
    /// Originating document identifier.
    pub reference_id: Option<String>,
    /// Lines in order.
    pub lines: Vec<EntryLineRequest>,
}

/// Request body for booking a sale invoice.
#[derive(Debug, Deserialize)]
pub struct SaleEntryRequest {
    /// Invoice identifier in the invoicing module.
    pub invoice_id: String,
    /// Printed invoice number.
    pub invoice_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// CASH, TRANSFER, CARD or CREDIT.
    pub payment_method: String,
    /// Amount before tax and discount.
    pub subtotal: Decimal,
    /// Tax charged.
    #[serde(default)]
    pub tax: Decimal,
    /// Discount granted.
    #[serde(default)]
    pub discount: Decimal,
    /// Amount collected.
    pub total: Decimal,
}

/// Query parameters for the journal book.
#[derive(Debug, Deserialize)]
pub struct JournalBookQuery {
    /// First day included (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Restrict to one entry type.
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}

/// Account reference inside a line.
#[derive(Debug, Serialize)]
pub struct LineAccount {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
}

/// Response for one entry line.
#[derive(Debug, Serialize)]
pub struct EntryLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// 1-based position.
    pub line_number: i32,
    /// Account posted to.
    pub account: LineAccount,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub description: Option<String>,
}

impl From<LineWithAccount> for EntryLineResponse {
    fn from(value: LineWithAccount) -> Self {
        let LineWithAccount { line, account } = value;
        Self {
            id: line.id,
            line_number: line.line_number,
            account: LineAccount {
                id: account.id,
                code: account.code,
                name: account.name,
            },
            debit: line.debit,
            credit: line.credit,
            description: line.description,
        }
    }
}

/// Response for a journal entry with its lines.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Yearly sequential number, e.g. `AST-2025-000001`.
    pub entry_number: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub entry_type: &'static str,
    /// DRAFT, POSTED or VOIDED.
    pub status: &'static str,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Originating document kind.
    pub reference_type: Option<String>,
    /// Originating document identifier.
    pub reference_id: Option<String>,
    /// Creating user.
    pub created_by: Uuid,
    /// Approving user.
    pub approved_by: Option<Uuid>,
    /// Approval time.
    pub approved_at: Option<DateTime<FixedOffset>>,
    /// Voiding user.
    pub voided_by: Option<Uuid>,
    /// Voiding time.
    pub voided_at: Option<DateTime<FixedOffset>>,
    /// Lines in order.
    pub lines: Vec<EntryLineResponse>,
}

impl From<EntryWithLines> for EntryResponse {
    fn from(value: EntryWithLines) -> Self {
        let EntryWithLines { entry, lines } = value;
        Self {
            id: entry.id,
            entry_number: entry.entry_number,
            date: entry.date,
            description: entry.description,
            entry_type: EntryType::from(entry.entry_type).as_str(),
            status: EntryStatus::from(entry.status).as_str(),
            total_debit: entry.total_debit,
            total_credit: entry.total_credit,
            reference_type: entry.reference_type,
            reference_id: entry.reference_id,
            created_by: entry.created_by,
            approved_by: entry.approved_by,
            approved_at: entry.approved_at,
            voided_by: entry.voided_by,
            voided_at: entry.voided_at,
            lines: lines.into_iter().map(EntryLineResponse::from).collect(),
        }
    }
}

fn parse_entry_type(value: &str) -> Result<EntryType, ApiError> {
    value
        .parse()
        .map_err(|message: String| ApiError::bad_request("INVALID_ENTRY_TYPE", message))
}

/// POST /journal-entries - Record an entry with all of its lines.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry_type = payload
        .entry_type
        .as_deref()
        .map(parse_entry_type)
        .transpose()?
        .unwrap_or(EntryType::Operation);

    let lines = payload
        .lines
        .into_iter()
        .map(|line| EntryLineInput {
            account_id: AccountId::from_uuid(line.account_id),
            debit: line.debit,
            credit: line.credit,
            description: line.description,
        })
        .collect();

    let input = CreateEntryInput {
        date: payload.date,
        description: payload.description,
        entry_type,
        reference_type: payload.reference_type,
        reference_id: payload.reference_id,
        lines,
        created_by: auth.user_id(),
    };

    let entry = state.journal().create_entry(input).await?;
    Ok((StatusCode::CREATED, Json(EntryResponse::from(entry))))
}

/// POST /journal-entries/sales - Book a sale invoice.
async fn create_sale_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaleEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_method: PaymentMethod = payload
        .payment_method
        .parse()
        .map_err(|message: String| ApiError::bad_request("INVALID_PAYMENT_METHOD", message))?;

    let invoice = SaleInvoice {
        invoice_id: payload.invoice_id,
        invoice_number: payload.invoice_number,
        customer_name: payload.customer_name,
        date: payload.date,
        payment_method,
        subtotal: payload.subtotal,
        tax: payload.tax,
        discount: payload.discount,
        total: payload.total,
    };

    let entry = state
        .journal()
        .create_sale_entry(&invoice, &state.sale_accounts, auth.user_id())
        .await?;

    info!(
        entry_id = %entry.entry.id,
        invoice_id = %invoice.invoice_id,
        "Sale invoice booked"
    );

    Ok((StatusCode::CREATED, Json(EntryResponse::from(entry))))
}

/// GET /journal-entries/{entry_id} - Fetch an entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.journal().get_entry(EntryId::from_uuid(entry_id)).await?;
    Ok(Json(EntryResponse::from(entry)))
}

/// POST /journal-entries/{entry_id}/approve - Post a draft.
async fn approve_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .journal()
        .approve_entry(EntryId::from_uuid(entry_id), auth.user_id())
        .await?;
    Ok(Json(EntryResponse::from(entry)))
}

/// POST /journal-entries/{entry_id}/void - Void a draft or posted entry.
async fn void_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .journal()
        .void_entry(EntryId::from_uuid(entry_id), auth.user_id())
        .await?;
    Ok(Json(EntryResponse::from(entry)))
}

/// GET /journal-book - Posted entries in a date range, chronologically.
async fn journal_book(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<JournalBookQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::from_bounds(query.from, query.to)?;
    let entry_type = query.entry_type.as_deref().map(parse_entry_type).transpose()?;

    let entries = state.journal().journal_book(range, entry_type).await?;

    let data: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();
    Ok(Json(data))
}
