//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use obrador_core::accounts::AccountType;
use obrador_db::{
    entities::accounts,
    repositories::{
        AccountFilter, AccountNode, AccountRepository, CreateAccountInput, UpdateAccountInput,
    },
};
use obrador_shared::types::AccountId;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{account_id}", get(get_account).patch(update_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by hierarchy level.
    pub level: Option<i32>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Dotted hierarchical code, unique across the chart.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account description.
    pub description: Option<String>,
    /// ASSET, LIABILITY, EQUITY, INCOME or EXPENSE.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Hierarchy level, 1 for a root.
    pub level: i32,
    /// Parent account ID, required below level 1.
    pub parent_id: Option<Uuid>,
    /// Whether lines may post to the account (default: leaf level only).
    pub allows_posting: Option<bool>,
}

/// Request body for updating an account.
///
/// Code, type, level and parent are fixed once created.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    pub name: Option<String>,
    /// Account description; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
    /// Whether lines may post to the account.
    pub allows_posting: Option<bool>,
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A neighbouring account in the hierarchy.
#[derive(Debug, Serialize)]
pub struct AccountRef {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
}

impl From<accounts::Model> for AccountRef {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
        }
    }
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account description.
    pub description: Option<String>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Hierarchy level.
    pub level: i32,
    /// Parent account ID.
    pub parent_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether lines may post to the account.
    pub allows_posting: bool,
    /// Parent account.
    pub parent: Option<AccountRef>,
    /// Direct children.
    pub children: Vec<AccountRef>,
}

impl From<AccountNode> for AccountResponse {
    fn from(node: AccountNode) -> Self {
        let AccountNode {
            account,
            parent,
            children,
        } = node;
        Self {
            id: account.id,
            code: account.code,
            name: account.name,
            description: account.description,
            account_type: AccountType::from(account.account_type).as_str().to_string(),
            level: account.level,
            parent_id: account.parent_id,
            is_active: account.is_active,
            allows_posting: account.allows_posting,
            parent: parent.map(AccountRef::from),
            children: children.into_iter().map(AccountRef::from).collect(),
        }
    }
}

fn parse_account_type(value: &str) -> Result<AccountType, ApiError> {
    value
        .parse()
        .map_err(|message: String| ApiError::bad_request("INVALID_ACCOUNT_TYPE", message))
}

/// GET /accounts - List the chart of accounts in code order.
async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListAccountsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = AccountFilter {
        account_type: query.account_type.as_deref().map(parse_account_type).transpose()?,
        is_active: query.is_active,
        level: query.level,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let accounts = repo.list_accounts(filter).await?;

    let data: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(Json(data))
}

/// POST /accounts - Register an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_type = parse_account_type(&payload.account_type)?;
    let input = CreateAccountInput {
        allows_posting: payload.allows_posting.unwrap_or(payload.level == 4),
        code: payload.code,
        name: payload.name,
        account_type,
        level: payload.level,
        parent_id: payload.parent_id.map(AccountId::from_uuid),
        description: payload.description,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let created = repo.create_account(input).await?;

    info!(
        account_id = %created.id,
        code = %created.code,
        user_id = %auth.user_id(),
        "Account created"
    );

    let account = repo.get_account(AccountId::from_uuid(created.id)).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET /accounts/{account_id} - Fetch an account with its parent and children.
async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.get_account(AccountId::from_uuid(account_id)).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// PATCH /accounts/{account_id} - Rename, describe, or toggle flags.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdateAccountInput {
        name: payload.name,
        description: payload.description,
        is_active: payload.is_active,
        allows_posting: payload.allows_posting,
    };

    let id = AccountId::from_uuid(account_id);
    let repo = AccountRepository::new((*state.db).clone());
    repo.update_account(id, input).await?;

    info!(%account_id, user_id = %auth.user_id(), "Account updated");

    let account = repo.get_account(id).await?;
    Ok(Json(AccountResponse::from(account)))
}
