//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use chrono::Utc;
use obrador_core::accounts::{AccountError, AccountType, ParentAccount, validate_hierarchy};
use obrador_shared::types::AccountId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{accounts, sea_orm_active_enums::AccountType as DbAccountType};

/// Error types for account store operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    /// A chart rule was violated.
    #[error(transparent)]
    Domain(#[from] AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AccountStoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Domain(err) => err.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller may retry the operation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Hierarchical code, unique across the chart.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Depth in the hierarchy, 1 for roots.
    pub level: i32,
    /// Parent account, required below level 1.
    pub parent_id: Option<AccountId>,
    /// Whether lines may post to this account.
    pub allows_posting: bool,
    /// Free-form description.
    pub description: Option<String>,
}

/// Input for updating an account.
///
/// Code and parent are fixed once the account exists.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
    /// Open or close the account to postings.
    pub allows_posting: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by hierarchy level.
    pub level: Option<i32>,
}

/// An account together with its immediate neighbours in the tree.
#[derive(Debug, Clone)]
pub struct AccountNode {
    /// The account record.
    pub account: accounts::Model,
    /// Its parent, absent for roots.
    pub parent: Option<accounts::Model>,
    /// Direct children ordered by code.
    pub children: Vec<accounts::Model>,
}

/// Account repository for chart operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is already taken
    /// - The parent does not exist, or the level does not sit below it
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountStoreError> {
        if self.find_by_code(&input.code).await?.is_some() {
            return Err(AccountError::DuplicateCode(input.code).into());
        }

        let parent = match input.parent_id {
            Some(parent_id) => Some(
                accounts::Entity::find_by_id(parent_id.into_inner())
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| {
                        AccountError::InvalidHierarchy(format!(
                            "parent account {parent_id} does not exist"
                        ))
                    })?,
            ),
            None => None,
        };

        validate_hierarchy(
            input.level,
            parent.as_ref().map(|p| ParentAccount { level: p.level }),
        )?;

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            code: Set(input.code.clone()),
            name: Set(input.name),
            description: Set(input.description),
            account_type: Set(input.account_type.into()),
            level: Set(input.level),
            parent_id: Set(parent.map(|p| p.id)),
            is_active: Set(true),
            allows_posting: Set(input.allows_posting),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await.map_err(|err| {
            // Lost a race against a concurrent insert of the same code
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AccountStoreError::Domain(AccountError::DuplicateCode(input.code.clone()))
            } else {
                err.into()
            }
        })?;

        tracing::info!(account_id = %account.id, code = %account.code, "account created");
        Ok(account)
    }

    /// Updates the mutable fields of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn update_account(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountStoreError> {
        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id.into_inner()))?;

        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(allows_posting) = input.allows_posting {
            active.allows_posting = Set(allows_posting);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Lists accounts ordered by code, each with its parent and direct children.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<AccountNode>, AccountStoreError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(DbAccountType::from(account_type)));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        if let Some(level) = filter.level {
            query = query.filter(accounts::Column::Level.eq(level));
        }

        let accounts = query.all(&self.db).await?;
        self.attach_neighbours(accounts).await
    }

    /// Finds one account with its parent and direct children.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn get_account(&self, id: AccountId) -> Result<AccountNode, AccountStoreError> {
        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id.into_inner()))?;

        let mut nodes = self.attach_neighbours(vec![account]).await?;
        nodes
            .pop()
            .ok_or_else(|| AccountError::NotFound(id.into_inner()).into())
    }

    /// Finds an account by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Finds every account whose code is in `codes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_codes(&self, codes: &[&str]) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Code.is_in(codes.iter().copied()))
            .all(&self.db)
            .await
    }

    async fn attach_neighbours(
        &self,
        accounts: Vec<accounts::Model>,
    ) -> Result<Vec<AccountNode>, AccountStoreError> {
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = accounts.iter().map(|a| a.id).collect();
        let parent_ids: Vec<Uuid> = accounts.iter().filter_map(|a| a.parent_id).collect();

        let parents: HashMap<Uuid, accounts::Model> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(parent_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut children: HashMap<Uuid, Vec<accounts::Model>> = HashMap::new();
        for child in accounts::Entity::find()
            .filter(accounts::Column::ParentId.is_in(ids))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?
        {
            if let Some(parent_id) = child.parent_id {
                children.entry(parent_id).or_default().push(child);
            }
        }

        Ok(accounts
            .into_iter()
            .map(|account| AccountNode {
                parent: account.parent_id.and_then(|id| parents.get(&id).cloned()),
                children: children.remove(&account.id).unwrap_or_default(),
                account,
            })
            .collect())
    }
}
