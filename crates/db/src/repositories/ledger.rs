//! Ledger repository: feeds posted lines to the ledger projector.

use obrador_core::ledger::{AccountLedger, DateRange, LedgerProjector};
use obrador_core::reports::ReportError;
use obrador_shared::types::AccountId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::postings::{PostingFilter, load_postings};
use super::report::ReportStoreError;
use crate::entities::accounts;

/// Ledger repository for running-balance projections.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Projects one account over `range`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub async fn project_account(
        &self,
        account_id: AccountId,
        range: DateRange,
    ) -> Result<AccountLedger, ReportStoreError> {
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReportError::AccountNotFound(account_id.into_inner()))?;

        let postings = load_postings(
            &self.db,
            PostingFilter {
                account_id: Some(account_id),
                from: Some(range.start),
                to: range.end,
            },
        )
        .await?;

        Ok(LedgerProjector::project(account.summary(), range, &postings))
    }

    /// Projects every active, postable account with activity in `range`, in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn project_all(&self, range: DateRange) -> Result<Vec<AccountLedger>, ReportStoreError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::AllowsPosting.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        let postings = load_postings(
            &self.db,
            PostingFilter {
                account_id: None,
                from: Some(range.start),
                to: range.end,
            },
        )
        .await?;

        Ok(LedgerProjector::project_all(
            accounts.iter().map(accounts::Model::summary).collect(),
            range,
            &postings,
        ))
    }
}
