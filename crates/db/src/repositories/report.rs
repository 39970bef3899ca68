//! Report repository for financial statements.
//!
//! Every statement is derived from POSTED lines on each request; nothing is
//! cached between calls.

use chrono::NaiveDate;
use obrador_core::accounts::AccountSummary;
use obrador_core::ledger::DateRange;
use obrador_core::reports::{BalanceSheet, IncomeStatement, ReportError, ReportService, TrialBalance};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use super::postings::{PostingFilter, load_postings};
use crate::entities::accounts;

/// Error types for report store operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportStoreError {
    /// A report rule was violated.
    #[error(transparent)]
    Domain(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ReportStoreError {
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

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Trial balance of active, postable accounts over `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(&self, range: DateRange) -> Result<TrialBalance, ReportStoreError> {
        let accounts = self.report_accounts(true).await?;
        let postings = load_postings(
            &self.db,
            PostingFilter {
                account_id: None,
                from: Some(range.start),
                to: range.end,
            },
        )
        .await?;

        Ok(ReportService::trial_balance(
            range,
            ReportService::accumulate(accounts, &postings),
        ))
    }

    /// Balance sheet from inception to `as_of`.
    ///
    /// Every account with postings counts, including deactivated ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(&self, as_of: NaiveDate) -> Result<BalanceSheet, ReportStoreError> {
        let accounts = self.report_accounts(false).await?;
        let postings = load_postings(
            &self.db,
            PostingFilter {
                account_id: None,
                from: None,
                to: as_of,
            },
        )
        .await?;

        let activity = ReportService::accumulate(accounts, &postings);
        let sheet = ReportService::balance_sheet(as_of, &activity);
        if !sheet.is_balanced {
            tracing::warn!(
                %as_of,
                assets = %sheet.assets.total,
                liabilities_and_equity = %sheet.total_liabilities_and_equity,
                "balance sheet does not balance"
            );
        }
        Ok(sheet)
    }

    /// Income statement over `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn income_statement(
        &self,
        range: DateRange,
    ) -> Result<IncomeStatement, ReportStoreError> {
        let accounts = self.report_accounts(false).await?;
        let postings = load_postings(
            &self.db,
            PostingFilter {
                account_id: None,
                from: Some(range.start),
                to: range.end,
            },
        )
        .await?;

        Ok(ReportService::income_statement(
            range,
            &ReportService::accumulate(accounts, &postings),
        ))
    }

    /// Accounts in code order; trial balances only look at active, postable ones.
    async fn report_accounts(&self, active_postable_only: bool) -> Result<Vec<AccountSummary>, DbErr> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);
        if active_postable_only {
            query = query
                .filter(accounts::Column::IsActive.eq(true))
                .filter(accounts::Column::AllowsPosting.eq(true));
        }

        Ok(query
            .all(&self.db)
            .await?
            .iter()
            .map(accounts::Model::summary)
            .collect())
    }
}
