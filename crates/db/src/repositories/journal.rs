//! Journal repository: persistence side of the journal entry engine.
//!
//! Validation lives in `obrador_core::journal`; this module adds what needs
//! the database: account resolution, entry numbering, atomic header + lines
//! writes, and status transitions.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use obrador_core::journal::{
    CreateEntryInput, EntryNumber, EntryTotals, EntryType, EntryWorkflow, JournalError,
    JournalService, StatusChange, ValidatedLine,
};
use obrador_core::ledger::DateRange;
use obrador_core::sales::{SaleAccountCodes, SaleAccounts, SaleInvoice, SalePolicy};
use obrador_shared::types::{EntryId, EntryLineId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::account::AccountRepository;
use crate::entities::{
    accounts, journal_entries, journal_entry_lines,
    sea_orm_active_enums::{EntryStatus, EntryType as DbEntryType},
};

/// Attempts made to allocate an entry number before giving up.
pub const MAX_NUMBERING_ATTEMPTS: u32 = 3;

/// Default entry number prefix.
pub const DEFAULT_ENTRY_PREFIX: &str = "AST";

/// Error types for journal store operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalStoreError {
    /// A journal rule was violated.
    #[error(transparent)]
    Domain(#[from] JournalError),

    /// Concurrent creations kept colliding on the entry number.
    #[error("Could not allocate an entry number after {attempts} attempts, please retry")]
    Conflict {
        /// Attempts made.
        attempts: u32,
    },

    /// The chart lacks an account the sale policy posts to.
    #[error("Sale posting account '{0}' is missing from the chart")]
    SaleAccountMissing(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl JournalStoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.error_code(),
            Self::Conflict { .. } => "CONFLICT",
            Self::SaleAccountMissing(_) => "SALE_ACCOUNT_MISSING",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Domain(err) => err.http_status_code(),
            Self::Conflict { .. } => 409,
            Self::SaleAccountMissing(_) | Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller may retry the operation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Database(_))
    }
}

/// A line with the account it posts to.
#[derive(Debug, Clone)]
pub struct LineWithAccount {
    /// The line record.
    pub line: journal_entry_lines::Model,
    /// The account referenced by the line.
    pub account: accounts::Model,
}

/// A journal entry hydrated with its lines in line order.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// The header record.
    pub entry: journal_entries::Model,
    /// The lines, ordered by line number.
    pub lines: Vec<LineWithAccount>,
}

/// Journal repository for entry operations.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    prefix: String,
}

impl JournalRepository {
    /// Creates a new journal repository numbering entries with `AST`.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            prefix: DEFAULT_ENTRY_PREFIX.to_string(),
        }
    }

    /// Uses `prefix` for generated entry numbers.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Creates an entry with all its lines in one database transaction.
    ///
    /// Line shape and balance are checked before touching the database;
    /// account checks, numbering and the writes share one transaction. A
    /// collision on the entry number restarts the transaction, up to
    /// [`MAX_NUMBERING_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns the first violated journal rule, `Conflict` when numbering
    /// keeps colliding, or a database error. Nothing is persisted on error.
    pub async fn create_entry(
        &self,
        input: CreateEntryInput,
    ) -> Result<EntryWithLines, JournalStoreError> {
        let totals = JournalService::validate_lines(&input.lines)?;

        for attempt in 1..=MAX_NUMBERING_ATTEMPTS {
            match self.try_create_entry(&input, totals).await {
                Err(JournalStoreError::Database(err)) if is_unique_violation(&err) => {
                    tracing::warn!(attempt, "entry number collision, retrying");
                }
                result => return result,
            }
        }

        Err(JournalStoreError::Conflict {
            attempts: MAX_NUMBERING_ATTEMPTS,
        })
    }

    async fn try_create_entry(
        &self,
        input: &CreateEntryInput,
        totals: EntryTotals,
    ) -> Result<EntryWithLines, JournalStoreError> {
        let txn = self.db.begin().await?;

        let account_ids: Vec<Uuid> = input
            .lines
            .iter()
            .map(|line| line.account_id.into_inner())
            .collect();
        let accounts: HashMap<Uuid, accounts::Model> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let lines = JournalService::validate_accounts(&input.lines, |id| {
            accounts.get(&id.into_inner()).map(accounts::Model::posting)
        })?;

        let entry_number = self.next_entry_number(&txn, Utc::now().year()).await?;
        let initial = EntryWorkflow::initial_status(input.entry_type, input.created_by);

        let now = Utc::now().into();
        let entry = journal_entries::ActiveModel {
            id: Set(EntryId::new().into_inner()),
            entry_number: Set(entry_number),
            date: Set(input.date),
            description: Set(input.description.clone()),
            entry_type: Set(input.entry_type.into()),
            status: Set(initial.status.into()),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            reference_type: Set(input.reference_type.clone()),
            reference_id: Set(input.reference_id.clone()),
            created_by: Set(input.created_by.into_inner()),
            approved_by: Set(initial.approved_by.map(UserId::into_inner)),
            approved_at: Set(initial.approved_at.map(Into::into)),
            voided_by: Set(None),
            voided_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut hydrated = Vec::with_capacity(lines.len());
        for line in insert_lines(&txn, entry.id, lines).await? {
            let account = accounts
                .get(&line.account_id)
                .cloned()
                .ok_or(JournalError::AccountNotFound(line.account_id))?;
            hydrated.push(LineWithAccount { line, account });
        }

        txn.commit().await?;

        tracing::info!(
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            status = ?entry.status,
            "journal entry created"
        );

        Ok(EntryWithLines {
            entry,
            lines: hydrated,
        })
    }

    /// Computes the next number of `year` under a row lock on the current maximum.
    async fn next_entry_number(
        &self,
        txn: &DatabaseTransaction,
        year: i32,
    ) -> Result<String, JournalStoreError> {
        let last = journal_entries::Entity::find()
            .filter(
                journal_entries::Column::EntryNumber
                    .starts_with(EntryNumber::year_prefix(&self.prefix, year)),
            )
            .order_by_desc(journal_entries::Column::EntryNumber)
            .lock_exclusive()
            .one(txn)
            .await?;

        let next = EntryNumber::next_after(
            &self.prefix,
            year,
            last.as_ref().map(|e| e.entry_number.as_str()),
        )?;
        Ok(next.to_string())
    }

    /// Fetches an entry with its lines and their accounts.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub async fn get_entry(&self, id: EntryId) -> Result<EntryWithLines, JournalStoreError> {
        let entry = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(JournalError::NotFound(id.into_inner()))?;

        let mut lines = load_lines(&self.db, vec![entry.id]).await?;
        Ok(EntryWithLines {
            lines: lines.remove(&entry.id).unwrap_or_default(),
            entry,
        })
    }

    /// Moves a draft entry to POSTED.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `InvalidStateTransition` unless the entry is a draft.
    pub async fn approve_entry(
        &self,
        id: EntryId,
        approved_by: UserId,
    ) -> Result<EntryWithLines, JournalStoreError> {
        let entry = self
            .change_status(id, |status| EntryWorkflow::approve(status, approved_by))
            .await?;
        tracing::info!(entry_id = %entry.entry.id, %approved_by, "journal entry approved");
        Ok(entry)
    }

    /// Voids an entry, excluding it from every later projection.
    ///
    /// No reversing entry is created; the voiding actor and time are recorded.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `AlreadyVoided` for a voided entry.
    pub async fn void_entry(
        &self,
        id: EntryId,
        voided_by: UserId,
    ) -> Result<EntryWithLines, JournalStoreError> {
        let entry = self
            .change_status(id, |status| EntryWorkflow::void(status, voided_by))
            .await?;
        tracing::info!(entry_id = %entry.entry.id, %voided_by, "journal entry voided");
        Ok(entry)
    }

    async fn change_status<F>(
        &self,
        id: EntryId,
        transition: F,
    ) -> Result<EntryWithLines, JournalStoreError>
    where
        F: FnOnce(obrador_core::journal::EntryStatus) -> Result<StatusChange, JournalError>,
    {
        let txn = self.db.begin().await?;

        let entry = journal_entries::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(JournalError::NotFound(id.into_inner()))?;

        let change = transition(entry.status.into())?;

        let mut active: journal_entries::ActiveModel = entry.into();
        active.status = Set(change.new_status().into());
        match change {
            StatusChange::Approve {
                approved_by,
                approved_at,
                ..
            } => {
                active.approved_by = Set(Some(approved_by.into_inner()));
                active.approved_at = Set(Some(approved_at.into()));
            }
            StatusChange::Void {
                voided_by,
                voided_at,
                ..
            } => {
                active.voided_by = Set(Some(voided_by.into_inner()));
                active.voided_at = Set(Some(voided_at.into()));
            }
        }
        active.updated_at = Set(Utc::now().into());

        let entry = active.update(&txn).await?;
        let mut lines = load_lines(&txn, vec![entry.id]).await?;
        let hydrated = EntryWithLines {
            lines: lines.remove(&entry.id).unwrap_or_default(),
            entry,
        };

        txn.commit().await?;
        Ok(hydrated)
    }

    /// Lists POSTED entries within `range`, by date then entry number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn journal_book(
        &self,
        range: DateRange,
        entry_type: Option<EntryType>,
    ) -> Result<Vec<EntryWithLines>, JournalStoreError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::Status.eq(EntryStatus::Posted))
            .filter(journal_entries::Column::Date.between(range.start, range.end))
            .order_by_asc(journal_entries::Column::Date)
            .order_by_asc(journal_entries::Column::EntryNumber);

        if let Some(entry_type) = entry_type {
            query = query.filter(journal_entries::Column::EntryType.eq(DbEntryType::from(entry_type)));
        }

        let entries = query.all(&self.db).await?;
        let mut lines = load_lines(&self.db, entries.iter().map(|e| e.id).collect()).await?;

        Ok(entries
            .into_iter()
            .map(|entry| EntryWithLines {
                lines: lines.remove(&entry.id).unwrap_or_default(),
                entry,
            })
            .collect())
    }

    /// Books a sale invoice as a SALE entry.
    ///
    /// # Errors
    ///
    /// Returns `SaleAccountMissing` when a policy account is not in the
    /// chart, otherwise the same errors as [`Self::create_entry`].
    pub async fn create_sale_entry(
        &self,
        invoice: &SaleInvoice,
        codes: &SaleAccountCodes,
        created_by: UserId,
    ) -> Result<EntryWithLines, JournalStoreError> {
        let by_code: HashMap<String, Uuid> = AccountRepository::new(self.db.clone())
            .find_by_codes(&codes.all())
            .await?
            .into_iter()
            .map(|a| (a.code, a.id))
            .collect();

        let accounts = SaleAccounts::resolve(codes, |code| by_code.get(code).map(|&id| id.into()))
            .map_err(JournalStoreError::SaleAccountMissing)?;

        self.create_entry(SalePolicy::build_entry(invoice, &accounts, created_by))
            .await
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    lines: Vec<ValidatedLine>,
) -> Result<Vec<journal_entry_lines::Model>, DbErr> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let mut inserted = Vec::with_capacity(lines.len());

    for line in lines {
        let model = journal_entry_lines::ActiveModel {
            id: Set(EntryLineId::new().into_inner()),
            entry_id: Set(entry_id),
            line_number: Set(line.line_number),
            account_id: Set(line.account_id.into_inner()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            description: Set(line.description),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;
        inserted.push(model);
    }

    Ok(inserted)
}

/// Loads the lines of `entry_ids` with their accounts, grouped by entry.
async fn load_lines<C>(
    db: &C,
    entry_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<LineWithAccount>>, DbErr>
where
    C: ConnectionTrait,
{
    let mut grouped: HashMap<Uuid, Vec<LineWithAccount>> = HashMap::new();
    if entry_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = journal_entry_lines::Entity::find()
        .find_also_related(accounts::Entity)
        .filter(journal_entry_lines::Column::EntryId.is_in(entry_ids))
        .order_by_asc(journal_entry_lines::Column::EntryId)
        .order_by_asc(journal_entry_lines::Column::LineNumber)
        .all(db)
        .await?;

    for (line, account) in rows {
        let account = account.ok_or_else(|| {
            DbErr::RecordNotFound(format!("account {} of line {}", line.account_id, line.id))
        })?;
        grouped
            .entry(line.entry_id)
            .or_default()
            .push(LineWithAccount { line, account });
    }

    Ok(grouped)
}
