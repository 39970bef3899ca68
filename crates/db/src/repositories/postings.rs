//! Loading posted lines for projections and reports.

use chrono::NaiveDate;
use obrador_core::ledger::Posting;
use obrador_shared::types::AccountId;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::entities::{journal_entries, journal_entry_lines, sea_orm_active_enums::EntryStatus};

/// Which posted lines to load.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PostingFilter {
    /// Restrict to one account.
    pub account_id: Option<AccountId>,
    /// Inclusive lower date bound; `None` means since inception.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: NaiveDate,
}

/// Loads the lines of POSTED entries matching `filter`.
///
/// Drafts and voided entries never leave this function. Ordering is left to
/// the projector.
pub(crate) async fn load_postings<C>(db: &C, filter: PostingFilter) -> Result<Vec<Posting>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = journal_entry_lines::Entity::find()
        .find_also_related(journal_entries::Entity)
        .filter(journal_entries::Column::Status.eq(EntryStatus::Posted))
        .filter(journal_entries::Column::Date.lte(filter.to));

    if let Some(from) = filter.from {
        query = query.filter(journal_entries::Column::Date.gte(from));
    }
    if let Some(account_id) = filter.account_id {
        query = query.filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()));
    }

    let rows = query.all(db).await?;

    Ok(rows
        .into_iter()
        .filter_map(|(line, entry)| {
            let entry = entry?;
            Some(Posting {
                entry_id: entry.id.into(),
                entry_number: entry.entry_number,
                date: entry.date,
                description: entry.description,
                account_id: line.account_id.into(),
                debit: line.debit,
                credit: line.credit,
            })
        })
        .collect())
}
