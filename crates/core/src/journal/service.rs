//! Journal service for entry validation.
//!
//! Every invariant a journal entry must satisfy before it is persisted is
//! checked here, in a fixed order, so that callers get the same error for the
//! same bad input no matter which surface they came through.

use obrador_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::{CreateEntryInput, EntryLineInput, EntryTotals, ValidatedEntry, ValidatedLine};

/// Posting-relevant fields of an account referenced by a line.
#[derive(Debug, Clone, Copy)]
pub struct PostingAccount {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account accepts direct postings.
    pub allows_posting: bool,
}

/// Journal service for entry validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct JournalService;

impl JournalService {
    /// Minimum number of lines in an entry.
    pub const MIN_LINES: usize = 2;

    /// Decimal places an amount may carry; matches the stored column scale.
    pub const AMOUNT_SCALE: u32 = 2;

    /// Validate an entry before persisting.
    ///
    /// 1. At least two lines
    /// 2. Each line carries exactly one positive amount, in whole cents
    /// 3. Debits equal credits within one cent
    /// 4. Every account exists and accepts postings
    ///
    /// # Errors
    ///
    /// Returns the first `JournalError` found, in the order above.
    pub fn validate_entry<A>(
        input: &CreateEntryInput,
        account_lookup: A,
    ) -> Result<ValidatedEntry, JournalError>
    where
        A: Fn(AccountId) -> Option<PostingAccount>,
    {
        let totals = Self::validate_lines(&input.lines)?;
        let lines = Self::validate_accounts(&input.lines, account_lookup)?;
        Ok(ValidatedEntry { lines, totals })
    }

    /// Checks line count, line shape, and balance. Needs no account data.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientLines`, `MalformedLine`, or `UnbalancedEntry`.
    pub fn validate_lines(lines: &[EntryLineInput]) -> Result<EntryTotals, JournalError> {
        if lines.len() < Self::MIN_LINES {
            return Err(JournalError::InsufficientLines(lines.len()));
        }

        for (index, line) in lines.iter().enumerate() {
            Self::validate_line(index + 1, line)?;
        }

        let totals = EntryTotals::from_lines(lines);
        if !totals.is_balanced() {
            return Err(JournalError::UnbalancedEntry {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok(totals)
    }

    /// Resolves each line's account and numbers the lines.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `NonPostableAccount` for the first offending line.
    pub fn validate_accounts<A>(
        lines: &[EntryLineInput],
        account_lookup: A,
    ) -> Result<Vec<ValidatedLine>, JournalError>
    where
        A: Fn(AccountId) -> Option<PostingAccount>,
    {
        lines
            .iter()
            .zip(1..)
            .map(|(line, line_number)| {
                let account = account_lookup(line.account_id)
                    .ok_or(JournalError::AccountNotFound(line.account_id.into_inner()))?;
                if !account.allows_posting {
                    return Err(JournalError::NonPostableAccount(account.id.into_inner()));
                }

                Ok(ValidatedLine {
                    line_number,
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description.clone(),
                })
            })
            .collect()
    }

    /// A line is never both debit and credit, never neither, never negative.
    fn validate_line(line_number: usize, line: &EntryLineInput) -> Result<(), JournalError> {
        let malformed = |reason| JournalError::MalformedLine {
            line_number,
            reason,
        };

        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(malformed("amounts cannot be negative"));
        }

        if line.debit.normalize().scale() > Self::AMOUNT_SCALE
            || line.credit.normalize().scale() > Self::AMOUNT_SCALE
        {
            return Err(malformed("amounts cannot carry fractions of a cent"));
        }

        match (line.debit > Decimal::ZERO, line.credit > Decimal::ZERO) {
            (true, false) | (false, true) => Ok(()),
            (true, true) => Err(malformed("a line cannot carry both a debit and a credit")),
            (false, false) => Err(malformed("a line needs a debit or a credit")),
        }
    }
}
