//! Journal error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::EntryStatus;

/// Errors that can occur while creating or transitioning journal entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// A line is not exactly one positive debit or credit.
    #[error("Line {line_number} is malformed: {reason}")]
    MalformedLine {
        /// 1-based line position.
        line_number: usize,
        /// What is wrong with the line.
        reason: &'static str,
    },

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account does not accept direct postings.
    #[error("Account {0} does not allow posting")]
    NonPostableAccount(Uuid),

    // ========== Entry State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    /// Status change not allowed from the current status.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    /// Entry was already voided.
    #[error("Journal entry is already voided")]
    AlreadyVoided,

    /// The yearly entry sequence has no numbers left.
    #[error("Entry number sequence exhausted for {prefix}-{year}")]
    SequenceExhausted {
        /// Entry number prefix.
        prefix: String,
        /// Calendar year.
        year: i32,
    },
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::MalformedLine { .. } => "MALFORMED_LINE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NonPostableAccount(_) => "NON_POSTABLE_ACCOUNT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::AlreadyVoided => "ALREADY_VOIDED",
            Self::SequenceExhausted { .. } => "SEQUENCE_EXHAUSTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the caller sent an entry that cannot be recorded
            Self::InsufficientLines(_)
            | Self::MalformedLine { .. }
            | Self::UnbalancedEntry { .. }
            | Self::AccountNotFound(_)
            | Self::NonPostableAccount(_) => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict - entry is not in a state that allows the action
            Self::InvalidStateTransition { .. } | Self::AlreadyVoided => 409,

            Self::SequenceExhausted { .. } => 500,
        }
    }
}
