//! Journal entry status workflow.
//!
//! `DRAFT --approve--> POSTED --void--> VOIDED`, and `DRAFT --void--> VOIDED`.
//! Nothing leaves VOIDED.

use chrono::{DateTime, Utc};
use obrador_shared::types::UserId;

use super::error::JournalError;
use super::types::{EntryStatus, EntryType};

/// Status and approval stamp an entry is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialStatus {
    /// Starting status.
    pub status: EntryStatus,
    /// Approver, set when the entry starts out posted.
    pub approved_by: Option<UserId>,
    /// Approval time, set when the entry starts out posted.
    pub approved_at: Option<DateTime<Utc>>,
}

/// A validated status change with its audit stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// DRAFT -> POSTED.
    Approve {
        /// The new status.
        new_status: EntryStatus,
        /// The approving user.
        approved_by: UserId,
        /// When the entry was approved.
        approved_at: DateTime<Utc>,
    },
    /// DRAFT or POSTED -> VOIDED.
    Void {
        /// The new status.
        new_status: EntryStatus,
        /// The voiding user.
        voided_by: UserId,
        /// When the entry was voided.
        voided_at: DateTime<Utc>,
    },
}

impl StatusChange {
    /// The status the entry moves to.
    #[must_use]
    pub const fn new_status(&self) -> EntryStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Void { new_status, .. } => *new_status,
        }
    }
}

/// Stateless service for entry status transitions.
pub struct EntryWorkflow;

impl EntryWorkflow {
    /// Manual (OPERATION) entries are posted on creation, stamped as approved
    /// by their author. Every other type starts as a draft.
    #[must_use]
    pub fn initial_status(entry_type: EntryType, created_by: UserId) -> InitialStatus {
        match entry_type {
            EntryType::Operation => InitialStatus {
                status: EntryStatus::Posted,
                approved_by: Some(created_by),
                approved_at: Some(Utc::now()),
            },
            _ => InitialStatus {
                status: EntryStatus::Draft,
                approved_by: None,
                approved_at: None,
            },
        }
    }

    /// Approve a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the entry is a draft.
    pub fn approve(current: EntryStatus, approved_by: UserId) -> Result<StatusChange, JournalError> {
        match current {
            EntryStatus::Draft => Ok(StatusChange::Approve {
                new_status: EntryStatus::Posted,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(JournalError::InvalidStateTransition {
                from: current,
                to: EntryStatus::Posted,
            }),
        }
    }

    /// Void an entry that is not voided yet.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyVoided` for a voided entry.
    pub fn void(current: EntryStatus, voided_by: UserId) -> Result<StatusChange, JournalError> {
        match current {
            EntryStatus::Voided => Err(JournalError::AlreadyVoided),
            EntryStatus::Draft | EntryStatus::Posted => Ok(StatusChange::Void {
                new_status: EntryStatus::Voided,
                voided_by,
                voided_at: Utc::now(),
            }),
        }
    }
}
