//! Journal entry rules.
//!
//! This module implements the journal entry engine's pure side:
//! - Entry and line input types
//! - Balance and line well-formedness validation
//! - Posting eligibility of referenced accounts
//! - Sequential entry numbering per calendar year
//! - The DRAFT -> POSTED -> VOIDED status workflow

pub mod error;
pub mod numbering;
pub mod service;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod service_props;

pub use error::JournalError;
pub use numbering::EntryNumber;
pub use service::{JournalService, PostingAccount};
pub use types::{
    CreateEntryInput, EntryLineInput, EntryStatus, EntryTotals, EntryType, ValidatedEntry,
    ValidatedLine,
};
pub use workflow::{EntryWorkflow, InitialStatus, StatusChange};
