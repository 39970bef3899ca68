//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod journal;
pub mod ledger;
mod postings;
pub mod report;

pub use account::{
    AccountFilter, AccountNode, AccountRepository, AccountStoreError, CreateAccountInput,
    UpdateAccountInput,
};
pub use journal::{EntryWithLines, JournalRepository, JournalStoreError, LineWithAccount};
pub use ledger::LedgerRepository;
pub use report::{ReportRepository, ReportStoreError};
