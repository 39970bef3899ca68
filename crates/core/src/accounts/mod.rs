//! Chart of accounts rules.

pub mod error;
pub mod hierarchy;
pub mod types;

pub use error::AccountError;
pub use hierarchy::{ParentAccount, validate_hierarchy};
pub use types::{AccountSummary, AccountType, NormalBalance};
