//! Ledger projection.
//!
//! Balances are never stored. A ledger is replayed from the posted lines of an
//! account each time it is requested, so the journal stays the only source of
//! truth.

pub mod projection;
pub mod range;

pub use projection::{AccountLedger, LedgerProjector, LedgerRow, Posting};
pub use range::DateRange;
