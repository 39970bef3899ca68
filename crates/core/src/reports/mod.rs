//! Financial report generation.
//!
//! This module provides pure business logic for deriving statements from
//! posted activity:
//! - Trial Balance
//! - Balance Sheet
//! - Income Statement

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::{PERIOD_RESULT_LABEL, ReportService};
pub use types::*;
