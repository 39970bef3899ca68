//! Core accounting logic for Obrador.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts rules (types, normal balances, hierarchy)
//! - `journal` - Journal entry validation, numbering, and status workflow
//! - `ledger` - Running-balance projection of posted lines
//! - `reports` - Trial balance, balance sheet, and income statement derivation
//! - `sales` - Posting policy for invoices handed over by the sales desk

pub mod accounts;
pub mod journal;
pub mod ledger;
pub mod reports;
pub mod sales;

use rust_decimal::Decimal;

/// Largest difference tolerated when comparing debit and credit totals.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true when two amounts agree within [`BALANCE_TOLERANCE`].
#[must_use]
pub fn within_tolerance(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() <= BALANCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
        assert!(within_tolerance(dec!(100.00), dec!(100.01)));
        assert!(!within_tolerance(dec!(100.00), dec!(100.02)));
    }
}
