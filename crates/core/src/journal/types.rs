//! Journal entry domain types.

use chrono::NaiveDate;
use obrador_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::within_tolerance;

/// Business origin of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Opening balances.
    Opening,
    /// Manual entry keyed by an accountant.
    Operation,
    /// Period adjustment.
    Adjustment,
    /// Year-end closing.
    Closing,
    /// Purchase of goods or services.
    Purchase,
    /// Sale originated by an invoice.
    Sale,
    /// Production run consuming inventory.
    Production,
}

impl EntryType {
    /// All entry types.
    pub const ALL: [Self; 7] = [
        Self::Opening,
        Self::Operation,
        Self::Adjustment,
        Self::Closing,
        Self::Purchase,
        Self::Sale,
        Self::Production,
    ];

    /// Stable upper-case name used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "OPENING",
            Self::Operation => "OPERATION",
            Self::Adjustment => "ADJUSTMENT",
            Self::Closing => "CLOSING",
            Self::Purchase => "PURCHASE",
            Self::Sale => "SALE",
            Self::Production => "PRODUCTION",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entry type '{s}'"))
    }
}

/// Entry lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Awaiting approval; excluded from projections.
    Draft,
    /// Included in every ledger and report.
    Posted,
    /// Cancelled; kept for audit, excluded from projections.
    Voided,
}

impl EntryStatus {
    /// Stable upper-case name used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Posted => "POSTED",
            Self::Voided => "VOIDED",
        }
    }

    /// Returns true if the entry's amounts count in projections.
    #[must_use]
    pub fn is_posted(self) -> bool {
        matches!(self, Self::Posted)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for one debit-or-credit leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero for a credit leg).
    pub debit: Decimal,
    /// Credit amount (zero for a debit leg).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl EntryLineInput {
    /// Builds a debit leg.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Builds a credit leg.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Attaches a line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for creating a journal entry with all of its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryInput {
    /// Accounting date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Business origin.
    pub entry_type: EntryType,
    /// Originating document kind, e.g. `Invoice`.
    pub reference_type: Option<String>,
    /// Originating document identifier.
    pub reference_id: Option<String>,
    /// Lines in creation order.
    pub lines: Vec<EntryLineInput>,
    /// Acting user.
    pub created_by: UserId,
}

/// Debit and credit sums of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Sums the lines of an entry.
    #[must_use]
    pub fn from_lines(lines: &[EntryLineInput]) -> Self {
        Self {
            total_debit: lines.iter().map(|l| l.debit).sum(),
            total_credit: lines.iter().map(|l| l.credit).sum(),
        }
    }

    /// Returns true if debits equal credits within one cent.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        within_tolerance(self.total_debit, self.total_credit)
    }
}

/// A line that passed validation, numbered in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    /// 1-based position within the entry.
    pub line_number: i32,
    /// Postable account.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

/// Result of validating an entry: numbered lines plus their totals.
#[derive(Debug, Clone)]
pub struct ValidatedEntry {
    /// Numbered lines.
    pub lines: Vec<ValidatedLine>,
    /// Entry totals.
    pub totals: EntryTotals,
}
