//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountSummary;
use crate::ledger::DateRange;

/// Summed posted activity of one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountActivity {
    /// The account.
    pub account: AccountSummary,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

impl AccountActivity {
    /// Balance in the account's natural sign.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.account
            .account_type
            .normal_balance()
            .balance_change(self.total_debit, self.total_credit)
    }
}

/// One row of the trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account: AccountSummary,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance when debits exceed credits, else zero.
    pub debit_balance: Decimal,
    /// Net balance when credits exceed debits, else zero.
    pub credit_balance: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
    /// Sum of the debit-balance column.
    pub debit_balance: Decimal,
    /// Sum of the credit-balance column.
    pub credit_balance: Decimal,
    /// Whether both balance columns agree.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Reported period.
    pub range: DateRange,
    /// Rows in account code order.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// A line of a statement section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// Source account; `None` for computed lines such as the period result.
    pub account: Option<AccountSummary>,
    /// Display label.
    pub label: String,
    /// Amount in the section's natural sign.
    pub amount: Decimal,
}

/// A statement section with its subtotal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementSection {
    /// Lines in account code order.
    pub lines: Vec<StatementLine>,
    /// Sum of the lines.
    pub total: Decimal,
}

impl StatementSection {
    pub(crate) fn push(&mut self, line: StatementLine) {
        self.total += line.amount;
        self.lines.push(line);
    }
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Inception-to-date cut-off.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: StatementSection,
    /// Liabilities section.
    pub liabilities: StatementSection,
    /// Equity section, including the period result line.
    pub equity: StatementSection,
    /// Net income not yet closed into equity.
    pub period_result: Decimal,
    /// Liabilities plus equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within one cent.
    pub is_balanced: bool,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Reported period.
    pub range: DateRange,
    /// Income section (credit - debit).
    pub income: StatementSection,
    /// Expense section (debit - credit).
    pub expenses: StatementSection,
    /// Total income minus total expenses.
    pub net_income: Decimal,
}
