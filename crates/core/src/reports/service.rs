//! Report generation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use obrador_shared::types::AccountId;
use rust_decimal::Decimal;

use super::types::{
    AccountActivity, BalanceSheet, IncomeStatement, StatementLine, StatementSection, TrialBalance,
    TrialBalanceRow, TrialBalanceTotals,
};
use crate::accounts::{AccountSummary, AccountType};
use crate::ledger::{DateRange, Posting};
use crate::within_tolerance;

/// Label of the computed equity line carrying unclosed net income.
pub const PERIOD_RESULT_LABEL: &str = "Period Result";

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Sums posted lines per account.
    ///
    /// Accounts without any posting are dropped; the rest keep the order they
    /// are given in.
    #[must_use]
    pub fn accumulate(accounts: Vec<AccountSummary>, postings: &[Posting]) -> Vec<AccountActivity> {
        let mut sums: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        for posting in postings {
            let entry = sums.entry(posting.account_id).or_default();
            entry.0 += posting.debit;
            entry.1 += posting.credit;
        }

        accounts
            .into_iter()
            .filter_map(|account| {
                let (total_debit, total_credit) = sums.remove(&account.id)?;
                Some(AccountActivity {
                    account,
                    total_debit,
                    total_credit,
                })
            })
            .collect()
    }

    /// Generates a trial balance.
    ///
    /// Each account's net lands in the debit column when debits exceed
    /// credits and in the credit column otherwise.
    #[must_use]
    pub fn trial_balance(range: DateRange, activity: Vec<AccountActivity>) -> TrialBalance {
        let mut totals = TrialBalanceTotals::default();

        let rows: Vec<TrialBalanceRow> = activity
            .into_iter()
            .map(|a| {
                let net = a.total_debit - a.total_credit;
                let (debit_balance, credit_balance) = if net > Decimal::ZERO {
                    (net, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, net.abs())
                };

                totals.total_debit += a.total_debit;
                totals.total_credit += a.total_credit;
                totals.debit_balance += debit_balance;
                totals.credit_balance += credit_balance;

                TrialBalanceRow {
                    account: a.account,
                    total_debit: a.total_debit,
                    total_credit: a.total_credit,
                    debit_balance,
                    credit_balance,
                }
            })
            .collect();

        totals.is_balanced = within_tolerance(totals.debit_balance, totals.credit_balance);

        TrialBalance {
            range,
            rows,
            totals,
        }
    }

    /// Generates an income statement over the activity of a period.
    #[must_use]
    pub fn income_statement(range: DateRange, activity: &[AccountActivity]) -> IncomeStatement {
        let income = Self::section(activity, AccountType::Income);
        let expenses = Self::section(activity, AccountType::Expense);
        let net_income = income.total - expenses.total;

        IncomeStatement {
            range,
            income,
            expenses,
            net_income,
        }
    }

    /// Generates a balance sheet from inception-to-date activity.
    ///
    /// Income and expense accounts that have not been closed into equity are
    /// folded into a single computed "Period Result" equity line, so the sheet
    /// balances between closings. A closing entry that moves those balances
    /// into equity shrinks the computed line by the same amount.
    #[must_use]
    pub fn balance_sheet(as_of: NaiveDate, activity: &[AccountActivity]) -> BalanceSheet {
        let assets = Self::section(activity, AccountType::Asset);
        let liabilities = Self::section(activity, AccountType::Liability);
        let mut equity = Self::section(activity, AccountType::Equity);

        // Unclosed income and expense, net on the credit side.
        let period_result: Decimal = activity
            .iter()
            .filter(|a| !a.account.account_type.is_balance_sheet())
            .map(|a| a.total_credit - a.total_debit)
            .sum();
        if period_result != Decimal::ZERO {
            equity.push(StatementLine {
                account: None,
                label: PERIOD_RESULT_LABEL.to_string(),
                amount: period_result,
            });
        }

        let total_liabilities_and_equity = liabilities.total + equity.total;
        let is_balanced = within_tolerance(assets.total, total_liabilities_and_equity);

        BalanceSheet {
            as_of,
            assets,
            liabilities,
            equity,
            period_result,
            total_liabilities_and_equity,
            is_balanced,
        }
    }

    /// Non-zero balances of one account type, in the given order.
    fn section(activity: &[AccountActivity], account_type: AccountType) -> StatementSection {
        let mut section = StatementSection::default();
        for a in activity.iter().filter(|a| a.account.account_type == account_type) {
            let amount = a.balance();
            if amount != Decimal::ZERO {
                section.push(StatementLine {
                    label: format!("{} {}", a.account.code, a.account.name),
                    account: Some(a.account.clone()),
                    amount,
                });
            }
        }
        section
    }
}
