//! Running-balance projection of an account's posted lines.

use chrono::NaiveDate;
use obrador_shared::types::{AccountId, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::range::DateRange;
use crate::accounts::AccountSummary;

/// One posted line as read from the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Owning entry.
    pub entry_id: EntryId,
    /// Owning entry's number.
    pub entry_number: String,
    /// Owning entry's date.
    pub date: NaiveDate,
    /// Owning entry's description.
    pub description: String,
    /// Account the line posts to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One row of an account ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Owning entry.
    pub entry_id: EntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry number.
    pub entry_number: String,
    /// Entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this row, in the account's natural sign.
    pub running_balance: Decimal,
}

/// The ledger of one account over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    /// The projected account.
    pub account: AccountSummary,
    /// Projected range.
    pub range: DateRange,
    /// Rows ordered by date then entry number.
    pub rows: Vec<LedgerRow>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Running balance after the last row.
    pub final_balance: Decimal,
}

/// Replays posted lines into running balances.
pub struct LedgerProjector;

impl LedgerProjector {
    /// Projects one account.
    ///
    /// Postings outside the range or belonging to another account are ignored,
    /// and rows are ordered by date then entry number regardless of input order.
    #[must_use]
    pub fn project(account: AccountSummary, range: DateRange, postings: &[Posting]) -> AccountLedger {
        let mut relevant: Vec<&Posting> = postings
            .iter()
            .filter(|p| p.account_id == account.id && range.contains(p.date))
            .collect();
        relevant.sort_by(|a, b| (a.date, &a.entry_number).cmp(&(b.date, &b.entry_number)));

        let side = account.account_type.normal_balance();
        let mut running_balance = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        let rows = relevant
            .into_iter()
            .map(|posting| {
                running_balance += side.balance_change(posting.debit, posting.credit);
                total_debit += posting.debit;
                total_credit += posting.credit;

                LedgerRow {
                    entry_id: posting.entry_id,
                    date: posting.date,
                    entry_number: posting.entry_number.clone(),
                    description: posting.description.clone(),
                    debit: posting.debit,
                    credit: posting.credit,
                    running_balance,
                }
            })
            .collect();

        AccountLedger {
            account,
            range,
            rows,
            total_debit,
            total_credit,
            final_balance: running_balance,
        }
    }

    /// Projects every given account, omitting accounts without activity.
    ///
    /// Accounts keep the order they are given in.
    #[must_use]
    pub fn project_all(
        accounts: Vec<AccountSummary>,
        range: DateRange,
        postings: &[Posting],
    ) -> Vec<AccountLedger> {
        accounts
            .into_iter()
            .map(|account| Self::project(account, range, postings))
            .filter(|ledger| !ledger.rows.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountType;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn year() -> DateRange {
        DateRange::new(date(1, 1), date(12, 31)).unwrap()
    }

    fn account(account_type: AccountType) -> AccountSummary {
        AccountSummary {
            id: AccountId::new(),
            code: "1.1.01.001".to_string(),
            name: "Caja General".to_string(),
            account_type,
        }
    }

    fn posting(
        account: &AccountSummary,
        number: &str,
        on: NaiveDate,
        debit: Decimal,
        credit: Decimal,
    ) -> Posting {
        Posting {
            entry_id: EntryId::new(),
            entry_number: number.to_string(),
            date: on,
            description: format!("Entry {number}"),
            account_id: account.id,
            debit,
            credit,
        }
    }

    #[test]
    fn test_debit_normal_running_balance() {
        let cash = account(AccountType::Asset);
        let postings = vec![
            posting(&cash, "AST-2025-000001", date(1, 5), dec!(100), dec!(0)),
            posting(&cash, "AST-2025-000002", date(1, 6), dec!(0), dec!(30)),
        ];

        let ledger = LedgerProjector::project(cash, year(), &postings);

        let balances: Vec<_> = ledger.rows.iter().map(|r| r.running_balance).collect();
        assert_eq!(balances, vec![dec!(100), dec!(70)]);
        assert_eq!(ledger.total_debit, dec!(100));
        assert_eq!(ledger.total_credit, dec!(30));
        assert_eq!(ledger.final_balance, dec!(70));
    }

    #[test]
    fn test_credit_normal_running_balance() {
        let sales = account(AccountType::Income);
        let postings = vec![
            posting(&sales, "AST-2025-000001", date(1, 5), dec!(0), dec!(250)),
            posting(&sales, "AST-2025-000002", date(1, 9), dec!(50), dec!(0)),
        ];

        let ledger = LedgerProjector::project(sales, year(), &postings);

        assert_eq!(ledger.final_balance, dec!(200));
        assert_eq!(ledger.rows[0].running_balance, dec!(250));
    }

    #[test]
    fn test_orders_by_date_then_number() {
        let cash = account(AccountType::Asset);
        let postings = vec![
            posting(&cash, "AST-2025-000003", date(2, 1), dec!(1), dec!(0)),
            posting(&cash, "AST-2025-000002", date(1, 1), dec!(2), dec!(0)),
            posting(&cash, "AST-2025-000001", date(2, 1), dec!(3), dec!(0)),
        ];

        let ledger = LedgerProjector::project(cash, year(), &postings);

        let numbers: Vec<_> = ledger.rows.iter().map(|r| r.entry_number.as_str()).collect();
        assert_eq!(numbers, vec!["AST-2025-000002", "AST-2025-000001", "AST-2025-000003"]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let cash = account(AccountType::Asset);
        let postings = vec![
            posting(&cash, "AST-2025-000001", date(1, 31), dec!(1), dec!(0)),
            posting(&cash, "AST-2025-000002", date(2, 1), dec!(2), dec!(0)),
            posting(&cash, "AST-2025-000003", date(2, 28), dec!(4), dec!(0)),
            posting(&cash, "AST-2025-000004", date(3, 1), dec!(8), dec!(0)),
        ];
        let february = DateRange::new(date(2, 1), date(2, 28)).unwrap();

        let ledger = LedgerProjector::project(cash, february, &postings);

        assert_eq!(ledger.rows.len(), 2);
        assert_eq!(ledger.final_balance, dec!(6));
    }

    #[test]
    fn test_empty_ledger_is_zero() {
        let ledger = LedgerProjector::project(account(AccountType::Liability), year(), &[]);
        assert!(ledger.rows.is_empty());
        assert_eq!(ledger.final_balance, Decimal::ZERO);
    }

    #[test]
    fn test_project_all_skips_idle_accounts() {
        let cash = account(AccountType::Asset);
        let idle = account(AccountType::Expense);
        let postings = vec![posting(&cash, "AST-2025-000001", date(1, 5), dec!(10), dec!(0))];

        let ledgers = LedgerProjector::project_all(vec![cash.clone(), idle], year(), &postings);

        assert_eq!(ledgers.len(), 1);
        assert_eq!(ledgers[0].account.id, cash.id);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The final balance equals the side-adjusted sum of all lines, and
        /// each row's balance is the previous one plus its own change.
        #[test]
        fn prop_running_balance_chain(
            amounts in prop::collection::vec((0i64..100_000i64, any::<bool>()), 1..30),
            debit_normal in any::<bool>(),
        ) {
            let acct = account(if debit_normal { AccountType::Asset } else { AccountType::Equity });
            let postings: Vec<_> = amounts
                .iter()
                .enumerate()
                .map(|(i, (cents, is_debit))| {
                    let amount = Decimal::new(*cents, 2);
                    let (debit, credit) = if *is_debit { (amount, Decimal::ZERO) } else { (Decimal::ZERO, amount) };
                    posting(&acct, &format!("AST-2025-{:06}", i + 1), date(1, 1), debit, credit)
                })
                .collect();
            let side = acct.account_type.normal_balance();

            let ledger = LedgerProjector::project(acct, year(), &postings);

            let mut previous = Decimal::ZERO;
            for row in &ledger.rows {
                prop_assert_eq!(row.running_balance, previous + side.balance_change(row.debit, row.credit));
                previous = row.running_balance;
            }
            prop_assert_eq!(ledger.final_balance, side.balance_change(ledger.total_debit, ledger.total_credit));
        }
    }
}
