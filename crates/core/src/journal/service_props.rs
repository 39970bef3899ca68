//! Property-based tests for journal entry validation.

use chrono::NaiveDate;
use obrador_shared::types::{AccountId, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::JournalError;
use super::service::{JournalService, PostingAccount};
use super::types::{CreateEntryInput, EntryLineInput, EntryType};

/// Positive amounts in cents, up to 10,000.00.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_input(lines: Vec<EntryLineInput>) -> CreateEntryInput {
    CreateEntryInput {
        date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        description: "Generated".to_string(),
        entry_type: EntryType::Adjustment,
        reference_type: None,
        reference_id: None,
        lines,
        created_by: UserId::new(),
    }
}

fn any_postable(id: AccountId) -> Option<PostingAccount> {
    Some(PostingAccount {
        id,
        allows_posting: true,
    })
}

/// Debit legs plus one balancing credit leg.
fn balanced_lines(debits: &[Decimal]) -> Vec<EntryLineInput> {
    let total: Decimal = debits.iter().copied().sum();
    let mut lines: Vec<_> = debits
        .iter()
        .map(|amount| EntryLineInput::debit(AccountId::new(), *amount))
        .collect();
    lines.push(EntryLineInput::credit(AccountId::new(), total));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted entry has debits equal to credits within one cent.
    #[test]
    fn prop_accepted_entries_balance(debits in prop::collection::vec(amount_strategy(), 1..10)) {
        let input = make_input(balanced_lines(&debits));

        let validated = JournalService::validate_entry(&input, any_postable).unwrap();
        prop_assert!(validated.totals.is_balanced());
        prop_assert_eq!(validated.lines.len(), debits.len() + 1);
    }

    /// Skewing one leg by more than a cent is always rejected with both totals.
    #[test]
    fn prop_skewed_entries_rejected(
        debits in prop::collection::vec(amount_strategy(), 1..10),
        skew in 2i64..100_000i64,
    ) {
        let mut lines = balanced_lines(&debits);
        let last = lines.len() - 1;
        lines[last].credit += Decimal::new(skew, 2);
        let expected_credit = lines[last].credit;
        let input = make_input(lines);

        let err = JournalService::validate_entry(&input, any_postable).unwrap_err();
        match err {
            JournalError::UnbalancedEntry { debit, credit } => {
                prop_assert_eq!(debit, debits.iter().copied().sum::<Decimal>());
                prop_assert_eq!(credit, expected_credit);
            }
            other => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// A line with both sides or neither side positive is always rejected.
    #[test]
    fn prop_lines_carry_exactly_one_side(
        debit in prop_oneof![Just(Decimal::ZERO), amount_strategy()],
        credit in prop_oneof![Just(Decimal::ZERO), amount_strategy()],
    ) {
        let line = EntryLineInput {
            account_id: AccountId::new(),
            debit,
            credit,
            description: None,
        };
        let one_sided = (debit > Decimal::ZERO) ^ (credit > Decimal::ZERO);
        let result = JournalService::validate_lines(&[
            line,
            EntryLineInput {
                account_id: AccountId::new(),
                debit: credit,
                credit: debit,
                description: None,
            },
        ]);

        if one_sided {
            prop_assert!(result.is_ok());
        } else {
            let is_malformed = matches!(result, Err(JournalError::MalformedLine { line_number: 1, .. }));
            prop_assert!(is_malformed);
        }
    }

    /// A leg with a fraction of a cent never validates, however it balances.
    #[test]
    fn prop_sub_cent_legs_rejected(
        debits in prop::collection::vec(amount_strategy(), 1..6),
        target in 0usize..6,
        mills in 1i64..10i64,
    ) {
        let mut lines = balanced_lines(&debits);
        let index = target % lines.len();
        let line = &mut lines[index];
        if line.debit > Decimal::ZERO {
            line.debit += Decimal::new(mills, 3);
        } else {
            line.credit += Decimal::new(mills, 3);
        }

        let result = JournalService::validate_lines(&lines);
        let is_malformed = matches!(
            result,
            Err(JournalError::MalformedLine { line_number, .. }) if line_number == index + 1
        );
        prop_assert!(is_malformed);
    }

    /// Any line against a non-postable account is rejected, whatever the amounts.
    #[test]
    fn prop_non_postable_always_rejected(
        debits in prop::collection::vec(amount_strategy(), 1..6),
        target in 0usize..6,
    ) {
        let lines = balanced_lines(&debits);
        let blocked = lines[target % lines.len()].account_id;
        let input = make_input(lines);

        let err = JournalService::validate_entry(&input, |id| {
            Some(PostingAccount { id, allows_posting: id != blocked })
        })
        .unwrap_err();
        prop_assert_eq!(err, JournalError::NonPostableAccount(blocked.into_inner()));
    }
}
