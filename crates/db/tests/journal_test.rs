//! Integration tests for the journal repository.

mod common;

use chrono::{Datelike, Utc};
use common::{BREAD_SALES, Books, CASH, CASH_AND_BANKS, CAPITAL, PAYABLE, RAW_MATERIAL_COST, date};
use futures::future::join_all;
use obrador_core::journal::{EntryLineInput, EntryType, JournalError};
use obrador_core::sales::{PaymentMethod, SaleAccountCodes, SaleInvoice};
use obrador_db::JournalRepository;
use obrador_db::entities::journal_entries;
use obrador_db::entities::sea_orm_active_enums::EntryStatus;
use obrador_db::repositories::JournalStoreError;
use obrador_shared::types::{AccountId, EntryId, UserId};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

fn number(sequence: u32) -> String {
    format!("AST-{}-{sequence:06}", Utc::now().year())
}

async fn entry_count(books: &Books) -> u64 {
    journal_entries::Entity::find().count(&books.db).await.unwrap()
}

#[tokio::test]
async fn test_manual_entry_is_posted_with_first_number() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let created = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Counter sales",
            vec![books.debit(CASH, dec!(100)), books.credit(BREAD_SALES, dec!(100))],
        ))
        .await
        .unwrap();

    assert_eq!(created.entry.status, EntryStatus::Posted);
    assert_eq!(created.entry.entry_number, number(1));
    assert_eq!(created.entry.approved_by, Some(books.user.into_inner()));
    assert!(created.entry.approved_at.is_some());
    assert_eq!(created.entry.total_debit, dec!(100));
    assert_eq!(created.entry.total_credit, dec!(100));

    let codes: Vec<&str> = created.lines.iter().map(|l| l.account.code.as_str()).collect();
    assert_eq!(codes, vec![CASH, BREAD_SALES]);
    let numbers: Vec<i32> = created.lines.iter().map(|l| l.line.line_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_entry_numbers_increase_within_year() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let mut numbers = Vec::new();
    for day in 1..=3 {
        let created = repo
            .create_entry(books.entry(
                date(2025, 3, day),
                EntryType::Operation,
                "Counter sales",
                vec![books.debit(CASH, dec!(10)), books.credit(BREAD_SALES, dec!(10))],
            ))
            .await
            .unwrap();
        numbers.push(created.entry.entry_number);
    }

    assert_eq!(numbers, vec![number(1), number(2), number(3)]);
}

#[tokio::test]
async fn test_custom_prefix() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone()).with_prefix("PAN");

    let created = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Counter sales",
            vec![books.debit(CASH, dec!(10)), books.credit(BREAD_SALES, dec!(10))],
        ))
        .await
        .unwrap();

    assert_eq!(
        created.entry.entry_number,
        format!("PAN-{}-000001", Utc::now().year())
    );
}

#[tokio::test]
async fn test_concurrent_creations_get_distinct_numbers() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let creations = (0..10).map(|_| {
        let repo = repo.clone();
        let input = books.entry(
            date(2025, 4, 1),
            EntryType::Operation,
            "Parallel sale",
            vec![books.debit(CASH, dec!(5)), books.credit(BREAD_SALES, dec!(5))],
        );
        async move { repo.create_entry(input).await }
    });

    let mut numbers: Vec<String> = join_all(creations)
        .await
        .into_iter()
        .map(|result| result.unwrap().entry.entry_number)
        .collect();
    numbers.sort();

    let expected: Vec<String> = (1..=10).map(number).collect();
    assert_eq!(numbers, expected);
}

#[tokio::test]
async fn test_unbalanced_entry_reports_totals_and_persists_nothing() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let err = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Typo",
            vec![books.debit(CASH, dec!(100)), books.credit(BREAD_SALES, dec!(90))],
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JournalStoreError::Domain(JournalError::UnbalancedEntry { debit, credit })
            if debit == dec!(100) && credit == dec!(90)
    ));
    assert!(err.to_string().contains("Debit: 100"));
    assert!(err.to_string().contains("Credit: 90"));
    assert_eq!(err.http_status_code(), 400);
    assert_eq!(entry_count(&books).await, 0);
}

#[tokio::test]
async fn test_sub_cent_amounts_are_rejected_before_storage() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let err = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Rounding dust",
            vec![books.debit(CASH, dec!(100.004)), books.credit(BREAD_SALES, dec!(100.00))],
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JournalStoreError::Domain(JournalError::MalformedLine { line_number: 1, .. })
    ));
    assert_eq!(err.http_status_code(), 400);
    assert_eq!(entry_count(&books).await, 0);
}

#[tokio::test]
async fn test_single_line_is_rejected() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let err = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Half an entry",
            vec![books.debit(CASH, dec!(100))],
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JournalStoreError::Domain(JournalError::InsufficientLines(1))
    ));
}

#[tokio::test]
async fn test_non_postable_account_is_rejected() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let err = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Posting to a group account",
            vec![
                books.debit(CASH_AND_BANKS, dec!(100)),
                books.credit(BREAD_SALES, dec!(100)),
            ],
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JournalStoreError::Domain(JournalError::NonPostableAccount(id))
            if id == books.id(CASH_AND_BANKS).into_inner()
    ));
    assert_eq!(entry_count(&books).await, 0);
}

#[tokio::test]
async fn test_unknown_account_is_rejected() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());
    let unknown = AccountId::new();

    let err = repo
        .create_entry(books.entry(
            date(2025, 3, 1),
            EntryType::Operation,
            "Ghost account",
            vec![
                EntryLineInput::debit(unknown, dec!(100)),
                books.credit(BREAD_SALES, dec!(100)),
            ],
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JournalStoreError::Domain(JournalError::AccountNotFound(id)) if id == unknown.into_inner()
    ));
}

#[tokio::test]
async fn test_get_entry_returns_created_entry() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let mut input = books.entry(
        date(2025, 3, 2),
        EntryType::Opening,
        "Opening balances",
        vec![
            books.debit(CASH, dec!(1000)).with_description("Cash on hand"),
            books.credit(PAYABLE, dec!(200)),
            books.credit(CAPITAL, dec!(800)),
        ],
    );
    input.reference_type = Some("Manual".to_string());
    input.reference_id = Some("OB-1".to_string());
    let created = repo.create_entry(input).await.unwrap();

    let fetched = repo.get_entry(created.entry.id.into()).await.unwrap();

    assert_eq!(fetched.entry.id, created.entry.id);
    assert_eq!(fetched.entry.entry_number, created.entry.entry_number);
    assert_eq!(fetched.entry.date, created.entry.date);
    assert_eq!(fetched.entry.description, "Opening balances");
    assert_eq!(fetched.entry.status, EntryStatus::Draft);
    assert_eq!(fetched.entry.reference_type.as_deref(), Some("Manual"));
    assert_eq!(fetched.entry.reference_id.as_deref(), Some("OB-1"));
    assert_eq!(fetched.entry.total_debit, dec!(1000));

    let created_lines: Vec<_> = created
        .lines
        .iter()
        .map(|l| (l.line.id, l.line.line_number, l.line.account_id, l.line.debit, l.line.credit))
        .collect();
    let fetched_lines: Vec<_> = fetched
        .lines
        .iter()
        .map(|l| (l.line.id, l.line.line_number, l.line.account_id, l.line.debit, l.line.credit))
        .collect();
    assert_eq!(fetched_lines, created_lines);
    assert_eq!(fetched.lines[0].line.description.as_deref(), Some("Cash on hand"));
}

#[tokio::test]
async fn test_get_missing_entry_is_not_found() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let err = repo.get_entry(EntryId::new()).await.unwrap_err();
    assert_eq!(err.http_status_code(), 404);
}

#[tokio::test]
async fn test_draft_lifecycle() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());
    let approver = UserId::new();

    let created = repo
        .create_entry(books.entry(
            date(2025, 3, 3),
            EntryType::Purchase,
            "Flour on credit",
            vec![
                books.debit(RAW_MATERIAL_COST, dec!(150)),
                books.credit(PAYABLE, dec!(150)),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(created.entry.status, EntryStatus::Draft);
    assert!(created.entry.approved_by.is_none());
    let id: EntryId = created.entry.id.into();

    let approved = repo.approve_entry(id, approver).await.unwrap();
    assert_eq!(approved.entry.status, EntryStatus::Posted);
    assert_eq!(approved.entry.approved_by, Some(approver.into_inner()));
    assert_eq!(approved.lines.len(), 2);

    let again = repo.approve_entry(id, approver).await.unwrap_err();
    assert!(matches!(
        again,
        JournalStoreError::Domain(JournalError::InvalidStateTransition { .. })
    ));
    assert_eq!(again.http_status_code(), 409);

    let voided = repo.void_entry(id, approver).await.unwrap();
    assert_eq!(voided.entry.status, EntryStatus::Voided);
    assert_eq!(voided.entry.voided_by, Some(approver.into_inner()));
    assert!(voided.entry.voided_at.is_some());

    let twice = repo.void_entry(id, approver).await.unwrap_err();
    assert!(matches!(
        twice,
        JournalStoreError::Domain(JournalError::AlreadyVoided)
    ));

    let fetched = repo.get_entry(id).await.unwrap();
    assert_eq!(fetched.entry.status, EntryStatus::Voided);
    assert_eq!(fetched.entry.approved_by, Some(approver.into_inner()));
}

#[tokio::test]
async fn test_approving_voided_draft_fails_without_side_effects() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let created = repo
        .create_entry(books.entry(
            date(2025, 3, 3),
            EntryType::Adjustment,
            "Wrong adjustment",
            vec![books.debit(CASH, dec!(20)), books.credit(CAPITAL, dec!(20))],
        ))
        .await
        .unwrap();
    let id: EntryId = created.entry.id.into();
    repo.void_entry(id, books.user).await.unwrap();

    assert!(repo.approve_entry(id, books.user).await.is_err());

    let fetched = repo.get_entry(id).await.unwrap();
    assert_eq!(fetched.entry.status, EntryStatus::Voided);
    assert!(fetched.entry.approved_by.is_none());
}

#[tokio::test]
async fn test_journal_book_lists_posted_entries_in_order() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let later = repo
        .create_entry(books.entry(
            date(2025, 5, 20),
            EntryType::Operation,
            "Later sale",
            vec![books.debit(CASH, dec!(30)), books.credit(BREAD_SALES, dec!(30))],
        ))
        .await
        .unwrap();
    let earlier = repo
        .create_entry(books.entry(
            date(2025, 5, 2),
            EntryType::Operation,
            "Earlier sale",
            vec![books.debit(CASH, dec!(40)), books.credit(BREAD_SALES, dec!(40))],
        ))
        .await
        .unwrap();
    repo.create_entry(books.entry(
        date(2025, 5, 10),
        EntryType::Purchase,
        "Pending purchase",
        vec![books.debit(RAW_MATERIAL_COST, dec!(25)), books.credit(PAYABLE, dec!(25))],
    ))
    .await
    .unwrap();
    repo.create_entry(books.entry(
        date(2025, 6, 1),
        EntryType::Operation,
        "Next month",
        vec![books.debit(CASH, dec!(50)), books.credit(BREAD_SALES, dec!(50))],
    ))
    .await
    .unwrap();

    let range = obrador_core::ledger::DateRange::new(date(2025, 5, 1), date(2025, 5, 31)).unwrap();
    let book = repo.journal_book(range, None).await.unwrap();

    let ids: Vec<_> = book.iter().map(|e| e.entry.id).collect();
    assert_eq!(ids, vec![earlier.entry.id, later.entry.id]);
    assert!(book.iter().all(|e| e.lines.len() == 2));

    let purchases = repo
        .journal_book(range, Some(EntryType::Purchase))
        .await
        .unwrap();
    assert!(purchases.is_empty());
}

fn invoice(method: PaymentMethod) -> SaleInvoice {
    SaleInvoice {
        invoice_id: "17".to_string(),
        invoice_number: "F-000017".to_string(),
        customer_name: "Hotel Plaza".to_string(),
        date: date(2025, 7, 1),
        payment_method: method,
        subtotal: dec!(200),
        tax: dec!(26),
        discount: dec!(10),
        total: dec!(216),
    }
}

#[tokio::test]
async fn test_sale_entry_from_invoice() {
    let books = Books::open().await;
    let repo = JournalRepository::new(books.db.clone());

    let created = repo
        .create_sale_entry(
            &invoice(PaymentMethod::Credit),
            &SaleAccountCodes::default(),
            books.user,
        )
        .await
        .unwrap();

    assert_eq!(created.entry.status, EntryStatus::Draft);
    assert_eq!(created.entry.reference_type.as_deref(), Some("Invoice"));
    assert_eq!(created.entry.reference_id.as_deref(), Some("17"));
    assert_eq!(
        created.entry.description,
        "Sale per invoice F-000017 - Customer: Hotel Plaza"
    );
    assert_eq!(created.entry.total_debit, dec!(226));
    assert_eq!(created.entry.total_credit, dec!(226));

    let codes: Vec<&str> = created.lines.iter().map(|l| l.account.code.as_str()).collect();
    assert_eq!(
        codes,
        vec![common::RECEIVABLE, BREAD_SALES, common::TAX_PAYABLE, common::DISCOUNTS]
    );
}

#[tokio::test]
async fn test_sale_entry_without_chart_fails() {
    let db = common::setup_db().await;
    let repo = JournalRepository::new(db);

    let err = repo
        .create_sale_entry(
            &invoice(PaymentMethod::Cash),
            &SaleAccountCodes::default(),
            UserId::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, JournalStoreError::SaleAccountMissing(_)));
    assert!(!err.is_retryable());
}
