//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the
//! production migrator.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use obrador_core::journal::{CreateEntryInput, EntryLineInput, EntryType};
use obrador_db::migration::{Migrator, MigratorTrait};
use obrador_db::seed::{BAKERY_CHART, seed_chart};
use obrador_shared::types::{AccountId, UserId};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub const CASH: &str = "1.1.01.001";
pub const BANK: &str = "1.1.01.002";
pub const RECEIVABLE: &str = "1.1.02.001";
pub const PAYABLE: &str = "2.1.01.001";
pub const TAX_PAYABLE: &str = "2.1.02.001";
pub const CAPITAL: &str = "3.1.01.001";
pub const RETAINED: &str = "3.2.01.001";
pub const BREAD_SALES: &str = "4.1.01.001";
pub const DISCOUNTS: &str = "4.1.02.001";
pub const RAW_MATERIAL_COST: &str = "5.1.01.001";
pub const RENT: &str = "5.2.01.002";
pub const CASH_AND_BANKS: &str = "1.1.01";

/// A fresh, migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// A migrated database loaded with the bakery chart.
pub struct Books {
    pub db: DatabaseConnection,
    pub accounts: HashMap<&'static str, AccountId>,
    pub user: UserId,
}

impl Books {
    pub async fn open() -> Self {
        let db = setup_db().await;
        seed_chart(&db, BAKERY_CHART).await.expect("Failed to seed chart");

        let repo = obrador_db::AccountRepository::new(db.clone());
        let mut accounts = HashMap::new();
        for seed in BAKERY_CHART {
            let account = repo
                .find_by_code(seed.code)
                .await
                .expect("lookup failed")
                .expect("seeded account missing");
            accounts.insert(seed.code, AccountId::from(account.id));
        }

        Self {
            db,
            accounts,
            user: UserId::new(),
        }
    }

    pub fn id(&self, code: &str) -> AccountId {
        self.accounts[code]
    }

    pub fn debit(&self, code: &str, amount: rust_decimal::Decimal) -> EntryLineInput {
        EntryLineInput::debit(self.id(code), amount)
    }

    pub fn credit(&self, code: &str, amount: rust_decimal::Decimal) -> EntryLineInput {
        EntryLineInput::credit(self.id(code), amount)
    }

    pub fn entry(
        &self,
        date: NaiveDate,
        entry_type: EntryType,
        description: &str,
        lines: Vec<EntryLineInput>,
    ) -> CreateEntryInput {
        CreateEntryInput {
            date,
            description: description.to_string(),
            entry_type,
            reference_type: None,
            reference_id: None,
            lines,
            created_by: self.user,
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
