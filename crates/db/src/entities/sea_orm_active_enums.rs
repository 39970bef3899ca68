//! `SeaORM` active enums, stored as their upper-case names.

use obrador_core::{accounts, journal};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountType {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "INCOME")]
    Income,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EntryType {
    #[sea_orm(string_value = "OPENING")]
    Opening,
    #[sea_orm(string_value = "OPERATION")]
    Operation,
    #[sea_orm(string_value = "ADJUSTMENT")]
    Adjustment,
    #[sea_orm(string_value = "CLOSING")]
    Closing,
    #[sea_orm(string_value = "PURCHASE")]
    Purchase,
    #[sea_orm(string_value = "SALE")]
    Sale,
    #[sea_orm(string_value = "PRODUCTION")]
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EntryStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "POSTED")]
    Posted,
    #[sea_orm(string_value = "VOIDED")]
    Voided,
}

impl From<AccountType> for accounts::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<accounts::AccountType> for AccountType {
    fn from(value: accounts::AccountType) -> Self {
        match value {
            accounts::AccountType::Asset => Self::Asset,
            accounts::AccountType::Liability => Self::Liability,
            accounts::AccountType::Equity => Self::Equity,
            accounts::AccountType::Income => Self::Income,
            accounts::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<EntryType> for journal::EntryType {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::Opening => Self::Opening,
            EntryType::Operation => Self::Operation,
            EntryType::Adjustment => Self::Adjustment,
            EntryType::Closing => Self::Closing,
            EntryType::Purchase => Self::Purchase,
            EntryType::Sale => Self::Sale,
            EntryType::Production => Self::Production,
        }
    }
}

impl From<journal::EntryType> for EntryType {
    fn from(value: journal::EntryType) -> Self {
        match value {
            journal::EntryType::Opening => Self::Opening,
            journal::EntryType::Operation => Self::Operation,
            journal::EntryType::Adjustment => Self::Adjustment,
            journal::EntryType::Closing => Self::Closing,
            journal::EntryType::Purchase => Self::Purchase,
            journal::EntryType::Sale => Self::Sale,
            journal::EntryType::Production => Self::Production,
        }
    }
}

impl From<EntryStatus> for journal::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<journal::EntryStatus> for EntryStatus {
    fn from(value: journal::EntryStatus) -> Self {
        match value {
            journal::EntryStatus::Draft => Self::Draft,
            journal::EntryStatus::Posted => Self::Posted,
            journal::EntryStatus::Voided => Self::Voided,
        }
    }
}
