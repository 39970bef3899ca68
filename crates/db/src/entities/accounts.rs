//! `SeaORM` Entity for the chart of accounts.

use obrador_core::accounts::AccountSummary;
use obrador_core::journal::PostingAccount;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub account_type: AccountType,
    pub level: i32,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
    pub allows_posting: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::journal_entry_lines::Entity")]
    JournalEntryLines,
}

impl Related<super::journal_entry_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Identifying fields carried into ledgers and reports.
    #[must_use]
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.into(),
            code: self.code.clone(),
            name: self.name.clone(),
            account_type: self.account_type.into(),
        }
    }

    /// Fields the journal engine checks before posting.
    #[must_use]
    pub fn posting(&self) -> PostingAccount {
        PostingAccount {
            id: self.id.into(),
            allows_posting: self.allows_posting,
        }
    }
}
