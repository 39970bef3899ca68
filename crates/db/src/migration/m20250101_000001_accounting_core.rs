//! Chart of accounts and journal tables.
//!
//! Built with the schema builder rather than raw SQL so the same migration
//! runs on PostgreSQL and on the SQLite databases used in tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Code).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Accounts::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Accounts::Description).text())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(20).not_null())
                    .col(ColumnDef::new(Accounts::Level).integer().not_null())
                    .col(ColumnDef::new(Accounts::ParentId).uuid())
                    .col(ColumnDef::new(Accounts::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Accounts::AllowsPosting)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(Accounts::CreatedAt))
                    .col(timestamp(Accounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_parent")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(JournalEntries::EntryNumber)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::Date).date().not_null())
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryType).string_len(20).not_null())
                    .col(ColumnDef::new(JournalEntries::Status).string_len(20).not_null())
                    .col(money(JournalEntries::TotalDebit))
                    .col(money(JournalEntries::TotalCredit))
                    .col(ColumnDef::new(JournalEntries::ReferenceType).string_len(50))
                    .col(ColumnDef::new(JournalEntries::ReferenceId).string_len(100))
                    .col(ColumnDef::new(JournalEntries::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::ApprovedBy).uuid())
                    .col(ColumnDef::new(JournalEntries::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JournalEntries::VoidedBy).uuid())
                    .col(ColumnDef::new(JournalEntries::VoidedAt).timestamp_with_time_zone())
                    .col(timestamp(JournalEntries::CreatedAt))
                    .col(timestamp(JournalEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntryLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntryLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntryLines::EntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntryLines::LineNumber).integer().not_null())
                    .col(ColumnDef::new(JournalEntryLines::AccountId).uuid().not_null())
                    .col(money(JournalEntryLines::Debit))
                    .col(money(JournalEntryLines::Credit))
                    .col(ColumnDef::new(JournalEntryLines::Description).text())
                    .col(timestamp(JournalEntryLines::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entry_lines_entry")
                            .from(JournalEntryLines::Table, JournalEntryLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entry_lines_account")
                            .from(JournalEntryLines::Table, JournalEntryLines::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_date_status")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::Date)
                    .col(JournalEntries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entry_lines_account")
                    .table(JournalEntryLines::Table)
                    .col(JournalEntryLines::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_journal_entry_lines_entry_line")
                    .table(JournalEntryLines::Table)
                    .col(JournalEntryLines::EntryId)
                    .col(JournalEntryLines::LineNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalEntryLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

/// `DECIMAL(15,2) NOT NULL DEFAULT 0`.
fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(15, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Code,
    Name,
    Description,
    AccountType,
    Level,
    ParentId,
    IsActive,
    AllowsPosting,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    EntryNumber,
    Date,
    Description,
    EntryType,
    Status,
    TotalDebit,
    TotalCredit,
    ReferenceType,
    ReferenceId,
    CreatedBy,
    ApprovedBy,
    ApprovedAt,
    VoidedBy,
    VoidedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalEntryLines {
    Table,
    Id,
    EntryId,
    LineNumber,
    AccountId,
    Debit,
    Credit,
    Description,
    CreatedAt,
}
