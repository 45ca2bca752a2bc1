//! Migration: family notifications and direct messages.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_accounts_and_families::{Accounts, Families};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Index)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::FamilyId).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notifications::NotificationGrade)
                            .string_len(4)
                            .not_null()
                            .default("NONE"),
                    )
                    .col(ColumnDef::new(Notifications::Description).text().not_null())
                    .col(ColumnDef::new(Notifications::IsRead).boolean().not_null().default(false))
                    .col(ColumnDef::new(Notifications::MessageSn).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_family")
                            .from(Notifications::Table, Notifications::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // NULL serials never collide, so manual notifications are unaffected
        manager
            .create_index(
                Index::create()
                    .name("uq_notifications_family_message_sn")
                    .table(Notifications::Table)
                    .col(Notifications::FamilyId)
                    .col(Notifications::MessageSn)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Index)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::FromId).string_len(16).not_null())
                    .col(ColumnDef::new(Messages::ToId).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Messages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(ColumnDef::new(Messages::ImageUrl).string_len(255).null())
                    .col(ColumnDef::new(Messages::IsRead).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_from")
                            .from(Messages::Table, Messages::FromId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_to")
                            .from(Messages::Table, Messages::ToId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notifications {
    Table,
    Index,
    FamilyId,
    CreatedAt,
    NotificationGrade,
    Description,
    IsRead,
    MessageSn,
}

#[derive(Iden)]
enum Messages {
    Table,
    Index,
    FromId,
    ToId,
    CreatedAt,
    Content,
    ImageUrl,
    IsRead,
}
