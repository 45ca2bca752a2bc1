//! Migration: chat sessions, chat history and emotion reports.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatSessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChatSessions::Uid).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(ChatSessions::UserId).string_len(16).null())
                    .col(
                        ColumnDef::new(ChatSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ChatSessions::LastActive)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatHistories::Index)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatHistories::SessionId).string_len(36).not_null())
                    .col(ColumnDef::new(ChatHistories::UserId).string_len(16).null())
                    .col(ColumnDef::new(ChatHistories::UserMessage).text().not_null())
                    .col(ColumnDef::new(ChatHistories::BotMessage).text().not_null())
                    .col(
                        ColumnDef::new(ChatHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_histories_session")
                            .from(ChatHistories::Table, ChatHistories::SessionId)
                            .to(ChatSessions::Table, ChatSessions::Uid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_histories_user_created")
                    .table(ChatHistories::Table)
                    .col(ChatHistories::UserId)
                    .col(ChatHistories::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmotionReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmotionReports::Index)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmotionReports::UserId).string_len(16).not_null())
                    .col(ColumnDef::new(EmotionReports::ReportContent).text().not_null())
                    .col(
                        ColumnDef::new(EmotionReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmotionReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChatSessions {
    Table,
    Uid,
    UserId,
    CreatedAt,
    LastActive,
}

#[derive(Iden)]
enum ChatHistories {
    Table,
    Index,
    SessionId,
    UserId,
    UserMessage,
    BotMessage,
    CreatedAt,
}

#[derive(Iden)]
enum EmotionReports {
    Table,
    Index,
    UserId,
    ReportContent,
    CreatedAt,
}
