//! Migration: accounts, families, member relations and login sessions.

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
                    .col(ColumnDef::new(Accounts::Id).string_len(16).not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Email).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(Accounts::Password).string_len(128).not_null())
                    .col(ColumnDef::new(Accounts::Role).string_len(8).not_null().default("TEST"))
                    .col(ColumnDef::new(Accounts::UserName).string_len(32).null())
                    .col(ColumnDef::new(Accounts::BirthDate).date().null())
                    .col(ColumnDef::new(Accounts::Gender).string_len(8).null())
                    .col(ColumnDef::new(Accounts::Address).string_len(128).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Families::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Families::Id).string_len(16).not_null().primary_key())
                    .col(ColumnDef::new(Families::MainUser).string_len(16).not_null().unique_key())
                    .col(ColumnDef::new(Families::FamilyName).string_len(32).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_families_main_user")
                            .from(Families::Table, Families::MainUser)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemberRelations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MemberRelations::Id)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MemberRelations::FamilyId).string_len(16).not_null())
                    .col(ColumnDef::new(MemberRelations::UserId).string_len(16).not_null())
                    .col(ColumnDef::new(MemberRelations::Nickname).string_len(32).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_relations_family")
                            .from(MemberRelations::Table, MemberRelations::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_relations_user")
                            .from(MemberRelations::Table, MemberRelations::UserId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_member_relations_family_user")
                    .table(MemberRelations::Table)
                    .col(MemberRelations::FamilyId)
                    .col(MemberRelations::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoginSessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LoginSessions::Xid).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(LoginSessions::UserId).string_len(16).not_null())
                    .col(
                        ColumnDef::new(LoginSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LoginSessions::LastActive)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LoginSessions::IsMainUser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_login_sessions_user")
                            .from(LoginSessions::Table, LoginSessions::UserId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_login_sessions_user_id")
                    .table(LoginSessions::Table)
                    .col(LoginSessions::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MemberRelations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Families::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
    Email,
    Password,
    Role,
    UserName,
    BirthDate,
    Gender,
    Address,
}

#[derive(Iden)]
pub enum Families {
    Table,
    Id,
    MainUser,
    FamilyName,
}

#[derive(Iden)]
enum MemberRelations {
    Table,
    Id,
    FamilyId,
    UserId,
    Nickname,
}

#[derive(Iden)]
enum LoginSessions {
    Table,
    Xid,
    UserId,
    CreatedAt,
    LastActive,
    IsMainUser,
}
