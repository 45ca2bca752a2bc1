//! Migration: home, health, active and mental status plus mental reports.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_accounts_and_families::Families;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Columns every status table starts with.
fn status_table<T>(table: T, fk_name: &str) -> TableCreateStatement
where
    T: Iden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Status::Index)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Status::FamilyId).string_len(16).not_null())
        .col(
            ColumnDef::new(Status::ReportedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name(fk_name)
                .from(table, Status::FamilyId)
                .to(Families::Table, Families::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                status_table(HomeStatus::Table, "fk_home_status_family")
                    .col(ColumnDef::new(HomeStatus::Temperature).double().null())
                    .col(ColumnDef::new(HomeStatus::Humidity).double().null())
                    .col(ColumnDef::new(HomeStatus::DustLevel).double().null())
                    .col(ColumnDef::new(HomeStatus::Ethanol).double().null())
                    .col(ColumnDef::new(HomeStatus::Others).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                status_table(HealthStatus::Table, "fk_health_status_family")
                    .col(ColumnDef::new(HealthStatus::HeartRate).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                status_table(ActiveStatus::Table, "fk_active_status_family")
                    .col(ColumnDef::new(ActiveStatus::Score).integer().null())
                    .col(ColumnDef::new(ActiveStatus::Action).string_len(255).null())
                    .col(ColumnDef::new(ActiveStatus::IsCritical).boolean().null())
                    .col(ColumnDef::new(ActiveStatus::Description).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                status_table(MentalStatus::Table, "fk_mental_status_family")
                    .col(ColumnDef::new(MentalStatus::Score).integer().not_null())
                    .col(ColumnDef::new(MentalStatus::IsCritical).boolean().not_null())
                    .col(ColumnDef::new(MentalStatus::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                status_table(MentalReports::Table, "fk_mental_reports_family")
                    .col(
                        ColumnDef::new(MentalReports::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentalReports::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MentalReports::AverageScore).double().not_null())
                    .col(ColumnDef::new(MentalReports::CriticalDays).integer().not_null())
                    .col(ColumnDef::new(MentalReports::BestDay).date().null())
                    .col(ColumnDef::new(MentalReports::WorstDay).date().null())
                    .col(ColumnDef::new(MentalReports::ImprovementNeeded).boolean().not_null())
                    .col(ColumnDef::new(MentalReports::Summary).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MentalReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MentalStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActiveStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HealthStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HomeStatus::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Status {
    Index,
    FamilyId,
    ReportedAt,
}

#[derive(Iden, Clone, Copy)]
enum HomeStatus {
    Table,
    Temperature,
    Humidity,
    DustLevel,
    Ethanol,
    Others,
}

#[derive(Iden, Clone, Copy)]
enum HealthStatus {
    Table,
    HeartRate,
}

#[derive(Iden, Clone, Copy)]
enum ActiveStatus {
    Table,
    Score,
    Action,
    IsCritical,
    Description,
}

#[derive(Iden, Clone, Copy)]
enum MentalStatus {
    Table,
    Score,
    IsCritical,
    Description,
}

#[derive(Iden, Clone, Copy)]
enum MentalReports {
    Table,
    StartTime,
    EndTime,
    AverageScore,
    CriticalDays,
    BestDay,
    WorstDay,
    ImprovementNeeded,
    Summary,
}
