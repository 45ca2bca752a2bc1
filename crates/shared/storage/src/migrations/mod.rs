//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_accounts_and_families;
mod m20250101_000002_create_status_tables;
mod m20250101_000003_create_notifications_and_messages;
mod m20250101_000004_create_reference_tables;
mod m20250101_000005_create_chat_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_accounts_and_families::Migration),
            Box::new(m20250101_000002_create_status_tables::Migration),
            Box::new(m20250101_000003_create_notifications_and_messages::Migration),
            Box::new(m20250101_000004_create_reference_tables::Migration),
            Box::new(m20250101_000005_create_chat_tables::Migration),
        ]
    }
}
