//! Database connection and initialization.

use std::collections::HashSet;
use std::time::Duration;

use common::{retry_with_backoff, DatabaseConfig, RetryPolicy};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, Statement,
};
use sea_orm_migration::{seaql_migrations, MigrationName, MigratorTrait};

use crate::migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Initialize database connection and run migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;

        // Run pending migrations
        Migrator::up(&db.connection, None).await?;
        tracing::info!("Database connected and migrations applied");

        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    ///
    /// Connection failures are retried with linear backoff.
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
            .sqlx_logging(false);

        let policy = RetryPolicy::new(config.connect_attempts, Duration::from_secs(1));
        let connection = retry_with_backoff(
            &policy,
            "database connect",
            |err: &DbErr| matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)),
            || SeaDatabase::connect(options.clone()),
        )
        .await?;

        Ok(Self { connection })
    }

    /// Clone of the pooled connection for repositories.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

/// Migration command understood by every binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Connect and run a migration command.
pub async fn run_migrations(config: &DatabaseConfig, action: MigrateAction) -> Result<(), DbErr> {
    let db = Database::connect_without_migrations(config).await?;
    let conn = &db.connection;

    match action {
        MigrateAction::Up => {
            Migrator::up(conn, None).await?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            Migrator::down(conn, Some(1)).await?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let applied: HashSet<String> = seaql_migrations::Entity::find()
                .all(conn)
                .await?
                .into_iter()
                .map(|row| row.version)
                .collect();

            for migration in Migrator::migrations() {
                let name = migration.name();
                let mark = if applied.contains(name) { "applied" } else { "pending" };
                println!("{:<60} {}", name, mark);
            }
        }
        MigrateAction::Fresh => {
            Migrator::fresh(conn).await?;
            tracing::info!("Database reset and migrations applied");
        }
    }

    Ok(())
}
