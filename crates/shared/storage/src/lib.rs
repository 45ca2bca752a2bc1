//! Persistence for the care-bot services.
//!
//! sea-orm entities, migrations, the connection wrapper and one repository
//! per aggregate. Services depend on the repository traits only.

pub mod db;
pub mod entities;
pub mod migrations;
pub mod repositories;

pub use db::{run_migrations, Database, MigrateAction};
pub use migrations::Migrator;
pub use repositories::*;
