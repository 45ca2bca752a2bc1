//! Combined binary for development - runs all services in one process.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "care-bot")]
#[command(about = "Care-bot services in one binary for development")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all services in a single process (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "USER_API_PORT", default_value = "8000")]
        user_port: u16,
        #[arg(long, env = "AI_API_PORT", default_value = "8001")]
        ai_port: u16,
        #[arg(long, env = "VOICE_API_PORT", default_value = "8002")]
        voice_port: u16,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            user_port,
            ai_port,
            voice_port,
        } => {
            info!("Starting combined services in development mode");
            info!("  User API:  http://{}:{}", host, user_port);
            info!("  AI API:    http://{}:{}", host, ai_port);
            info!("  Voice API: http://{}:{}", host, voice_port);

            let user_host = host.clone();
            let user_handle = tokio::spawn(async move {
                if let Err(e) = user_api_lib::run_embedded(&user_host, user_port).await {
                    error!("User API failed: {}", e);
                }
            });

            let ai_host = host.clone();
            let ai_handle = tokio::spawn(async move {
                if let Err(e) = ai_api_lib::run_embedded(&ai_host, ai_port).await {
                    error!("AI API failed: {}", e);
                }
            });

            let voice_host = host.clone();
            let voice_handle = tokio::spawn(async move {
                if let Err(e) = voice_api_lib::run_embedded(&voice_host, voice_port).await {
                    error!("Voice API failed: {}", e);
                }
            });

            // Wait for any service to exit (which would indicate an error)
            tokio::select! {
                _ = user_handle => {
                    error!("User API exited unexpectedly");
                }
                _ = ai_handle => {
                    error!("AI API exited unexpectedly");
                }
                _ = voice_handle => {
                    error!("Voice API exited unexpectedly");
                }
            }
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateAction::Up => storage::MigrateAction::Up,
                MigrateAction::Down => storage::MigrateAction::Down,
                MigrateAction::Status => storage::MigrateAction::Status,
                MigrateAction::Fresh => storage::MigrateAction::Fresh,
            };

            // Both database services share one schema
            user_api_lib::run_migrations(migrate_action).await?;
        }
    }

    Ok(())
}
