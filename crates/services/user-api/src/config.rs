//! User API configuration.

use common::config::env_or;
use common::{DatabaseConfig, ServiceConfig};
use domain::constants::DEFAULT_SESSION_EXPIRE_SECONDS;

/// User API configuration.
#[derive(Debug, Clone)]
pub struct UserApiConfig {
    /// Host and port to bind
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    /// Idle seconds before a sub user's session expires
    pub session_expire_seconds: i64,
    /// Seconds between expired-session sweeps
    pub session_cleanup_interval_seconds: u64,
    /// Base URL of the AI server
    pub ai_server_url: String,
    /// Timeout in seconds for calls to the AI server
    pub external_timeout_seconds: u64,
}

impl UserApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service: ServiceConfig::from_env("user-api", "USER_API", defaults.service.port),
            database: DatabaseConfig::from_env(),
            session_expire_seconds: env_or("SESSION_EXPIRE_TIME", defaults.session_expire_seconds),
            session_cleanup_interval_seconds: env_or(
                "SESSION_CLEANUP_INTERVAL",
                defaults.session_cleanup_interval_seconds,
            ),
            ai_server_url: env_or("AI_SERVER_URL", defaults.ai_server_url),
            external_timeout_seconds: env_or(
                "EXTERNAL_TIMEOUT",
                defaults.external_timeout_seconds,
            ),
        }
    }
}

impl Default for UserApiConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "user-api".to_string(),
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig::default(),
            session_expire_seconds: DEFAULT_SESSION_EXPIRE_SECONDS,
            session_cleanup_interval_seconds: 600,
            ai_server_url: "http://localhost:8001".to_string(),
            external_timeout_seconds: 60,
        }
    }
}
