//! Shared infrastructure for the care-bot services: the error envelope,
//! validating extractors, configuration structures and retry helpers.

pub mod config;
pub mod error;
pub mod extract;
pub mod retry;

pub use config::{CacheBackend, CacheConfig, DatabaseConfig, RetryPolicy, ServiceConfig};
pub use error::{AppError, AppResult, Detail, OptionExt};
pub use retry::retry_with_backoff;
