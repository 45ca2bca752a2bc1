//! Middleware components.

pub mod session;

pub use session::{require_self_or_system, session_middleware, CurrentUser};
