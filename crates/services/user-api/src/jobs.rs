//! Background tasks of the user API.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{debug, info, warn};

use crate::service::AuthService;

/// Periodically delete login sessions idle past the expiry window.
///
/// Main user sessions are never touched.
pub async fn session_cleanup_task(auth: Arc<dyn AuthService>, every: Duration) {
    let mut interval = time::interval(every);
    info!(interval_secs = every.as_secs(), "Session cleanup task started");

    loop {
        interval.tick().await;

        match auth.cleanup_expired().await {
            Ok(0) => debug!("No expired sessions"),
            Ok(removed) => info!(removed, "Expired login sessions removed"),
            Err(e) => warn!("Session cleanup failed: {}", e),
        }
    }
}
