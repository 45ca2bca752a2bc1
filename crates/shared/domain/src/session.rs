//! Login sessions.
//!
//! A session is an opaque key stored in the `session_id` cookie. Sessions of
//! main users (the care recipients) never expire; everyone else is logged out
//! after an idle period.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginSession {
    pub xid: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub is_main_user: bool,
}

impl LoginSession {
    pub fn new(xid: String, user_id: String, is_main_user: bool, now: DateTime<Utc>) -> Self {
        Self {
            xid,
            user_id,
            created_at: now,
            last_active: now,
            is_main_user,
        }
    }

    /// Expired iff not a main user session and idle longer than `expire_seconds`.
    pub fn is_expired(&self, now: DateTime<Utc>, expire_seconds: i64) -> bool {
        !self.is_main_user && now - self.last_active > Duration::seconds(expire_seconds)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }
}
