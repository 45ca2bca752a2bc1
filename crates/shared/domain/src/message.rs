//! Direct messages between accounts of the same family.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    pub index: i32,
    pub from_id: String,
    pub to_id: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub image_url: Option<String>,
    pub is_read: bool,
}

impl Message {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.from_id == user_id || self.to_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub from_id: String,
    pub to_id: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// An account a user may send messages to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Receiver {
    pub user_id: String,
    pub user_name: Option<String>,
    pub nickname: Option<String>,
}
