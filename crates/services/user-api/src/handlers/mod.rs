//! HTTP handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod family_handler;
pub mod health_handler;
pub mod member_handler;
pub mod message_handler;
pub mod notification_handler;
pub mod status_handler;
pub mod tool_handler;

use serde::Serialize;

pub use account_handler::account_routes;
pub use auth_handler::{auth_routes, auth_session_routes};
pub use family_handler::family_routes;
pub use health_handler::health_routes;
pub use member_handler::member_routes;
pub use message_handler::message_routes;
pub use notification_handler::notification_routes;
pub use status_handler::status_routes;
pub use tool_handler::tool_routes;

/// `{"message": ..., "result": ...}` body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_result(message: impl Into<String>, result: T) -> Self {
        Self {
            message: message.into(),
            result: Some(result),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            result: None,
        }
    }
}

/// List response whose message depends on whether anything was found.
pub fn listing<T: Serialize>(items: Vec<T>, found: &str, empty: &str) -> ApiResponse<Vec<T>> {
    let message = if items.is_empty() { empty } else { found };
    ApiResponse::with_result(message, items)
}

/// `{"id": ...}` result of create endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatedId {
    pub id: String,
}
