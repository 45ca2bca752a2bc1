//! Business logic layer - service traits and their repository-backed
//! implementations.

pub mod access;
pub mod account_service;
pub mod auth_service;
pub mod family_service;
pub mod member_service;
pub mod message_service;
pub mod notification_service;
pub mod status_service;
pub mod tool_service;

use std::future::Future;

use serde_json::json;

use common::{AppError, AppResult};
use domain::{generate_id, IdKind};

pub use access::AccessPolicy;
pub use account_service::{AccountManager, AccountPatch, AccountService, NewAccount};
pub use auth_service::{AuthManager, AuthService};
pub use family_service::{FamilyManager, FamilyService};
pub use member_service::{MemberManager, MemberService};
pub use message_service::{MessageManager, MessageService};
pub use notification_service::{NotificationManager, NotificationService};
pub use status_service::{StatusManager, StatusRecord, StatusRecords, StatusService};
pub use tool_service::{ToolManager, ToolService};

/// Draw identifiers of `kind` until one is not taken.
pub(crate) async fn unique_id<F, Fut>(kind: IdKind, mut exists: F) -> AppResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    loop {
        let candidate = generate_id(kind);
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
}

/// Deletions are confirmed with a password; an empty one is a 422.
pub(crate) fn ensure_password_given(id: &str, password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::no_data("Password is required")
            .at(["body", "password"])
            .with_input(json!({"id": id})));
    }
    Ok(())
}
