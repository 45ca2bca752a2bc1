//! Family-scoped access policy.

use std::sync::Arc;

use serde_json::json;

use common::{AppError, AppResult};
use storage::FamilyRepository;

use crate::middleware::CurrentUser;

/// Decides whether a requester may touch a family's data: SYSTEM accounts
/// always, otherwise only the family's main user and its members.
#[derive(Clone)]
pub struct AccessPolicy {
    families: Arc<dyn FamilyRepository>,
}

impl AccessPolicy {
    pub fn new(families: Arc<dyn FamilyRepository>) -> Self {
        Self { families }
    }

    /// 404 when the family is unknown, 403 when the requester is not allowed.
    pub async fn ensure_family_access(
        &self,
        requester: &CurrentUser,
        family_id: &str,
    ) -> AppResult<()> {
        let access = self.families.access(family_id).await?.ok_or_else(|| {
            AppError::not_found("Family not found").with_input(json!({"family_id": family_id}))
        })?;

        if access.permits(&requester.id, requester.role) {
            Ok(())
        } else {
            Err(AppError::forbidden("You do not have permission").with_input(json!({
                "family_id": family_id,
                "request_id": requester.id,
            })))
        }
    }
}
