//! Cookie session middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use common::{AppError, AppResult};
use domain::{constants::SESSION_COOKIE, Role};

use crate::state::AppState;

/// Account behind the session cookie of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
    /// Key of the login session that authenticated the request
    pub session_id: String,
}

impl CurrentUser {
    pub fn is_system(&self) -> bool {
        self.role.is_system()
    }
}

/// Allow only the account itself or a SYSTEM account.
pub fn require_self_or_system(user: &CurrentUser, target_id: &str) -> AppResult<()> {
    if user.is_system() || user.id == target_id {
        Ok(())
    } else {
        Err(AppError::forbidden("You do not have permission").with_input(json!({
            "user_id": target_id,
            "request_id": user.id,
        })))
    }
}

fn session_cookie(jar: &CookieJar) -> AppResult<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::no_data("Session ID is not provided. Please login again with your account.")
        })
}

/// Resolve the `session_id` cookie to the current user.
///
/// Missing cookie is a 422, unknown or expired sessions a 401. A valid
/// session has its `last_active` refreshed.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = session_cookie(&jar)?;
    let current_user = state.auth_service.authenticate(&session_id).await?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Handlers outside the session-protected routers can still ask for the
/// current user; the cookie is resolved on demand.
#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = session_cookie(&jar)?;
        state.auth_service.authenticate(&session_id).await
    }
}
