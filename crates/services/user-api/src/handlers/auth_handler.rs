//! Login session handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{constants::SESSION_COOKIE, AccountResponse, LoginSession};

use super::ApiResponse;
use crate::extractors::{require_text, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "family@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResult {
    pub session_id: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub user_id: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Routes that work without a session
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Routes that need the session middleware
pub fn auth_session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/password", patch(change_password))
        .route("/sessions", get(sessions))
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .build()
}

/// Log in and receive the `session_id` cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successfully", body = LoginResult),
        (status = 401, description = "Invalid email or password"),
        (status = 422, description = "Email or password missing")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginResult>>)> {
    let email = require_text(payload.email.clone(), "email", "Email", &payload)?;
    let password = require_text(payload.password.clone(), "password", "Password", &payload)?;

    let session = state.auth_service.login(&email, &password).await?;
    let jar = jar.add(session_cookie(session.xid.clone()));

    Ok((
        jar,
        Json(ApiResponse::with_result(
            "Login successfully",
            LoginResult {
                session_id: session.xid,
                user_id: session.user_id,
            },
        )),
    ))
}

/// Delete the current session and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Logout successfully"),
        (status = 401, description = "Session ID is invalid.")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<()>>)> {
    state.auth_service.logout(&current_user.session_id).await?;
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json(ApiResponse::message("Logout successfully"))))
}

/// The account behind the session cookie
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Current user", body = AccountResponse),
        (status = 401, description = "Session invalid or expired"),
        (status = 422, description = "Session ID is not provided")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    let account = state
        .account_service
        .get_account(&current_user, &current_user.id)
        .await?;
    Ok(Json(ApiResponse::with_result(
        "Current user retrieved successfully",
        AccountResponse::from(account),
    )))
}

/// Change a password; the account's other sessions are logged out
#[utoipa::path(
    patch,
    path = "/auth/password",
    tag = "Auth",
    security(("session_cookie" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully"),
        (status = 401, description = "Invalid password"),
        (status = 403, description = "You do not have permission"),
        (status = 422, description = "Field missing")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let user_id = require_text(payload.user_id.clone(), "user_id", "User ID", &payload)?;
    let current = require_text(
        payload.current_password.clone(),
        "current_password",
        "Current password",
        &payload,
    )?;
    let new = require_text(
        payload.new_password.clone(),
        "new_password",
        "New password",
        &payload,
    )?;

    state
        .auth_service
        .change_password(&current_user, &user_id, &current, &new)
        .await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// Login sessions of the current user
#[utoipa::path(
    get,
    path = "/auth/sessions",
    tag = "Auth",
    security(("session_cookie" = [])),
    responses((status = 200, description = "Sessions", body = Vec<LoginSession>))
)]
pub async fn sessions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<LoginSession>>>> {
    let sessions = state.auth_service.sessions_of(&current_user.id).await?;
    Ok(Json(ApiResponse::with_result(
        "Login sessions retrieved successfully",
        sessions,
    )))
}
