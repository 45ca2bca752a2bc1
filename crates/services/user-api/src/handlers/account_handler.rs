//! Account handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{AccountResponse, BirthDate, Gender, Role};

use super::{listing, ApiResponse, CreatedId};
use crate::extractors::{require_text, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::service::{AccountPatch, NewAccount};
use crate::state::AppState;

/// Email availability check
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct EmailCheckRequest {
    #[validate(length(max = 128, message = "Email must be at most 128 characters"))]
    #[schema(example = "family@example.com")]
    pub email: Option<String>,
}

/// New account. `password`, `role` and `email` are required.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(max = 128, message = "Email must be at most 128 characters"))]
    #[schema(example = "family@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    /// test, system, main or sub (any case)
    #[schema(example = "main")]
    pub role: Option<String>,
    pub user_name: Option<String>,
    pub birth_date: Option<BirthDate>,
    /// male, female or other (any case)
    pub gender: Option<String>,
    pub address: Option<String>,
}

/// Partial account update; absent fields keep their value.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(max = 128, message = "Email must be at most 128 characters"))]
    pub email: Option<String>,
    pub role: Option<String>,
    pub user_name: Option<String>,
    pub birth_date: Option<BirthDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

/// Password confirmation for deletions
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordCheck {
    pub password: Option<String>,
}

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/check-email", post(check_email))
        .route(
            "/:id",
            get(get_account).patch(update_account).delete(delete_account),
        )
}

fn parse_role<I: Serialize>(value: Option<&str>, input: &I) -> AppResult<Option<Role>> {
    value
        .filter(|v| !v.is_empty())
        .map(Role::parse)
        .transpose()
        .map_err(|e| AppError::from(e).with_input(input))
}

fn parse_gender<I: Serialize>(value: Option<&str>, input: &I) -> AppResult<Option<Gender>> {
    value
        .filter(|v| !v.is_empty())
        .map(Gender::parse)
        .transpose()
        .map_err(|e| AppError::from(e).with_input(input))
}

/// Check whether an email can be registered
#[utoipa::path(
    post,
    path = "/accounts/check-email",
    tag = "Accounts",
    request_body = EmailCheckRequest,
    responses(
        (status = 200, description = "Email is available"),
        (status = 409, description = "Email is already in use"),
        (status = 422, description = "Email is required")
    )
)]
pub async fn check_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailCheckRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let email = require_text(payload.email.clone(), "email", "Email", &payload)?;
    state.account_service.check_email(&email).await?;
    Ok(Json(ApiResponse::message("Email is available")))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "New account created successfully", body = CreatedId),
        (status = 400, description = "Invalid role, gender or birth date"),
        (status = 409, description = "Email is already in use"),
        (status = 422, description = "Missing password, role or email")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    let password = require_text(payload.password.clone(), "password", "Password", &payload)?;
    let role = require_text(payload.role.clone(), "role", "Role", &payload)?;
    let email = require_text(payload.email.clone(), "email", "Email", &payload)?;

    let role = parse_role(Some(&role), &payload)?.unwrap_or_default();
    let gender = parse_gender(payload.gender.as_deref(), &payload)?.unwrap_or_default();

    let id = state
        .account_service
        .create_account(NewAccount {
            email,
            password,
            role,
            user_name: payload.user_name,
            birth_date: payload.birth_date,
            gender,
            address: payload.address,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_result(
            "New account created successfully",
            CreatedId { id },
        )),
    ))
}

/// List every account
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    responses(
        (status = 200, description = "All accounts", body = Vec<AccountResponse>)
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<AccountResponse>>>> {
    let accounts = state.account_service.list_accounts().await?;
    Ok(Json(listing(
        accounts.into_iter().map(AccountResponse::from).collect(),
        "All accounts retrieved successfully",
        "No accounts found",
    )))
}

/// Get one account (itself or SYSTEM)
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("session_cookie" = [])),
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account retrieved successfully", body = AccountResponse),
        (status = 401, description = "Session invalid or expired"),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    let account = state.account_service.get_account(&current_user, &id).await?;
    Ok(Json(ApiResponse::with_result(
        "Account retrieved successfully",
        AccountResponse::from(account),
    )))
}

/// Update account details
#[utoipa::path(
    patch,
    path = "/accounts/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = AccountResponse),
        (status = 400, description = "Invalid role, gender or birth date"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email is already in use")
    )
)]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    let role = parse_role(payload.role.as_deref(), &payload)?;
    let gender = parse_gender(payload.gender.as_deref(), &payload)?;

    let account = state
        .account_service
        .update_account(
            &id,
            AccountPatch {
                email: payload.email.filter(|e| !e.is_empty()),
                role,
                user_name: payload.user_name,
                birth_date: payload.birth_date,
                gender,
                address: payload.address,
            },
        )
        .await?;

    Ok(Json(ApiResponse::with_result(
        "Account updated successfully",
        AccountResponse::from(account),
    )))
}

/// Delete an account (requires its password)
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account ID")),
    request_body = PasswordCheck,
    responses(
        (status = 200, description = "Account deleted successfully"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Password is required")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PasswordCheck>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .account_service
        .delete_account(&id, payload.password.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::message("Account deleted successfully")))
}
