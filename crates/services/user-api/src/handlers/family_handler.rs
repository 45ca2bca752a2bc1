//! Family handlers.

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

use common::AppResult;
use domain::Family;

use super::account_handler::PasswordCheck;
use super::{listing, ApiResponse, CreatedId};
use crate::extractors::{require_text, ValidatedJson};
use crate::state::AppState;

/// Lookup of a main user's family
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct FamilyCheckRequest {
    /// Main user id
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFamilyRequest {
    pub main_user: Option<String>,
    #[schema(example = "Kim family")]
    pub family_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateFamilyRequest {
    pub family_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FamilyIdResult {
    pub family_id: String,
}

/// Create family routes
pub fn family_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_families).post(create_family))
        .route("/check-exist", post(check_exist))
        .route(
            "/:id",
            get(get_family).patch(update_family).delete(delete_family),
        )
}

/// Find the family of a main user
#[utoipa::path(
    post,
    path = "/families/check-exist",
    tag = "Families",
    request_body = FamilyCheckRequest,
    responses(
        (status = 200, description = "Family exists", body = FamilyIdResult),
        (status = 404, description = "Main ID does not have a family"),
        (status = 422, description = "Main ID is required")
    )
)]
pub async fn check_exist(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<FamilyCheckRequest>,
) -> AppResult<Json<ApiResponse<FamilyIdResult>>> {
    let main_user = require_text(payload.id.clone(), "id", "Main ID", &payload)?;
    let family_id = state.family_service.family_of_main_user(&main_user).await?;
    Ok(Json(ApiResponse::with_result(
        "Family exists",
        FamilyIdResult { family_id },
    )))
}

/// Create a family for a main user
#[utoipa::path(
    post,
    path = "/families",
    tag = "Families",
    request_body = CreateFamilyRequest,
    responses(
        (status = 201, description = "New family created successfully", body = CreatedId),
        (status = 400, description = "Does not exist or is not a main user"),
        (status = 409, description = "Main user already has a family"),
        (status = 422, description = "Main user is required")
    )
)]
pub async fn create_family(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateFamilyRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    let main_user = require_text(payload.main_user.clone(), "main_user", "Main user", &payload)?;
    let id = state
        .family_service
        .create_family(&main_user, payload.family_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_result(
            "New family created successfully",
            CreatedId { id },
        )),
    ))
}

/// List every family
#[utoipa::path(
    get,
    path = "/families",
    tag = "Families",
    responses((status = 200, description = "All families", body = Vec<Family>))
)]
pub async fn list_families(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Family>>>> {
    let families = state.family_service.list_families().await?;
    Ok(Json(listing(
        families,
        "All families retrieved successfully",
        "No families found",
    )))
}

/// Get one family
#[utoipa::path(
    get,
    path = "/families/{id}",
    tag = "Families",
    params(("id" = String, Path, description = "Family ID")),
    responses(
        (status = 200, description = "Family retrieved successfully", body = Family),
        (status = 404, description = "Family not found")
    )
)]
pub async fn get_family(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Family>>> {
    let family = state.family_service.get_family(&id).await?;
    Ok(Json(ApiResponse::with_result(
        "Family retrieved successfully",
        family,
    )))
}

/// Rename a family
#[utoipa::path(
    patch,
    path = "/families/{id}",
    tag = "Families",
    params(("id" = String, Path, description = "Family ID")),
    request_body = UpdateFamilyRequest,
    responses(
        (status = 200, description = "Family updated successfully", body = Family),
        (status = 404, description = "Family not found")
    )
)]
pub async fn update_family(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateFamilyRequest>,
) -> AppResult<Json<ApiResponse<Family>>> {
    let family = state
        .family_service
        .update_family(&id, payload.family_name)
        .await?;
    Ok(Json(ApiResponse::with_result(
        "Family updated successfully",
        family,
    )))
}

/// Delete a family (requires the main user's password)
#[utoipa::path(
    delete,
    path = "/families/{id}",
    tag = "Families",
    params(("id" = String, Path, description = "Family ID")),
    request_body = PasswordCheck,
    responses(
        (status = 200, description = "Family deleted successfully"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "Family not found"),
        (status = 422, description = "Password is required")
    )
)]
pub async fn delete_family(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PasswordCheck>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .family_service
        .delete_family(&id, payload.password.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::message("Family deleted successfully")))
}
