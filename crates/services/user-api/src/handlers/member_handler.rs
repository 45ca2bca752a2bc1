//! Member handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{Member, MemberFilter};

use super::account_handler::PasswordCheck;
use super::{listing, ApiResponse, CreatedId};
use crate::extractors::{require_text, ValidatedJson, ValidatedQuery, ID_PATTERN};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    pub family_id: Option<String>,
    pub user_id: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRequest {
    pub nickname: Option<String>,
}

/// Member list filters; both present means AND.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberQuery {
    #[serde(rename = "familyId")]
    #[validate(regex(path = *ID_PATTERN, message = "Family ID must be 16 letters or digits"))]
    #[param(rename = "familyId")]
    pub family_id: Option<String>,
    #[serde(rename = "userId")]
    #[validate(regex(path = *ID_PATTERN, message = "User ID must be 16 letters or digits"))]
    #[param(rename = "userId")]
    pub user_id: Option<String>,
}

/// Create member routes
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/:id",
            get(get_member).patch(update_member).delete(delete_member),
        )
}

/// Add a sub user to a family
#[utoipa::path(
    post,
    path = "/members",
    tag = "Members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "New member created successfully", body = CreatedId),
        (status = 400, description = "User not found or is not a sub user"),
        (status = 404, description = "Family not found"),
        (status = 409, description = "Member already exists in family"),
        (status = 422, description = "Family ID or user ID missing")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateMemberRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    let family_id = require_text(payload.family_id.clone(), "family_id", "Family ID", &payload)?;
    let user_id = require_text(payload.user_id.clone(), "user_id", "User ID", &payload)?;

    let id = state
        .member_service
        .create_member(&family_id, &user_id, payload.nickname)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_result(
            "New member created successfully",
            CreatedId { id },
        )),
    ))
}

/// List members, optionally filtered by family and user
#[utoipa::path(
    get,
    path = "/members",
    tag = "Members",
    params(MemberQuery),
    responses(
        (status = 200, description = "Members", body = Vec<Member>),
        (status = 422, description = "Malformed filter")
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MemberQuery>,
) -> AppResult<Json<ApiResponse<Vec<Member>>>> {
    let members = state
        .member_service
        .list_members(MemberFilter {
            family_id: query.family_id,
            user_id: query.user_id,
        })
        .await?;
    Ok(Json(listing(
        members,
        "All members retrieved successfully",
        "No members found",
    )))
}

/// Get one member relation
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "Members",
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member retrieved successfully", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Member>>> {
    let member = state.member_service.get_member(&id).await?;
    Ok(Json(ApiResponse::with_result(
        "Member retrieved successfully",
        member,
    )))
}

/// Change a member's nickname
#[utoipa::path(
    patch,
    path = "/members/{id}",
    tag = "Members",
    params(("id" = String, Path, description = "Member ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated successfully", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateMemberRequest>,
) -> AppResult<Json<ApiResponse<Member>>> {
    let member = state
        .member_service
        .update_member(&id, payload.nickname)
        .await?;
    Ok(Json(ApiResponse::with_result(
        "Member updated successfully",
        member,
    )))
}

/// Remove a member (requires the member user's password)
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "Members",
    params(("id" = String, Path, description = "Member ID")),
    request_body = PasswordCheck,
    responses(
        (status = 200, description = "Member deleted successfully"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "Member not found"),
        (status = 422, description = "Password is required")
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PasswordCheck>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .member_service
        .delete_member(&id, payload.password.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::message("Member deleted successfully")))
}
