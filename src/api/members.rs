//! Member management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, MembershipStatus, UpdateMember},
};

use super::{books::SearchParams, CreatedResponse, MessageResponse};

/// Status update request
#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of Active, Expired, Suspended
    pub status: String,
}

/// List all members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "List of members", body = Vec<Member>)
    )
)]
pub async fn list_members(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.list_members().await?;
    Ok(Json(members))
}

/// Search members by name, email or phone
#[utoipa::path(
    get,
    path = "/members/search",
    tag = "members",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching members", body = Vec<Member>),
        (status = 400, description = "Missing search query")
    )
)]
pub async fn search_members(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Member>>> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

    let members = state.services.members.search_members(&query).await?;
    Ok(Json(members))
}

/// Get a single member
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get_member(id).await?;
    Ok(Json(member))
}

/// Create a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = CreatedResponse),
        (status = 400, description = "Missing fields or duplicate email")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = state.services.members.create_member(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: member.id,
            message: "Member created successfully".to_string(),
        }),
    ))
}

/// Update an existing member
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = MessageResponse),
        (status = 400, description = "Invalid input or duplicate email"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateMember>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state.services.members.update_member(id, request).await?;

    Ok(Json(MessageResponse {
        message: "Member updated successfully".to_string(),
    }))
}

/// Update membership status
#[utoipa::path(
    patch,
    path = "/members/{id}/status",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<MessageResponse>> {
    let status: MembershipStatus = request
        .status
        .parse()
        .map_err(|e: String| AppError::Validation(e))?;

    state.services.members.update_status(id, status).await?;

    Ok(Json(MessageResponse {
        message: "Member status updated successfully".to_string(),
    }))
}

/// Delete a member. Refused while the member has open loans.
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 400, description = "Member has active loans"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.members.delete_member(id).await?;

    Ok(Json(MessageResponse {
        message: "Member deleted successfully".to_string(),
    }))
}
