use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_moderator, AuthUser};
use crate::models::{ComplaintModel, ComplaintStatus, UserModel};
use crate::response::ApiResponse;
use crate::services::moderation::{
    ComplaintListItem, ComplaintTarget, ModerationService, UserComplaintSummary,
};
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportRequest {
    /// Why this content is being reported (10-500 characters)
    #[validate(length(min = 10, max = 500))]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComplaintStatusRequest {
    /// One of NEW, PROCESSING, RESOLVED, REJECTED
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    pub approved: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserSearchQuery {
    pub q: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/report",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Complaint filed", body = ComplaintModel),
        (status = 404, description = "Post not found", body = AppError),
        (status = 409, description = "Open complaint already exists", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn report_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let complaint = ModerationService::new(db)
        .report(user_id, ComplaintTarget::Post(id), &payload.reason)
        .await?;
    Ok(ApiResponse::ok(complaint))
}

#[utoipa::path(
    post,
    path = "/api/v1/comments/{id}/report",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Complaint filed", body = ComplaintModel),
        (status = 404, description = "Comment not found", body = AppError),
        (status = 409, description = "Open complaint already exists", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn report_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ReportRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let complaint = ModerationService::new(db)
        .report(user_id, ComplaintTarget::Comment(id), &payload.reason)
        .await?;
    Ok(ApiResponse::ok(complaint))
}

#[utoipa::path(
    get,
    path = "/api/v1/moderation/complaints",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Open complaints", body = Vec<ComplaintListItem>),
        (status = 403, description = "Not a moderator", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn list_complaints(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;
    let items = ModerationService::new(db).list_complaints().await?;
    Ok(ApiResponse::ok(items))
}

#[utoipa::path(
    put,
    path = "/api/v1/moderation/complaints/{id}",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Complaint ID")),
    request_body = UpdateComplaintStatusRequest,
    responses(
        (status = 200, description = "Complaint updated", body = ComplaintModel),
        (status = 400, description = "Unknown status", body = AppError),
        (status = 409, description = "Complaint already closed", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn update_complaint_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateComplaintStatusRequest>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let status: ComplaintStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown status: {}", payload.status)))?;

    let complaint = ModerationService::new(db).update_status(id, status).await?;
    Ok(ApiResponse::ok(complaint))
}

#[utoipa::path(
    put,
    path = "/api/v1/moderation/posts/{id}/visibility",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = VisibilityRequest,
    responses(
        (status = 200, description = "Visibility updated"),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn toggle_post_visibility(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisibilityRequest>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;
    ModerationService::new(db)
        .toggle_post_visibility(id, payload.approved)
        .await?;
    Ok(ApiResponse::with_message(
        (),
        "Post visibility updated".to_string(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/moderation/comments/{id}/visibility",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = VisibilityRequest,
    responses(
        (status = 200, description = "Visibility updated"),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn toggle_comment_visibility(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<VisibilityRequest>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;
    ModerationService::new(db)
        .toggle_comment_visibility(id, payload.approved)
        .await?;
    Ok(ApiResponse::with_message(
        (),
        "Comment visibility updated".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/moderation/users/{id}/block",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User blocked", body = UserModel),
        (status = 403, description = "Target is a moderator", body = AppError),
        (status = 409, description = "Already blocked", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn block_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor_id = require_moderator(&db, &auth_user).await?;
    let user = ModerationService::new(db).block_user(actor_id, id).await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    post,
    path = "/api/v1/moderation/users/{id}/unblock",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unblocked", body = UserModel),
        (status = 409, description = "User is not blocked", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn unblock_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor_id = require_moderator(&db, &auth_user).await?;
    let user = ModerationService::new(db)
        .unblock_user(actor_id, id)
        .await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    post,
    path = "/api/v1/moderation/users/{id}/moderator",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Moderator role assigned", body = UserModel),
        (status = 409, description = "Already a moderator or blocked", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn assign_moderator(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor_id = require_moderator(&db, &auth_user).await?;
    let user = ModerationService::new(db)
        .assign_moderator(actor_id, id)
        .await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/moderation/users/{id}/moderator",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Moderator role removed", body = UserModel),
        (status = 409, description = "User is not a moderator", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn remove_moderator(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor_id = require_moderator(&db, &auth_user).await?;
    let user = ModerationService::new(db)
        .remove_moderator(actor_id, id)
        .await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/moderation/users",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Users with complaint tallies", body = Vec<UserComplaintSummary>),
        (status = 403, description = "Not a moderator", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn users_with_complaints(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;
    let rows = ModerationService::new(db).users_with_complaints().await?;
    Ok(ApiResponse::ok(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/moderation/users/search",
    security(("jwt_token" = [])),
    params(("q" = String, Query, description = "Username or email substring")),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserModel>),
        (status = 403, description = "Not a moderator", body = AppError),
    ),
    tag = "moderation"
)]
pub async fn search_users(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<UserSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let actor_id = require_moderator(&db, &auth_user).await?;
    let users = ModerationService::new(db)
        .search_users(actor_id, &params.q)
        .await?;
    Ok(ApiResponse::ok(users))
}
