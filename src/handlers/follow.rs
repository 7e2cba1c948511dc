use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::follow::FollowService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/follow",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Now following"),
        (status = 404, description = "User not found", body = AppError),
        (status = 409, description = "Already following", body = AppError),
    ),
    tag = "follows"
)]
pub async fn follow_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    FollowService::new(db).follow(user_id, id).await?;
    Ok(ApiResponse::with_message((), "Now following".to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/follow",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Unfollowed"),
        (status = 404, description = "Follow not found", body = AppError),
    ),
    tag = "follows"
)]
pub async fn unfollow_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    FollowService::new(db).unfollow(user_id, id).await?;
    Ok(ApiResponse::with_message((), "Unfollowed".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/followers",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Followers", body = Vec<UserModel>),
    ),
    tag = "follows"
)]
pub async fn list_followers(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let users = FollowService::new(db).followers(id).await?;
    Ok(ApiResponse::ok(users))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/following",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Following", body = Vec<UserModel>),
    ),
    tag = "follows"
)]
pub async fn list_following(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let users = FollowService::new(db).following(id).await?;
    Ok(ApiResponse::ok(users))
}
