use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::response::ApiResponse;
use crate::services::like::LikeService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatusResponse {
    pub count: u64,
    /// Present only for authenticated requests
    pub liked: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post liked"),
        (status = 404, description = "Post not found", body = AppError),
        (status = 409, description = "Already liked", body = AppError),
    ),
    tag = "likes"
)]
pub async fn like_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    LikeService::new(db).like(user_id, id).await?;
    Ok(ApiResponse::with_message((), "Post liked".to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/like",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like removed"),
        (status = 404, description = "Like not found", body = AppError),
    ),
    tag = "likes"
)]
pub async fn unlike_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    LikeService::new(db).unlike(user_id, id).await?;
    Ok(ApiResponse::with_message((), "Like removed".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/likes",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like count", body = LikeStatusResponse),
    ),
    tag = "likes"
)]
pub async fn get_likes(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: Option<Extension<AuthUser>>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = LikeService::new(db);
    let count = service.count(id).await?;

    let liked = match auth_user {
        Some(Extension(user)) => Some(service.has_liked(parse_user_id(&user)?, id).await?),
        None => None,
    };

    Ok(ApiResponse::ok(LikeStatusResponse { count, liked }))
}
