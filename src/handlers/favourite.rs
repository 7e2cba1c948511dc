use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::PostModel;
use crate::response::ApiResponse;
use crate::services::favourite::FavouriteService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/favourite",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Added to favourites"),
        (status = 404, description = "Post not found", body = AppError),
        (status = 409, description = "Already in favourites", body = AppError),
    ),
    tag = "favourites"
)]
pub async fn add_favourite(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    FavouriteService::new(db).add(user_id, id).await?;
    Ok(ApiResponse::with_message(
        (),
        "Added to favourites".to_string(),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/favourite",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Removed from favourites"),
        (status = 404, description = "Favourite not found", body = AppError),
    ),
    tag = "favourites"
)]
pub async fn remove_favourite(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    FavouriteService::new(db).remove(user_id, id).await?;
    Ok(ApiResponse::with_message(
        (),
        "Removed from favourites".to_string(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/favourites",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Favourite posts", body = Vec<PostModel>),
    ),
    tag = "favourites"
)]
pub async fn list_favourites(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let posts = FavouriteService::new(db).list(user_id).await?;
    Ok(ApiResponse::ok(posts))
}
