use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::PostModel;
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::post::{
    ParagraphPayload, PhotoPayload, PlacePayload, PostDetail, PostPayload, PostService,
};
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceRequest {
    /// Place name (1-150 characters)
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Latitude in degrees
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Longitude in degrees
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ParagraphRequest {
    /// Ordering key within the post
    pub position: i32,
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PhotoRequest {
    #[validate(length(min = 1))]
    pub url: String,
    /// Ordering key; defaults to request order
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PostRequest {
    /// Post title (1-200 characters)
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(nested)]
    pub place: PlaceRequest,
    /// Tag names; blanks and duplicates are dropped
    pub tags: Option<Vec<String>>,
    #[validate(nested)]
    pub paragraphs: Vec<ParagraphRequest>,
    #[validate(nested)]
    pub photos: Option<Vec<PhotoRequest>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttachPlaceRequest {
    /// Existing place to attach the post to
    pub place_id: Uuid,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedPostResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedQuery {
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

impl PostRequest {
    fn into_payload(self) -> AppResult<PostPayload> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let tags = self.tags.unwrap_or_default();
        if tags.len() > 10 {
            return Err(AppError::Validation("Maximum 10 tags allowed".to_string()));
        }
        for tag in &tags {
            if tag.trim().len() > 150 {
                return Err(AppError::Validation(
                    "Each tag must be at most 150 characters".to_string(),
                ));
            }
        }

        let photos = self
            .photos
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, p)| PhotoPayload {
                url: p.url,
                position: p.position.unwrap_or(i as i32),
            })
            .collect();

        Ok(PostPayload {
            title: self.title,
            place: PlacePayload {
                name: self.place.name,
                description: self.place.description,
                latitude: self.place.latitude,
                longitude: self.place.longitude,
            },
            tags,
            paragraphs: self
                .paragraphs
                .into_iter()
                .map(|p| ParagraphPayload {
                    position: p.position,
                    content: p.content,
                })
                .collect(),
            photos,
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    security(("jwt_token" = [])),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post created", body = CreatedPostResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "posts"
)]
pub async fn create_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<PostRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let payload = payload.into_payload()?;

    let service = PostService::new(db);
    let id = service.create(user_id, payload).await?;

    Ok(ApiResponse::ok(CreatedPostResponse { id }))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated"),
        (status = 404, description = "Post not found or not owned", body = AppError),
    ),
    tag = "posts"
)]
pub async fn update_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let payload = payload.into_payload()?;

    let service = PostService::new(db);
    service.update(user_id, id, payload).await?;

    Ok(ApiResponse::with_message((), "Post updated".to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Post not found or not owned", body = AppError),
    ),
    tag = "posts"
)]
pub async fn delete_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = PostService::new(db);
    service.delete(user_id, id).await?;

    Ok(ApiResponse::with_message((), "Post deleted".to_string()))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}/place",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = AttachPlaceRequest,
    responses(
        (status = 200, description = "Post attached to place"),
        (status = 404, description = "Post or place not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn attach_post_to_place(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachPlaceRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let service = PostService::new(db);
    service
        .attach_to_place(
            user_id,
            id,
            payload.place_id,
            payload.latitude,
            payload.longitude,
        )
        .await?;

    Ok(ApiResponse::with_message((), "Post attached to place".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostDetail),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn get_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db);
    let detail = service.get(id).await?;
    Ok(ApiResponse::ok(detail))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Public feed", body = PaginatedResponse<PostModel>),
    ),
    tag = "posts"
)]
pub async fn feed(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = PostService::new(db);
    let (posts, total) = service.feed(page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        posts, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/posts",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "User's posts", body = PaginatedResponse<PostModel>),
    ),
    tag = "posts"
)]
pub async fn list_user_posts(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = PostService::new(db);
    let (posts, total) = service.list_by_user(id, page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        posts, total, page, per_page,
    )))
}
