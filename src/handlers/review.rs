use crate::error::{AppError, AppResult};
use crate::handlers::post::PlaceRequest;
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::ReviewModel;
use crate::response::ApiResponse;
use crate::services::post::PlacePayload;
use crate::services::review::{ReviewListItem, ReviewPatch, ReviewPayload, ReviewService};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    /// Place being reviewed
    pub place_id: Uuid,
    /// 1 to 5 stars
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 1000))]
    pub content: Option<String>,
    /// Defaults to public
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewWithPlaceRequest {
    #[validate(nested)]
    pub place: PlaceRequest,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 1000))]
    pub content: Option<String>,
    pub is_public: Option<bool>,
    /// Attach the review to this post's place instead of creating one
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 1000))]
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    security(("jwt_token" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ReviewModel),
        (status = 404, description = "Place not found", body = AppError),
        (status = 409, description = "Place already reviewed by this user", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn create_review(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let review = ReviewService::new(db)
        .create(
            user_id,
            payload.place_id,
            ReviewPayload {
                rating: payload.rating,
                content: payload.content.unwrap_or_default(),
                is_public: payload.is_public.unwrap_or(true),
            },
        )
        .await?;
    Ok(ApiResponse::ok(review))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews/with-place",
    security(("jwt_token" = [])),
    request_body = CreateReviewWithPlaceRequest,
    responses(
        (status = 200, description = "Place and review created", body = ReviewModel),
        (status = 404, description = "Referenced post not found", body = AppError),
        (status = 409, description = "Place already reviewed by this user", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn create_review_with_place(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateReviewWithPlaceRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let review = ReviewService::new(db)
        .create_with_place(
            user_id,
            PlacePayload {
                name: payload.place.name,
                description: payload.place.description,
                latitude: payload.place.latitude,
                longitude: payload.place.longitude,
            },
            ReviewPayload {
                rating: payload.rating,
                content: payload.content.unwrap_or_default(),
                is_public: payload.is_public.unwrap_or(true),
            },
            payload.post_id,
        )
        .await?;
    Ok(ApiResponse::ok(review))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's reviews, private included", body = Vec<ReviewListItem>),
    ),
    tag = "reviews"
)]
pub async fn list_my_reviews(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let reviews = ReviewService::new(db).list_for_user(user_id).await?;
    Ok(ApiResponse::ok(reviews))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{id}/reviews",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Public reviews of the place", body = Vec<ReviewListItem>),
    ),
    tag = "reviews"
)]
pub async fn list_place_reviews(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let reviews = ReviewService::new(db).list_for_place(id).await?;
    Ok(ApiResponse::ok(reviews))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewModel),
        (status = 404, description = "Review not found or not owned", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn update_review(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let review = ReviewService::new(db)
        .update(
            user_id,
            id,
            ReviewPatch {
                rating: payload.rating,
                content: payload.content,
                is_public: payload.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::ok(review))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    security(("jwt_token" = [])),
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found or not owned", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    ReviewService::new(db).delete(user_id, id).await?;
    Ok(ApiResponse::with_message((), "Review deleted".to_string()))
}
