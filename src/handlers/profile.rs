use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::profile::{ProfilePatch, ProfileService};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    /// Empty string clears the bio
    #[validate(length(max = 150))]
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// What other users see; email stays private to the account owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProfile {
    pub id: i32,
    pub username: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub role_id: i32,
}

impl From<UserModel> for PublicProfile {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            bio: user.bio,
            avatar_url: user.avatar_url,
            role_id: user.role_id,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's full profile", body = UserModel),
    ),
    tag = "profile"
)]
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let user = ProfileService::new(db).get(user_id).await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    security(("jwt_token" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserModel),
        (status = 409, description = "Username already taken", body = AppError),
    ),
    tag = "profile"
)]
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user_id = parse_user_id(&auth_user)?;

    let user = ProfileService::new(db)
        .update(
            user_id,
            ProfilePatch {
                username: payload.username,
                bio: payload.bio,
                avatar_url: payload.avatar_url,
            },
        )
        .await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "profile"
)]
pub async fn get_public_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user = ProfileService::new(db).get(id).await?;
    Ok(ApiResponse::ok(PublicProfile::from(user)))
}
