mod config;
mod error;
mod handlers;
mod middleware;
mod migration;
mod models;
mod response;
mod routes;
mod services;
mod utils;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Post routes
        crate::handlers::post::feed,
        crate::handlers::post::get_post,
        crate::handlers::post::list_user_posts,
        crate::handlers::post::create_post,
        crate::handlers::post::update_post,
        crate::handlers::post::delete_post,
        crate::handlers::post::attach_post_to_place,
        // Like routes
        crate::handlers::like::like_post,
        crate::handlers::like::unlike_post,
        crate::handlers::like::get_likes,
        // Favourite routes
        crate::handlers::favourite::add_favourite,
        crate::handlers::favourite::remove_favourite,
        crate::handlers::favourite::list_favourites,
        // Comment routes
        crate::handlers::comment::list_comments,
        crate::handlers::comment::create_comment,
        crate::handlers::comment::update_comment,
        crate::handlers::comment::delete_comment,
        // Review routes
        crate::handlers::review::create_review,
        crate::handlers::review::create_review_with_place,
        crate::handlers::review::list_my_reviews,
        crate::handlers::review::list_place_reviews,
        crate::handlers::review::update_review,
        crate::handlers::review::delete_review,
        // Profile routes
        crate::handlers::profile::get_profile,
        crate::handlers::profile::update_profile,
        crate::handlers::profile::get_public_profile,
        // Follow routes
        crate::handlers::follow::follow_user,
        crate::handlers::follow::unfollow_user,
        crate::handlers::follow::list_followers,
        crate::handlers::follow::list_following,
        // Moderation routes
        crate::handlers::moderation::report_post,
        crate::handlers::moderation::report_comment,
        crate::handlers::moderation::list_complaints,
        crate::handlers::moderation::update_complaint_status,
        crate::handlers::moderation::toggle_post_visibility,
        crate::handlers::moderation::toggle_comment_visibility,
        crate::handlers::moderation::block_user,
        crate::handlers::moderation::unblock_user,
        crate::handlers::moderation::assign_moderator,
        crate::handlers::moderation::remove_moderator,
        crate::handlers::moderation::users_with_complaints,
        crate::handlers::moderation::search_users,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::response::PaginatedResponse<serde_json::Value>,
            crate::response::PaginationQuery,
            crate::error::AppError,
            // Post
            crate::handlers::post::PostRequest,
            crate::handlers::post::PlaceRequest,
            crate::handlers::post::ParagraphRequest,
            crate::handlers::post::PhotoRequest,
            crate::handlers::post::AttachPlaceRequest,
            crate::handlers::post::CreatedPostResponse,
            crate::services::post::PostDetail,
            // Like
            crate::handlers::like::LikeStatusResponse,
            // Comment
            crate::handlers::comment::CreateCommentRequest,
            crate::handlers::comment::UpdateCommentRequest,
            // Review
            crate::handlers::review::CreateReviewRequest,
            crate::handlers::review::CreateReviewWithPlaceRequest,
            crate::handlers::review::UpdateReviewRequest,
            crate::services::review::ReviewListItem,
            // Profile
            crate::handlers::profile::UpdateProfileRequest,
            crate::handlers::profile::PublicProfile,
            // Moderation
            crate::handlers::moderation::ReportRequest,
            crate::handlers::moderation::UpdateComplaintStatusRequest,
            crate::handlers::moderation::VisibilityRequest,
            crate::services::moderation::ComplaintListItem,
            crate::services::moderation::UserComplaintSummary,
            // Models surfaced directly
            crate::models::PostModel,
            crate::models::PlaceModel,
            crate::models::ParagraphModel,
            crate::models::PhotoModel,
            crate::models::TagModel,
            crate::models::CommentModel,
            crate::models::ComplaintModel,
            crate::models::ComplaintStatus,
            crate::models::ComplaintType,
            crate::models::ReviewModel,
            crate::models::UserModel,
        )
    ),
    tags(
        (name = "posts", description = "Post aggregate operations"),
        (name = "likes", description = "Like operations"),
        (name = "favourites", description = "Favourite operations"),
        (name = "comments", description = "Comment operations"),
        (name = "reviews", description = "Place review operations"),
        (name = "profile", description = "User profile operations"),
        (name = "follows", description = "Follow operations"),
        (name = "moderation", description = "Complaints and moderator console"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfare=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let jwt_config = validate_config()?;
    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting Wayfare API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app().layer(Extension(db));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<crate::config::jwt::JwtConfig> {
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    // DATABASE_URL is checked here so startup fails before binding the listener
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    Ok(jwt_config)
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Wayfare API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
