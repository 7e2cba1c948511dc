use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let public_read = public_read_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    public_read.merge(protected)
}

/// Public read routes: feed, post details, comments, follow lists.
fn public_read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Posts
        .route("/posts", routing::get(handlers::post::feed))
        .route("/posts/{id}", routing::get(handlers::post::get_post))
        .route(
            "/users/{id}/posts",
            routing::get(handlers::post::list_user_posts),
        )
        // Likes
        .route("/posts/{id}/likes", routing::get(handlers::like::get_likes))
        // Comments
        .route(
            "/posts/{post_id}/comments",
            routing::get(handlers::comment::list_comments),
        )
        // Reviews
        .route(
            "/places/{id}/reviews",
            routing::get(handlers::review::list_place_reviews),
        )
        // Profiles
        .route(
            "/users/{id}",
            routing::get(handlers::profile::get_public_profile),
        )
        // Follow (public reads)
        .route(
            "/users/{id}/followers",
            routing::get(handlers::follow::list_followers),
        )
        .route(
            "/users/{id}/following",
            routing::get(handlers::follow::list_following),
        );

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Protected routes: every authenticated write plus the moderator console.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Posts
        .route("/posts", routing::post(handlers::post::create_post))
        .route(
            "/posts/{id}",
            routing::put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route(
            "/posts/{id}/place",
            routing::put(handlers::post::attach_post_to_place),
        )
        // Likes
        .route(
            "/posts/{id}/like",
            routing::post(handlers::like::like_post).delete(handlers::like::unlike_post),
        )
        // Favourites
        .route(
            "/posts/{id}/favourite",
            routing::post(handlers::favourite::add_favourite)
                .delete(handlers::favourite::remove_favourite),
        )
        .route(
            "/favourites",
            routing::get(handlers::favourite::list_favourites),
        )
        // Comments
        .route(
            "/posts/{post_id}/comments",
            routing::post(handlers::comment::create_comment),
        )
        .route(
            "/comments/{id}",
            routing::put(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        // Reports (any authenticated user)
        .route(
            "/posts/{id}/report",
            routing::post(handlers::moderation::report_post),
        )
        .route(
            "/comments/{id}/report",
            routing::post(handlers::moderation::report_comment),
        )
        // Reviews
        .route(
            "/reviews",
            routing::post(handlers::review::create_review)
                .get(handlers::review::list_my_reviews),
        )
        .route(
            "/reviews/with-place",
            routing::post(handlers::review::create_review_with_place),
        )
        .route(
            "/reviews/{id}",
            routing::put(handlers::review::update_review)
                .delete(handlers::review::delete_review),
        )
        // Profile
        .route(
            "/profile",
            routing::get(handlers::profile::get_profile)
                .put(handlers::profile::update_profile),
        )
        // Follows
        .route(
            "/users/{id}/follow",
            routing::post(handlers::follow::follow_user)
                .delete(handlers::follow::unfollow_user),
        )
        // Moderator console
        .route(
            "/moderation/complaints",
            routing::get(handlers::moderation::list_complaints),
        )
        .route(
            "/moderation/complaints/{id}",
            routing::put(handlers::moderation::update_complaint_status),
        )
        .route(
            "/moderation/posts/{id}/visibility",
            routing::put(handlers::moderation::toggle_post_visibility),
        )
        .route(
            "/moderation/comments/{id}/visibility",
            routing::put(handlers::moderation::toggle_comment_visibility),
        )
        .route(
            "/moderation/users",
            routing::get(handlers::moderation::users_with_complaints),
        )
        .route(
            "/moderation/users/search",
            routing::get(handlers::moderation::search_users),
        )
        .route(
            "/moderation/users/{id}/block",
            routing::post(handlers::moderation::block_user),
        )
        .route(
            "/moderation/users/{id}/unblock",
            routing::post(handlers::moderation::unblock_user),
        )
        .route(
            "/moderation/users/{id}/moderator",
            routing::post(handlers::moderation::assign_moderator)
                .delete(handlers::moderation::remove_moderator),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
