#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};
use uuid::Uuid;
use wayfare::models::user;

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // The suite fires requests far faster than the default limits allow
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = wayfare::config::jwt::JwtConfig::from_env().unwrap();
        let _ = wayfare::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

/// Spin up the app against the test database, or None when no database is
/// configured (so the suite can run in environments without Postgres).
pub async fn spawn_app() -> Option<TestApp> {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Migrate and wipe once per test binary; tests inside a binary run in
    // parallel, so they isolate through unique users instead of cleanup.
    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        wayfare::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        cleanup_tables(&db).await;
    }

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(wayfare::routes::create_routes())
        .layer(axum::extract::Extension(db.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    Some(TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    })
}

/// Prints the standard skip notice. Call when spawn_app returns None.
pub fn skip_notice(test: &str) {
    eprintln!("skipping {test}: DATABASE_URL not set");
}

async fn cleanup_tables(db: &DatabaseConnection) {
    // Reverse dependency order
    let tables = [
        "reviews",
        "complaints",
        "follows",
        "favourites",
        "comments",
        "likes",
        "place_tags",
        "tags",
        "paragraphs",
        "photos",
        "posts",
        "places",
        "users",
    ];
    for table in tables {
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                format!("DELETE FROM {}", table),
            ))
            .await;
    }
}

/// Insert a user directly (tokens come from the shared secret; there is no
/// register endpoint). Returns (user_id, bearer token).
pub async fn create_test_user(app: &TestApp, prefix: &str) -> (i32, String) {
    create_user_with_role(app, prefix, user::ROLE_MEMBER).await
}

pub async fn create_moderator(app: &TestApp, prefix: &str) -> (i32, String) {
    create_user_with_role(app, prefix, user::ROLE_MODERATOR).await
}

async fn create_user_with_role(app: &TestApp, prefix: &str, role_id: i32) -> (i32, String) {
    let n = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let username = format!("{}_{}", prefix, n);

    let created = user::ActiveModel {
        username: Set(username.clone()),
        email: Set(format!("{}@example.com", username)),
        role_id: Set(role_id),
        is_blocked: Set(false),
        bio: Set(None),
        avatar_url: Set(None),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .expect("Failed to insert test user");

    let token = wayfare::utils::jwt::encode_access_token(&created.id.to_string())
        .expect("Failed to mint test token");
    (created.id, token)
}

/// Create a post through the API and return its id.
pub async fn create_test_post(app: &TestApp, token: &str, title: &str) -> Uuid {
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "place": {
                "name": "Test Place",
                "description": "A spot worth sharing",
                "latitude": 59.93,
                "longitude": 30.31
            },
            "tags": ["test"],
            "paragraphs": [
                { "position": 0, "content": "First paragraph" },
                { "position": 1, "content": "Second paragraph" }
            ],
            "photos": [
                { "url": "https://example.com/a.jpg", "position": 0 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "create post failed");
    let body: serde_json::Value = resp.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}
