#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cinema_api::auth::jwt::{generate_access_token, JwtConfig};
use cinema_api::auth::password::hash_password;
use cinema_api::config::ServerConfig;
use cinema_api::router::{build_app_service, AppService};
use cinema_api::state::AppState;
use cinema_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use cinema_core::types::DbId;
use cinema_db::models::user::{CreateUser, User};
use cinema_db::repositories::UserRepo;

/// Role ids seeded by the migrations.
pub const ADMIN_ROLE_ID: DbId = 1;
pub const MEMBER_ROLE_ID: DbId = 2;

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the application service exactly as `main.rs` does, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> AppService {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_service(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Create a user directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role_id: DbId) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        password_hash,
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Sign an access token for `user` without going through login.
pub fn token_for(user: &User) -> String {
    let role = if user.role_id == ADMIN_ROLE_ID {
        ROLE_ADMIN
    } else {
        ROLE_MEMBER
    };
    generate_access_token(user.id, role, &test_config().jwt).expect("token should sign")
}

/// Create an admin and return it with a valid access token.
pub async fn admin_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ADMIN_ROLE_ID).await;
    let token = token_for(&user);
    (user, token)
}

/// Create a member and return it with a valid access token.
pub async fn member_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, MEMBER_ROLE_ID).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: AppService,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request should build");
    app.oneshot(request).await.expect("service is infallible")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn get(app: AppService, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: AppService, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: AppService, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: AppService,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: AppService,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: AppService,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: AppService, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn delete_auth(app: AppService, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a raw body with the given content type (for malformed-input tests).
pub async fn post_raw_auth(
    app: AppService,
    uri: &str,
    content_type: &str,
    body: &'static str,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("request should build");
    app.oneshot(request).await.expect("service is infallible")
}
