//! Error envelope and input rejection behaviour.
//!
//! Every failure must come back as `{ "error": ..., "code": ... }` JSON,
//! including malformed bodies, bad query strings and non-numeric ids.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, member_with_token, post_json_auth, post_raw_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_entity_is_404_with_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/genres/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("999999"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_path_id_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/movies/not-a-number").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_body_is_400(pool: PgPool) {
    let (_user, token) = member_with_token(&pool, "sloppy").await;
    let app = common::build_test_app(pool);

    let response = post_raw_auth(
        app,
        "/api/genres",
        "application/json",
        "{\"name\": ",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_content_type_is_rejected_with_json(pool: PgPool) {
    let (_user, token) = member_with_token(&pool, "texter").await;
    let app = common::build_test_app(pool);

    let response = post_raw_auth(app, "/api/genres", "text/plain", "Drama", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_query_parameter_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/movies?limit=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_ordering_is_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/movies?ordering=director").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn validator_failure_is_validation_error(pool: PgPool) {
    let (_user, token) = member_with_token(&pool, "blank").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/genres", json!({ "name": "" }), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_without_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json(app, "/api/genres", json!({ "name": "Noir" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}
