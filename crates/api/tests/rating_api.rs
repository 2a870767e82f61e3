//! HTTP-level integration tests for `/api/ratings`.
//!
//! Every route is scoped to the caller, so another user's rating must look
//! exactly like a missing one.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, member_with_token, patch_json_auth, post_json_auth,
    put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_movie(pool: &PgPool, token: &str, title: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = json!({
        "title": title,
        "synopsis": "",
        "duration_minutes": 100,
        "release_date": "2020-02-02",
        "director": "Director",
        "cast": "",
    });
    let response = post_json_auth(app, "/api/movies", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn post_rating(pool: &PgPool, token: &str, body: Value) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/ratings", body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_upserts_with_movie_in_body(pool: PgPool) {
    let (user, token) = member_with_token(&pool, "rater").await;
    let movie = create_movie(&pool, &token, "Body Movie").await;

    let (status, json) = post_rating(&pool, &token, json!({ "movie": movie, "rating": 4 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["rating"], 4);
    assert_eq!(json["data"]["user"]["id"], user.id);
    let rating_id = json["data"]["id"].clone();

    let (status, json) = post_rating(&pool, &token, json!({ "movie": movie, "rating": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], rating_id, "upsert keeps the same row");
    assert_eq!(json["data"]["rating"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_with_unknown_movie_is_400(pool: PgPool) {
    let (_user, token) = member_with_token(&pool, "rater").await;

    let (status, json) = post_rating(&pool, &token, json!({ "movie": 987654, "rating": 3 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_with_out_of_range_rating_is_400(pool: PgPool) {
    let (_user, token) = member_with_token(&pool, "rater").await;
    let movie = create_movie(&pool, &token, "Range").await;

    let (status, _) = post_rating(&pool, &token, json!({ "movie": movie, "rating": 9 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_shows_only_own_ratings_with_filters(pool: PgPool) {
    let (_me, my_token) = member_with_token(&pool, "me").await;
    let (_other, other_token) = member_with_token(&pool, "other").await;
    let first = create_movie(&pool, &my_token, "First").await;
    let second = create_movie(&pool, &my_token, "Second").await;

    post_rating(&pool, &my_token, json!({ "movie": first, "rating": 5 })).await;
    post_rating(&pool, &my_token, json!({ "movie": second, "rating": 3 })).await;
    post_rating(&pool, &other_token, json!({ "movie": first, "rating": 1 })).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/ratings", &my_token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/ratings?movie={first}");
    let json = body_json(get_auth(app, &uri, &my_token).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["rating"], 5);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/ratings?rating=3", &my_token).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["movie_id"], second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    assert_eq!(get(app, "/api/ratings").await.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_rating_is_404_for_every_verb(pool: PgPool) {
    let (_owner, owner_token) = member_with_token(&pool, "owner").await;
    let (_snoop, snoop_token) = member_with_token(&pool, "snoop").await;
    let movie = create_movie(&pool, &owner_token, "Private").await;
    let (_, json) = post_rating(&pool, &owner_token, json!({ "movie": movie, "rating": 4 })).await;
    let uri = format!("/api/ratings/{}", json["data"]["id"]);

    let app = common::build_test_app(pool.clone());
    assert_eq!(get_auth(app, &uri, &snoop_token).await.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "rating": 1 }), &snoop_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &snoop_token).await.status(), StatusCode::NOT_FOUND);

    // Untouched for the owner.
    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &uri, &owner_token).await).await;
    assert_eq!(json["data"]["rating"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_updates_and_deletes(pool: PgPool) {
    let (_owner, token) = member_with_token(&pool, "owner").await;
    let movie = create_movie(&pool, &token, "Mine").await;
    let (_, json) = post_rating(&pool, &token, json!({ "movie": movie, "rating": 4 })).await;
    let uri = format!("/api/ratings/{}", json["data"]["id"]);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(app, &uri, json!({ "rating": "2" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["rating"], 2);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "rating": 0 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}
