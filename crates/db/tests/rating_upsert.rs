//! Integration tests for the rating upsert and its aggregates.
//!
//! - one row per (movie, user), second write reports an update
//! - concurrent writes for the same pair never duplicate
//! - removal and the not-found path
//! - averages computed from live rows, `None` when unrated

use chrono::NaiveDate;
use cinema_core::rating::{RatingOutcome, RatingStats};
use cinema_db::models::movie::CreateMovie;
use cinema_db::models::rating::RatingListParams;
use cinema_db::models::user::CreateUser;
use cinema_db::repositories::{MovieRepo, RatingRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "not-a-real-hash".to_string(),
        role_id: 2,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn new_movie(pool: &PgPool, title: &str) -> i64 {
    let input = CreateMovie {
        title: title.to_string(),
        synopsis: "A synopsis".to_string(),
        duration_minutes: 120,
        release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        director: "Someone".to_string(),
        cast_text: "Various".to_string(),
        poster_path: None,
        trailer_url: None,
        is_active: None,
        genre_ids: vec![],
    };
    MovieRepo::create(pool, &input).await.unwrap().id
}

async fn row_count(pool: &PgPool, movie_id: i64, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE movie_id = $1 AND user_id = $2")
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_rating_is_created_second_is_updated(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let movie = new_movie(&pool, "Heat").await;

    let first = RatingRepo::upsert(&pool, movie, user, 4).await.unwrap();
    assert_eq!(RatingOutcome::from_created(first.created), RatingOutcome::Created);
    assert_eq!(first.rating.rating, 4);

    let second = RatingRepo::upsert(&pool, movie, user, 2).await.unwrap();
    assert_eq!(RatingOutcome::from_created(second.created), RatingOutcome::Updated);
    assert_eq!(second.rating.id, first.rating.id);
    assert_eq!(second.rating.rating, 2);

    assert_eq!(row_count(&pool, movie, user).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_value_twice_is_idempotent(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let movie = new_movie(&pool, "Heat").await;

    RatingRepo::upsert(&pool, movie, user, 5).await.unwrap();
    let again = RatingRepo::upsert(&pool, movie, user, 5).await.unwrap();

    assert!(!again.created);
    assert_eq!(again.rating.rating, 5);
    assert_eq!(row_count(&pool, movie, user).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_upserts_leave_one_row(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let movie = new_movie(&pool, "Heat").await;

    let (a, b) = tokio::join!(
        RatingRepo::upsert(&pool, movie, user, 3),
        RatingRepo::upsert(&pool, movie, user, 5),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    // Exactly one of the two inserted the row.
    assert_ne!(a.created, b.created);
    assert_eq!(a.rating.id, b.rating.id);
    assert_eq!(row_count(&pool, movie, user).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraint_rejects_out_of_range(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let movie = new_movie(&pool, "Heat").await;

    let err = RatingRepo::upsert(&pool, movie, user, 6).await.unwrap_err();
    let code = err.as_database_error().and_then(|e| e.code()).unwrap();
    assert_eq!(code, "23514");
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_then_remove_again(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let movie = new_movie(&pool, "Heat").await;

    assert!(!RatingRepo::remove_for_movie_user(&pool, movie, user).await.unwrap());

    RatingRepo::upsert(&pool, movie, user, 3).await.unwrap();
    assert!(RatingRepo::remove_for_movie_user(&pool, movie, user).await.unwrap());
    assert!(!RatingRepo::remove_for_movie_user(&pool, movie, user).await.unwrap());
    assert!(RatingRepo::find_for_movie_user(&pool, movie, user)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_movie_delete_cascades_to_ratings(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let movie = new_movie(&pool, "Heat").await;
    RatingRepo::upsert(&pool, movie, user, 3).await.unwrap();

    assert!(MovieRepo::delete(&pool, movie).await.unwrap());
    assert_eq!(row_count(&pool, movie, user).await, 0);
}

// ---------------------------------------------------------------------------
// Ownership scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owned_access_is_scoped_to_user(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let movie = new_movie(&pool, "Heat").await;

    let rating = RatingRepo::upsert(&pool, movie, alice, 4).await.unwrap().rating;

    assert!(RatingRepo::find_owned(&pool, rating.id, bob).await.unwrap().is_none());
    assert!(RatingRepo::update_owned(&pool, rating.id, bob, 1).await.unwrap().is_none());
    assert!(!RatingRepo::delete_owned(&pool, rating.id, bob).await.unwrap());

    let found = RatingRepo::find_owned(&pool, rating.id, alice).await.unwrap().unwrap();
    assert_eq!(found.username, "alice");

    let updated = RatingRepo::update_owned(&pool, rating.id, alice, 1).await.unwrap().unwrap();
    assert_eq!(updated.rating, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_user_filters(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let heat = new_movie(&pool, "Heat").await;
    let ronin = new_movie(&pool, "Ronin").await;

    RatingRepo::upsert(&pool, heat, alice, 5).await.unwrap();
    RatingRepo::upsert(&pool, ronin, alice, 3).await.unwrap();
    RatingRepo::upsert(&pool, heat, bob, 1).await.unwrap();

    let all = RatingRepo::list_for_user(&pool, alice, &RatingListParams::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|r| r.rating.user_id == alice));

    let by_movie = RatingRepo::list_for_user(
        &pool,
        alice,
        &RatingListParams {
            movie: Some(ronin),
            rating: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(by_movie.len(), 1);
    assert_eq!(by_movie[0].rating.rating, 3);

    let by_value = RatingRepo::list_for_user(
        &pool,
        alice,
        &RatingListParams {
            movie: None,
            rating: Some(5),
        },
    )
    .await
    .unwrap();
    assert_eq!(by_value.len(), 1);
    assert_eq!(by_value[0].rating.movie_id, heat);
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unrated_movie_has_no_average(pool: PgPool) {
    let movie = new_movie(&pool, "Heat").await;

    let row = MovieRepo::find_active_with_stats(&pool, movie).await.unwrap().unwrap();
    let stats = row.stats();
    assert_eq!(stats.average_rating, None);
    assert_eq!(stats.total_ratings, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_average_tracks_live_rows(pool: PgPool) {
    let movie = new_movie(&pool, "Heat").await;
    let mut users = Vec::new();
    for (name, value) in [("a", 5), ("b", 4), ("c", 4)] {
        let user = new_user(&pool, name).await;
        RatingRepo::upsert(&pool, movie, user, value).await.unwrap();
        users.push(user);
    }

    let stats = MovieRepo::find_active_with_stats(&pool, movie)
        .await
        .unwrap()
        .unwrap()
        .stats();
    assert_eq!(stats.average_rating, Some(13.0 / 3.0));
    assert_eq!(stats.total_ratings, 3);

    let values = RatingRepo::values_for_movie(&pool, movie).await.unwrap();
    assert_eq!(RatingStats::from_values(&values), stats);

    // Overwrite and remove; the aggregate follows.
    RatingRepo::upsert(&pool, movie, users[0], 1).await.unwrap();
    RatingRepo::remove_for_movie_user(&pool, movie, users[1]).await.unwrap();
    let stats = MovieRepo::find_active_with_stats(&pool, movie)
        .await
        .unwrap()
        .unwrap()
        .stats();
    assert_eq!(stats.average_rating, Some(2.5));
    assert_eq!(stats.total_ratings, 2);
}
