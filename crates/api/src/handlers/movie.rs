//! Handlers for the `/movies` resource, its curated views and the
//! per-movie rating actions.

use std::collections::HashSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cinema_core::catalog::{CuratedView, MovieOrdering};
use cinema_core::error::CoreError;
use cinema_core::rating::{coerce_rating, RatingOutcome, RatingStats};
use cinema_core::types::DbId;
use cinema_db::models::comment::{CommentListParams, CommentView};
use cinema_db::models::movie::{
    CreateMovie, Movie, MovieDetail, MovieListItem, MovieListParams, MovieWithStats, UpdateMovie,
};
use cinema_db::models::rating::RatingView;
use cinema_db::repositories::{CommentRepo, GenreRepo, MovieRepo, RatingRepo};
use cinema_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /movies/{id}/rate`.
///
/// `rating` stays raw JSON so integer strings can be coerced and every
/// malformed shape reports the same validation message.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

/// Load an active movie or fail with 404.
pub(crate) async fn require_active_movie(pool: &DbPool, id: DbId) -> AppResult<Movie> {
    MovieRepo::find_active(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Reject genre ids that do not exist with a 400.
async fn ensure_genres_exist(pool: &DbPool, genre_ids: &[DbId]) -> AppResult<()> {
    let wanted: HashSet<DbId> = genre_ids.iter().copied().collect();
    let wanted: Vec<DbId> = wanted.into_iter().collect();
    let found: HashSet<DbId> = GenreRepo::existing_ids(pool, &wanted)
        .await?
        .into_iter()
        .collect();

    let mut missing: Vec<DbId> = wanted.into_iter().filter(|id| !found.contains(id)).collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort_unstable();
    let listed: Vec<String> = missing.iter().map(ToString::to_string).collect();
    Err(AppError::Core(CoreError::Validation(format!(
        "Unknown genre id(s): {}",
        listed.join(", ")
    ))))
}

/// Attach genres to a batch of rows, preserving row order.
async fn to_list_items(
    pool: &DbPool,
    rows: Vec<MovieWithStats>,
) -> AppResult<Vec<MovieListItem>> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.movie.id).collect();
    let mut genres = MovieRepo::genres_by_movie(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let movie_genres = genres.remove(&row.movie.id).unwrap_or_default();
            MovieListItem::new(row, movie_genres)
        })
        .collect())
}

/// Assemble the detail shape around `movie` as seen by `viewer`.
async fn assemble_detail(
    pool: &DbPool,
    movie: Movie,
    stats: RatingStats,
    viewer: Option<DbId>,
) -> AppResult<MovieDetail> {
    let id = movie.id;
    let genres = MovieRepo::genres_for_movie(pool, id).await?;
    let user_rating = match viewer {
        Some(user_id) => RatingRepo::find_for_movie_user(pool, id, user_id)
            .await?
            .map(|r| r.rating),
        None => None,
    };
    let comments: Vec<CommentView> =
        CommentRepo::list_active(pool, &CommentListParams { movie: Some(id) })
            .await?
            .into_iter()
            .map(CommentView::from)
            .collect();
    let comments_count = CommentRepo::count_active_for_movie(pool, id).await?;

    Ok(MovieDetail {
        movie,
        genres,
        average_rating: stats.average_rating,
        total_ratings: stats.total_ratings,
        user_rating,
        comments,
        comments_count,
    })
}

/// Run the rating upsert and shape the response.
///
/// 201 when the rating was created, 200 when an existing one was overwritten.
pub(crate) async fn upsert_rating(
    pool: &DbPool,
    movie_id: DbId,
    user_id: DbId,
    value: i16,
) -> AppResult<(StatusCode, Json<DataResponse<RatingView>>)> {
    let upserted = RatingRepo::upsert(pool, movie_id, user_id, value).await?;
    let outcome = RatingOutcome::from_created(upserted.created);

    let view = RatingRepo::find_owned(pool, upserted.rating.id, user_id)
        .await?
        .map(RatingView::from)
        .ok_or_else(|| AppError::InternalError("Upserted rating vanished".into()))?;

    tracing::info!(
        rating_id = view.id,
        movie_id,
        user_id,
        rating = value,
        outcome = ?outcome,
        "Movie rated"
    );

    let status = match outcome {
        RatingOutcome::Created => StatusCode::CREATED,
        RatingOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/movies
///
/// Active movies in the compact list shape.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<MovieListParams>,
) -> AppResult<Json<DataResponse<Vec<MovieListItem>>>> {
    let ordering = MovieOrdering::parse(params.ordering.as_deref())?;
    let rows = MovieRepo::list(&state.pool, &params, ordering).await?;
    let data = to_list_items(&state.pool, rows).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/movies
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppJson(input): AppJson<CreateMovie>,
) -> AppResult<(StatusCode, Json<DataResponse<MovieDetail>>)> {
    input.validate()?;
    ensure_genres_exist(&state.pool, &input.genre_ids).await?;

    let movie = MovieRepo::create(&state.pool, &input).await?;
    tracing::info!(movie_id = movie.id, user_id = auth.user_id, title = %movie.title, "Movie created");

    // A new movie has no ratings yet.
    let stats = RatingStats::from_totals(None, 0);
    let detail = assemble_detail(&state.pool, movie, stats, Some(auth.user_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/movies/{id}
///
/// Full detail. An authenticated caller also sees their own `user_rating`.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<MovieDetail>>> {
    let row = MovieRepo::find_active_with_stats(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let stats = row.stats();
    let detail =
        assemble_detail(&state.pool, row.movie, stats, auth.map(|a| a.user_id)).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT/PATCH /api/movies/{id}
///
/// `genre_ids`, when present, replaces the whole genre set.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateMovie>,
) -> AppResult<Json<DataResponse<MovieDetail>>> {
    input.validate()?;
    if let Some(ref genre_ids) = input.genre_ids {
        ensure_genres_exist(&state.pool, genre_ids).await?;
    }

    let movie = MovieRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(movie_id = id, user_id = auth.user_id, "Movie updated");

    let values = RatingRepo::values_for_movie(&state.pool, id).await?;
    let stats = RatingStats::from_values(&values);
    let detail = assemble_detail(&state.pool, movie, stats, Some(auth.user_id)).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/movies/{id}
///
/// Physical delete; ratings and comments go with the movie.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    require_active_movie(&state.pool, id).await?;
    if !MovieRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(movie_id = id, admin_id = admin.user_id, "Movie deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Curated views
// ---------------------------------------------------------------------------

async fn curated(
    state: &AppState,
    view: CuratedView,
) -> AppResult<Json<DataResponse<Vec<MovieListItem>>>> {
    let today = Utc::now().date_naive();
    let rows = MovieRepo::curated(&state.pool, view, today).await?;
    let data = to_list_items(&state.pool, rows).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/movies/top_rated
///
/// Up to ten rated movies, best average first.
pub async fn top_rated(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MovieListItem>>>> {
    curated(&state, CuratedView::TopRated).await
}

/// GET /api/movies/recent
pub async fn recent(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MovieListItem>>>> {
    curated(&state, CuratedView::Recent).await
}

/// GET /api/movies/coming_soon
pub async fn coming_soon(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MovieListItem>>>> {
    curated(&state, CuratedView::ComingSoon).await
}

// ---------------------------------------------------------------------------
// Rating actions
// ---------------------------------------------------------------------------

/// POST /api/movies/{id}/rate
///
/// Body `{ "rating": 1..=5 }`. Creates the caller's rating (201) or
/// overwrites it (200).
pub async fn rate(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<RateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RatingView>>)> {
    require_active_movie(&state.pool, id).await?;
    let value = coerce_rating(input.rating.as_ref())?;
    upsert_rating(&state.pool, id, auth.user_id, value).await
}

/// DELETE /api/movies/{id}/remove_rating
///
/// 204 when the caller's rating was removed, 404 when there was none.
pub async fn remove_rating(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    require_active_movie(&state.pool, id).await?;
    if !RatingRepo::remove_for_movie_user(&state.pool, id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Rating for movie",
            id,
        }));
    }
    tracing::info!(movie_id = id, user_id = auth.user_id, "Rating removed");
    Ok(StatusCode::NO_CONTENT)
}
