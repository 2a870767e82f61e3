//! Handlers for the `/ratings` resource.
//!
//! Every route is scoped to the caller: another user's rating is reported
//! as missing rather than forbidden.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinema_core::error::CoreError;
use cinema_core::rating::coerce_rating;
use cinema_core::types::DbId;
use cinema_db::models::rating::{RatingListParams, RatingView};
use cinema_db::repositories::{MovieRepo, RatingRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::movie::upsert_rating;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/ratings`.
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    #[serde(alias = "movie_id")]
    pub movie: DbId,
    pub rating: Option<serde_json::Value>,
}

/// Request body for `PUT/PATCH /api/ratings/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: Option<serde_json::Value>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Rating", id })
}

/// GET /api/ratings
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppQuery(params): AppQuery<RatingListParams>,
) -> AppResult<Json<DataResponse<Vec<RatingView>>>> {
    let rows = RatingRepo::list_for_user(&state.pool, auth.user_id, &params).await?;
    let data = rows.into_iter().map(RatingView::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/ratings
///
/// Same upsert as `POST /api/movies/{id}/rate`, with the movie in the body.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppJson(input): AppJson<CreateRatingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RatingView>>)> {
    let value = coerce_rating(input.rating.as_ref())?;
    if MovieRepo::find_active(&state.pool, input.movie).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid movie id {}",
            input.movie
        ))));
    }
    upsert_rating(&state.pool, input.movie, auth.user_id, value).await
}

/// GET /api/ratings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<RatingView>>> {
    let row = RatingRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// PUT/PATCH /api/ratings/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateRatingRequest>,
) -> AppResult<Json<DataResponse<RatingView>>> {
    let value = coerce_rating(input.rating.as_ref())?;
    RatingRepo::update_owned(&state.pool, id, auth.user_id, value)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(rating_id = id, user_id = auth.user_id, rating = value, "Rating updated");

    let row = RatingRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// DELETE /api/ratings/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !RatingRepo::delete_owned(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }
    tracing::info!(rating_id = id, user_id = auth.user_id, "Rating deleted");
    Ok(StatusCode::NO_CONTENT)
}
