//! Handlers for the `/genres` resource.
//!
//! Reads are public. Creating and editing need an authenticated user;
//! deleting needs an admin.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinema_core::catalog::GenreOrdering;
use cinema_core::error::CoreError;
use cinema_core::types::DbId;
use cinema_db::models::genre::{CreateGenre, Genre, GenreListParams, UpdateGenre};
use cinema_db::repositories::GenreRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Genre", id })
}

/// GET /api/genres
///
/// `?search=` matches the name case-insensitively; `?ordering=name|-name`.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<GenreListParams>,
) -> AppResult<Json<DataResponse<Vec<Genre>>>> {
    let ordering = GenreOrdering::parse(params.ordering.as_deref())?;
    let genres = GenreRepo::list(&state.pool, params.search.as_deref(), ordering).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// POST /api/genres
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppJson(mut input): AppJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<DataResponse<Genre>>)> {
    input.normalize();
    input.validate()?;
    let genre = GenreRepo::create(&state.pool, &input).await?;

    tracing::info!(genre_id = genre.id, user_id = auth.user_id, name = %genre.name, "Genre created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// GET /api/genres/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Genre>>> {
    let genre = GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: genre }))
}

/// PUT/PATCH /api/genres/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(mut input): AppJson<UpdateGenre>,
) -> AppResult<Json<DataResponse<Genre>>> {
    input.normalize();
    input.validate()?;
    let genre = GenreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(genre_id = id, user_id = auth.user_id, "Genre updated");
    Ok(Json(DataResponse { data: genre }))
}

/// DELETE /api/genres/{id}
///
/// Movies tagged with the genre keep existing; only the link is removed.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !GenreRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(genre_id = id, admin_id = admin.user_id, "Genre deleted");
    Ok(StatusCode::NO_CONTENT)
}
