//! Handlers for the `/comments` resource.
//!
//! Hidden comments are invisible to every route here, including to their
//! author.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinema_core::comments::{ensure_can_edit, ensure_can_hide};
use cinema_core::error::CoreError;
use cinema_core::types::DbId;
use cinema_db::models::comment::{
    CommentListParams, CommentView, CommentWithUser, CreateComment, UpdateComment,
};
use cinema_db::repositories::{CommentRepo, MovieRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Comment", id })
}

/// GET /api/comments
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CommentListParams>,
) -> AppResult<Json<DataResponse<Vec<CommentView>>>> {
    let rows = CommentRepo::list_active(&state.pool, &params).await?;
    let data = rows.into_iter().map(CommentView::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/comments
///
/// The author is always the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentView>>)> {
    input.validate()?;
    if MovieRepo::find_active(&state.pool, input.movie_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid movie id {}",
            input.movie_id
        ))));
    }

    let comment = CommentRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        comment_id = comment.id,
        movie_id = comment.movie_id,
        user_id = auth.user_id,
        "Comment created"
    );

    let row = CommentRepo::find_active(&state.pool, comment.id)
        .await?
        .ok_or_else(|| not_found(comment.id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row.into() })))
}

/// GET /api/comments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CommentView>>> {
    let row = CommentRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// PUT/PATCH /api/comments/{id}
///
/// Author only. Admins moderate by deleting, not by editing.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateComment>,
) -> AppResult<Json<DataResponse<CommentView>>> {
    let existing = CommentRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_can_edit(existing.comment.user_id, auth.user_id)?;
    input.validate()?;

    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(comment_id = id, user_id = auth.user_id, "Comment updated");

    let row = CommentWithUser { comment, ..existing };
    Ok(Json(DataResponse { data: row.into() }))
}

/// DELETE /api/comments/{id}
///
/// Hides the comment. Allowed for the author and for admins.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let existing = CommentRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_can_hide(existing.comment.user_id, auth.user_id, &auth.role)?;

    if !CommentRepo::deactivate(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(
        comment_id = id,
        user_id = auth.user_id,
        owner_id = existing.comment.user_id,
        "Comment hidden"
    );
    Ok(StatusCode::NO_CONTENT)
}
