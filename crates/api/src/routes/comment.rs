//! Route definitions for the `/comments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update (author only)
/// PATCH  /{id}  -> update (author only)
/// DELETE /{id}  -> delete (author or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comment::list).post(comment::create))
        .route(
            "/{id}",
            get(comment::get_by_id)
                .put(comment::update)
                .patch(comment::update)
                .delete(comment::delete),
        )
}
