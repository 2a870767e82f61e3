//! Route definitions for the `/ratings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::rating;
use crate::state::AppState;

/// Routes mounted at `/ratings`. All require auth and only see the
/// caller's own ratings.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// PATCH  /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rating::list).post(rating::create))
        .route(
            "/{id}",
            get(rating::get_by_id)
                .put(rating::update)
                .patch(rating::update)
                .delete(rating::delete),
        )
}
