//! Route definitions for the `/movies` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// The static curated paths are matched before `/{id}`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /top_rated            -> top_rated
/// GET    /recent               -> recent
/// GET    /coming_soon          -> coming_soon
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update
/// PATCH  /{id}                 -> update
/// DELETE /{id}                 -> delete (admin only)
/// POST   /{id}/rate            -> rate
/// DELETE /{id}/remove_rating   -> remove_rating
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movie::list).post(movie::create))
        .route("/top_rated", get(movie::top_rated))
        .route("/recent", get(movie::recent))
        .route("/coming_soon", get(movie::coming_soon))
        .route(
            "/{id}",
            get(movie::get_by_id)
                .put(movie::update)
                .patch(movie::update)
                .delete(movie::delete),
        )
        .route("/{id}/rate", post(movie::rate))
        .route("/{id}/remove_rating", delete(movie::remove_rating))
}
