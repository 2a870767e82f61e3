pub mod admin;
pub mod auth;
pub mod comment;
pub mod genre;
pub mod health;
pub mod movie;
pub mod rating;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /admin/users                         list, create (admin only)
///
/// /genres                              list (public), create (auth)
/// /genres/{id}                         get (public), update (auth), delete (admin)
///
/// /movies                              list (public), create (auth)
/// /movies/top_rated                    ten best rated (public)
/// /movies/recent                       ten latest released (public)
/// /movies/coming_soon                  ten next to release (public)
/// /movies/{id}                         detail (public), update (auth), delete (admin)
/// /movies/{id}/rate                    rate or re-rate (POST, auth)
/// /movies/{id}/remove_rating           remove own rating (DELETE, auth)
///
/// /ratings                             list own, create (auth)
/// /ratings/{id}                        get, update, delete own (auth)
///
/// /comments                            list (public), create (auth)
/// /comments/{id}                       get (public), update (owner), delete (owner or admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/genres", genre::router())
        .nest("/movies", movie::router())
        .nest("/ratings", rating::router())
        .nest("/comments", comment::router())
}
