//! Movie entity model, aggregate read models and DTOs.

use cinema_core::rating::RatingStats;
use cinema_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::comment::CommentView;
use crate::models::genre::Genre;
use crate::models::{blank_as_none, clearable};

/// A movie row from the `movies` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub synopsis: String,
    pub duration_minutes: i32,
    pub release_date: Date,
    pub director: String,
    pub cast_text: String,
    pub poster_path: Option<String>,
    pub trailer_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A movie joined with the raw rating totals computed at query time.
///
/// `rating_sum` is NULL when the movie has no ratings.
#[derive(Debug, Clone, FromRow)]
pub struct MovieWithStats {
    #[sqlx(flatten)]
    pub movie: Movie,
    pub rating_sum: Option<i64>,
    pub rating_count: i64,
}

impl MovieWithStats {
    pub fn stats(&self) -> RatingStats {
        RatingStats::from_totals(self.rating_sum, self.rating_count)
    }
}

/// One `(movie_id, genre)` pair, used to batch-load genres for many movies.
#[derive(Debug, Clone, FromRow)]
pub struct MovieGenreRow {
    pub movie_id: DbId,
    #[sqlx(flatten)]
    pub genre: Genre,
}

/// Compact movie shape used by the list and curated endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct MovieListItem {
    pub id: DbId,
    pub title: String,
    pub duration_minutes: i32,
    pub release_date: Date,
    pub poster_path: Option<String>,
    pub genres: Vec<Genre>,
    pub is_active: bool,
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
}

impl MovieListItem {
    pub fn new(row: MovieWithStats, genres: Vec<Genre>) -> Self {
        let stats = row.stats();
        let movie = row.movie;
        Self {
            id: movie.id,
            title: movie.title,
            duration_minutes: movie.duration_minutes,
            release_date: movie.release_date,
            poster_path: movie.poster_path,
            genres,
            is_active: movie.is_active,
            average_rating: stats.average_rating,
            total_ratings: stats.total_ratings,
        }
    }
}

/// Full movie shape returned by `GET /api/movies/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
    /// The caller's own rating, `null` for anonymous callers or when unrated.
    pub user_rating: Option<i16>,
    pub comments: Vec<CommentView>,
    pub comments_count: i64,
}

/// DTO for creating a new movie.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub synopsis: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
    pub release_date: Date,
    #[validate(length(min = 1, max = 200))]
    pub director: String,
    #[serde(alias = "cast")]
    pub cast_text: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(url)]
    pub trailer_url: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    #[serde(default, alias = "genres")]
    pub genre_ids: Vec<DbId>,
}

/// DTO for updating an existing movie. All fields are optional.
///
/// When `genre_ids` is present it replaces the movie's whole genre set.
/// `poster_path` and `trailer_url` are cleared by sending `null` or `""`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMovie {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub synopsis: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    pub release_date: Option<Date>,
    #[validate(length(min = 1, max = 200))]
    pub director: Option<String>,
    #[serde(alias = "cast")]
    pub cast_text: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub poster_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    #[validate(url)]
    pub trailer_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    #[serde(alias = "genres")]
    pub genre_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /api/movies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieListParams {
    #[serde(alias = "genres")]
    pub genre: Option<DbId>,
    pub release_date: Option<Date>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
