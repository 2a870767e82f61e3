//! Rating entity model and read projections.

use cinema_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserSummary;

/// A rating row from the `ratings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub movie_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of the rating upsert: the stored row plus whether it was inserted.
#[derive(Debug, Clone, FromRow)]
pub struct RatingUpsert {
    #[sqlx(flatten)]
    pub rating: Rating,
    pub created: bool,
}

/// A rating joined with its author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct RatingWithUser {
    #[sqlx(flatten)]
    pub rating: Rating,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// API shape of a rating with the author embedded.
#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    pub id: DbId,
    pub movie_id: DbId,
    pub user: UserSummary,
    pub rating: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<RatingWithUser> for RatingView {
    fn from(row: RatingWithUser) -> Self {
        let r = row.rating;
        Self {
            id: r.id,
            movie_id: r.movie_id,
            user: UserSummary {
                id: r.user_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
            },
            rating: r.rating,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Query parameters for `GET /api/ratings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingListParams {
    pub movie: Option<DbId>,
    pub rating: Option<i16>,
}
