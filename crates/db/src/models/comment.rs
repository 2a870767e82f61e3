//! Comment entity model and DTOs.

use cinema_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::user::UserSummary;

/// A comment row from the `comments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub movie_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithUser {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// API shape of a comment with the author embedded.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub movie_id: DbId,
    pub user: UserSummary,
    pub content: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CommentWithUser> for CommentView {
    fn from(row: CommentWithUser) -> Self {
        let c = row.comment;
        Self {
            id: c.id,
            movie_id: c.movie_id,
            user: UserSummary {
                id: c.user_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
            },
            content: c.content,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// DTO for posting a comment. The author always comes from the token;
/// any `user` field in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[serde(alias = "movie")]
    pub movie_id: DbId,
    #[validate(length(min = 1))]
    pub content: String,
}

/// DTO for editing a comment. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /api/comments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListParams {
    pub movie: Option<DbId>,
}
