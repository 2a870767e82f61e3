//! Repository for the `comments` table.
//!
//! Deletion is logical: hidden comments keep their row with
//! `is_active = false` and drop out of every read here.

use cinema_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{
    Comment, CommentListParams, CommentWithUser, CreateComment, UpdateComment,
};

const COLUMNS: &str = "id, movie_id, user_id, content, is_active, created_at, updated_at";

const WITH_USER_COLUMNS: &str = "c.id, c.movie_id, c.user_id, c.content, c.is_active, \
                                 c.created_at, c.updated_at, u.username, u.first_name, u.last_name";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment authored by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (movie_id, user_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.movie_id)
            .bind(user_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find an active comment with its author.
    pub async fn find_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommentWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_USER_COLUMNS} FROM comments c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.id = $1 AND c.is_active = true"
        );
        sqlx::query_as::<_, CommentWithUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active comments, newest first, optionally for one movie.
    pub async fn list_active(
        pool: &PgPool,
        params: &CommentListParams,
    ) -> Result<Vec<CommentWithUser>, sqlx::Error> {
        let movie_filter = if params.movie.is_some() {
            "AND c.movie_id = $1"
        } else {
            ""
        };
        let query = format!(
            "SELECT {WITH_USER_COLUMNS} FROM comments c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.is_active = true {movie_filter} \
             ORDER BY c.created_at DESC, c.id DESC"
        );

        let mut q = sqlx::query_as::<_, CommentWithUser>(&query);
        if let Some(movie) = params.movie {
            q = q.bind(movie);
        }
        q.fetch_all(pool).await
    }

    /// Number of active comments on a movie.
    pub async fn count_active_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE movie_id = $1 AND is_active = true",
        )
        .bind(movie_id)
        .fetch_one(pool)
        .await
    }

    /// Update an active comment. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no active comment with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET \
                content = COALESCE($2, content), \
                is_active = COALESCE($3, is_active) \
             WHERE id = $1 AND is_active = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(&input.content)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hide a comment. Returns `true` if it was active.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
