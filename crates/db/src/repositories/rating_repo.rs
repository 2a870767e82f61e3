//! Repository for the `ratings` table.
//!
//! A user holds at most one rating per movie (`uq_ratings_movie_user`).
//! Writes go through [`RatingRepo::upsert`], a single statement, so two
//! concurrent submissions for the same pair can never produce two rows.

use cinema_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::{Rating, RatingListParams, RatingUpsert, RatingWithUser};

const COLUMNS: &str = "id, movie_id, user_id, rating, created_at, updated_at";

/// Rating columns qualified with the `r` alias plus the author's public fields.
const WITH_USER_COLUMNS: &str = "r.id, r.movie_id, r.user_id, r.rating, r.created_at, \
                                 r.updated_at, u.username, u.first_name, u.last_name";

/// Provides upsert and user-scoped access to ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Create or overwrite the caller's rating for a movie.
    ///
    /// `created` is true when the row was inserted by this call. Postgres
    /// leaves `xmax` at zero for freshly inserted tuples and sets it when
    /// `ON CONFLICT DO UPDATE` rewrites an existing one.
    pub async fn upsert(
        pool: &PgPool,
        movie_id: DbId,
        user_id: DbId,
        value: i16,
    ) -> Result<RatingUpsert, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (movie_id, user_id, rating) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (movie_id, user_id) \
             DO UPDATE SET rating = EXCLUDED.rating \
             RETURNING {COLUMNS}, (xmax = 0) AS created"
        );
        sqlx::query_as::<_, RatingUpsert>(&query)
            .bind(movie_id)
            .bind(user_id)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// The user's rating for a movie, if any.
    pub async fn find_for_movie_user(
        pool: &PgPool,
        movie_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM ratings WHERE movie_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Rating>(&query)
            .bind(movie_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the user's rating for a movie. Returns `false` if there was none.
    pub async fn remove_for_movie_user(
        pool: &PgPool,
        movie_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ratings WHERE movie_id = $1 AND user_id = $2")
            .bind(movie_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the user's own ratings, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        params: &RatingListParams,
    ) -> Result<Vec<RatingWithUser>, sqlx::Error> {
        let mut conditions = vec!["r.user_id = $1".to_string()];
        let mut bind_idx = 2u32;

        if params.movie.is_some() {
            conditions.push(format!("r.movie_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.rating.is_some() {
            conditions.push(format!("r.rating = ${bind_idx}"));
        }

        let query = format!(
            "SELECT {WITH_USER_COLUMNS} FROM ratings r \
             JOIN users u ON u.id = r.user_id \
             WHERE {} \
             ORDER BY r.created_at DESC, r.id DESC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, RatingWithUser>(&query).bind(user_id);
        if let Some(movie) = params.movie {
            q = q.bind(movie);
        }
        if let Some(rating) = params.rating {
            q = q.bind(rating);
        }
        q.fetch_all(pool).await
    }

    /// Find a rating by id, but only if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<RatingWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_USER_COLUMNS} FROM ratings r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.id = $1 AND r.user_id = $2"
        );
        sqlx::query_as::<_, RatingWithUser>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Change the value of a rating owned by `user_id`.
    ///
    /// Returns `None` if no such rating exists for that user.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        value: i16,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!(
            "UPDATE ratings SET rating = $3 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .bind(user_id)
            .bind(value)
            .fetch_optional(pool)
            .await
    }

    /// Delete a rating owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All rating values of a movie.
    pub async fn values_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<i16>, sqlx::Error> {
        sqlx::query_scalar::<_, i16>("SELECT rating FROM ratings WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_all(pool)
            .await
    }
}
