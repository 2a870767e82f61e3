//! Repository for the `genres` table.

use cinema_core::catalog::GenreOrdering;
use cinema_core::search::contains_pattern;
use cinema_core::types::DbId;
use sqlx::PgPool;

use crate::models::genre::{CreateGenre, Genre, UpdateGenre};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre. A duplicate name violates `uq_genres_name`.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query = format!(
            "INSERT INTO genres (name, description) \
             VALUES ($1, COALESCE($2, '')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Insert a genre unless one with the same name exists.
    ///
    /// Returns the stored row and whether it was created by this call.
    pub async fn get_or_create(
        pool: &PgPool,
        name: &str,
        description: &str,
    ) -> Result<(Genre, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO genres (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Genre>(&insert)
            .bind(name)
            .bind(description)
            .fetch_optional(pool)
            .await?;
        if let Some(genre) = inserted {
            return Ok((genre, true));
        }

        let select = format!("SELECT {COLUMNS} FROM genres WHERE name = $1");
        let existing = sqlx::query_as::<_, Genre>(&select)
            .bind(name)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List genres, optionally filtered by a case-insensitive name substring.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        ordering: GenreOrdering,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        let pattern = search.and_then(contains_pattern);
        let where_clause = if pattern.is_some() {
            "WHERE name ILIKE $1"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM genres {where_clause} ORDER BY {}, id ASC",
            ordering.order_by_sql()
        );

        let mut q = sqlx::query_as::<_, Genre>(&query);
        if let Some(ref pattern) = pattern {
            q = q.bind(pattern);
        }
        q.fetch_all(pool).await
    }

    /// Return the subset of `ids` that exist, in ascending order.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>("SELECT id FROM genres WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Update a genre. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGenre,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!(
            "UPDATE genres SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a genre. Its movie associations go with it; the movies stay.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
