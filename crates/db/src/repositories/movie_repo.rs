//! Repository for the `movies` and `movie_genres` tables.
//!
//! Rating aggregates are never stored. Every read that needs them joins a
//! per-movie `SUM`/`COUNT` over `ratings`, so the figures always reflect
//! the current rows.

use std::collections::HashMap;

use cinema_core::catalog::{CuratedView, MovieOrdering, CURATED_LIMIT};
use cinema_core::search::{
    clamp_limit, clamp_offset, contains_pattern, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use cinema_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::genre::Genre;
use crate::models::movie::{
    CreateMovie, Movie, MovieGenreRow, MovieListParams, MovieWithStats, UpdateMovie,
};

const COLUMNS: &str = "id, title, synopsis, duration_minutes, release_date, director, \
                       cast_text, poster_path, trailer_url, is_active, created_at, updated_at";

/// Movie columns qualified with the `m` alias, for joined queries.
const M_COLUMNS: &str = "m.id, m.title, m.synopsis, m.duration_minutes, m.release_date, \
                         m.director, m.cast_text, m.poster_path, m.trailer_url, m.is_active, \
                         m.created_at, m.updated_at";

/// Genre columns qualified with the `g` alias.
const G_COLUMNS: &str = "g.id, g.name, g.description, g.created_at, g.updated_at";

/// `FROM` clause joining each movie to its rating totals.
///
/// `rating_sum` stays NULL for unrated movies; `rating_count` becomes 0.
const STATS_FROM: &str = "FROM movies m \
    LEFT JOIN ( \
        SELECT movie_id, SUM(rating)::int8 AS rating_sum, COUNT(*) AS rating_count \
        FROM ratings GROUP BY movie_id \
    ) s ON s.movie_id = m.id";

/// Provides CRUD, listing and curated queries for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie and its genre associations in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO movies \
                (title, synopsis, duration_minutes, release_date, director, cast_text, \
                 poster_path, trailer_url, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, true)) \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.synopsis)
            .bind(input.duration_minutes)
            .bind(input.release_date)
            .bind(&input.director)
            .bind(&input.cast_text)
            .bind(&input.poster_path)
            .bind(&input.trailer_url)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_genres_inner(&mut tx, movie.id, &input.genre_ids).await?;

        tx.commit().await?;
        Ok(movie)
    }

    /// Find an active movie by id. Inactive movies are invisible.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active movie together with its rating totals.
    pub async fn find_active_with_stats(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovieWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {M_COLUMNS}, s.rating_sum, COALESCE(s.rating_count, 0) AS rating_count \
             {STATS_FROM} \
             WHERE m.id = $1 AND m.is_active = true"
        );
        sqlx::query_as::<_, MovieWithStats>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active movies with optional genre, release date and text filters.
    ///
    /// `search` matches title, director or cast case-insensitively.
    pub async fn list(
        pool: &PgPool,
        params: &MovieListParams,
        ordering: MovieOrdering,
    ) -> Result<Vec<MovieWithStats>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params.search.as_deref().and_then(contains_pattern);

        let mut conditions = vec!["m.is_active = true".to_string()];
        let mut bind_idx = 1u32;

        if params.genre.is_some() {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM movie_genres mg \
                 WHERE mg.movie_id = m.id AND mg.genre_id = ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.release_date.is_some() {
            conditions.push(format!("m.release_date = ${bind_idx}"));
            bind_idx += 1;
        }
        if pattern.is_some() {
            conditions.push(format!(
                "(m.title ILIKE ${bind_idx} OR m.director ILIKE ${bind_idx} \
                 OR m.cast_text ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {M_COLUMNS}, s.rating_sum, COALESCE(s.rating_count, 0) AS rating_count \
             {STATS_FROM} \
             WHERE {} \
             ORDER BY {} \
             LIMIT ${} OFFSET ${}",
            conditions.join(" AND "),
            ordering.order_by_sql(),
            bind_idx,
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, MovieWithStats>(&query);
        if let Some(genre) = params.genre {
            q = q.bind(genre);
        }
        if let Some(release_date) = params.release_date {
            q = q.bind(release_date);
        }
        if let Some(ref pattern) = pattern {
            q = q.bind(pattern);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Run one of the curated views as of `today`, capped at [`CURATED_LIMIT`].
    pub async fn curated(
        pool: &PgPool,
        view: CuratedView,
        today: Date,
    ) -> Result<Vec<MovieWithStats>, sqlx::Error> {
        let (filter, order) = match view {
            CuratedView::TopRated => (
                "COALESCE(s.rating_count, 0) > 0",
                "s.rating_sum::float8 / s.rating_count::float8 DESC, m.id ASC",
            ),
            CuratedView::Recent => ("m.release_date <= $2", "m.release_date DESC, m.id DESC"),
            CuratedView::ComingSoon => ("m.release_date > $2", "m.release_date ASC, m.id ASC"),
        };
        let query = format!(
            "SELECT {M_COLUMNS}, s.rating_sum, COALESCE(s.rating_count, 0) AS rating_count \
             {STATS_FROM} \
             WHERE m.is_active = true AND {filter} \
             ORDER BY {order} \
             LIMIT $1"
        );

        let q = sqlx::query_as::<_, MovieWithStats>(&query).bind(CURATED_LIMIT);
        match view {
            CuratedView::TopRated => q.fetch_all(pool).await,
            CuratedView::Recent | CuratedView::ComingSoon => q.bind(today).fetch_all(pool).await,
        }
    }

    /// Update a movie. Only non-`None` fields are applied.
    ///
    /// `poster_path` and `trailer_url` are written whenever the outer
    /// `Option` is `Some`, so `Some(None)` clears them.
    ///
    /// If `genre_ids` is `Some`, replaces all genre associations.
    /// Returns `None` if no active movie with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE movies SET \
                title = COALESCE($2, title), \
                synopsis = COALESCE($3, synopsis), \
                duration_minutes = COALESCE($4, duration_minutes), \
                release_date = COALESCE($5, release_date), \
                director = COALESCE($6, director), \
                cast_text = COALESCE($7, cast_text), \
                poster_path = CASE WHEN $8 THEN $9 ELSE poster_path END, \
                trailer_url = CASE WHEN $10 THEN $11 ELSE trailer_url END, \
                is_active = COALESCE($12, is_active) \
             WHERE id = $1 AND is_active = true \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.synopsis)
            .bind(input.duration_minutes)
            .bind(input.release_date)
            .bind(&input.director)
            .bind(&input.cast_text)
            .bind(input.poster_path.is_some())
            .bind(input.poster_path.as_ref().and_then(|v| v.as_deref()))
            .bind(input.trailer_url.is_some())
            .bind(input.trailer_url.as_ref().and_then(|v| v.as_deref()))
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(movie), Some(genre_ids)) = (&movie, &input.genre_ids) {
            Self::set_genres_inner(&mut tx, movie.id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(movie)
    }

    /// Physically delete a movie. Ratings, comments and genre links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Genre association helpers
    // -----------------------------------------------------------------------

    /// Genres of one movie, by name.
    pub async fn genres_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {G_COLUMNS} FROM genres g \
             JOIN movie_genres mg ON mg.genre_id = g.id \
             WHERE mg.movie_id = $1 \
             ORDER BY g.name"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(movie_id)
            .fetch_all(pool)
            .await
    }

    /// Genres of many movies in one query, grouped by movie id.
    ///
    /// Movies without genres are absent from the map.
    pub async fn genres_by_movie(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Genre>>, sqlx::Error> {
        if movie_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!(
            "SELECT mg.movie_id, {G_COLUMNS} FROM genres g \
             JOIN movie_genres mg ON mg.genre_id = g.id \
             WHERE mg.movie_id = ANY($1) \
             ORDER BY g.name"
        );
        let rows = sqlx::query_as::<_, MovieGenreRow>(&query)
            .bind(movie_ids)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<Genre>> = HashMap::new();
        for row in rows {
            grouped.entry(row.movie_id).or_default().push(row.genre);
        }
        Ok(grouped)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace genre associations within an existing transaction.
    async fn set_genres_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut **tx)
            .await?;

        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO movie_genres (movie_id, genre_id) \
             SELECT $1, UNNEST($2::int8[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
