//! Idempotent bootstrap data.

use cinema_core::genres::STANDARD_GENRES;
use sqlx::PgPool;

use crate::repositories::GenreRepo;

/// Counts reported after seeding genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub existing: usize,
    /// Genres in the table after seeding, including ones not in the catalogue.
    pub total: i64,
}

/// Insert every genre of the standard catalogue that is not already present.
///
/// Safe to run repeatedly; existing genres keep their description.
pub async fn seed_genres(pool: &PgPool) -> Result<SeedSummary, sqlx::Error> {
    let mut created = 0;
    let mut existing = 0;

    for &(name, description) in STANDARD_GENRES {
        let (genre, was_created) = GenreRepo::get_or_create(pool, name, description).await?;
        if was_created {
            created += 1;
            tracing::info!(genre_id = genre.id, name, "Genre created");
        } else {
            existing += 1;
            tracing::debug!(genre_id = genre.id, name, "Genre already present");
        }
    }

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM genres")
        .fetch_one(pool)
        .await?;

    Ok(SeedSummary {
        created,
        existing,
        total,
    })
}
