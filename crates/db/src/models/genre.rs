//! Genre entity model and DTOs.

use cinema_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A genre row from the `genres` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new genre.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Defaults to an empty string if omitted.
    pub description: Option<String>,
}

/// DTO for updating an existing genre. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGenre {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateGenre {
    /// Trim the name so that a blank name fails `length(min = 1)`.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }
}

impl UpdateGenre {
    /// Trim the name, if present, so that a blank name fails validation.
    pub fn normalize(&mut self) {
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
    }
}

/// Query parameters for `GET /api/genres`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
}
