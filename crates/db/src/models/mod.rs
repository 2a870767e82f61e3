//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod comment;
pub mod genre;
pub mod movie;
pub mod rating;
pub mod role;
pub mod session;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Read an optional text field where `""` means "no value".
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Read a clearable field of an update DTO.
///
/// Pair with `#[serde(default)]`: an absent field stays `None` (keep the
/// stored value), while `null` or `""` become `Some(None)` (clear it).
pub(crate) fn clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none(deserializer).map(Some)
}
