//! Curated movie views and list ordering.
//!
//! The views partition active movies around "today". The caller decides
//! what today is and passes it in; nothing here reads the clock.

use crate::error::CoreError;
use crate::types::Date;

/// Maximum number of movies returned by every curated view.
pub const CURATED_LIMIT: i64 = 10;

/// The three read-only curated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuratedView {
    /// Rated movies by average rating, best first. Ties broken by `id ASC`.
    TopRated,
    /// Released movies (`release_date <= today`), newest first.
    Recent,
    /// Unreleased movies (`release_date > today`), soonest first.
    ComingSoon,
}

impl CuratedView {
    /// Whether a movie with `release_date` may appear in this view on `today`.
    ///
    /// `TopRated` ignores the release date.
    pub fn admits(self, release_date: Date, today: Date) -> bool {
        match self {
            CuratedView::TopRated => true,
            CuratedView::Recent => is_released(release_date, today),
            CuratedView::ComingSoon => !is_released(release_date, today),
        }
    }
}

/// A movie counts as released on its release date.
pub fn is_released(release_date: Date, today: Date) -> bool {
    release_date <= today
}

/// `?ordering=` values accepted by the movie list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieOrdering {
    Title,
    TitleDesc,
    ReleaseDate,
    #[default]
    ReleaseDateDesc,
}

impl MovieOrdering {
    /// Parse an ordering parameter. `None` yields the default (`-release_date`).
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some("title") => Ok(MovieOrdering::Title),
            Some("-title") => Ok(MovieOrdering::TitleDesc),
            Some("release_date") => Ok(MovieOrdering::ReleaseDate),
            Some("-release_date") => Ok(MovieOrdering::ReleaseDateDesc),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid ordering '{other}'. Must be one of: title, -title, release_date, -release_date"
            ))),
        }
    }

    /// SQL `ORDER BY` body for the `movies m` alias, with a stable id tie-break.
    pub fn order_by_sql(self) -> &'static str {
        match self {
            MovieOrdering::Title => "m.title ASC, m.id ASC",
            MovieOrdering::TitleDesc => "m.title DESC, m.id DESC",
            MovieOrdering::ReleaseDate => "m.release_date ASC, m.id ASC",
            MovieOrdering::ReleaseDateDesc => "m.release_date DESC, m.id DESC",
        }
    }
}

/// `?ordering=` values accepted by the genre list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenreOrdering {
    #[default]
    Name,
    NameDesc,
}

impl GenreOrdering {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("name") => Ok(GenreOrdering::Name),
            Some("-name") => Ok(GenreOrdering::NameDesc),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid ordering '{other}'. Must be one of: name, -name"
            ))),
        }
    }

    pub fn order_by_sql(self) -> &'static str {
        match self {
            GenreOrdering::Name => "name ASC",
            GenreOrdering::NameDesc => "name DESC",
        }
    }
}
