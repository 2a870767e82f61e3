//! Rating validation and aggregation.
//!
//! A movie's average and count are always derived from its rating rows at
//! read time. Nothing here stores or increments an aggregate.

use serde::Serialize;

use crate::error::CoreError;

/// Lowest accepted star value.
pub const RATING_MIN: i16 = 1;

/// Highest accepted star value.
pub const RATING_MAX: i16 = 5;

/// Validate that a rating value is within `[RATING_MIN, RATING_MAX]`.
pub fn validate_rating(value: i16) -> Result<(), CoreError> {
    if !(RATING_MIN..=RATING_MAX).contains(&value) {
        return Err(CoreError::Validation(format!(
            "Rating must be a number between {RATING_MIN} and {RATING_MAX}, got {value}"
        )));
    }
    Ok(())
}

/// Coerce a raw JSON `rating` field into a validated star value.
///
/// Accepts an integer, a whole float (`3.0`) or a string holding an
/// integer (`"4"`). Missing, `null`, fractional, boolean and non-numeric
/// values are rejected.
pub fn coerce_rating(raw: Option<&serde_json::Value>) -> Result<i16, CoreError> {
    let missing = || {
        CoreError::Validation(format!(
            "Rating must be a number between {RATING_MIN} and {RATING_MAX}"
        ))
    };

    let parsed: i64 = match raw {
        Some(serde_json::Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() <= f64::from(i16::MAX) => f as i64,
            _ => return Err(missing()),
        },
        Some(serde_json::Value::String(s)) => s.trim().parse().map_err(|_| missing())?,
        _ => return Err(missing()),
    };

    let value = i16::try_from(parsed).map_err(|_| missing())?;
    validate_rating(value)?;
    Ok(value)
}

/// Aggregated rating figures for one movie.
///
/// `average_rating` is `None` when the movie has no ratings; it is never
/// reported as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
}

impl RatingStats {
    /// Build stats from a SQL `SUM` (NULL when there are no rows) and `COUNT`.
    pub fn from_totals(sum: Option<i64>, count: i64) -> Self {
        let average_rating = match sum {
            Some(sum) if count > 0 => Some(sum as f64 / count as f64),
            _ => None,
        };
        Self {
            average_rating,
            total_ratings: count,
        }
    }

    /// Build stats from the individual rating values.
    pub fn from_values(values: &[i16]) -> Self {
        if values.is_empty() {
            return Self::from_totals(None, 0);
        }
        let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
        Self::from_totals(Some(sum), values.len() as i64)
    }
}

/// Whether an upsert inserted a new rating or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Created,
    Updated,
}

impl RatingOutcome {
    pub fn from_created(created: bool) -> Self {
        if created {
            RatingOutcome::Created
        } else {
            RatingOutcome::Updated
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    // -- validate_rating -----------------------------------------------------

    #[test]
    fn accepts_every_star_value() {
        for value in RATING_MIN..=RATING_MAX {
            assert!(validate_rating(value).is_ok(), "{value} should be accepted");
        }
    }

    #[test]
    fn rejects_zero_and_six() {
        assert_matches!(validate_rating(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(6), Err(CoreError::Validation(_)));
    }

    // -- coerce_rating -------------------------------------------------------

    #[test]
    fn coerces_integer_and_numeric_string() {
        assert_eq!(coerce_rating(Some(&json!(3))).unwrap(), 3);
        assert_eq!(coerce_rating(Some(&json!("4"))).unwrap(), 4);
        assert_eq!(coerce_rating(Some(&json!(" 5 "))).unwrap(), 5);
    }

    #[test]
    fn accepts_whole_floats() {
        assert_eq!(coerce_rating(Some(&json!(3.0))).unwrap(), 3);
        assert_eq!(coerce_rating(Some(&json!(5.0))).unwrap(), 5);
        assert!(coerce_rating(Some(&json!(6.0))).is_err());
        assert!(coerce_rating(Some(&json!(1e300))).is_err());
    }

    #[test]
    fn missing_or_null_is_a_validation_error() {
        assert_matches!(coerce_rating(None), Err(CoreError::Validation(_)));
        assert_matches!(
            coerce_rating(Some(&json!(null))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_non_integer_shapes() {
        for raw in [json!(3.5), json!(true), json!("great"), json!([4]), json!({})] {
            assert_matches!(
                coerce_rating(Some(&raw)),
                Err(CoreError::Validation(_)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_and_overflowing_values() {
        assert!(coerce_rating(Some(&json!(0))).is_err());
        assert!(coerce_rating(Some(&json!(6))).is_err());
        assert!(coerce_rating(Some(&json!(-1))).is_err());
        assert!(coerce_rating(Some(&json!(70000))).is_err());
    }

    // -- RatingStats ---------------------------------------------------------

    #[test]
    fn no_ratings_yields_sentinel_not_zero() {
        let stats = RatingStats::from_values(&[]);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.total_ratings, 0);

        let stats = RatingStats::from_totals(None, 0);
        assert_eq!(stats.average_rating, None);
    }

    #[test]
    fn average_is_exact_mean() {
        let stats = RatingStats::from_values(&[5, 4, 4]);
        assert_eq!(stats.average_rating, Some(13.0 / 3.0));
        assert_eq!(stats.total_ratings, 3);

        let stats = RatingStats::from_values(&[1, 2]);
        assert_eq!(stats.average_rating, Some(1.5));
    }

    #[test]
    fn totals_and_values_agree() {
        let values = [1, 5, 3, 3, 2];
        let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
        assert_eq!(
            RatingStats::from_values(&values),
            RatingStats::from_totals(Some(sum), values.len() as i64)
        );
    }

    #[test]
    fn sentinel_serializes_as_null() {
        let json = serde_json::to_value(RatingStats::from_totals(None, 0)).unwrap();
        assert!(json["average_rating"].is_null());
        assert_eq!(json["total_ratings"], 0);
    }

    // -- RatingOutcome -------------------------------------------------------

    #[test]
    fn outcome_from_created_flag() {
        assert_eq!(RatingOutcome::from_created(true), RatingOutcome::Created);
        assert_eq!(RatingOutcome::from_created(false), RatingOutcome::Updated);
    }
}
