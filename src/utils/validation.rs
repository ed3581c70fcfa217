use crate::models::*;
use thiserror::Error;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Rating must be a number, got {0:?}")]
    NotANumber(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    ScoreOutOfRange(f64),

    #[error("Movie {0} does not exist")]
    UnknownMovie(MovieId),

    #[error("Search query too long (max {max} characters)")]
    QueryTooLong { max: usize },
}

pub fn validate_score(score: f64) -> Result<f64, ValidationError> {
    if !score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange(score));
    }
    Ok(score)
}

/// Parses a submitted form value. Blank input means "no rating submitted"
/// and yields `Ok(None)`.
pub fn parse_score(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let score = raw
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber(raw.to_string()))?;
    validate_score(score).map(Some)
}

/// Checks a stored rating, e.g. one loaded from a corpus file.
pub fn validate_rating(rating: &Rating) -> Result<(), ValidationError> {
    validate_score(rating.score)?;
    Ok(())
}

/// Lenient parse used for browse filters: anything that is not a number is
/// treated as "no minimum".
pub fn parse_min_rating(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok()).filter(|v| v.is_finite())
}

pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
}

pub fn validate_query(query: &str, max_length: usize) -> Result<&str, ValidationError> {
    if query.chars().count() > max_length {
        return Err(ValidationError::QueryTooLong { max: max_length });
    }
    Ok(query.trim())
}
