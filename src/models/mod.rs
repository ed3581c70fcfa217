use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = i64;
pub type MovieId = i64;

/// A single user's score for a movie. The scale is 1 to 5; a zero is never
/// stored, so zero can stand for "not rated" inside the rating matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: f64,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, score: f64) -> Self {
        Self {
            user_id,
            movie_id,
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub release_year: Option<i32>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genre: String::new(),
            year: None,
            description: String::new(),
            poster_url: String::new(),
            release_year: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self.release_year = Some(year);
        self
    }
}

/// Genre entry as reported by the metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Full record for one movie as reported by the metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Search hit from the metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Explains why a recommendation result is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    NoData,
    UserUnrated,
    NoSimilarUsers,
    NoNewRecommendations,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NoData => "no-data",
            ReasonCode::UserUnrated => "user-unrated",
            ReasonCode::NoSimilarUsers => "no-similar-users",
            ReasonCode::NoNewRecommendations => "no-new-recommendations",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::NoData => "Not enough data to generate recommendations.",
            ReasonCode::UserUnrated => "You have not rated any movies yet.",
            ReasonCode::NoSimilarUsers => "No similar users found for recommendations.",
            ReasonCode::NoNewRecommendations => "No new recommendations found.",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub score: f64,
}

/// Engine output: ranked movie ids, or an empty list with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ranked: Vec<ScoredMovie>,
    pub reason: Option<ReasonCode>,
}

impl Recommendation {
    pub fn ranked(ranked: Vec<ScoredMovie>) -> Self {
        if ranked.is_empty() {
            return Self::empty(ReasonCode::NoNewRecommendations);
        }
        Self {
            ranked,
            reason: None,
        }
    }

    pub fn empty(reason: ReasonCode) -> Self {
        Self {
            ranked: Vec::new(),
            reason: Some(reason),
        }
    }

    pub fn movie_ids(&self) -> Vec<MovieId> {
        self.ranked.iter().map(|m| m.movie_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub movie: Movie,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub recommendations: Vec<RecommendedMovie>,
    pub reason: Option<ReasonCode>,
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilter {
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub min_rating: Option<f64>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieWithAverage {
    pub movie: Movie,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub local: Vec<Movie>,
    pub external: Vec<MovieSummary>,
}
