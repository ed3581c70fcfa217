pub mod matrix;
pub mod scoring;
pub mod similarity;

use crate::config::RecommendationConfig;
use crate::models::*;
use std::collections::HashSet;
use tracing::debug;

pub use matrix::RatingMatrix;
pub use similarity::{cosine_similarity, similarity_matrix};

pub trait RecommendationAlgorithm: Send + Sync {
    fn recommend(&self, ratings: &[Rating], target_user: UserId) -> Recommendation;
}

/// User-based collaborative filtering over a dense rating matrix.
///
/// Every call rebuilds the matrix and similarities from the supplied
/// corpus; the engine keeps no state between calls.
#[derive(Debug, Clone)]
pub struct CollaborativeFiltering {
    pub max_results: usize,
    pub similarity_floor: f64,
    pub denominator_epsilon: f64,
}

impl Default for CollaborativeFiltering {
    fn default() -> Self {
        Self::from_config(&RecommendationConfig::default())
    }
}

impl CollaborativeFiltering {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RecommendationConfig) -> Self {
        Self {
            max_results: config.max_results,
            similarity_floor: config.similarity_floor,
            denominator_epsilon: config.denominator_epsilon,
        }
    }
}

impl RecommendationAlgorithm for CollaborativeFiltering {
    fn recommend(&self, ratings: &[Rating], target_user: UserId) -> Recommendation {
        if ratings.is_empty() {
            return Recommendation::empty(ReasonCode::NoData);
        }

        let matrix = RatingMatrix::from_ratings(ratings);
        let Some(target_row) = matrix.user_row(target_user) else {
            return Recommendation::empty(ReasonCode::UserUnrated);
        };

        // neighbours need strictly positive similarity whatever the configured floor
        let floor = self.similarity_floor.max(0.0);
        let sims = similarity_matrix(&matrix);
        let neighbors = scoring::select_neighbors(sims.row(target_row), target_row, floor);
        if neighbors.is_empty() {
            return Recommendation::empty(ReasonCode::NoSimilarUsers);
        }

        let scores = scoring::aggregate_scores(&matrix, &neighbors, self.denominator_epsilon);

        let already_rated: HashSet<MovieId> = ratings
            .iter()
            .filter(|r| r.user_id == target_user)
            .map(|r| r.movie_id)
            .collect();

        let ranked = scoring::rank_candidates(matrix.movies(), scores.view(), &already_rated, self.max_results);

        debug!(
            "user {}: {} users, {} movies, {} neighbours, {} candidates",
            target_user,
            matrix.num_users(),
            matrix.num_movies(),
            neighbors.len(),
            ranked.len()
        );

        Recommendation::ranked(ranked)
    }
}

/// Runs the default engine: at most 10 results, neighbours above 0.
pub fn recommend(ratings: &[Rating], target_user: UserId) -> Recommendation {
    CollaborativeFiltering::default().recommend(ratings, target_user)
}
