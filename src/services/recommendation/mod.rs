use crate::algorithms::{CollaborativeFiltering, RecommendationAlgorithm};
use crate::config::Config;
use crate::models::*;
use crate::services::catalog::MovieCatalog;
use crate::services::ratings::RatingsSource;
use crate::utils::validation::{parse_score, validate_score, ValidationError};
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

pub struct RecommendationService {
    ratings: Arc<dyn RatingsSource>,
    catalog: Arc<dyn MovieCatalog>,
    algorithm: Arc<dyn RecommendationAlgorithm>,
}

impl RecommendationService {
    pub fn new(ratings: Arc<dyn RatingsSource>, catalog: Arc<dyn MovieCatalog>, config: &Config) -> Self {
        let algorithm = Arc::new(CollaborativeFiltering::from_config(&config.recommendation));
        Self::with_algorithm(ratings, catalog, algorithm)
    }

    pub fn with_algorithm(
        ratings: Arc<dyn RatingsSource>,
        catalog: Arc<dyn MovieCatalog>,
        algorithm: Arc<dyn RecommendationAlgorithm>,
    ) -> Self {
        Self {
            ratings,
            catalog,
            algorithm,
        }
    }

    /// Runs the engine over the full corpus and materialises the ranked ids
    /// into catalog records. Ids that no longer resolve are dropped.
    pub async fn get_recommendations(&self, user_id: UserId) -> Result<RecommendationResponse> {
        let corpus = self
            .ratings
            .all_ratings()
            .await
            .context("Failed to load ratings corpus")?;

        let recommendation = self.algorithm.recommend(&corpus, user_id);

        let mut recommendations = Vec::new();
        if !recommendation.is_empty() {
            let movies: HashMap<MovieId, Movie> = self
                .catalog
                .find_many(&recommendation.movie_ids())
                .await
                .context("Failed to look up recommended movies")?
                .into_iter()
                .map(|m| (m.id, m))
                .collect();

            for scored in &recommendation.ranked {
                match movies.get(&scored.movie_id) {
                    Some(movie) => recommendations.push(RecommendedMovie {
                        movie: movie.clone(),
                        score: scored.score,
                    }),
                    None => debug!("Dropping movie {} with no catalog record", scored.movie_id),
                }
            }
        }

        let reason = match recommendation.reason {
            Some(reason) => Some(reason),
            None if recommendations.is_empty() => Some(ReasonCode::NoNewRecommendations),
            None => None,
        };

        info!(
            "Generated {} recommendations for user {} from {} ratings (reason: {:?})",
            recommendations.len(),
            user_id,
            corpus.len(),
            reason
        );

        Ok(RecommendationResponse {
            user_id,
            recommendations,
            reason,
            message: reason.map(|r| r.message().to_string()),
            generated_at: Utc::now(),
        })
    }

    pub async fn rate(&self, user_id: UserId, movie_id: MovieId, score: f64) -> Result<UpsertOutcome> {
        validate_score(score)?;
        if self.catalog.get(movie_id).await?.is_none() {
            return Err(ValidationError::UnknownMovie(movie_id).into());
        }

        let outcome = self.ratings.upsert(Rating::new(user_id, movie_id, score)).await?;
        info!("User {} rated movie {} with {} ({:?})", user_id, movie_id, score, outcome);
        Ok(outcome)
    }

    /// Bulk form submission: blank values are skipped, everything else is
    /// validated and stored. Nothing is written unless every entry is valid.
    /// Returns how many ratings were written.
    pub async fn rate_many(&self, user_id: UserId, submissions: &[(MovieId, String)]) -> Result<usize> {
        let mut pending = Vec::with_capacity(submissions.len());
        for (movie_id, raw) in submissions {
            if let Some(score) = parse_score(raw)? {
                pending.push(Rating::new(user_id, *movie_id, score));
            }
        }

        let ids: Vec<MovieId> = pending.iter().map(|r| r.movie_id).collect();
        let known: HashSet<MovieId> = self.catalog.find_many(&ids).await?.into_iter().map(|m| m.id).collect();
        if let Some(missing) = pending.iter().find(|r| !known.contains(&r.movie_id)) {
            return Err(ValidationError::UnknownMovie(missing.movie_id).into());
        }

        for rating in &pending {
            self.ratings.upsert(*rating).await?;
        }
        info!("User {} submitted {} ratings", user_id, pending.len());
        Ok(pending.len())
    }

    pub async fn user_ratings(&self, user_id: UserId) -> Result<HashMap<MovieId, f64>> {
        let ratings = self.ratings.ratings_for_user(user_id).await?;
        Ok(ratings.into_iter().map(|r| (r.movie_id, r.score)).collect())
    }
}
