use crate::models::*;
use crate::utils::validation::{validate_rating, ValidationError};
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Read/write access to the ratings corpus.
#[async_trait::async_trait]
pub trait RatingsSource: Send + Sync {
    /// Every rating in the system at call time.
    async fn all_ratings(&self) -> Result<Vec<Rating>>;
    async fn ratings_for_user(&self, user_id: UserId) -> Result<Vec<Rating>>;
    /// Stores `rating`, replacing any earlier score for the same user and movie.
    async fn upsert(&self, rating: Rating) -> Result<UpsertOutcome>;
}

#[derive(Default)]
struct RatingsTable {
    rows: Vec<Rating>,
    index: HashMap<(UserId, MovieId), usize>,
}

/// In-process ratings store. Ratings keep their first insertion position, so
/// `all_ratings` returns a stable order across updates.
#[derive(Default)]
pub struct InMemoryRatings {
    table: RwLock<RatingsTable>,
}

impl InMemoryRatings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let store = Self::new();
        for rating in ratings {
            store.put(rating);
        }
        store
    }

    /// Like `with_ratings`, but rejects the whole batch if any score is out
    /// of range. Used when seeding from data the user edited by hand.
    pub fn try_with_ratings(ratings: impl IntoIterator<Item = Rating>) -> Result<Self, ValidationError> {
        let ratings: Vec<Rating> = ratings.into_iter().collect();
        for rating in &ratings {
            validate_rating(rating)?;
        }
        Ok(Self::with_ratings(ratings))
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn put(&self, rating: Rating) -> UpsertOutcome {
        let mut table = self.table.write();
        let key = (rating.user_id, rating.movie_id);
        let existing = table.index.get(&key).copied();
        match existing {
            Some(pos) => {
                table.rows[pos].score = rating.score;
                UpsertOutcome::Updated
            }
            None => {
                let pos = table.rows.len();
                table.rows.push(rating);
                table.index.insert(key, pos);
                UpsertOutcome::Created
            }
        }
    }
}

#[async_trait::async_trait]
impl RatingsSource for InMemoryRatings {
    async fn all_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.table.read().rows.clone())
    }

    async fn ratings_for_user(&self, user_id: UserId) -> Result<Vec<Rating>> {
        let table = self.table.read();
        Ok(table.rows.iter().filter(|r| r.user_id == user_id).copied().collect())
    }

    async fn upsert(&self, rating: Rating) -> Result<UpsertOutcome> {
        let outcome = self.put(rating);
        debug!(
            "Rating {:?}: user {} movie {} score {}",
            outcome, rating.user_id, rating.movie_id, rating.score
        );
        Ok(outcome)
    }
}
