use crate::models::{MovieId, Rating, UserId};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;

/// Dense user x movie rating matrix.
///
/// Rows and columns follow the order in which users and movies first appear
/// in the corpus, so the layout is deterministic for a given input. A cell
/// holding `0.0` means the user has not rated that movie; ratings are on a
/// 1 to 5 scale, so a genuine rating never collides with the fill value.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    users: Vec<UserId>,
    movies: Vec<MovieId>,
    user_index: HashMap<UserId, usize>,
    movie_index: HashMap<MovieId, usize>,
    values: Array2<f64>,
}

impl RatingMatrix {
    /// Later triples for the same (user, movie) pair overwrite earlier ones.
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut users = Vec::new();
        let mut movies = Vec::new();
        let mut user_index = HashMap::new();
        let mut movie_index = HashMap::new();

        for rating in ratings {
            user_index.entry(rating.user_id).or_insert_with(|| {
                users.push(rating.user_id);
                users.len() - 1
            });
            movie_index.entry(rating.movie_id).or_insert_with(|| {
                movies.push(rating.movie_id);
                movies.len() - 1
            });
        }

        let mut values = Array2::<f64>::zeros((users.len(), movies.len()));
        for rating in ratings {
            let row = user_index[&rating.user_id];
            let col = movie_index[&rating.movie_id];
            values[[row, col]] = rating.score;
        }

        Self {
            users,
            movies,
            user_index,
            movie_index,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_movies(&self) -> usize {
        self.movies.len()
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn user_row(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    pub fn movie_column(&self, movie_id: MovieId) -> Option<usize> {
        self.movie_index.get(&movie_id).copied()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> Option<f64> {
        let row = self.user_row(user_id)?;
        let col = self.movie_column(movie_id)?;
        let value = self.values[[row, col]];
        (value != 0.0).then_some(value)
    }
}
