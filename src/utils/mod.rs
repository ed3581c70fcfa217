use crate::models::{MovieId, Rating};
use std::collections::HashMap;

pub mod pagination;
pub mod validation;

/// Mean score per movie across all users.
pub fn average_scores(ratings: &[Rating]) -> HashMap<MovieId, f64> {
    let mut totals: HashMap<MovieId, (f64, usize)> = HashMap::new();
    for rating in ratings {
        let entry = totals.entry(rating.movie_id).or_insert((0.0, 0));
        entry.0 += rating.score;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(movie_id, (sum, count))| (movie_id, sum / count as f64))
        .collect()
}

/// Leading four-digit year of a `YYYY-MM-DD` date string.
pub fn year_from_date(date: &str) -> Option<i32> {
    date.get(..4).and_then(|y| y.parse().ok())
}
