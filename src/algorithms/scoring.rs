use super::matrix::RatingMatrix;
use crate::models::{MovieId, ScoredMovie};
use ndarray::{Array1, ArrayView1};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub similarity: f64,
}

/// Rows of `sims` other than `target_row` with similarity strictly above
/// `floor`, in row order.
pub fn select_neighbors(sims: ArrayView1<'_, f64>, target_row: usize, floor: f64) -> Vec<Neighbor> {
    sims.iter()
        .enumerate()
        .filter(|&(row, &similarity)| row != target_row && similarity > floor)
        .map(|(row, &similarity)| Neighbor { row, similarity })
        .collect()
}

/// Similarity-weighted average of the neighbours' ratings for every movie
/// column. An unrated cell counts as zero, which pulls down movies that only
/// some neighbours have seen.
pub fn aggregate_scores(matrix: &RatingMatrix, neighbors: &[Neighbor], epsilon: f64) -> Array1<f64> {
    let mut weighted = Array1::<f64>::zeros(matrix.num_movies());
    let mut sim_sum = 0.0;

    for neighbor in neighbors {
        weighted.scaled_add(neighbor.similarity, &matrix.row(neighbor.row));
        sim_sum += neighbor.similarity;
    }

    weighted / sim_sum.max(epsilon)
}

/// Stable descending sort of movie columns by score, skipping movies in
/// `exclude`, truncated to `limit`.
pub fn rank_candidates(
    movies: &[MovieId],
    scores: ArrayView1<'_, f64>,
    exclude: &HashSet<MovieId>,
    limit: usize,
) -> Vec<ScoredMovie> {
    let mut ranked: Vec<ScoredMovie> = movies
        .iter()
        .zip(scores.iter())
        .map(|(&movie_id, &score)| ScoredMovie { movie_id, score })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .filter(|m| !exclude.contains(&m.movie_id))
        .take(limit)
        .collect()
}
