use super::matrix::RatingMatrix;
use ndarray::{Array2, ArrayView1};

/// Cosine similarity of two rating rows. Either row being all zeros yields
/// exactly `0.0`.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Pairwise user x user similarity. Only the upper triangle is computed and
/// mirrored, so `sim[[i, j]] == sim[[j, i]]` holds bit for bit.
pub fn similarity_matrix(matrix: &RatingMatrix) -> Array2<f64> {
    let n = matrix.num_users();
    let mut sims = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in i..n {
            let sim = cosine_similarity(matrix.row(i), matrix.row(j));
            sims[[i, j]] = sim;
            sims[[j, i]] = sim;
        }
    }

    sims
}
