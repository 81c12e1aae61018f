//! Gray-code Mₖ matrix used to invert uniformly-controlled rotation angles.

use ndarray::Array2;

/// Binary-reflected Gray code of `j`.
fn gray(j: usize) -> usize {
    j ^ (j >> 1)
}

/// The `2^k × 2^k` matrix `M[i,j] = (-1)^popcount(i & gray(j))`.
///
/// `dim` is `2^k`, the full matrix side length (not `k` itself).
pub fn m_k(dim: usize) -> Array2<f64> {
    Array2::from_shape_fn((dim, dim), |(i, j)| {
        if (i & gray(j)).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    })
}
