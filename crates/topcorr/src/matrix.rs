//! Matrix helpers shared by the filters.
//!
//! Input matrices are plain `nalgebra::DMatrix<f64>` values. Nothing here
//! checks symmetry or the unit diagonal; callers are trusted on both.

use nalgebra::DMatrix;

use crate::error::{Error, Result};

/// Return `p` for a square `p x p` matrix.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the matrix is not square.
pub fn ensure_square(matrix: &DMatrix<f64>) -> Result<usize> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(Error::invalid_input(format!(
            "expected a square matrix, got {rows}x{cols}"
        )));
    }
    Ok(rows)
}

/// All ordered off-diagonal pairs `(i, j)` sorted by descending `matrix[(i, j)]`.
///
/// Ties keep the row-major order of the flattened matrix, so `(0, 3)` comes
/// before `(1, 2)` when both carry the same value. Ordering uses
/// [`f64::total_cmp`], which places NaN entries ahead of every number.
#[must_use]
pub fn ranked_pairs(matrix: &DMatrix<f64>) -> Vec<(usize, usize)> {
    let p = matrix.nrows();
    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(p * p.saturating_sub(1));
    for i in 0..p {
        for j in 0..p {
            if i != j {
                pairs.push((i, j));
            }
        }
    }

    // Stable: equal weights stay in row-major order.
    pairs.sort_by(|a, b| matrix[*b].total_cmp(&matrix[*a]));
    pairs
}

/// Column indices of `column` sorted by descending value, ties by lower index.
#[must_use]
pub fn ranked_column(matrix: &DMatrix<f64>, column: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..matrix.nrows()).collect();
    rows.sort_by(|a, b| matrix[(*b, column)].total_cmp(&matrix[(*a, column)]));
    rows
}

// ---------------------------------------------------------------------------
// Linear algebra capability
// ---------------------------------------------------------------------------

/// Matrix inversion used by the partial-correlation transform.
///
/// Implementations must report non-invertible input as
/// [`Error::SingularMatrix`] instead of returning garbage.
pub trait MatrixInverse {
    /// Invert a square matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularMatrix`] if the matrix has no inverse.
    fn invert(&self, matrix: &DMatrix<f64>) -> Result<DMatrix<f64>>;
}

/// Default inverse backed by nalgebra's LU decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuInverse;

impl MatrixInverse for LuInverse {
    fn invert(&self, matrix: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        // try_inverse panics on non-square input.
        ensure_square(matrix)?;
        matrix.clone().try_inverse().ok_or(Error::SingularMatrix)
    }
}
