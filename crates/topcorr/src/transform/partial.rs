//! Partial correlation from the precision matrix.
//!
//! ```text
//! P = C^-1
//! pc[i, j] = -P[i, j] / sqrt(P[i, i] * P[j, j])      (i != j)
//! pc[i, i] = 1
//! ```
//!
//! Only invertibility is required. Indefinite input can give entries outside
//! `[-1, 1]` or NaN; those are returned as data.

use nalgebra::DMatrix;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::matrix::{LuInverse, MatrixInverse, ensure_square};

/// Partial correlation matrix of `corr`, inverted with [`LuInverse`].
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] for non-square input and
/// [`crate::Error::SingularMatrix`] when `corr` has no inverse.
pub fn partial_correlation(corr: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    partial_correlation_with(corr, &LuInverse)
}

/// Partial correlation matrix of `corr` using a caller-supplied inverse.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] for non-square input; inversion
/// errors from `inverter` are propagated unchanged.
#[instrument(skip(corr, inverter), fields(p = corr.nrows()))]
pub fn partial_correlation_with<I>(corr: &DMatrix<f64>, inverter: &I) -> Result<DMatrix<f64>>
where
    I: MatrixInverse + ?Sized,
{
    let p = ensure_square(corr)?;
    let precision = inverter.invert(corr)?;

    let mut partial = DMatrix::from_fn(p, p, |i, j| {
        -precision[(i, j)] / (precision[(i, i)] * precision[(j, j)]).sqrt()
    });
    partial.fill_diagonal(1.0);

    let nan_count = partial.iter().filter(|v| v.is_nan()).count();
    if nan_count > 0 {
        warn!(nan_count, "partial correlation produced NaN entries");
    }
    Ok(partial)
}
