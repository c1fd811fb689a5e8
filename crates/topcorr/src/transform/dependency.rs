//! Dependency network (Kenett et al., "Dominating Clasp of the Financial
//! Sector Revealed by Partial Correlation Analysis of the Stock Market").
//!
//! # Definition
//!
//! For every ordered triple of distinct nodes:
//!
//! ```text
//! d(i, j | k) = C[i, j] - pc(i, j | k)
//! pc(i, j | k) = (C[i, j] - C[i, k] C[k, j]) / sqrt((1 - C[i, k]^2)(1 - C[k, j]^2))
//! ```
//!
//! After the triple loop, `d(i, j | j)` is set to `1` for every `i, j`. The
//! directed influence of `k` on `i` is the mean over `j != i`:
//!
//! ```text
//! D[k, i] = sum_{j != i} d(i, j | k) / (p - 1)      (k != i)
//! ```
//!
//! The sum includes the `j = k` sentinel term. The diagonal of `D` is 0.

use nalgebra::DMatrix;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::matrix::ensure_square;

/// Correlation of `i` and `j` after removing the linear effect of `k`.
///
/// Returns NaN when `|C[i, k]| > 1` or `|C[k, j]| > 1`, and an infinite or
/// NaN value when either equals 1.
#[must_use]
pub fn conditional_correlation(corr: &DMatrix<f64>, i: usize, j: usize, k: usize) -> f64 {
    let (ij, ik, kj) = (corr[(i, j)], corr[(i, k)], corr[(k, j)]);
    let denominator = ik.mul_add(-ik, 1.0) * kj.mul_add(-kj, 1.0);
    ik.mul_add(-kj, ij) / denominator.sqrt()
}

/// The `p x p x p` tensor of `d(i, j | k)` values.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyTensor {
    p: usize,
    values: Vec<f64>,
}

impl DependencyTensor {
    /// Compute the tensor for `corr`, sentinel included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if `corr` is not square.
    pub fn from_correlation(corr: &DMatrix<f64>) -> Result<Self> {
        let p = ensure_square(corr)?;
        let mut tensor = Self {
            p,
            values: vec![0.0; p * p * p],
        };

        for i in 0..p {
            for j in 0..p {
                if i == j {
                    continue;
                }
                for k in 0..p {
                    if k == i || k == j {
                        continue;
                    }
                    let value = corr[(i, j)] - conditional_correlation(corr, i, j, k);
                    tensor.set(i, j, k, value);
                }
            }
        }

        // Sentinel: conditioning a pair on one of its own members.
        for i in 0..p {
            for j in 0..p {
                tensor.set(i, j, j, 1.0);
            }
        }

        Ok(tensor)
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.p
    }

    /// `d(i, j | k)`. Panics if an index is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.values[self.offset(i, j, k)]
    }

    fn set(&mut self, i: usize, j: usize, k: usize, value: f64) {
        let offset = self.offset(i, j, k);
        self.values[offset] = value;
    }

    const fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.p + j) * self.p + k
    }

    /// Aggregate into the directed `p x p` dependency matrix.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aggregate(&self) -> DMatrix<f64> {
        let p = self.p;
        let mut network = DMatrix::zeros(p, p);
        if p < 2 {
            return network;
        }

        let scale = 1.0 / (p - 1) as f64;
        for i in 0..p {
            for k in 0..p {
                if i == k {
                    continue;
                }
                let total: f64 = (0..p).filter(|&j| j != i).map(|j| self.get(i, j, k)).sum();
                network[(k, i)] = total * scale;
            }
        }
        network
    }
}

/// Directed dependency network of `corr`; entry `(k, i)` is the influence
/// of node `k` on node `i`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if `corr` is not square.
#[instrument(skip(corr), fields(p = corr.nrows()))]
pub fn dependency_network(corr: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let tensor = DependencyTensor::from_correlation(corr)?;
    let network = tensor.aggregate();
    debug!(p = tensor.size(), "built dependency network");
    Ok(network)
}
