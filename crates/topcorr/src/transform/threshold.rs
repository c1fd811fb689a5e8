//! Elementwise threshold mask.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// How [`threshold`] compares and rewrites entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOptions {
    /// Replace every surviving nonzero entry by `1.0`. Default: false.
    #[serde(default)]
    pub binary: bool,
    /// Compare `|value|` instead of `value`. Default: true.
    #[serde(default = "default_true")]
    pub absolute: bool,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            binary: false,
            absolute: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Zero every entry below `level` and optionally binarise the rest.
///
/// NaN entries never compare below `level`, so they survive untouched. The
/// input may have any shape.
///
/// Applying the same threshold twice gives the same matrix as applying it
/// once, provided `level <= 1` whenever `binary` is set.
#[must_use]
pub fn threshold(matrix: &DMatrix<f64>, level: f64, options: ThresholdOptions) -> DMatrix<f64> {
    matrix.map(|value| {
        let compared = if options.absolute { value.abs() } else { value };
        if compared < level {
            0.0
        } else if options.binary && value.abs() > 0.0 {
            1.0
        } else {
            value
        }
    })
}
