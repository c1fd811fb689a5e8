//! Matrix-to-matrix transforms.
//!
//! - [`threshold`](threshold::threshold): elementwise mask, any shape.
//! - [`partial_correlation`](partial::partial_correlation): precision-based
//!   partial correlation; needs an invertible matrix.
//! - [`dependency_network`](dependency::dependency_network): directed
//!   influence matrix built from first-order partial correlations.

pub mod dependency;
pub mod partial;
pub mod threshold;

pub use dependency::{DependencyTensor, conditional_correlation, dependency_network};
pub use partial::{partial_correlation, partial_correlation_with};
pub use threshold::{ThresholdOptions, threshold};
