#![forbid(unsafe_code)]
//! topcorr: sparse backbone graphs from dense correlation matrices.
//!
//! # Overview
//!
//! Given a `p x p` correlation (or similarity) matrix, this crate extracts
//! interpretable dependence structure:
//!
//! - [`filter`]: graph filters (TMFG, PMFG, maximum spanning tree, k-NN).
//! - [`transform`]: matrix transforms (threshold, partial correlation,
//!   dependency network).
//! - [`graph`]: the weighted undirected [`CorrelationGraph`] the filters
//!   return, plus the pluggable planarity test.
//! - [`config`]: a serde-friendly [`FilterConfig`] for choosing a filter at
//!   runtime.
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use topcorr::{tmfg, maximum_spanning_tree};
//!
//! let corr = DMatrix::from_fn(6, 6, |i, j| if i == j { 1.0 } else { 0.5 });
//! let tmfg = tmfg(&corr, false)?;
//! assert_eq!(tmfg.edge_count(), 3 * 6 - 6);
//!
//! let tree = maximum_spanning_tree(&corr)?;
//! assert_eq!(tree.edge_count(), 5);
//! # Ok::<(), topcorr::Error>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: fallible functions return [`Result`] with the typed
//!   [`Error`].
//! - **Logging**: `tracing` spans and events only; the crate never installs
//!   a subscriber.
//! - **Determinism**: every tie is broken by node id or row-major order, so
//!   the same matrix always yields the same graph.

pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod matrix;
pub mod transform;

pub use config::{FilterConfig, Filtered};
pub use error::{Error, ErrorCode, Result};
pub use filter::{knn, maximum_spanning_tree, pmfg, pmfg_with, tmfg};
pub use graph::{CorrelationGraph, PathEmbedding, PlanarityTest, WeightedEdge};
pub use matrix::{LuInverse, MatrixInverse};
pub use transform::{
    DependencyTensor, ThresholdOptions, dependency_network, partial_correlation,
    partial_correlation_with, threshold,
};
