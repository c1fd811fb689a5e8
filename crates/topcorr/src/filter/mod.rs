//! Backbone graph filters.
//!
//! # Overview
//!
//! Each filter turns a dense `p x p` correlation matrix into a sparse
//! [`CorrelationGraph`](crate::graph::CorrelationGraph) on nodes `0..p`:
//!
//! | Filter | Edges | Structure |
//! |--------|-------|-----------|
//! | [`tmfg::tmfg`] | `3p - 6` | maximal planar triangulation |
//! | [`pmfg::pmfg`] | `<= 3p - 6` | greedy planar graph |
//! | [`mst::maximum_spanning_tree`] | `p - 1` | maximum-weight spanning tree |
//! | [`knn::knn`] | `kp/2 ..= kp` | k-nearest-neighbour graph |
//!
//! Edge weights are always the raw correlation entries. Every call owns its
//! working state; nothing is shared between calls.

pub mod knn;
pub mod mst;
pub mod pmfg;
pub mod tmfg;

pub use knn::knn;
pub use mst::maximum_spanning_tree;
pub use pmfg::{max_planar_edges, pmfg, pmfg_with};
pub use tmfg::{Face, tmfg};
