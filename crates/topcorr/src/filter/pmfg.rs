//! Planar Maximally Filtered Graph (PMFG).
//!
//! Candidate pairs are visited in descending correlation order (see
//! [`ranked_pairs`] for the tie rule). Each pair is added tentatively and
//! kept only if the graph stays planar. Construction stops once the graph
//! holds the planar edge maximum `3p - 6`.
//!
//! The planarity check is injected through [`PlanarityTest`]; [`pmfg`] uses
//! the default [`PathEmbedding`].

use nalgebra::DMatrix;
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::graph::{CorrelationGraph, PathEmbedding, PlanarityTest};
use crate::matrix::{ensure_square, ranked_pairs};

/// Largest edge count of a simple planar graph on `p` nodes.
#[must_use]
pub const fn max_planar_edges(p: usize) -> usize {
    if p < 3 { p * p.saturating_sub(1) / 2 } else { 3 * p - 6 }
}

/// Build the PMFG of `corr` with the default planarity test.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if `corr` is not square.
pub fn pmfg(corr: &DMatrix<f64>) -> Result<CorrelationGraph> {
    pmfg_with(corr, &PathEmbedding)
}

/// Build the PMFG of `corr`, gating every edge on `oracle`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if `corr` is not square.
#[instrument(skip(corr, oracle), fields(p = corr.nrows()))]
pub fn pmfg_with<P>(corr: &DMatrix<f64>, oracle: &P) -> Result<CorrelationGraph>
where
    P: PlanarityTest + ?Sized,
{
    let p = ensure_square(corr)?;
    let target = max_planar_edges(p);
    let mut graph = CorrelationGraph::with_nodes(p);
    let mut rejected = 0_usize;

    for (i, j) in ranked_pairs(corr) {
        if graph.edge_count() >= target {
            break;
        }
        if graph.has_edge(i, j) {
            continue;
        }

        graph.add_edge(i, j, corr[(i, j)]);
        if !graph.is_planar_with(oracle) {
            graph.remove_edge(i, j);
            rejected += 1;
            trace!(i, j, "edge breaks planarity");
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        rejected,
        "built PMFG"
    );
    Ok(graph)
}
