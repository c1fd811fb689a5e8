//! Maximum-weight spanning tree.
//!
//! Kruskal's algorithm run on descending correlation: the heaviest pair that
//! joins two different components is accepted until `p - 1` edges exist.
//! Components are tracked with petgraph's [`UnionFind`].
//!
//! This is the tree correlation-network literature usually calls the
//! "minimum spanning tree" (on the distance `sqrt(2(1 - rho))`). On raw
//! correlations the same tree is the *maximum*-weight one, which is what is
//! computed here.

use nalgebra::DMatrix;
use petgraph::unionfind::UnionFind;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::graph::CorrelationGraph;
use crate::matrix::{ensure_square, ranked_pairs};

/// Build the maximum-weight spanning tree of `corr`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if `corr` is not square.
#[instrument(skip(corr), fields(p = corr.nrows()))]
pub fn maximum_spanning_tree(corr: &DMatrix<f64>) -> Result<CorrelationGraph> {
    let p = ensure_square(corr)?;
    let mut graph = CorrelationGraph::with_nodes(p);
    let target = p.saturating_sub(1);
    let mut components: UnionFind<usize> = UnionFind::new(p);

    for (i, j) in ranked_pairs(corr) {
        if graph.edge_count() >= target {
            break;
        }
        // `union` is false when i and j already share a component.
        if components.union(i, j) {
            graph.add_edge(i, j, corr[(i, j)]);
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        weight = graph.total_weight(),
        "built maximum spanning tree"
    );
    Ok(graph)
}
