//! k-nearest-neighbour graph.
//!
//! Every node links to the `k` other nodes it is most correlated with.
//! Edges are undirected and insertion is idempotent, so every node ends up
//! with at least `k` neighbours (more when others pick it as well) and the
//! graph holds between `kp / 2` and `kp` edges.

use nalgebra::DMatrix;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::graph::CorrelationGraph;
use crate::matrix::{ensure_square, ranked_column};

/// Build the k-NN graph of `corr`.
///
/// Node `i` ranks candidates by column `i` of `corr` (descending, ties by
/// lower id) and links to the first `k` that are not `i`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `corr` is not square or `k >= p`.
#[instrument(skip(corr), fields(p = corr.nrows()))]
pub fn knn(corr: &DMatrix<f64>, k: usize) -> Result<CorrelationGraph> {
    let p = ensure_square(corr)?;
    if k >= p {
        return Err(Error::invalid_input(format!(
            "k must be below the node count: k = {k}, p = {p}"
        )));
    }

    let mut graph = CorrelationGraph::with_nodes(p);
    for i in 0..p {
        for j in ranked_column(corr, i)
            .into_iter()
            .filter(|&j| j != i)
            .take(k)
        {
            graph.add_edge(i, j, corr[(i, j)]);
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built k-NN graph"
    );
    Ok(graph)
}
