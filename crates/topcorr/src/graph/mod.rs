//! Weighted undirected graph returned by every backbone filter.
//!
//! # Overview
//!
//! [`CorrelationGraph`] wraps a petgraph [`UnGraph`] whose node `i` carries
//! the id `i`, so node ids and petgraph indices always agree. Edge weights
//! are the raw correlation values, never their absolute value.
//!
//! Edge insertion is idempotent: adding an existing pair overwrites its
//! weight and leaves the edge count unchanged. Inserting an edge whose
//! endpoint is past the current node range grows the node set to cover it.
//!
//! ## Planarity
//!
//! Planarity is a pluggable capability ([`PlanarityTest`]). The default
//! [`PathEmbedding`] test is used by [`CorrelationGraph::is_planar`]; the PMFG
//! builder accepts any other implementation.

#![allow(clippy::module_name_repetitions)]

pub mod planarity;

pub use planarity::{PathEmbedding, PlanarityTest};

use nalgebra::DMatrix;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One undirected edge, reported with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Sparse backbone graph over nodes `0..p`.
#[derive(Debug, Clone, Default)]
pub struct CorrelationGraph {
    graph: UnGraph<usize, f64>,
}

impl CorrelationGraph {
    /// Create an empty graph with no nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with isolated nodes `0..p`.
    #[must_use]
    pub fn with_nodes(p: usize) -> Self {
        let mut graph = UnGraph::with_capacity(p, 0);
        for id in 0..p {
            graph.add_node(id);
        }
        Self { graph }
    }

    /// Ensure node `id` exists, adding every missing id up to it.
    pub fn add_node(&mut self, id: usize) {
        while self.graph.node_count() <= id {
            let next = self.graph.node_count();
            self.graph.add_node(next);
        }
    }

    /// Insert or update the undirected edge `u - v`.
    ///
    /// Returns `true` when the edge is new, `false` when an existing edge's
    /// weight was overwritten.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) -> bool {
        self.add_node(u.max(v));
        let (a, b) = (NodeIndex::new(u), NodeIndex::new(v));
        if let Some(edge) = self.graph.find_edge(a, b) {
            self.graph[edge] = weight;
            false
        } else {
            self.graph.add_edge(a, b, weight);
            true
        }
    }

    /// Remove the edge `u - v`, returning its weight if it existed.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Option<f64> {
        let edge = self.find(u, v)?;
        self.graph.remove_edge(edge)
    }

    #[must_use]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.find(u, v).is_some()
    }

    /// Weight of the edge `u - v`, if present.
    #[must_use]
    pub fn weight(&self, u: usize, v: usize) -> Option<f64> {
        self.find(u, v).map(|edge| self.graph[edge])
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges in ascending `(source, target)` order with `source < target`.
    #[must_use]
    pub fn edges(&self) -> Vec<WeightedEdge> {
        let mut edges: Vec<WeightedEdge> = self
            .graph
            .edge_references()
            .map(|edge| {
                let (a, b) = (edge.source().index(), edge.target().index());
                WeightedEdge {
                    source: a.min(b),
                    target: a.max(b),
                    weight: *edge.weight(),
                }
            })
            .collect();
        edges.sort_by_key(|edge| (edge.source, edge.target));
        edges
    }

    /// Neighbours of `u` in ascending order. Unknown nodes have none.
    #[must_use]
    pub fn neighbors(&self, u: usize) -> Vec<usize> {
        if u >= self.node_count() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(u))
            .map(NodeIndex::index)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    #[must_use]
    pub fn degree(&self, u: usize) -> usize {
        self.neighbors(u).len()
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// `true` when every node is reachable from every other node.
    ///
    /// Graphs with zero or one node count as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        connected_components(&self.graph) <= 1
    }

    /// `true` when the graph is a forest.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_undirected(&self.graph)
    }

    /// Planarity under the default [`PathEmbedding`] test.
    #[must_use]
    pub fn is_planar(&self) -> bool {
        self.is_planar_with(&PathEmbedding)
    }

    /// Planarity under a caller-supplied test.
    #[must_use]
    pub fn is_planar_with<P: PlanarityTest + ?Sized>(&self, oracle: &P) -> bool {
        oracle.is_planar(&self.graph)
    }

    /// Dense symmetric `p x p` weight matrix; absent edges are zero.
    #[must_use]
    pub fn to_adjacency_matrix(&self) -> DMatrix<f64> {
        let p = self.node_count();
        let mut matrix = DMatrix::zeros(p, p);
        for edge in self.edges() {
            matrix[(edge.source, edge.target)] = edge.weight;
            matrix[(edge.target, edge.source)] = edge.weight;
        }
        matrix
    }

    /// Borrow the underlying petgraph value.
    #[must_use]
    pub const fn inner(&self) -> &UnGraph<usize, f64> {
        &self.graph
    }

    fn find(&self, u: usize, v: usize) -> Option<petgraph::graph::EdgeIndex> {
        let p = self.node_count();
        if u >= p || v >= p {
            return None;
        }
        self.graph.find_edge(NodeIndex::new(u), NodeIndex::new(v))
    }
}

impl PartialEq for CorrelationGraph {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count() && self.edges() == other.edges()
    }
}

impl Serialize for CorrelationGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CorrelationGraph", 2)?;
        state.serialize_field("nodes", &self.node_count())?;
        state.serialize_field("edges", &self.edges())?;
        state.end()
    }
}
