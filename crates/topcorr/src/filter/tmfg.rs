//! Triangulated Maximally Filtered Graph (TMFG).
//!
//! # Algorithm
//!
//! 1. Rank nodes by centrality (column sums of the selection matrix) and
//!    seed a tetrahedron on the top four.
//! 2. Keep the exposed triangular faces in an ordered set.
//! 3. While nodes remain, find the `(face, node)` pair with the largest sum
//!    of selection weights between the node and the face's three members,
//!    connect the node to that face and replace the face by the three new
//!    faces it creates.
//!
//! The result is a maximal planar graph with exactly `3p - 6` edges.
//!
//! ## Determinism
//!
//! - Seed ranking: descending centrality, ties by lower node id.
//! - Faces are visited in ascending order of their sorted triples and
//!   candidate nodes in ascending id order; the first maximum wins at both
//!   levels.
//! - Sums are compared with `>`, so a NaN sum never displaces a candidate.

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::graph::CorrelationGraph;
use crate::matrix::ensure_square;

/// An exposed triangular face, stored as sorted node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Face([usize; 3]);

impl Face {
    /// Build a face from three distinct node ids in any order.
    #[must_use]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        let mut nodes = [a, b, c];
        nodes.sort_unstable();
        Self(nodes)
    }

    /// Build a face from a slice that must hold exactly three distinct ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other arity or repeated ids.
    pub fn from_slice(nodes: &[usize]) -> Result<Self> {
        let &[a, b, c] = nodes else {
            return Err(Error::invalid_argument(format!(
                "a face needs exactly 3 nodes, got {}",
                nodes.len()
            )));
        };
        if a == b || b == c || a == c {
            return Err(Error::invalid_argument(format!(
                "face nodes must be distinct, got {nodes:?}"
            )));
        }
        Ok(Self::new(a, b, c))
    }

    #[must_use]
    pub const fn nodes(&self) -> [usize; 3] {
        self.0
    }

    /// The three faces created by placing `node` inside this face.
    #[must_use]
    pub const fn split(&self, node: usize) -> [Self; 3] {
        let [a, b, c] = self.0;
        [
            Self::sorted_with(node, a, b),
            Self::sorted_with(node, a, c),
            Self::sorted_with(node, b, c),
        ]
    }

    /// `lo < hi` is already known; place `node` among them.
    const fn sorted_with(node: usize, lo: usize, hi: usize) -> Self {
        if node < lo {
            Self([node, lo, hi])
        } else if node < hi {
            Self([lo, node, hi])
        } else {
            Self([lo, hi, node])
        }
    }
}

/// Build the TMFG of `corr`.
///
/// With `absolute` set, node and face selection uses `|corr|`; edge
/// weights are always the raw entries of `corr`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `corr` is not square or has fewer than
/// four rows.
#[instrument(skip(corr), fields(p = corr.nrows()))]
pub fn tmfg(corr: &DMatrix<f64>, absolute: bool) -> Result<CorrelationGraph> {
    let p = ensure_square(corr)?;
    if p < 4 {
        warn!(p, "TMFG needs at least 4 nodes");
        return Err(Error::invalid_input(format!(
            "TMFG needs at least 4 nodes, got {p}"
        )));
    }

    let selection = if absolute { corr.abs() } else { corr.clone() };
    let (graph, faces) = grow(corr, &selection)?;

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        faces = faces.len(),
        "built TMFG"
    );
    Ok(graph)
}

/// Nodes ordered by descending column sum, ties by lower id.
#[must_use]
pub fn centrality_order(selection: &DMatrix<f64>) -> Vec<usize> {
    let centrality: Vec<f64> = (0..selection.ncols())
        .map(|j| selection.column(j).sum())
        .collect();
    let mut order: Vec<usize> = (0..centrality.len()).collect();
    order.sort_by(|a, b| centrality[*b].total_cmp(&centrality[*a]));
    order
}

/// Connect `node` to every member of `attach` with weights from `corr`.
///
/// `attach` holds either the two partners used while seeding the
/// tetrahedron or the three members of a face.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `attach` has a size other than 2 or
/// 3, repeats a node, or contains `node` itself.
pub fn insert_node(
    graph: &mut CorrelationGraph,
    corr: &DMatrix<f64>,
    node: usize,
    attach: &[usize],
) -> Result<()> {
    if !(2..=3).contains(&attach.len()) {
        return Err(Error::invalid_argument(format!(
            "a node attaches to 2 or 3 nodes, got {}",
            attach.len()
        )));
    }
    if attach.contains(&node) {
        return Err(Error::invalid_argument(format!(
            "node {node} cannot attach to itself"
        )));
    }
    if attach.iter().enumerate().any(|(i, v)| attach[..i].contains(v)) {
        return Err(Error::invalid_argument(format!(
            "attachment nodes must be distinct, got {attach:?}"
        )));
    }

    for &other in attach {
        graph.add_edge(node, other, corr[(node, other)]);
    }
    Ok(())
}

/// Best not-yet-placed node for `face`: `(node, gain)`.
fn best_candidate(
    face: Face,
    remaining: &[usize],
    selection: &DMatrix<f64>,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for &node in remaining {
        let gain: f64 = face.nodes().iter().map(|&m| selection[(m, node)]).sum();
        if best.is_none_or(|(_, top)| gain > top) {
            best = Some((node, gain));
        }
    }
    best
}

fn grow(
    corr: &DMatrix<f64>,
    selection: &DMatrix<f64>,
) -> Result<(CorrelationGraph, BTreeSet<Face>)> {
    let p = corr.nrows();
    let order = centrality_order(selection);
    let [s0, s1, s2, s3] = [order[0], order[1], order[2], order[3]];

    let mut graph = CorrelationGraph::with_nodes(p);
    graph.add_edge(s0, s1, corr[(s0, s1)]);
    insert_node(&mut graph, corr, s2, &[s0, s1])?;
    insert_node(&mut graph, corr, s3, &[s0, s1, s2])?;

    let mut faces: BTreeSet<Face> = [
        Face::new(s0, s1, s3),
        Face::new(s1, s2, s3),
        Face::new(s0, s2, s3),
        Face::new(s0, s1, s2),
    ]
    .into_iter()
    .collect();

    let seeds = [s0, s1, s2, s3];
    let mut remaining: Vec<usize> = (0..p).filter(|v| !seeds.contains(v)).collect();

    while !remaining.is_empty() {
        let mut best: Option<(Face, usize, f64)> = None;
        for &face in &faces {
            let Some((node, gain)) = best_candidate(face, &remaining, selection) else {
                continue;
            };
            if best.is_none_or(|(_, _, top)| gain > top) {
                best = Some((face, node, gain));
            }
        }

        let Some((face, node, _)) = best else {
            break;
        };
        insert_node(&mut graph, corr, node, &face.nodes())?;
        faces.remove(&face);
        faces.extend(face.split(node));
        remaining.retain(|&v| v != node);
    }

    Ok((graph, faces))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_matrix(inner: f64, last: [f64; 4]) -> DMatrix<f64> {
        let mut m = DMatrix::from_element(5, 5, inner);
        m.fill_diagonal(1.0);
        for (i, value) in last.iter().enumerate() {
            m[(4, i)] = *value;
            m[(i, 4)] = *value;
        }
        m
    }

    #[test]
    fn face_is_canonical() {
        assert_eq!(Face::new(3, 1, 2), Face::new(1, 2, 3));
        assert_eq!(Face::new(9, 4, 7).nodes(), [4, 7, 9]);
    }

    #[test]
    fn face_split_produces_sorted_faces() {
        let faces = Face::new(2, 5, 8).split(6);
        assert_eq!(
            faces,
            [Face::new(2, 5, 6), Face::new(2, 6, 8), Face::new(5, 6, 8)]
        );
        let faces = Face::new(2, 5, 8).split(0);
        assert_eq!(faces[0].nodes(), [0, 2, 5]);
        let faces = Face::new(2, 5, 8).split(9);
        assert_eq!(faces[2].nodes(), [5, 8, 9]);
    }

    #[test]
    fn face_from_slice_checks_arity() {
        assert!(matches!(
            Face::from_slice(&[1, 2]),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Face::from_slice(&[1, 2, 3, 4]),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Face::from_slice(&[1, 1, 3]),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(Face::from_slice(&[3, 2, 1]).unwrap(), Face::new(1, 2, 3));
    }

    #[test]
    fn insert_node_rejects_malformed_arguments() {
        let corr = DMatrix::<f64>::identity(5, 5);
        let mut graph = CorrelationGraph::with_nodes(5);
        for attach in [&[1][..], &[1, 2, 3, 4][..], &[0, 1][..], &[1, 1, 2][..]] {
            let err = insert_node(&mut graph, &corr, 0, attach).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }), "{attach:?}");
        }
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn rejects_fewer_than_four_nodes() {
        let corr = DMatrix::<f64>::identity(3, 3);
        assert!(matches!(tmfg(&corr, false), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn rejects_non_square_input() {
        let corr = DMatrix::<f64>::zeros(4, 5);
        assert!(matches!(tmfg(&corr, false), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn four_nodes_give_k4_with_raw_weights() {
        let corr = DMatrix::from_row_slice(
            4,
            4,
            &[
                1.0, -0.2, 0.3, 0.4, //
                -0.2, 1.0, 0.5, 0.6, //
                0.3, 0.5, 1.0, 0.7, //
                0.4, 0.6, 0.7, 1.0,
            ],
        );
        let graph = tmfg(&corr, true).unwrap();
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.weight(0, 1), Some(-0.2));
        assert_eq!(graph.weight(2, 3), Some(0.7));
    }

    #[test]
    fn fifth_node_joins_its_strongest_face() {
        let corr = block_matrix(0.5, [0.1, 0.2, 0.3, 0.05]);
        let graph = tmfg(&corr, false).unwrap();
        assert_eq!(graph.edge_count(), 9);
        assert_eq!(graph.neighbors(4), vec![0, 1, 2]);
        assert_eq!(graph.weight(4, 2), Some(0.3));
    }

    #[test]
    fn absolute_flag_changes_selection_but_not_weights() {
        let corr = block_matrix(0.7, [-0.9, -0.8, 0.1, 0.2]);

        let raw = tmfg(&corr, false).unwrap();
        assert_eq!(raw.neighbors(4), vec![1, 2, 3]);
        assert_eq!(raw.weight(4, 1), Some(-0.8));

        let abs = tmfg(&corr, true).unwrap();
        assert_eq!(abs.neighbors(4), vec![0, 1, 3]);
        assert_eq!(abs.weight(4, 0), Some(-0.9));
    }

    #[test]
    fn strongly_negative_sums_still_place_every_node() {
        let corr = block_matrix(0.5, [-0.9, -0.9, -0.9, -0.9]);
        let graph = tmfg(&corr, false).unwrap();
        assert_eq!(graph.edge_count(), 9);
        // All faces tie; the lowest sorted triple wins.
        assert_eq!(graph.neighbors(4), vec![0, 1, 2]);
    }

    #[test]
    fn centrality_ties_prefer_lower_ids() {
        let mut m = DMatrix::from_element(6, 6, 0.25);
        m.fill_diagonal(1.0);
        assert_eq!(centrality_order(&m), vec![0, 1, 2, 3, 4, 5]);
        m[(5, 0)] = 0.5;
        m[(0, 5)] = 0.5;
        assert_eq!(&centrality_order(&m)[..2], &[0, 5]);
    }

    #[test]
    fn face_count_tracks_inserted_nodes() {
        let p = 9;
        let corr = DMatrix::from_fn(p, p, |i, j| {
            if i == j {
                1.0
            } else {
                1.0 / (1.0 + (i as f64 - j as f64).abs())
            }
        });
        let (graph, faces) = grow(&corr, &corr).unwrap();
        assert_eq!(faces.len(), 2 * p - 4);
        assert_eq!(graph.edge_count(), 3 * p - 6);
        assert!(graph.is_planar());

        // Every face is a triangle of the graph.
        for face in &faces {
            let [a, b, c] = face.nodes();
            assert!(graph.has_edge(a, b) && graph.has_edge(b, c) && graph.has_edge(a, c));
        }
    }
}
