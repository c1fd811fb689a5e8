//! Hand-built matrices with analytically known backbones.
//!
//! Expected values are derived by hand (or by brute force over every
//! candidate structure) and hardcoded, so any change in selection order or
//! tie-breaking shows up here.

use nalgebra::DMatrix;
use petgraph::unionfind::UnionFind;

use topcorr::{
    Error, FilterConfig, dependency_network, knn, maximum_spanning_tree, partial_correlation,
    pmfg, tmfg,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Two tight blocks {0, 1} and {2, 3} with weak cross links.
fn two_pairs() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 0.8, 0.1, 0.2, //
            0.8, 1.0, 0.2, 0.3, //
            0.1, 0.2, 1.0, 0.7, //
            0.2, 0.3, 0.7, 1.0,
        ],
    )
}

fn five_assets() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        5,
        5,
        &[
            1.00, 0.62, 0.15, -0.30, 0.41, //
            0.62, 1.00, 0.27, 0.05, 0.58, //
            0.15, 0.27, 1.00, 0.49, -0.12, //
            -0.30, 0.05, 0.49, 1.00, 0.33, //
            0.41, 0.58, -0.12, 0.33, 1.00,
        ],
    )
}

/// Heaviest spanning tree weight, by trying every 4-edge subset.
fn brute_force_max_tree_weight(corr: &DMatrix<f64>) -> f64 {
    let p = corr.nrows();
    let pairs: Vec<(usize, usize)> = (0..p)
        .flat_map(|i| ((i + 1)..p).map(move |j| (i, j)))
        .collect();
    let mut best = f64::NEG_INFINITY;

    for mask in 0_u32..(1 << pairs.len()) {
        if mask.count_ones() as usize != p - 1 {
            continue;
        }
        let mut components: UnionFind<usize> = UnionFind::new(p);
        let mut weight = 0.0;
        let mut acyclic = true;
        for (bit, &(i, j)) in pairs.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                acyclic &= components.union(i, j);
                weight += corr[(i, j)];
            }
        }
        if acyclic && weight > best {
            best = weight;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Dependency network
// ---------------------------------------------------------------------------

#[test]
fn dependency_network_two_pairs_reference() {
    let network = dependency_network(&two_pairs()).unwrap();
    let expected = [
        [0.0, 0.353_615_866_948_079, 0.333_824_662_688_424, 0.354_778_905_004_398],
        [0.490_649_242_799_142, 0.0, 0.405_775_094_866_168, 0.428_382_955_921_334],
        [0.338_983_943_967_338, 0.357_080_176_148_108, 0.0, 0.362_793_914_359_221],
        [0.388_479_761_300_771, 0.407_650_670_882_438, 0.457_281_706_280_002, 0.0],
    ];
    for (k, row) in expected.iter().enumerate() {
        for (i, value) in row.iter().enumerate() {
            assert!(
                (network[(k, i)] - value).abs() < 1e-12,
                "D[{k}, {i}] = {} (expected {value})",
                network[(k, i)]
            );
        }
    }
}

#[test]
fn dependency_network_partner_dominates_influence() {
    let network = dependency_network(&two_pairs()).unwrap();
    // Nodes 0 and 2 have weak cross links, so their block partner is the
    // strongest influence on them.
    for (node, partner) in [(0, 1), (2, 3)] {
        for other in (0..4).filter(|&o| o != node && o != partner) {
            assert!(
                network[(partner, node)] > network[(other, node)],
                "node {node}: partner {partner} vs {other}"
            );
        }
    }
    // Influence is directed: 1 -> 0 is stronger than 0 -> 1.
    assert!(network[(1, 0)] > network[(0, 1)]);
}

// ---------------------------------------------------------------------------
// Spanning tree
// ---------------------------------------------------------------------------

#[test]
fn spanning_tree_is_maximum_by_brute_force() {
    let corr = five_assets();
    let tree = maximum_spanning_tree(&corr).unwrap();
    assert_eq!(tree.edge_count(), 4);
    assert!(tree.is_connected());
    assert!(tree.is_acyclic());
    assert!((tree.total_weight() - brute_force_max_tree_weight(&corr)).abs() < 1e-12);
}

#[test]
fn spanning_tree_five_assets_edges() {
    // Kruskal on descending weights: 0-1 (.62), 1-4 (.58), 2-3 (.49),
    // 0-4 (.41) closes a cycle, 3-4 (.33) joins the two components.
    let tree = maximum_spanning_tree(&five_assets()).unwrap();
    let pairs: Vec<(usize, usize)> = tree.edges().iter().map(|e| (e.source, e.target)).collect();
    assert_eq!(pairs, vec![(0, 1), (1, 4), (2, 3), (3, 4)]);
}

// ---------------------------------------------------------------------------
// Planar filters
// ---------------------------------------------------------------------------

#[test]
fn tmfg_on_four_nodes_is_complete() {
    let graph = tmfg(&two_pairs(), false).unwrap();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 6);
    for i in 0..4 {
        for j in (i + 1)..4 {
            assert_eq!(graph.weight(i, j), Some(two_pairs()[(i, j)]));
        }
    }
}

#[test]
fn tmfg_five_assets_places_last_node_on_best_face() {
    // Centrality (column sums): 1 = 2.52, 4 = 2.20, 0 = 1.88, 2 = 1.79,
    // 3 = 1.57. Seeds {1, 4, 0, 2}; node 3 joins the face with the largest
    // sum: {1, 2, 4} = 0.05 + 0.49 + 0.33 = 0.87.
    let graph = tmfg(&five_assets(), false).unwrap();
    assert_eq!(graph.edge_count(), 9);
    assert_eq!(graph.neighbors(3), vec![1, 2, 4]);
    assert!(!graph.has_edge(0, 3));
}

#[test]
fn pmfg_five_assets_drops_weakest_pair() {
    let graph = pmfg(&five_assets()).unwrap();
    assert_eq!(graph.edge_count(), 9);
    assert!(!graph.has_edge(0, 3));
    assert!(graph.is_planar());
}

// ---------------------------------------------------------------------------
// Partial correlation and errors
// ---------------------------------------------------------------------------

#[test]
fn partial_correlation_two_pairs_has_unit_diagonal() {
    let pc = partial_correlation(&two_pairs()).unwrap();
    for i in 0..4 {
        assert_eq!(pc[(i, i)], 1.0);
    }
    // Within-block partial correlations stay strong.
    assert!(pc[(0, 1)] > 0.7);
    assert!(pc[(2, 3)] > 0.6);
    assert!((pc[(0, 1)] - pc[(1, 0)]).abs() < 1e-12);
}

#[test]
fn collinear_input_is_singular() {
    // Variable 1 is an exact copy of variable 0. Dyadic entries keep the
    // elimination exact, so the zero pivot is hit exactly.
    let corr = DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 1.0, 0.5, 0.25, //
            1.0, 1.0, 0.5, 0.25, //
            0.5, 0.5, 1.0, 0.5, //
            0.25, 0.25, 0.5, 1.0,
        ],
    );
    assert_eq!(partial_correlation(&corr).unwrap_err(), Error::SingularMatrix);
}

#[test]
fn invalid_inputs_are_reported() {
    let rect = DMatrix::<f64>::zeros(3, 4);
    assert!(matches!(tmfg(&rect, false), Err(Error::InvalidInput { .. })));
    assert!(matches!(pmfg(&rect), Err(Error::InvalidInput { .. })));
    assert!(matches!(maximum_spanning_tree(&rect), Err(Error::InvalidInput { .. })));
    assert!(matches!(knn(&rect, 1), Err(Error::InvalidInput { .. })));
    assert!(matches!(dependency_network(&rect), Err(Error::InvalidInput { .. })));
    assert!(matches!(partial_correlation(&rect), Err(Error::InvalidInput { .. })));

    let err = tmfg(&DMatrix::<f64>::identity(3, 3), true).unwrap_err();
    assert_eq!(err.code().code(), "E1001");
}

#[test]
fn configured_pipeline_matches_direct_calls() {
    let corr = five_assets();
    let config: FilterConfig = serde_json::from_str(r#"{"method": "pmfg"}"#).unwrap();
    let graph = config.apply(&corr).unwrap().into_graph().unwrap();
    assert_eq!(graph, pmfg(&corr).unwrap());
}
