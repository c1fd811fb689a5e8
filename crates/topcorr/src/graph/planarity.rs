//! Planarity testing.
//!
//! # Overview
//!
//! [`PlanarityTest`] is the capability the PMFG builder depends on. Any
//! correct test can be plugged in; closures of type
//! `Fn(&UnGraph<usize, f64>) -> bool` implement the trait directly.
//!
//! The default [`PathEmbedding`] works in three stages:
//!
//! 1. Cheap bounds: fewer than 9 edges is always planar (K3,3 has 9, K5 has
//!    10); more than `3n - 6` edges never is.
//! 2. Split into biconnected blocks. A graph is planar iff every block is.
//! 3. Embed each block with the Demoucron-Malgrange-Pertuiset fragment
//!    algorithm: start from a cycle, then repeatedly route a path of some
//!    fragment through a face that holds all of its attachment vertices,
//!    always preferring a fragment with a single admissible face.
//!
//! Self-loops and parallel edges are ignored. Cost is O(n * m) per block.

use std::collections::{HashSet, VecDeque};

use fixedbitset::FixedBitSet;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

/// Decides whether an undirected graph admits a planar embedding.
pub trait PlanarityTest {
    fn is_planar(&self, graph: &UnGraph<usize, f64>) -> bool;
}

impl<F> PlanarityTest for F
where
    F: Fn(&UnGraph<usize, f64>) -> bool,
{
    fn is_planar(&self, graph: &UnGraph<usize, f64>) -> bool {
        self(graph)
    }
}

/// Default planarity test (block decomposition + path embedding).
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEmbedding;

impl PlanarityTest for PathEmbedding {
    fn is_planar(&self, graph: &UnGraph<usize, f64>) -> bool {
        let adjacency = simple_adjacency(graph);
        let n = adjacency.len();
        let m = adjacency.iter().map(Vec::len).sum::<usize>() / 2;

        if m < 9 {
            return true;
        }
        if m > 3 * n - 6 {
            return false;
        }

        biconnected_blocks(&adjacency)
            .iter()
            .all(|block| block_is_planar(block))
    }
}

/// Sorted, deduplicated neighbour lists without self-loops.
fn simple_adjacency(graph: &UnGraph<usize, f64>) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); graph.node_count()];
    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a != b {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
        neighbors.dedup();
    }
    adjacency
}

// ---------------------------------------------------------------------------
// Biconnected blocks (Hopcroft-Tarjan, iterative)
// ---------------------------------------------------------------------------

struct Frame {
    node: usize,
    parent: Option<usize>,
    next: usize,
}

/// Edge lists of the biconnected blocks of a simple graph.
fn biconnected_blocks(adjacency: &[Vec<usize>]) -> Vec<Vec<(usize, usize)>> {
    let n = adjacency.len();
    let mut disc: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0_usize; n];
    let mut clock = 0_usize;
    let mut edge_stack: Vec<(usize, usize)> = Vec::new();
    let mut blocks = Vec::new();

    for root in 0..n {
        if disc[root].is_some() || adjacency[root].is_empty() {
            continue;
        }
        disc[root] = Some(clock);
        low[root] = clock;
        clock += 1;
        let mut stack = vec![Frame {
            node: root,
            parent: None,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let v = frame.node;
            if frame.next < adjacency[v].len() {
                let w = adjacency[v][frame.next];
                frame.next += 1;
                if frame.parent == Some(w) {
                    continue;
                }
                match disc[w] {
                    None => {
                        edge_stack.push((v, w));
                        disc[w] = Some(clock);
                        low[w] = clock;
                        clock += 1;
                        stack.push(Frame {
                            node: w,
                            parent: Some(v),
                            next: 0,
                        });
                    }
                    Some(dw) if Some(dw) < disc[v] => {
                        // Back edge to an ancestor.
                        edge_stack.push((v, w));
                        low[v] = low[v].min(dw);
                    }
                    Some(_) => {}
                }
            } else {
                stack.pop();
                let Some(parent) = stack.last().map(|f| f.node) else {
                    continue;
                };
                low[parent] = low[parent].min(low[v]);
                if Some(low[v]) >= disc[parent] {
                    let mut block = Vec::new();
                    while let Some(edge) = edge_stack.pop() {
                        block.push(edge);
                        if edge == (parent, v) {
                            break;
                        }
                    }
                    blocks.push(block);
                }
            }
        }
    }

    blocks
}

// ---------------------------------------------------------------------------
// Path embedding of one biconnected block
// ---------------------------------------------------------------------------

/// A piece of the graph not yet embedded, hanging off embedded vertices.
struct Fragment {
    /// Embedded vertices this fragment touches, sorted.
    attachments: Vec<usize>,
    /// Non-embedded vertices of the fragment; empty for a single chord.
    interior: Vec<usize>,
}

fn block_is_planar(block: &[(usize, usize)]) -> bool {
    if block.len() < 9 {
        return true;
    }

    // Relabel block vertices to 0..k.
    let mut labels: Vec<usize> = block.iter().flat_map(|&(a, b)| [a, b]).collect();
    labels.sort_unstable();
    labels.dedup();
    let local = |v: usize| labels.binary_search(&v).unwrap_or_default();

    let k = labels.len();
    if block.len() > 3 * k - 6 {
        return false;
    }

    let mut adjacency = vec![Vec::new(); k];
    for &(a, b) in block {
        let (a, b) = (local(a), local(b));
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let Some(cycle) = initial_cycle(&adjacency) else {
        return true;
    };

    let mut embedded = FixedBitSet::with_capacity(k);
    let mut embedded_edges: HashSet<(usize, usize)> = HashSet::new();
    for (i, &v) in cycle.iter().enumerate() {
        embedded.insert(v);
        embedded_edges.insert(ordered(v, cycle[(i + 1) % cycle.len()]));
    }
    let mut faces: Vec<Vec<usize>> = vec![cycle.clone(), cycle];

    loop {
        let fragments = collect_fragments(&adjacency, &embedded, &embedded_edges);
        if fragments.is_empty() {
            return true;
        }

        let mut choice: Option<(usize, usize)> = None;
        for (index, fragment) in fragments.iter().enumerate() {
            let admissible: Vec<usize> = faces
                .iter()
                .enumerate()
                .filter(|(_, face)| fragment.attachments.iter().all(|v| face.contains(v)))
                .map(|(f, _)| f)
                .collect();
            match admissible.as_slice() {
                [] => return false,
                [only] => {
                    choice = Some((index, *only));
                    break;
                }
                [first, ..] => {
                    if choice.is_none() {
                        choice = Some((index, *first));
                    }
                }
            }
        }

        let Some((index, face)) = choice else {
            return true;
        };
        let Some(path) = fragment_path(&adjacency, &embedded, &fragments[index]) else {
            // Every fragment of a biconnected block has two attachments.
            return false;
        };

        for window in path.windows(2) {
            embedded_edges.insert(ordered(window[0], window[1]));
        }
        for &v in &path {
            embedded.insert(v);
        }
        let (left, right) = split_face(&faces[face], &path);
        faces[face] = left;
        faces.push(right);
    }
}

const fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// A simple cycle through vertex 0 and its first neighbour.
fn initial_cycle(adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
    let start = 0;
    let first = *adjacency.first()?.first()?;

    // Shortest path first -> start that avoids the edge start - first.
    let mut parent: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut seen = FixedBitSet::with_capacity(adjacency.len());
    seen.insert(first);
    let mut queue = VecDeque::from([first]);

    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if v == first && w == start {
                continue;
            }
            if seen.put(w) {
                continue;
            }
            parent[w] = Some(v);
            if w == start {
                let mut cycle = vec![start];
                let mut cursor = start;
                while let Some(prev) = parent[cursor] {
                    cycle.push(prev);
                    cursor = prev;
                }
                return Some(cycle);
            }
            queue.push_back(w);
        }
    }

    None
}

fn collect_fragments(
    adjacency: &[Vec<usize>],
    embedded: &FixedBitSet,
    embedded_edges: &HashSet<(usize, usize)>,
) -> Vec<Fragment> {
    let mut out = Vec::new();

    // Chords: unembedded edges between embedded vertices.
    for v in embedded.ones() {
        for &w in &adjacency[v] {
            if v < w && embedded.contains(w) && !embedded_edges.contains(&(v, w)) {
                out.push(Fragment {
                    attachments: vec![v, w],
                    interior: Vec::new(),
                });
            }
        }
    }

    // Components of the unembedded vertices, with their attachments.
    let mut visited = FixedBitSet::with_capacity(adjacency.len());
    for start in 0..adjacency.len() {
        if embedded.contains(start) || visited.put(start) {
            continue;
        }
        let mut interior = vec![start];
        let mut attachments = Vec::new();
        let mut cursor = 0;
        while cursor < interior.len() {
            let v = interior[cursor];
            cursor += 1;
            for &w in &adjacency[v] {
                if embedded.contains(w) {
                    attachments.push(w);
                } else if !visited.put(w) {
                    interior.push(w);
                }
            }
        }
        attachments.sort_unstable();
        attachments.dedup();
        out.push(Fragment {
            attachments,
            interior,
        });
    }

    out
}

/// A path through `fragment` joining two distinct attachment vertices.
fn fragment_path(
    adjacency: &[Vec<usize>],
    embedded: &FixedBitSet,
    fragment: &Fragment,
) -> Option<Vec<usize>> {
    if fragment.interior.is_empty() {
        return Some(fragment.attachments.clone());
    }

    let anchor = *fragment.attachments.first()?;
    let mut inside = FixedBitSet::with_capacity(adjacency.len());
    for &v in &fragment.interior {
        inside.insert(v);
    }
    let entry = adjacency[anchor]
        .iter()
        .copied()
        .find(|&w| inside.contains(w))?;

    let mut parent: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut seen = FixedBitSet::with_capacity(adjacency.len());
    seen.insert(entry);
    let mut queue = VecDeque::from([entry]);

    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if embedded.contains(w) {
                if w == anchor {
                    continue;
                }
                let mut path = vec![w, v];
                let mut cursor = v;
                while let Some(prev) = parent[cursor] {
                    path.push(prev);
                    cursor = prev;
                }
                path.push(anchor);
                path.reverse();
                return Some(path);
            }
            if inside.contains(w) && !seen.put(w) {
                parent[w] = Some(v);
                queue.push_back(w);
            }
        }
    }

    None
}

/// Split `face` along `path`, whose endpoints both lie on the face.
fn split_face(face: &[usize], path: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let len = face.len();
    let a = path[0];
    let b = path[path.len() - 1];
    let ia = face.iter().position(|&v| v == a).unwrap_or_default();
    let ib = face.iter().position(|&v| v == b).unwrap_or_default();
    let inner = &path[1..path.len() - 1];

    let walk = |from: usize, to: usize| {
        let mut out = Vec::new();
        let mut i = from;
        loop {
            out.push(face[i]);
            if i == to {
                break;
            }
            i = (i + 1) % len;
        }
        out
    };

    let mut left = walk(ia, ib);
    left.extend(inner.iter().rev());
    let mut right = walk(ib, ia);
    right.extend(inner.iter());
    (left, right)
}
