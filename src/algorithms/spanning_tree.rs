// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Minimum spanning trees: Kruskal and Prim
//!
//! Both treat edge orientation as irrelevant and keep each selected edge's
//! stored orientation and weight in the result. Disconnected input yields
//! a minimum spanning forest.

use crate::graph::{Edge, Graph, NodeIndex, Weight};
use tracing::{debug, trace};

/// Disjoint sets over node indices with path compression and union by size
#[derive(Debug, Clone)]
pub struct TreeRank {
    parent: Vec<NodeIndex>,
    size: Vec<usize>,
}

impl TreeRank {
    /// `n` singleton sets
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Representative of `x`'s set
    pub fn find(&mut self, x: NodeIndex) -> NodeIndex {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`; false if they were already one set
    pub fn union(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }

    /// Size of the set containing `x`
    pub fn size_of(&mut self, x: NodeIndex) -> usize {
        let root = self.find(x);
        self.size[root]
    }
}

/// Minimum spanning forest by Kruskal's algorithm.
///
/// Edges are taken in ascending weight order (row-major order on ties);
/// stops as soon as one tree covers every node.
#[must_use]
pub fn kruskal<P: Clone>(graph: &Graph<P>) -> Graph<P> {
    let mut tree = Graph::with_nodes_of(graph);
    let n = graph.len();
    if n == 0 {
        return tree;
    }

    let mut edges: Vec<Edge> = graph.edges().filter(|e| e.source != e.target).collect();
    edges.sort_by_key(|e| e.weight);

    let mut rank = TreeRank::new(n);
    for edge in edges {
        if !rank.union(edge.source, edge.target) {
            trace!(source = edge.source, target = edge.target, "kruskal: skipped, would close a cycle");
            continue;
        }
        tree.connect(edge.source, edge.target, edge.weight);
        if rank.size_of(edge.source) == n {
            break;
        }
    }

    debug!(nodes = n, edges = tree.edge_count(), "kruskal finished");
    tree
}

/// A candidate edge in Prim's frontier; `far` is its unlinked endpoint
#[derive(Debug, Clone, Copy)]
struct Candidate {
    weight: Weight,
    far: NodeIndex,
    edge: Edge,
}

fn incident<P>(graph: &Graph<P>, node: NodeIndex) -> Vec<Candidate> {
    let mut out = Vec::new();
    for other in graph.neighbors(node) {
        if other == node {
            continue;
        }
        if let Ok(weight) = graph.edge_weight(node, other) {
            out.push(Candidate {
                weight,
                far: other,
                edge: Edge { source: node, target: other, weight },
            });
        }
        if graph.is_directed() {
            if let Ok(weight) = graph.edge_weight(other, node) {
                out.push(Candidate {
                    weight,
                    far: other,
                    edge: Edge { source: other, target: node, weight },
                });
            }
        }
    }
    out
}

/// Minimum spanning forest by Prim's algorithm.
///
/// Grows a tree from the lowest unlinked index, keeping the candidate
/// list sorted ascending; once a node is linked every other candidate
/// into it is pruned.
#[must_use]
pub fn prim<P: Clone>(graph: &Graph<P>) -> Graph<P> {
    let mut tree = Graph::with_nodes_of(graph);
    let n = graph.len();
    let mut linked = vec![false; n];

    for root in 0..n {
        if linked[root] {
            continue;
        }
        linked[root] = true;
        let mut candidates: Vec<Candidate> = Vec::new();
        push_sorted(&mut candidates, incident(graph, root));

        while !candidates.is_empty() {
            let next = candidates.remove(0);
            linked[next.far] = true;
            tree.connect(next.edge.source, next.edge.target, next.edge.weight);
            trace!(source = next.edge.source, target = next.edge.target, weight = next.weight, "prim: linked");

            candidates.retain(|c| c.far != next.far);
            let fresh = incident(graph, next.far).into_iter().filter(|c| !linked[c.far]);
            push_sorted(&mut candidates, fresh);
        }
    }

    debug!(nodes = n, edges = tree.edge_count(), "prim finished");
    tree
}

fn push_sorted(candidates: &mut Vec<Candidate>, fresh: impl IntoIterator<Item = Candidate>) {
    for candidate in fresh {
        let at = candidates.partition_point(|c| c.weight <= candidate.weight);
        candidates.insert(at, candidate);
    }
}
