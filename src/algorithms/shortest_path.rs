// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shortest paths: Dijkstra, Bellman-Ford and Floyd-Warshall
//!
//! Distances are accumulated in `i64` so that no sum of two edge weights
//! can overflow; `UNREACHED` stands in for infinity and is never added to.

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeIndex, Weight};
use crate::path::Path;
use tracing::{debug, trace};

const UNREACHED: i64 = i64::MAX;

/// Rebuild the walk `start -> end` from a predecessor array.
/// Empty when `end` was never reached.
fn walk_back<P>(graph: &Graph<P>, prev: &[Option<NodeIndex>], start: NodeIndex, end: NodeIndex) -> Path {
    if start == end {
        return Path::starting_at(start);
    }
    if prev[end].is_none() {
        return Path::new();
    }

    let mut nodes = vec![end];
    let mut current = end;
    while let Some(p) = prev[current] {
        nodes.push(p);
        if p == start || nodes.len() > graph.len() {
            break;
        }
        current = p;
    }
    nodes.reverse();

    let mut path = Path::new();
    let mut previous: Option<NodeIndex> = None;
    for node in nodes {
        let weight = previous.and_then(|p| graph.cost(p, node)).unwrap_or_default();
        path.push(node, weight);
        previous = Some(node);
    }
    path
}

/// Single-pair shortest path with the array-based O(V²) Dijkstra.
///
/// Weights are assumed non-negative. Returns an empty path when `end` is
/// unreachable from `start`.
pub fn dijkstra<P>(graph: &Graph<P>, start: NodeIndex, end: NodeIndex) -> Result<Path> {
    graph.ensure_node(start)?;
    graph.ensure_node(end)?;

    let n = graph.len();
    let mut distances = vec![UNREACHED; n];
    let mut prev = vec![None; n];
    let mut settled = vec![false; n];
    distances[start] = 0;

    while let Some(u) = (0..n)
        .filter(|&i| !settled[i] && distances[i] != UNREACHED)
        .min_by_key(|&i| distances[i])
    {
        if u == end {
            break;
        }
        settled[u] = true;

        for v in graph.successors(u) {
            if settled[v] {
                continue;
            }
            let Some(w) = graph.cost(u, v) else { continue };
            let candidate = distances[u] + i64::from(w);
            if candidate < distances[v] {
                trace!(u, v, candidate, "relaxed");
                distances[v] = candidate;
                prev[v] = Some(u);
            }
        }
    }

    let path = walk_back(graph, &prev, start, end);
    debug!(start, end, hops = path.len(), "dijkstra finished");
    Ok(path)
}

/// Single-pair shortest path tolerating negative weights.
///
/// Runs `V - 1` relaxation rounds plus one detection pass; any improvement
/// in the detection pass means a negative cycle is reachable from `start`
/// and fails with [`GraphError::NegativeCycle`]. Returns an empty path when
/// `end` is unreachable.
pub fn bellman_ford<P>(graph: &Graph<P>, start: NodeIndex, end: NodeIndex) -> Result<Path> {
    graph.ensure_node(start)?;
    graph.ensure_node(end)?;

    let n = graph.len();
    let arcs: Vec<(NodeIndex, NodeIndex, i64)> = graph
        .arcs()
        .into_iter()
        .filter_map(|e| graph.cost(e.source, e.target).map(|w| (e.source, e.target, i64::from(w))))
        .collect();

    let mut distances = vec![UNREACHED; n];
    let mut prev = vec![None; n];
    distances[start] = 0;

    for round in 1..n {
        let mut changed = false;
        for &(u, v, w) in &arcs {
            if distances[u] == UNREACHED {
                continue;
            }
            let candidate = distances[u] + w;
            if candidate < distances[v] {
                distances[v] = candidate;
                prev[v] = Some(u);
                changed = true;
            }
        }
        if !changed {
            trace!(round, "bellman-ford converged early");
            break;
        }
    }

    let negative_cycle = arcs
        .iter()
        .any(|&(u, v, w)| distances[u] != UNREACHED && distances[u] + w < distances[v]);
    if negative_cycle {
        return Err(GraphError::NegativeCycle { start });
    }

    Ok(walk_back(graph, &prev, start, end))
}

/// All-pairs predecessor table produced by [`floyd_warshall`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllPairs {
    predecessors: Vec<Vec<Option<NodeIndex>>>,
    costs: Vec<Vec<Option<Weight>>>,
}

impl AllPairs {
    /// Last hop before `j` on the shortest `i -> j` path; `None` if `j` is
    /// unreachable from `i` (or `i == j`)
    #[must_use]
    pub fn predecessor(&self, i: NodeIndex, j: NodeIndex) -> Option<NodeIndex> {
        self.predecessors.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    /// The whole predecessor matrix
    #[must_use]
    pub fn predecessors(&self) -> &[Vec<Option<NodeIndex>>] {
        &self.predecessors
    }

    /// Shortest path `i -> j`; empty when unreachable or out of range
    #[must_use]
    pub fn path(&self, i: NodeIndex, j: NodeIndex) -> Path {
        let n = self.predecessors.len();
        if i >= n || j >= n {
            return Path::new();
        }
        if i == j {
            return Path::starting_at(i);
        }

        let mut nodes = vec![j];
        let mut current = j;
        while current != i {
            match self.predecessor(i, current) {
                Some(p) if nodes.len() <= n => {
                    nodes.push(p);
                    current = p;
                }
                _ => return Path::new(),
            }
        }
        nodes.reverse();

        let weights = nodes
            .windows(2)
            .map(|pair| self.costs[pair[0]][pair[1]].unwrap_or_default())
            .collect();
        Path::from_parts(nodes, weights).unwrap_or_default()
    }
}

/// All-pairs shortest paths with the Floyd-Warshall triple loop.
///
/// On an unweighted graph every edge counts as 1.
#[must_use]
pub fn floyd_warshall<P>(graph: &Graph<P>) -> AllPairs {
    let n = graph.len();
    let mut distances = vec![vec![UNREACHED; n]; n];
    let mut predecessors = vec![vec![None; n]; n];
    let mut costs = vec![vec![None; n]; n];

    for i in 0..n {
        distances[i][i] = 0;
    }
    for edge in graph.arcs() {
        let Some(w) = graph.cost(edge.source, edge.target) else { continue };
        costs[edge.source][edge.target] = Some(w);
        if edge.source != edge.target {
            distances[edge.source][edge.target] = i64::from(w);
            predecessors[edge.source][edge.target] = Some(edge.source);
        }
    }

    for k in 0..n {
        for i in 0..n {
            if distances[i][k] == UNREACHED {
                continue;
            }
            for j in 0..n {
                if distances[k][j] == UNREACHED {
                    continue;
                }
                let through = distances[i][k] + distances[k][j];
                if through < distances[i][j] {
                    distances[i][j] = through;
                    predecessors[i][j] = predecessors[k][j];
                }
            }
        }
    }

    debug!(nodes = n, "floyd-warshall finished");
    AllPairs { predecessors, costs }
}
