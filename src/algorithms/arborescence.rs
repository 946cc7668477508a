// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Minimum spanning arborescence (Chu-Liu/Edmonds)
//!
//! Each recursion level is a small graph of [`ClusterNode`]s. When the
//! cheapest incoming arcs of a level close a cycle, the cycle is contracted
//! into one cluster, arcs entering it are re-weighted by the reduced-cost
//! rule, and the contracted level is solved recursively. On the way back
//! the cluster is expanded: every cycle arc is kept except the one into the
//! member that the chosen entering arc now feeds.
//!
//! Every contraction removes at least one node, so the depth is bounded
//! by the node count.

use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph, NodeIndex};
use crate::traversal::reachable_from;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A node of one contraction level: the original nodes it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterNode {
    members: Vec<NodeIndex>,
}

impl ClusterNode {
    fn single(node: NodeIndex) -> Self {
        Self { members: vec![node] }
    }

    /// Original nodes merged into this cluster, never empty
    #[must_use]
    pub fn members(&self) -> &[NodeIndex] {
        &self.members
    }

    /// Does this cluster stand for a contracted cycle?
    #[must_use]
    pub fn is_contracted(&self) -> bool {
        self.members.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arc {
    source: usize,
    target: usize,
    weight: i64,
}

#[derive(Debug, Clone)]
struct Level {
    clusters: Vec<ClusterNode>,
    root: usize,
    arcs: Vec<Arc>,
}

/// A contracted level plus what is needed to expand its solution
#[derive(Debug)]
struct Contraction {
    level: Level,
    /// `origin[k]` is the parent-level arc that contracted arc `k` stands for
    origin: Vec<usize>,
    cycle: Vec<usize>,
}

impl Level {
    /// Index of the cheapest arc entering each non-root cluster; the first
    /// arc wins on ties
    fn cheapest_incoming(&self) -> Result<Vec<Option<usize>>> {
        let mut best: Vec<Option<usize>> = vec![None; self.clusters.len()];
        for (k, arc) in self.arcs.iter().enumerate() {
            if arc.target == self.root || arc.source == arc.target {
                continue;
            }
            match best[arc.target] {
                Some(b) if self.arcs[b].weight <= arc.weight => {}
                _ => best[arc.target] = Some(k),
            }
        }

        if let Some(orphan) = (0..self.clusters.len()).find(|&v| v != self.root && best[v].is_none()) {
            return Err(GraphError::Precondition(format!(
                "nodes {:?} have no incoming edge",
                self.clusters[orphan].members
            )));
        }
        Ok(best)
    }

    /// One cycle formed by the chosen arcs, listed along arc direction
    fn find_cycle(&self, best: &[Option<usize>]) -> Option<Vec<usize>> {
        let parent = |v: usize| best[v].map_or(self.root, |k| self.arcs[k].source);
        let mut stamp = vec![usize::MAX; self.clusters.len()];

        for start in 0..self.clusters.len() {
            let mut v = start;
            while v != self.root && stamp[v] == usize::MAX {
                stamp[v] = start;
                v = parent(v);
            }
            if v == self.root || stamp[v] != start {
                continue;
            }

            let mut cycle = vec![v];
            let mut u = parent(v);
            while u != v {
                cycle.push(u);
                u = parent(u);
            }
            cycle.reverse();
            return Some(cycle);
        }
        None
    }

    /// Merge `cycle` into one cluster appended after the surviving clusters
    fn contract(&self, best: &[Option<usize>], cycle: &[usize]) -> Contraction {
        let n = self.clusters.len();
        let mut in_cycle = vec![false; n];
        for &v in cycle {
            in_cycle[v] = true;
        }

        let mut map = vec![0; n];
        let mut clusters = Vec::with_capacity(n - cycle.len() + 1);
        for v in (0..n).filter(|&v| !in_cycle[v]) {
            map[v] = clusters.len();
            clusters.push(self.clusters[v].clone());
        }
        let merged = clusters.len();
        for &v in cycle {
            map[v] = merged;
        }
        clusters.push(ClusterNode {
            members: cycle
                .iter()
                .flat_map(|&v| self.clusters[v].members.iter().copied())
                .collect(),
        });

        // one arc per ordered pair, keeping the cheapest
        let mut slot: HashMap<(usize, usize), usize> = HashMap::new();
        let mut arcs: Vec<Arc> = Vec::new();
        let mut origin: Vec<usize> = Vec::new();
        for (k, arc) in self.arcs.iter().enumerate() {
            let (source, target) = (map[arc.source], map[arc.target]);
            if source == target {
                continue;
            }
            let weight = match best[arc.target] {
                Some(b) if in_cycle[arc.target] => arc.weight - self.arcs[b].weight,
                _ => arc.weight,
            };
            let contracted = Arc { source, target, weight };
            match slot.get(&(source, target)) {
                Some(&i) if arcs[i].weight <= weight => {}
                Some(&i) => {
                    arcs[i] = contracted;
                    origin[i] = k;
                }
                None => {
                    slot.insert((source, target), arcs.len());
                    arcs.push(contracted);
                    origin.push(k);
                }
            }
        }

        Contraction {
            level: Level {
                clusters,
                root: map[self.root],
                arcs,
            },
            origin,
            cycle: cycle.to_vec(),
        }
    }

    /// Map a solution of the contracted level back onto this level's arcs
    fn expand(&self, best: &[Option<usize>], contraction: &Contraction, solution: &[usize]) -> Vec<usize> {
        let mut chosen: Vec<usize> = solution.iter().map(|&k| contraction.origin[k]).collect();
        let entered = chosen
            .iter()
            .map(|&k| self.arcs[k].target)
            .find(|t| contraction.cycle.contains(t));

        for &v in &contraction.cycle {
            if Some(v) == entered {
                trace!(member = v, "expand: replacing cycle arc");
                continue;
            }
            if let Some(k) = best[v] {
                chosen.push(k);
            }
        }
        chosen
    }

    fn solve(&self, depth: usize) -> Result<Vec<usize>> {
        let best = self.cheapest_incoming()?;
        let Some(cycle) = self.find_cycle(&best) else {
            return Ok(best.into_iter().flatten().collect());
        };

        let contraction = self.contract(&best, &cycle);
        debug!(
            depth,
            clusters = contraction.level.clusters.len(),
            members = ?contraction.level.clusters[contraction.level.clusters.len() - 1].members,
            "contracted cycle"
        );
        let solution = contraction.level.solve(depth + 1)?;
        Ok(self.expand(&best, &contraction, &solution))
    }
}

/// Minimum-weight spanning arborescence.
///
/// With `root` given, that node must reach every other node; otherwise the
/// lowest-indexed node that does is used. Fails with
/// [`GraphError::NoSpanningArborescence`] when no such root exists. The
/// result holds the same nodes and only the arborescence edges.
pub fn chu_liu_edmonds<P: Clone>(graph: &Graph<P>, root: Option<NodeIndex>) -> Result<Graph<P>> {
    let n = graph.len();
    let mut tree = Graph::with_nodes_of(graph);
    if n == 0 && root.is_none() {
        return Ok(tree);
    }

    let spans = |r: NodeIndex| reachable_from(graph, r).len() == n;
    let root = match root {
        Some(r) => {
            graph.ensure_node(r)?;
            if !spans(r) {
                return Err(GraphError::NoSpanningArborescence { root: Some(r) });
            }
            r
        }
        None => (0..n)
            .find(|&r| spans(r))
            .ok_or(GraphError::NoSpanningArborescence { root: None })?,
    };

    let edges: Vec<Edge> = graph.arcs();
    let level = Level {
        clusters: (0..n).map(ClusterNode::single).collect(),
        root,
        arcs: edges
            .iter()
            .map(|e| Arc {
                source: e.source,
                target: e.target,
                weight: i64::from(e.weight),
            })
            .collect(),
    };

    for k in level.solve(0)? {
        let edge = edges[k];
        tree.connect(edge.source, edge.target, edge.weight);
    }
    debug!(root, weight = tree.total_weight(), "arborescence found");
    Ok(tree)
}
