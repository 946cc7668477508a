// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Walks produced by the pathfinding and Eulerian algorithms

use crate::graph::{NodeIndex, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered walk through a graph.
///
/// `weights[i]` annotates the step `nodes[i] -> nodes[i + 1]`. Producers
/// guarantee consecutive nodes are connected; the type does not check it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<NodeIndex>,
    weights: Vec<Weight>,
}

impl Path {
    /// Create an empty path
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a path at `node`
    #[must_use]
    pub fn starting_at(node: NodeIndex) -> Self {
        Self {
            nodes: vec![node],
            weights: Vec::new(),
        }
    }

    /// Append a step to `node` over an edge of weight `weight`.
    /// The first push on an empty path records no weight.
    pub fn push(&mut self, node: NodeIndex, weight: Weight) {
        if !self.nodes.is_empty() {
            self.weights.push(weight);
        }
        self.nodes.push(node);
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the path has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in walk order
    #[must_use]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Per-step weights
    #[must_use]
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// First node
    #[must_use]
    pub fn first(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    /// Last node
    #[must_use]
    pub fn last(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    /// Sum of step weights
    #[must_use]
    pub fn total_weight(&self) -> i64 {
        self.weights.iter().map(|&w| i64::from(w)).sum()
    }

    /// Steps as `(from, to, weight)` triples
    pub fn steps(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, Weight)> + '_ {
        self.nodes
            .windows(2)
            .zip(&self.weights)
            .map(|(pair, &w)| (pair[0], pair[1], w))
    }

    /// Does the walk end where it started?
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.first() == self.last()
    }

    /// Build from nodes and step weights; `None` if the lengths disagree
    #[must_use]
    pub fn from_parts(nodes: Vec<NodeIndex>, weights: Vec<Weight>) -> Option<Self> {
        let expected = nodes.len().saturating_sub(1);
        (weights.len() == expected).then_some(Self { nodes, weights })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.first() else {
            return write!(f, "(empty)");
        };
        write!(f, "{first}")?;
        for (_, to, w) in self.steps() {
            write!(f, " -({w})-> {to}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_records_step_weights() {
        let mut path = Path::new();
        path.push(0, 99);
        path.push(1, 2);
        path.push(3, 5);
        assert_eq!(path.nodes(), &[0, 1, 3]);
        assert_eq!(path.weights(), &[2, 5]);
        assert_eq!(path.total_weight(), 7);
        assert_eq!(path.steps().collect::<Vec<_>>(), vec![(0, 1, 2), (1, 3, 5)]);
    }

    #[test]
    fn test_display() {
        let path = Path::from_parts(vec![0, 1, 2], vec![1, 2]).unwrap();
        insta::assert_snapshot!(path.to_string(), @"0 -(1)-> 1 -(2)-> 2");
        insta::assert_snapshot!(Path::new().to_string(), @"(empty)");
    }

    #[test]
    fn test_closed_and_parts() {
        let path = Path::from_parts(vec![0, 1, 0], vec![1, 1]).unwrap();
        assert!(path.is_closed());
        assert!(!Path::starting_at(4).is_closed());
        assert!(Path::from_parts(vec![0, 1], vec![]).is_none());
    }
}
