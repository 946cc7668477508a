// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph store: dense node list plus a weight matrix

use crate::error::{GraphError, Result};
use crate::types::{Position, Spell};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Position of a node in its graph's node list
pub type NodeIndex = usize;

/// Integer edge weight
pub type Weight = i32;

/// Matrix cell value meaning "no edge"
pub const NO_EDGE: Weight = Weight::MAX;

/// Weight used when a caller does not supply one
pub const DEFAULT_WEIGHT: Weight = 1;

/// Capability flags algorithms may consult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphFlags {
    /// Edges are ordered pairs
    pub directed: bool,
    /// Edge weights are meaningful; otherwise every edge counts as 1
    pub weighted: bool,
    /// Self-loops may be inserted through `connect_checked`
    pub allow_loops: bool,
    /// Cycles may be closed through `connect_checked`
    pub allow_cycles: bool,
}

impl Default for GraphFlags {
    fn default() -> Self {
        Self {
            directed: true,
            weighted: true,
            allow_loops: true,
            allow_cycles: true,
        }
    }
}

impl GraphFlags {
    /// Undirected variant of the default flags
    #[must_use]
    pub fn undirected() -> Self {
        Self {
            directed: false,
            ..Self::default()
        }
    }
}

/// A node owned by a graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node<P> {
    index: NodeIndex,
    /// Opaque payload
    pub payload: P,
    /// Editor position
    pub position: Position,
}

impl<P> Node<P> {
    /// Current index; always equal to the node's position in the node list
    #[must_use]
    pub fn index(&self) -> NodeIndex {
        self.index
    }
}

/// A stored edge as reported by [`Graph::edges`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source index
    pub source: NodeIndex,
    /// Target index
    pub target: NodeIndex,
    /// Edge weight
    pub weight: Weight,
}

/// Directed weighted graph with at most one edge per ordered pair.
///
/// Nodes are addressed by dense indices; removing a node moves the last
/// node into the freed slot. Undirected graphs store each pair once, at
/// `matrix[max][min]`.
#[derive(Debug, Clone)]
pub struct Graph<P = Spell> {
    nodes: Vec<Node<P>>,
    matrix: Vec<Vec<Weight>>,
    flags: GraphFlags,
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Graph<P> {
    /// Create an empty directed graph
    #[must_use]
    pub fn new() -> Self {
        Self::with_flags(GraphFlags::default())
    }

    /// Create an empty graph with the given capability flags
    #[must_use]
    pub fn with_flags(flags: GraphFlags) -> Self {
        Self {
            nodes: Vec::new(),
            matrix: Vec::new(),
            flags,
        }
    }

    /// Capability flags
    #[must_use]
    pub fn flags(&self) -> GraphFlags {
        self.flags
    }

    /// Is this graph directed?
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.flags.directed
    }

    /// Node count
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Does `index` name a node of this graph?
    #[must_use]
    pub fn contains(&self, index: NodeIndex) -> bool {
        index < self.nodes.len()
    }

    /// Fail with [`GraphError::InvalidNode`] unless `index` is a member
    pub fn ensure_node(&self, index: NodeIndex) -> Result<()> {
        if self.contains(index) {
            Ok(())
        } else {
            Err(GraphError::InvalidNode {
                index,
                count: self.nodes.len(),
            })
        }
    }

    /// All nodes in index order
    #[must_use]
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    /// Get a node by index
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node<P>> {
        self.nodes.get(index)
    }

    /// Get a node by index for payload or position edits
    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node<P>> {
        self.nodes.get_mut(index)
    }

    /// Remove every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.matrix.clear();
    }

    // =========================================================================
    // Node CRUD
    // =========================================================================

    /// Append a node at the origin; returns its index
    pub fn add_node(&mut self, payload: P) -> NodeIndex {
        self.add_node_at(payload, Position::default())
    }

    /// Append a node at `position`; returns its index
    pub fn add_node_at(&mut self, payload: P, position: Position) -> NodeIndex {
        let index = self.nodes.len();
        for row in &mut self.matrix {
            row.push(NO_EDGE);
        }
        self.matrix.push(vec![NO_EDGE; index + 1]);
        self.nodes.push(Node {
            index,
            payload,
            position,
        });
        trace!(index, "added node");
        index
    }

    /// Remove a node and every edge touching it.
    ///
    /// The last node takes over the freed index. Returns false if `index`
    /// is not a member.
    pub fn remove_node(&mut self, index: NodeIndex) -> bool {
        if !self.contains(index) {
            return false;
        }
        if self.nodes.len() == 1 {
            self.clear();
            return true;
        }

        let last = self.nodes.len() - 1;
        self.nodes.swap_remove(index);
        self.matrix.swap_remove(index);
        for row in &mut self.matrix {
            row.swap_remove(index);
        }
        if index < last {
            self.nodes[index].index = index;
            if !self.flags.directed {
                self.recanonicalize(index);
            }
        }
        trace!(index, moved = last, "removed node");
        true
    }

    /// Restore `matrix[max][min]` storage for the node that was moved to `index`
    fn recanonicalize(&mut self, index: NodeIndex) {
        for other in 0..self.nodes.len() {
            if other == index {
                continue;
            }
            let (r, c) = Self::canonical(index, other);
            let (wr, wc) = (c, r);
            let stray = self.matrix[wr][wc];
            if stray != NO_EDGE {
                self.matrix[r][c] = stray;
                self.matrix[wr][wc] = NO_EDGE;
            }
        }
    }

    // =========================================================================
    // Edge CRUD
    // =========================================================================

    fn canonical(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
        (a.max(b), a.min(b))
    }

    fn cell(&self, source: NodeIndex, target: NodeIndex) -> (NodeIndex, NodeIndex) {
        if self.flags.directed {
            (source, target)
        } else {
            Self::canonical(source, target)
        }
    }

    fn raw(&self, source: NodeIndex, target: NodeIndex) -> Weight {
        let (r, c) = self.cell(source, target);
        self.matrix[r][c]
    }

    /// Add an edge. Returns false if either endpoint is absent or an edge
    /// already occupies the pair; the existing weight is left untouched.
    ///
    /// No loop or cycle policy is applied here; see [`Graph::connect_checked`].
    pub fn connect(&mut self, source: NodeIndex, target: NodeIndex, weight: Weight) -> bool {
        if !self.contains(source) || !self.contains(target) {
            warn!(source, target, "connect: endpoint not in graph");
            return false;
        }
        if weight == NO_EDGE {
            warn!(source, target, "connect: weight collides with the no-edge sentinel");
            return false;
        }
        let (r, c) = self.cell(source, target);
        if self.matrix[r][c] != NO_EDGE {
            return false;
        }
        self.matrix[r][c] = weight;
        trace!(source, target, weight, "connected");
        true
    }

    /// Add an edge honouring the graph's loop and cycle flags
    pub fn connect_checked(&mut self, source: NodeIndex, target: NodeIndex, weight: Weight) -> Result<()> {
        self.ensure_node(source)?;
        self.ensure_node(target)?;
        if self.adjacent(source, target) {
            return Err(GraphError::DuplicateEdge { from: source, to: target });
        }
        if source == target && !self.flags.allow_loops {
            return Err(GraphError::LoopForbidden { node: source });
        }
        if !self.flags.allow_cycles && self.closes_cycle(source, target) {
            return Err(GraphError::WouldCreateCycle { from: source, to: target });
        }
        if self.connect(source, target, weight) {
            Ok(())
        } else {
            Err(GraphError::Precondition(format!(
                "weight {weight} is reserved for the no-edge sentinel"
            )))
        }
    }

    /// Would adding `source -> target` close a cycle?
    fn closes_cycle(&self, source: NodeIndex, target: NodeIndex) -> bool {
        source == target || crate::traversal::reachable_from(self, target).contains(&source)
    }

    /// Remove an edge. Fails when `source == target` or no edge exists.
    pub fn disconnect(&mut self, source: NodeIndex, target: NodeIndex) -> bool {
        if source == target || !self.contains(source) || !self.contains(target) {
            return false;
        }
        let (r, c) = self.cell(source, target);
        if self.matrix[r][c] == NO_EDGE {
            return false;
        }
        self.matrix[r][c] = NO_EDGE;
        trace!(source, target, "disconnected");
        true
    }

    /// Is there an edge `n1 -> n2`?
    #[must_use]
    pub fn adjacent(&self, n1: NodeIndex, n2: NodeIndex) -> bool {
        self.contains(n1) && self.contains(n2) && self.raw(n1, n2) != NO_EDGE
    }

    /// Weight of the edge `source -> target`
    pub fn edge_weight(&self, source: NodeIndex, target: NodeIndex) -> Result<Weight> {
        if self.adjacent(source, target) {
            Ok(self.raw(source, target))
        } else {
            Err(GraphError::EdgeNotFound { from: source, to: target })
        }
    }

    /// Weight as seen by algorithms: 1 on unweighted graphs
    #[must_use]
    pub fn cost(&self, source: NodeIndex, target: NodeIndex) -> Option<Weight> {
        if !self.adjacent(source, target) {
            None
        } else if self.flags.weighted {
            Some(self.raw(source, target))
        } else {
            Some(1)
        }
    }

    /// Replace the weight of an existing edge
    pub fn set_edge_weight(&mut self, source: NodeIndex, target: NodeIndex, weight: Weight) -> Result<()> {
        if !self.adjacent(source, target) {
            return Err(GraphError::EdgeNotFound { from: source, to: target });
        }
        if weight == NO_EDGE {
            return Err(GraphError::Precondition(format!(
                "weight {weight} is reserved for the no-edge sentinel"
            )));
        }
        let (r, c) = self.cell(source, target);
        self.matrix[r][c] = weight;
        Ok(())
    }

    // =========================================================================
    // Adjacency queries
    // =========================================================================

    /// Targets of edges leaving `node` (every neighbour when undirected)
    #[must_use]
    pub fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        if !self.contains(node) {
            return Vec::new();
        }
        (0..self.nodes.len())
            .filter(|&other| self.raw(node, other) != NO_EDGE)
            .collect()
    }

    /// Sources of edges entering `node` (every neighbour when undirected)
    #[must_use]
    pub fn predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        if !self.contains(node) {
            return Vec::new();
        }
        (0..self.nodes.len())
            .filter(|&other| self.raw(other, node) != NO_EDGE)
            .collect()
    }

    /// Nodes connected to `node` in either direction
    #[must_use]
    pub fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        if !self.contains(node) {
            return Vec::new();
        }
        (0..self.nodes.len())
            .filter(|&other| self.raw(node, other) != NO_EDGE || self.raw(other, node) != NO_EDGE)
            .collect()
    }

    /// Number of edges entering `node`
    #[must_use]
    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.predecessors(node).len()
    }

    /// Number of edges leaving `node`
    #[must_use]
    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.successors(node).len()
    }

    /// All stored edges in row-major order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.matrix.iter().enumerate().flat_map(|(source, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &w)| w != NO_EDGE)
                .map(move |(target, &weight)| Edge { source, target, weight })
        })
    }

    /// Edges with both orientations listed for undirected graphs
    pub(crate) fn arcs(&self) -> Vec<Edge> {
        let mut arcs: Vec<Edge> = self.edges().collect();
        if !self.flags.directed {
            let mirrored: Vec<Edge> = arcs
                .iter()
                .filter(|e| e.source != e.target)
                .map(|e| Edge {
                    source: e.target,
                    target: e.source,
                    weight: e.weight,
                })
                .collect();
            arcs.extend(mirrored);
        }
        arcs
    }

    /// Number of stored edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Sum of all stored edge weights
    #[must_use]
    pub fn total_weight(&self) -> i64 {
        self.edges().map(|e| i64::from(e.weight)).sum()
    }

    // =========================================================================
    // Derived graphs and interop
    // =========================================================================

    /// A graph holding clones of the same nodes and flags, with no edges
    #[must_use]
    pub fn with_nodes_of(other: &Graph<P>) -> Self
    where
        P: Clone,
    {
        let mut graph = Self::with_flags(other.flags);
        for node in &other.nodes {
            graph.add_node_at(node.payload.clone(), node.position);
        }
        graph
    }

    /// Build a petgraph graph with the same node order; node weights are indices
    #[must_use]
    pub fn to_petgraph(&self) -> petgraph::Graph<NodeIndex, Weight> {
        let mut graph = petgraph::Graph::with_capacity(self.len(), self.edge_count());
        let handles: Vec<_> = (0..self.len()).map(|i| graph.add_node(i)).collect();
        for edge in self.edges() {
            graph.add_edge(handles[edge.source], handles[edge.target], edge.weight);
        }
        graph
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        use petgraph::dot::{Config, Dot};

        let graph = self.to_petgraph();
        let body = format!("{:?}", Dot::with_config(&graph, &[Config::GraphContentOnly]));
        let header = if self.flags.directed { "digraph" } else { "graph" };
        let edge_op = if self.flags.directed { "->" } else { "--" };
        format!(
            "{header} castgraph {{\n{}}}\n",
            body.replace(" -> ", &format!(" {edge_op} "))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Graph<&'static str> {
        let mut graph = Graph::new();
        for _ in 0..n {
            graph.add_node("n");
        }
        for i in 1..n {
            assert!(graph.connect(i - 1, i, i as Weight));
        }
        graph
    }

    #[test]
    fn test_add_node_extends_matrix() {
        let mut graph: Graph<()> = Graph::new();
        assert_eq!(graph.add_node(()), 0);
        assert_eq!(graph.add_node(()), 1);
        assert_eq!(graph.len(), 2);
        assert!(graph.matrix.iter().all(|row| row.len() == 2));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_node_moves_last_into_slot() {
        let mut graph = chain(4);
        graph.connect(3, 0, 9);

        assert!(graph.remove_node(1));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.node(1).map(Node::index), Some(1));
        // old node 3 is now node 1; its edges 2->3 and 3->0 follow it
        assert_eq!(graph.edge_weight(2, 1), Ok(3));
        assert_eq!(graph.edge_weight(1, 0), Ok(9));
        assert!(!graph.adjacent(0, 1));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_remove_last_and_only_node() {
        let mut graph = chain(2);
        assert!(graph.remove_node(1));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.remove_node(0));
        assert!(graph.is_empty());
        assert!(!graph.remove_node(0));
    }

    #[test]
    fn test_remove_node_keeps_self_loop_of_moved_node() {
        let mut graph = chain(3);
        graph.connect(2, 2, 7);
        graph.remove_node(0);
        assert_eq!(graph.edge_weight(0, 0), Ok(7));
    }

    #[test]
    fn test_connect_refuses_duplicate() {
        let mut graph = chain(2);
        assert!(!graph.connect(0, 1, 50));
        assert_eq!(graph.edge_weight(0, 1), Ok(1));
        assert!(!graph.connect(0, 7, 1));
    }

    #[test]
    fn test_disconnect_rules() {
        let mut graph = chain(2);
        graph.connect(1, 1, 3);
        assert!(!graph.disconnect(1, 1));
        assert!(!graph.disconnect(1, 0));
        assert!(graph.disconnect(0, 1));
        assert_eq!(graph.edge_weight(0, 1), Err(GraphError::EdgeNotFound { from: 0, to: 1 }));
    }

    #[test]
    fn test_set_edge_weight_requires_edge() {
        let mut graph = chain(3);
        assert!(graph.set_edge_weight(0, 1, 42).is_ok());
        assert_eq!(graph.edge_weight(0, 1), Ok(42));
        assert!(graph.set_edge_weight(0, 2, 1).is_err());
    }

    #[test]
    fn test_degrees() {
        let mut graph = chain(3);
        graph.connect(0, 2, 1);
        assert_eq!(graph.out_degree(0), 2);
        assert_eq!(graph.in_degree(0), 0);
        assert_eq!(graph.in_degree(2), 2);
        assert_eq!(graph.neighbors(1), vec![0, 2]);
    }

    #[test]
    fn test_undirected_canonical_storage() {
        let mut graph: Graph<()> = Graph::with_flags(GraphFlags::undirected());
        for _ in 0..3 {
            graph.add_node(());
        }
        assert!(graph.connect(0, 2, 5));
        assert!(!graph.connect(2, 0, 6));
        assert_eq!(graph.edge_weight(0, 2), Ok(5));
        assert_eq!(graph.edge_weight(2, 0), Ok(5));
        assert_eq!(graph.edges().next(), Some(Edge { source: 2, target: 0, weight: 5 }));
        assert_eq!(graph.in_degree(0), 1);
        assert_eq!(graph.out_degree(0), 1);
    }

    #[test]
    fn test_undirected_removal_recanonicalizes() {
        let mut graph: Graph<()> = Graph::with_flags(GraphFlags::undirected());
        for _ in 0..4 {
            graph.add_node(());
        }
        graph.connect(3, 2, 1);
        graph.connect(3, 0, 2);
        graph.remove_node(1);
        // old node 3 now sits at index 1
        assert_eq!(graph.edge_weight(1, 2), Ok(1));
        assert_eq!(graph.edge_weight(0, 1), Ok(2));
        assert!(graph.edges().all(|e| e.source >= e.target));
    }

    #[test]
    fn test_connect_checked_policies() {
        let flags = GraphFlags {
            allow_loops: false,
            allow_cycles: false,
            ..GraphFlags::default()
        };
        let mut graph: Graph<()> = Graph::with_flags(flags);
        for _ in 0..3 {
            graph.add_node(());
        }
        assert!(graph.connect_checked(0, 1, 1).is_ok());
        assert!(graph.connect_checked(1, 2, 1).is_ok());
        assert_eq!(graph.connect_checked(2, 0, 1), Err(GraphError::WouldCreateCycle { from: 2, to: 0 }));
        assert_eq!(graph.connect_checked(1, 1, 1), Err(GraphError::LoopForbidden { node: 1 }));
        assert_eq!(graph.connect_checked(0, 1, 1), Err(GraphError::DuplicateEdge { from: 0, to: 1 }));
        assert!(matches!(graph.connect_checked(0, 9, 1), Err(GraphError::InvalidNode { index: 9, .. })));
    }

    #[test]
    fn test_unweighted_cost() {
        let mut graph: Graph<()> = Graph::with_flags(GraphFlags {
            weighted: false,
            ..GraphFlags::default()
        });
        graph.add_node(());
        graph.add_node(());
        graph.connect(0, 1, 30);
        assert_eq!(graph.cost(0, 1), Some(1));
        assert_eq!(graph.edge_weight(0, 1), Ok(30));
    }

    #[test]
    fn test_to_dot() {
        let graph = chain(2);
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph castgraph {"));
        assert!(dot.contains("0 -> 1"));
    }
}
