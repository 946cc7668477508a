// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error taxonomy for graph operations and algorithms

use crate::graph::NodeIndex;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures raised by the graph store and the algorithm library
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node index that is not a member of the graph
    #[error("node {index} is not a member of the graph (node count {count})")]
    InvalidNode {
        /// The offending index
        index: NodeIndex,
        /// Node count at the time of the call
        count: usize,
    },

    /// Weight lookup or update on a pair with no edge
    #[error("edge not found: {from} -> {to}")]
    EdgeNotFound {
        /// Source index
        from: NodeIndex,
        /// Target index
        to: NodeIndex,
    },

    /// An edge already occupies the ordered pair
    #[error("edge already exists: {from} -> {to}")]
    DuplicateEdge {
        /// Source index
        from: NodeIndex,
        /// Target index
        to: NodeIndex,
    },

    /// An algorithm precondition does not hold for the input graph
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// No node reaches every other node (or the requested root does not)
    #[error("no spanning arborescence exists{}", .root.map(|r| format!(" rooted at node {r}")).unwrap_or_default())]
    NoSpanningArborescence {
        /// Requested root, if any
        root: Option<NodeIndex>,
    },

    /// A negative-weight cycle is reachable from the start node
    #[error("negative-weight cycle reachable from node {start}")]
    NegativeCycle {
        /// Start node of the search
        start: NodeIndex,
    },

    /// The graph contains a cycle where a DAG was required
    #[error("graph contains a cycle through node {node}")]
    Cyclic {
        /// A node on the detected cycle
        node: NodeIndex,
    },

    /// Self-loop on a graph that forbids loops
    #[error("self-loops are not allowed on this graph (node {node})")]
    LoopForbidden {
        /// The node the loop would be attached to
        node: NodeIndex,
    },

    /// The edge would close a cycle on a graph that forbids cycles
    #[error("edge {from} -> {to} would create a cycle")]
    WouldCreateCycle {
        /// Source index
        from: NodeIndex,
        /// Target index
        to: NodeIndex,
    },
}
