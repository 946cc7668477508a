// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Resource-dependency validity of a spell graph
//!
//! A node is satisfied when its fixed resources together with everything
//! its direct predecessors return cover its declared requirements.

use crate::graph::{Graph, NodeIndex};
use crate::types::Castable;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A node whose requirements are not covered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmetRequirement {
    /// The unsatisfied node
    pub node: NodeIndex,
    /// Required resources nothing supplies
    pub missing: BTreeSet<String>,
}

/// Outcome of [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Unsatisfied nodes in index order
    pub unmet: Vec<UnmetRequirement>,
}

impl ValidationReport {
    /// True when every node is satisfied
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.unmet.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unmet.is_empty() {
            return write!(f, "all requirements satisfied");
        }
        for (i, unmet) in self.unmet.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let missing: Vec<&str> = unmet.missing.iter().map(String::as_str).collect();
            write!(f, "node {}: missing {}", unmet.node, missing.join(", "))?;
        }
        Ok(())
    }
}

/// Resources available to `node`: its own fixed resources plus the merged
/// returns of its direct predecessors
#[must_use]
pub fn available_resources<P: Castable>(graph: &Graph<P>, node: NodeIndex) -> BTreeSet<String> {
    let Some(own) = graph.node(node) else {
        return BTreeSet::new();
    };
    let mut available = own.payload.fixed_resources();
    for pred in graph.predecessors(node) {
        if let Some(p) = graph.node(pred) {
            available.extend(p.payload.returns());
        }
    }
    available
}

/// Check every node's requirements
#[must_use]
pub fn validate<P: Castable>(graph: &Graph<P>) -> ValidationReport {
    let unmet = graph
        .nodes()
        .iter()
        .filter_map(|node| {
            let available = available_resources(graph, node.index());
            let missing: BTreeSet<String> = node
                .payload
                .requirements()
                .difference(&available)
                .cloned()
                .collect();
            (!missing.is_empty()).then(|| UnmetRequirement {
                node: node.index(),
                missing,
            })
        })
        .collect();
    ValidationReport { unmet }
}

/// Does every node have its requirements covered?
#[must_use]
pub fn is_valid<P: Castable>(graph: &Graph<P>) -> bool {
    validate(graph).is_valid()
}
