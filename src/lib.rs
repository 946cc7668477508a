// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Castgraph library - weighted digraph engine for spell graphs
//!
//! This crate provides a dense, index-addressed directed graph backed by a
//! weight matrix, a traversal engine, and a library of classical algorithms
//! (shortest paths, spanning trees and arborescences, Eulerian circuits,
//! a greedy TSP heuristic) together with the resource-dependency validity
//! check and the structured document used to persist spell graphs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod path;
pub mod store;
pub mod traversal;
pub mod validation;

/// Node payload types carried by spell graphs
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::collections::{BTreeMap, BTreeSet};
    use std::fmt;
    use std::str::FromStr;

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Position in 2D editor space. Ignored by every algorithm.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate
        pub x: f32,
        /// Y coordinate
        pub y: f32,
    }

    impl Position {
        /// Create a position
        #[must_use]
        pub fn new(x: f32, y: f32) -> Self {
            Self { x, y }
        }
    }

    // =========================================================================
    // Payload
    // =========================================================================

    /// Rarity category of a castable
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Rarity {
        /// Common
        #[default]
        Common,
        /// Uncommon
        Uncommon,
        /// Rare
        Rare,
        /// Epic
        Epic,
        /// Legendary
        Legendary,
    }

    impl Rarity {
        /// Lowercase tag used in documents and on the command line
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Common => "common",
                Self::Uncommon => "uncommon",
                Self::Rare => "rare",
                Self::Epic => "epic",
                Self::Legendary => "legendary",
            }
        }
    }

    impl FromStr for Rarity {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "common" => Ok(Self::Common),
                "uncommon" => Ok(Self::Uncommon),
                "rare" => Ok(Self::Rare),
                "epic" => Ok(Self::Epic),
                "legendary" => Ok(Self::Legendary),
                other => Err(format!(
                    "Unknown rarity: {other}. Valid: common, uncommon, rare, epic, legendary"
                )),
            }
        }
    }

    /// Typed value of a named node parameter
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", content = "value", rename_all = "lowercase")]
    pub enum ParamValue {
        /// Integer
        Int(i64),
        /// Float
        Float(f64),
        /// Boolean
        Bool(bool),
        /// Free text
        Text(String),
    }

    impl ParamValue {
        /// Infer the narrowest type for a command-line literal
        #[must_use]
        pub fn parse_literal(raw: &str) -> Self {
            if let Ok(i) = raw.parse::<i64>() {
                Self::Int(i)
            } else if let Ok(f) = raw.parse::<f64>() {
                Self::Float(f)
            } else if let Ok(b) = raw.parse::<bool>() {
                Self::Bool(b)
            } else {
                Self::Text(raw.to_string())
            }
        }
    }

    impl fmt::Display for ParamValue {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Int(i) => write!(f, "{i}"),
                Self::Float(x) => write!(f, "{x}"),
                Self::Bool(b) => write!(f, "{b}"),
                Self::Text(s) => write!(f, "{s:?}"),
            }
        }
    }

    /// Capability interface of a node payload.
    ///
    /// The graph algorithms never look at payloads; only the validity check
    /// does, through these three resource sets.
    pub trait Castable {
        /// Resources the node needs before it can be cast
        fn requirements(&self) -> BTreeSet<String>;
        /// Resources the node hands to its successors
        fn returns(&self) -> BTreeSet<String>;
        /// Resources the node supplies to itself
        fn fixed_resources(&self) -> BTreeSet<String>;
    }

    /// A spell node payload
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Spell {
        /// Payload type tag (e.g. "projectile", "explosion")
        pub kind: String,
        /// Rarity category
        #[serde(default)]
        pub rarity: Rarity,
        /// Named auxiliary parameter values; each name is a fixed resource
        #[serde(default)]
        pub params: BTreeMap<String, ParamValue>,
        /// Declared resource requirements
        #[serde(default)]
        pub requires: BTreeSet<String>,
        /// Declared resource returns
        #[serde(default)]
        pub returns: BTreeSet<String>,
    }

    impl Spell {
        /// Create a spell of the given kind with no parameters or resources
        #[must_use]
        pub fn new(kind: impl Into<String>) -> Self {
            Self {
                kind: kind.into(),
                ..Self::default()
            }
        }

        /// Builder: set rarity
        #[must_use]
        pub fn with_rarity(mut self, rarity: Rarity) -> Self {
            self.rarity = rarity;
            self
        }

        /// Builder: add a parameter
        #[must_use]
        pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
            self.params.insert(name.into(), value);
            self
        }

        /// Builder: add requirements
        #[must_use]
        pub fn requiring<I, S>(mut self, resources: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.requires.extend(resources.into_iter().map(Into::into));
            self
        }

        /// Builder: add returns
        #[must_use]
        pub fn returning<I, S>(mut self, resources: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.returns.extend(resources.into_iter().map(Into::into));
            self
        }
    }

    impl Castable for Spell {
        fn requirements(&self) -> BTreeSet<String> {
            self.requires.clone()
        }

        fn returns(&self) -> BTreeSet<String> {
            self.returns.clone()
        }

        fn fixed_resources(&self) -> BTreeSet<String> {
            self.params.keys().cloned().collect()
        }
    }

}

pub use error::{GraphError, Result};

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{GraphError, Result};
    pub use crate::graph::{Edge, Graph, GraphFlags, Node, NodeIndex, Weight, DEFAULT_WEIGHT, NO_EDGE};
    pub use crate::path::Path;
    pub use crate::types::*;
}
