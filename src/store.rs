// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Structured document form of a graph and its on-disk persistence

use crate::error::GraphError;
use crate::graph::{Graph, GraphFlags, NodeIndex, Weight, DEFAULT_WEIGHT, NO_EDGE};
use crate::types::{Castable, Position};
use crate::validation::validate;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Current document version
pub const DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// A node as persisted: position plus payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord<P> {
    /// Editor position
    #[serde(default)]
    pub position: Position,
    /// Payload
    pub payload: P,
}

/// An edge as persisted; a missing weight means [`DEFAULT_WEIGHT`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source index
    pub source: NodeIndex,
    /// Target index
    pub target: NodeIndex,
    /// Edge weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
}

/// Serializable representation of a whole graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument<P> {
    /// Document version
    #[serde(default = "default_version")]
    pub version: u32,
    /// When the document was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Capability flags
    #[serde(default)]
    pub flags: GraphFlags,
    /// Nodes in index order
    #[serde(default = "Vec::new")]
    pub nodes: Vec<NodeRecord<P>>,
    /// Edges
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Snapshot a graph as a document
#[must_use]
pub fn to_document<P: Clone>(graph: &Graph<P>) -> GraphDocument<P> {
    GraphDocument {
        version: DOCUMENT_VERSION,
        saved_at: Some(Utc::now()),
        flags: graph.flags(),
        nodes: graph
            .nodes()
            .iter()
            .map(|n| NodeRecord {
                position: n.position,
                payload: n.payload.clone(),
            })
            .collect(),
        edges: graph
            .edges()
            .map(|e| EdgeRecord {
                source: e.source,
                target: e.target,
                weight: (e.weight != DEFAULT_WEIGHT).then_some(e.weight),
            })
            .collect(),
    }
}

/// Rebuild a graph; edge endpoints must exist and ordered pairs must be unique
pub fn from_document<P>(document: GraphDocument<P>) -> crate::Result<Graph<P>> {
    let mut graph = Graph::with_flags(document.flags);
    for record in document.nodes {
        graph.add_node_at(record.payload, record.position);
    }
    for edge in document.edges {
        graph.ensure_node(edge.source)?;
        graph.ensure_node(edge.target)?;
        let weight = edge.weight.unwrap_or(DEFAULT_WEIGHT);
        if weight == NO_EDGE {
            return Err(GraphError::Precondition(format!(
                "edge {} -> {} carries the reserved absent-edge weight",
                edge.source, edge.target
            )));
        }
        if !graph.connect(edge.source, edge.target, weight) {
            return Err(GraphError::DuplicateEdge {
                from: edge.source,
                to: edge.target,
            });
        }
    }
    Ok(graph)
}

/// On-disk encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON
    Json,
    /// TOML
    Toml,
}

impl Format {
    /// Pick the encoding from a file extension; JSON unless it is `.toml`
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Encode a graph
pub fn encode<P: Clone + Serialize>(graph: &Graph<P>, format: Format) -> Result<String> {
    let document = to_document(graph);
    match format {
        Format::Json => serde_json::to_string_pretty(&document).context("Failed to serialize graph to JSON"),
        Format::Toml => toml::to_string_pretty(&document).context("Failed to serialize graph to TOML"),
    }
}

/// Decode a graph
pub fn decode<P: DeserializeOwned>(content: &str, format: Format) -> Result<Graph<P>> {
    let document: GraphDocument<P> = match format {
        Format::Json => serde_json::from_str(content).context("Failed to parse graph JSON")?,
        Format::Toml => toml::from_str(content).context("Failed to parse graph TOML")?,
    };
    if document.version > DOCUMENT_VERSION {
        anyhow::bail!(
            "Unsupported document version {} (newest supported: {})",
            document.version,
            DOCUMENT_VERSION
        );
    }
    from_document(document).context("Graph document is inconsistent")
}

fn ensure_valid<P: Castable>(graph: &Graph<P>, path: &Path) -> Result<()> {
    let report = validate(graph);
    if !report.is_valid() {
        anyhow::bail!(
            "Graph {} has unsatisfied resource requirements:\n{}",
            path.display(),
            report
        );
    }
    Ok(())
}

/// Write a graph without checking resource requirements
pub fn save_draft<P: Clone + Serialize>(graph: &Graph<P>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let content = encode(graph, Format::from_path(path))?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), nodes = graph.len(), "graph written");
    Ok(())
}

/// Read a graph without checking resource requirements
pub fn load_draft<P: DeserializeOwned>(path: &Path) -> Result<Graph<P>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode(&content, Format::from_path(path)).with_context(|| format!("Failed to load {}", path.display()))
}

/// Write a graph, refusing one whose wiring leaves requirements unmet
pub fn save<P: Castable + Clone + Serialize>(graph: &Graph<P>, path: &Path) -> Result<()> {
    ensure_valid(graph, path)?;
    save_draft(graph, path)?;
    info!(path = %path.display(), "graph saved");
    Ok(())
}

/// Read a graph, refusing one whose wiring leaves requirements unmet
pub fn load<P: Castable + DeserializeOwned>(path: &Path) -> Result<Graph<P>> {
    let graph = load_draft(path)?;
    ensure_valid(&graph, path)?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParamValue, Rarity, Spell};
    use tempfile::TempDir;

    fn sample() -> Graph<Spell> {
        let mut graph = Graph::new();
        graph.add_node_at(Spell::new("spark").returning(["heat"]), Position::new(1.0, 2.0));
        graph.add_node_at(
            Spell::new("fireball")
                .with_rarity(Rarity::Rare)
                .with_param("radius", ParamValue::Float(2.5))
                .requiring(["heat"]),
            Position::new(4.0, 2.0),
        );
        graph.connect(0, 1, 3);
        graph.connect(1, 1, DEFAULT_WEIGHT);
        graph
    }

    #[test]
    fn test_default_weight_is_omitted() {
        let document = to_document(&sample());
        assert_eq!(document.edges[0].weight, Some(3));
        assert_eq!(document.edges[1].weight, None);
    }

    #[test]
    fn test_json_and_toml_round_trip() {
        let graph = sample();
        for format in [Format::Json, Format::Toml] {
            let text = encode(&graph, format).unwrap();
            let back: Graph<Spell> = decode(&text, format).unwrap();
            assert_eq!(back.len(), 2);
            assert_eq!(back.edges().collect::<Vec<_>>(), graph.edges().collect::<Vec<_>>());
            assert_eq!(back.node(1).unwrap().payload, graph.node(1).unwrap().payload);
            assert_eq!(back.node(0).unwrap().position, Position::new(1.0, 2.0));
        }
    }

    #[test]
    fn test_decode_rejects_dangling_and_duplicate_edges() {
        let dangling = r#"{"nodes":[{"payload":"a"}],"edges":[{"source":0,"target":3}]}"#;
        assert!(decode::<String>(dangling, Format::Json).is_err());

        let duplicate = r#"{"nodes":[{"payload":"a"},{"payload":"b"}],
            "edges":[{"source":0,"target":1},{"source":0,"target":1,"weight":4}]}"#;
        assert!(decode::<String>(duplicate, Format::Json).is_err());
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let doc = r#"{"version":99,"nodes":[]}"#;
        assert!(decode::<String>(doc, Format::Json).is_err());
    }

    #[test]
    fn test_save_refuses_invalid_graph() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        let mut graph = sample();
        graph.disconnect(0, 1);

        assert!(save(&graph, &path).is_err());
        assert!(!path.exists());

        save_draft(&graph, &path).unwrap();
        assert!(load::<Spell>(&path).is_err());
        assert_eq!(load_draft::<Spell>(&path).unwrap().edge_count(), 1);
    }

    #[test]
    fn test_save_and_load_valid_graph() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("graph.toml");
        save(&sample(), &path).unwrap();
        let back: Graph<Spell> = load(&path).unwrap();
        assert_eq!(back.edge_count(), 2);
    }
}
