// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge management commands - wire spells together

use super::Workspace;
use crate::graph::{Edge, NodeIndex, Weight};
use anyhow::{Context, Result};
use tracing::info;

/// Add an edge, honouring the graph's loop and cycle flags
pub fn add(ws: &Workspace, source: NodeIndex, target: NodeIndex, weight: Option<Weight>) -> Result<()> {
    let mut graph = ws.load_draft()?;
    let weight = weight.unwrap_or(ws.config.default_weight);
    graph
        .connect_checked(source, target, weight)
        .with_context(|| format!("Cannot connect {source} -> {target}"))?;
    ws.save_draft(&graph)?;
    info!(source, target, weight, "edge added");

    if ws.json {
        ws.print_json(&Edge { source, target, weight })?;
    } else {
        ws.status(&format!("Created edge: {source} -> {target} (weight {weight})"));
    }
    Ok(())
}

/// Remove an edge
pub fn remove(ws: &Workspace, source: NodeIndex, target: NodeIndex) -> Result<()> {
    let mut graph = ws.load_draft()?;
    if !graph.disconnect(source, target) {
        anyhow::bail!("No edge {source} -> {target}");
    }
    ws.save_draft(&graph)?;
    info!(source, target, "edge removed");

    if ws.json {
        ws.print_json(&serde_json::json!({ "removed": { "source": source, "target": target } }))?;
    } else {
        ws.status(&format!("Removed edge: {source} -> {target}"));
    }
    Ok(())
}

/// Change the weight of an existing edge
pub fn set(ws: &Workspace, source: NodeIndex, target: NodeIndex, weight: Weight) -> Result<()> {
    let mut graph = ws.load_draft()?;
    let previous = graph.edge_weight(source, target)?;
    graph.set_edge_weight(source, target, weight)?;
    ws.save_draft(&graph)?;
    info!(source, target, previous, weight, "edge reweighted");

    if ws.json {
        ws.print_json(&serde_json::json!({ "source": source, "target": target, "previous": previous, "weight": weight }))?;
    } else {
        ws.status(&format!("Edge {source} -> {target}: weight {previous} -> {weight}"));
    }
    Ok(())
}

/// List edges in row-major order
pub fn list(ws: &Workspace) -> Result<()> {
    let graph = ws.load_draft()?;
    let edges: Vec<Edge> = graph.edges().collect();

    if ws.json {
        return ws.print_json(&edges);
    }
    if edges.is_empty() {
        println!("No edges defined. Use 'castgraph edge add' to create one.");
        return Ok(());
    }

    let arrow = if graph.is_directed() { "->" } else { "--" };
    println!("Edges ({}):", edges.len());
    for edge in &edges {
        let kind = |i: NodeIndex| graph.node(i).map_or("?", |n| n.payload.kind.as_str());
        println!(
            "  {} {arrow} {}  {}  {}",
            edge.source,
            edge.target,
            ws.dim(&format!("({} {arrow} {})", kind(edge.source), kind(edge.target))),
            edge.weight
        );
    }
    Ok(())
}
