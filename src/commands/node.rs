// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Node management commands - add, remove and list spells

use super::Workspace;
use crate::graph::NodeIndex;
use crate::types::{ParamValue, Position, Spell};
use anyhow::Result;
use serde::Serialize;
use tracing::info;

/// Parse a `name=value` parameter argument
pub fn parse_param(raw: &str) -> std::result::Result<(String, ParamValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Parameter name missing in '{raw}'"));
    }
    Ok((name.to_string(), ParamValue::parse_literal(value.trim())))
}

#[derive(Serialize)]
struct NodeRow<'a> {
    index: NodeIndex,
    position: Position,
    #[serde(flatten)]
    spell: &'a Spell,
}

/// Add a node
pub fn add(ws: &Workspace, spell: Spell, position: Position) -> Result<()> {
    let mut graph = ws.load_draft()?;
    let kind = spell.kind.clone();
    let index = graph.add_node_at(spell, position);
    ws.save_draft(&graph)?;
    info!(index, kind = %kind, "node added");

    if ws.json {
        ws.print_json(&serde_json::json!({ "index": index, "kind": kind }))?;
    } else {
        ws.status(&format!("Added node {index}: {kind}"));
    }
    Ok(())
}

/// Remove a node; the last node takes over its index
pub fn remove(ws: &Workspace, index: NodeIndex) -> Result<()> {
    let mut graph = ws.load_draft()?;
    graph.ensure_node(index)?;
    let last = graph.len() - 1;
    graph.remove_node(index);
    ws.save_draft(&graph)?;
    info!(index, "node removed");

    if ws.json {
        let moved = (last != index).then_some(last);
        ws.print_json(&serde_json::json!({ "removed": index, "moved": moved }))?;
    } else {
        ws.status(&format!("Removed node {index}"));
        if last != index {
            ws.status(&format!("  node {last} is now node {index}"));
        }
    }
    Ok(())
}

fn join(set: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    set.into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// List nodes in index order
pub fn list(ws: &Workspace) -> Result<()> {
    let graph = ws.load_draft()?;

    if ws.json {
        let rows: Vec<NodeRow<'_>> = graph
            .nodes()
            .iter()
            .map(|n| NodeRow {
                index: n.index(),
                position: n.position,
                spell: &n.payload,
            })
            .collect();
        return ws.print_json(&rows);
    }

    if graph.is_empty() {
        println!("No nodes defined. Use 'castgraph node add' to create one.");
        return Ok(());
    }

    println!("Nodes ({}):", graph.len());
    for node in graph.nodes() {
        let spell = &node.payload;
        println!(
            "  {:>3}  {} [{}] {}",
            node.index(),
            spell.kind,
            spell.rarity.code(),
            ws.dim(&format!("@ ({}, {})", node.position.x, node.position.y))
        );
        if !spell.requires.is_empty() {
            println!("       requires: {}", join(&spell.requires));
        }
        if !spell.returns.is_empty() {
            println!("       returns: {}", join(&spell.returns));
        }
        if !spell.params.is_empty() {
            let params: Vec<String> = spell.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!("       params: {}", params.join(", "));
        }
    }
    Ok(())
}
