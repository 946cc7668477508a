// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Validate command - checks every node's resource requirements

use super::Workspace;
use crate::validation::validate;
use anyhow::Result;

/// Run the validate command; fails when any requirement is unmet
pub fn run(ws: &Workspace) -> Result<()> {
    let graph = ws.load_draft()?;
    let report = validate(&graph);

    if ws.json {
        ws.print_json(&report)?;
    } else if report.is_valid() {
        println!("{} {} node(s), all requirements satisfied", ws.good("valid:"), graph.len());
    } else {
        println!("{} {} node(s) with unmet requirements", ws.bad("invalid:"), report.unmet.len());
        for unmet in &report.unmet {
            let kind = graph.node(unmet.node).map_or("?", |n| n.payload.kind.as_str());
            let missing: Vec<&str> = unmet.missing.iter().map(String::as_str).collect();
            println!("  {} {}: missing {}", unmet.node, ws.dim(kind), missing.join(", "));
        }
    }

    if !report.is_valid() {
        anyhow::bail!("Graph has {} node(s) with unmet requirements", report.unmet.len());
    }
    Ok(())
}
