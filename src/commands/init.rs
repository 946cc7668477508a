// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Init command - creates an empty graph document

use super::Workspace;
use crate::graph::{Graph, GraphFlags};
use crate::types::Spell;
use anyhow::Result;
use tracing::info;

/// Run the init command
pub fn run(ws: &Workspace, flags: GraphFlags, force: bool) -> Result<()> {
    let path = ws.graph_path();
    if path.exists() && !force {
        anyhow::bail!("Graph already exists at {}. Use --force to overwrite.", path.display());
    }

    let graph: Graph<Spell> = Graph::with_flags(flags);
    ws.save_draft(&graph)?;
    info!(path = %path.display(), directed = flags.directed, "graph initialized");

    if ws.json {
        ws.print_json(&flags)?;
    } else {
        ws.status(&format!("Initialized empty graph at {}", path.display()));
        ws.status(&format!(
            "  directed: {}  weighted: {}  loops: {}  cycles: {}",
            flags.directed, flags.weighted, flags.allow_loops, flags.allow_cycles
        ));
    }
    Ok(())
}
