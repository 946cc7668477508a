// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - exports the graph to various formats

use super::Workspace;
use crate::store::{self, Format};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT format
    Dot,
    /// JSON document
    Json,
    /// TOML document
    Toml,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(format!("Unknown export format: {other}. Supported: dot, json, toml")),
        }
    }
}

/// Run the export command.
///
/// Document formats go through the checked loader, so a graph with unmet
/// requirements is refused unless `draft` is set.
pub fn run(ws: &Workspace, format: ExportFormat, output: Option<PathBuf>, draft: bool) -> Result<()> {
    info!(?format, "exporting graph");

    let graph = if draft || format == ExportFormat::Dot {
        ws.load_draft()?
    } else {
        ws.load()?
    };

    if graph.is_empty() && !ws.quiet {
        eprintln!("Warning: Graph is empty. Use 'castgraph node add' first.");
    }

    let content = match format {
        ExportFormat::Dot => graph.to_dot(),
        ExportFormat::Json => store::encode(&graph, Format::Json)?,
        ExportFormat::Toml => store::encode(&graph, Format::Toml)?,
    };

    match output {
        Some(path) => {
            fs::write(&path, &content).with_context(|| format!("Failed to write to {}", path.display()))?;
            ws.status(&format!("Exported to {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
