// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod algo;
pub mod completions;
pub mod edge;
pub mod export;
pub mod init;
pub mod node;
pub mod validate;

use crate::config::Config;
use crate::graph::Graph;
use crate::store;
use crate::types::Spell;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Resolved configuration
    pub config: Config,
    /// Graph document the commands operate on
    pub graph_path: PathBuf,
    /// Emit JSON instead of text
    pub json: bool,
    /// Colorize text output
    pub color: bool,
    /// Suppress status messages from editing commands
    pub quiet: bool,
}

impl Workspace {
    /// Build a workspace from configuration, with an optional graph override
    #[must_use]
    pub fn new(config: Config, graph: Option<PathBuf>) -> Self {
        let graph_path = graph.unwrap_or_else(|| config.graph_path());
        Self {
            config,
            graph_path,
            json: false,
            color: true,
            quiet: false,
        }
    }

    /// Location of the graph document
    #[must_use]
    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    /// Load the graph while it is being edited (requirements unchecked)
    pub fn load_draft(&self) -> Result<Graph<Spell>> {
        if !self.graph_path.exists() {
            anyhow::bail!(
                "No graph at {}. Run 'castgraph init' first.",
                self.graph_path.display()
            );
        }
        store::load_draft(&self.graph_path)
            .with_context(|| format!("Failed to load graph from {}", self.graph_path.display()))
    }

    /// Load the graph, refusing one with unmet requirements
    pub fn load(&self) -> Result<Graph<Spell>> {
        if !self.graph_path.exists() {
            anyhow::bail!(
                "No graph at {}. Run 'castgraph init' first.",
                self.graph_path.display()
            );
        }
        store::load(&self.graph_path)
    }

    /// Persist an edited graph
    pub fn save_draft(&self, graph: &Graph<Spell>) -> Result<()> {
        store::save_draft(graph, &self.graph_path)
            .with_context(|| format!("Failed to save graph to {}", self.graph_path.display()))
    }

    /// Success styling
    #[must_use]
    pub fn good(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    /// Failure styling
    #[must_use]
    pub fn bad(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Secondary-detail styling
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print a status line unless quiet
    pub fn status(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value).context("Failed to encode output")?);
        Ok(())
    }
}
