// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! castgraph CLI - build, check and analyse spell graphs

use anyhow::Result;
use castgraph::commands::{self, algo, export::ExportFormat, node::parse_param, Workspace};
use castgraph::prelude::*;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "castgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress status messages and non-error logs)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "CASTGRAPH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, env = "CASTGRAPH_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Graph document override
    #[arg(short, long, env = "CASTGRAPH_GRAPH", global = true)]
    graph: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty graph
    Init {
        /// Edges have no orientation
        #[arg(long)]
        undirected: bool,

        /// Every edge costs 1
        #[arg(long)]
        unweighted: bool,

        /// Refuse self-loops
        #[arg(long)]
        no_loops: bool,

        /// Refuse edges that close a cycle
        #[arg(long)]
        acyclic: bool,

        /// Overwrite an existing graph
        #[arg(long)]
        force: bool,
    },

    /// Manage nodes
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },

    /// Manage edges
    Edge {
        #[command(subcommand)]
        action: EdgeAction,
    },

    /// Run a graph algorithm
    Run {
        /// Algorithm to run
        #[arg(value_enum)]
        algorithm: algo::Algorithm,

        /// Start node
        #[arg(long)]
        from: Option<NodeIndex>,

        /// End node
        #[arg(long)]
        to: Option<NodeIndex>,

        /// Arborescence root (first spanning node if omitted)
        #[arg(long)]
        root: Option<NodeIndex>,
    },

    /// Check that every node's requirements are supplied
    Validate,

    /// Export graph to various formats
    Export {
        /// Output format (dot, json, toml)
        #[arg(short, long, default_value = "dot")]
        format: ExportFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export even if requirements are unmet
        #[arg(long)]
        draft: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum NodeAction {
    /// Add a spell node
    Add {
        /// Payload type tag
        #[arg(short, long)]
        kind: String,

        /// Rarity (common, uncommon, rare, epic, legendary)
        #[arg(short, long, default_value = "common")]
        rarity: Rarity,

        /// X position
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f32,

        /// Y position
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f32,

        /// Required resources (comma separated)
        #[arg(long, value_delimiter = ',')]
        requires: Vec<String>,

        /// Returned resources (comma separated)
        #[arg(long, value_delimiter = ',')]
        returns: Vec<String>,

        /// Parameter as name=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
    },

    /// Remove a node; the last node takes its index
    #[command(alias = "rm")]
    Remove {
        /// Node index
        index: NodeIndex,
    },

    /// List nodes
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
enum EdgeAction {
    /// Connect two nodes
    Add {
        /// Source node
        source: NodeIndex,
        /// Target node
        target: NodeIndex,
        /// Edge weight (configured default if omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        weight: Option<Weight>,
    },

    /// Disconnect two nodes
    #[command(alias = "rm")]
    Remove {
        /// Source node
        source: NodeIndex,
        /// Target node
        target: NodeIndex,
    },

    /// Change an edge's weight
    Set {
        /// Source node
        source: NodeIndex,
        /// Target node
        target: NodeIndex,
        /// New weight
        #[arg(allow_negative_numbers = true)]
        weight: Weight,
    },

    /// List edges
    #[command(alias = "ls")]
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = castgraph::config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging; RUST_LOG wins over flags and config
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut ws = Workspace::new(config, cli.graph);
    ws.json = cli.json;
    ws.quiet = cli.quiet;
    ws.color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Init { undirected, unweighted, no_loops, acyclic, force } => {
            let flags = GraphFlags {
                directed: !undirected,
                weighted: !unweighted,
                allow_loops: !no_loops,
                allow_cycles: !acyclic,
            };
            commands::init::run(&ws, flags, force)
        }
        Commands::Node { action } => match action {
            NodeAction::Add { kind, rarity, x, y, requires, returns, params } => {
                let mut spell = Spell::new(kind).with_rarity(rarity).requiring(requires).returning(returns);
                for (name, value) in params {
                    spell = spell.with_param(name, value);
                }
                commands::node::add(&ws, spell, Position::new(x, y))
            }
            NodeAction::Remove { index } => commands::node::remove(&ws, index),
            NodeAction::List => commands::node::list(&ws),
        },
        Commands::Edge { action } => match action {
            EdgeAction::Add { source, target, weight } => commands::edge::add(&ws, source, target, weight),
            EdgeAction::Remove { source, target } => commands::edge::remove(&ws, source, target),
            EdgeAction::Set { source, target, weight } => commands::edge::set(&ws, source, target, weight),
            EdgeAction::List => commands::edge::list(&ws),
        },
        Commands::Run { algorithm, from, to, root } => {
            algo::run(&ws, algorithm, algo::Endpoints { from, to, root })
        }
        Commands::Validate => commands::validate::run(&ws),
        Commands::Export { format, output, draft } => commands::export::run(&ws, format, output, draft),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    }
}
