// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Values are layered: built-in defaults, then a TOML file, then
//! `CASTGRAPH_*` environment variables.

use crate::graph::{Weight, DEFAULT_WEIGHT};
use anyhow::{Context, Result};
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CASTGRAPH";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "hyperpolymath", "castgraph")
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for persistent data
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Weight given to edges added without an explicit one
    pub default_weight: Weight,
    /// Graph document, relative to `data_dir` unless absolute
    pub graph_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".castgraph")),
            log_level: "info".to_string(),
            default_weight: DEFAULT_WEIGHT,
            graph_file: PathBuf::from("graph.json"),
        }
    }
}

impl Config {
    /// Location of the graph document
    #[must_use]
    pub fn graph_path(&self) -> PathBuf {
        self.data_dir.join(&self.graph_file)
    }
}

/// Default location of the configuration file
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

fn build(file: Option<&Path>, required: bool, env: Environment) -> Result<Config> {
    let defaults = config::Config::try_from(&Config::default()).context("Failed to encode default configuration")?;
    let mut builder = config::Config::builder().add_source(defaults);
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(required));
    }
    builder
        .add_source(env.try_parsing(true))
        .build()
        .context("Failed to assemble configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

/// Load configuration.
///
/// An explicit `file` must exist; otherwise the per-user config file is
/// read when present.
pub fn load(file: Option<&Path>) -> Result<Config> {
    let env = Environment::with_prefix(ENV_PREFIX);
    match file {
        Some(path) => build(Some(path), true, env)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => build(default_config_file().as_deref(), false, env),
    }
}
