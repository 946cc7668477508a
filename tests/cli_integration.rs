// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the castgraph CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Build a castgraph invocation bound to a scratch data directory
fn castgraph(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("castgraph").unwrap();
    cmd.env("CASTGRAPH_DATA_DIR", data_dir.path())
        .env("CASTGRAPH_CONFIG", data_dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CASTGRAPH_GRAPH");
    cmd
}

/// Scratch data directory holding its own config file
fn scratch() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(data_dir.path().join("config.toml"), "log_level = \"warn\"\n").unwrap();
    data_dir
}

fn init_workspace() -> TempDir {
    let data_dir = scratch();
    castgraph(&data_dir).arg("init").assert().success();
    data_dir
}

/// spark (returns heat) and fireball (requires heat), not yet wired
fn spell_pair() -> TempDir {
    let data_dir = init_workspace();
    castgraph(&data_dir)
        .args(["node", "add", "--kind", "spark", "--returns", "heat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added node 0: spark"));
    castgraph(&data_dir)
        .args(["node", "add", "--kind", "fireball", "--rarity", "rare", "--requires", "heat"])
        .args(["--param", "radius=2.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added node 1: fireball"));
    data_dir
}

#[test]
fn test_init_refuses_to_overwrite() {
    let data_dir = init_workspace();
    castgraph(&data_dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    castgraph(&data_dir).args(["init", "--force"]).assert().success();
}

#[test]
fn test_commands_require_init() {
    let data_dir = scratch();
    castgraph(&data_dir)
        .args(["node", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("castgraph init"));
}

#[test]
fn test_validate_tracks_wiring() {
    let data_dir = spell_pair();

    castgraph(&data_dir)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing heat"));

    castgraph(&data_dir).args(["edge", "add", "0", "1", "--weight", "3"]).assert().success();

    castgraph(&data_dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("all requirements satisfied"));
}

#[test]
fn test_edge_lifecycle() {
    let data_dir = spell_pair();

    castgraph(&data_dir).args(["edge", "add", "0", "1"]).assert().success();
    castgraph(&data_dir)
        .args(["edge", "add", "0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot connect 0 -> 1"));

    castgraph(&data_dir).args(["edge", "set", "0", "1", "5"]).assert().success();
    castgraph(&data_dir)
        .args(["--json", "edge", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"weight\": 5"));

    castgraph(&data_dir).args(["edge", "remove", "0", "1"]).assert().success();
    castgraph(&data_dir)
        .args(["edge", "remove", "0", "1"])
        .assert()
        .failure();
    castgraph(&data_dir)
        .args(["edge", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No edges defined"));
}

#[test]
fn test_acyclic_graph_rejects_closing_edge() {
    let data_dir = scratch();
    castgraph(&data_dir).args(["init", "--acyclic", "--no-loops"]).assert().success();
    for kind in ["a", "b"] {
        castgraph(&data_dir).args(["node", "add", "--kind", kind]).assert().success();
    }
    castgraph(&data_dir).args(["edge", "add", "0", "1"]).assert().success();
    castgraph(&data_dir).args(["edge", "add", "1", "0"]).assert().failure();
    castgraph(&data_dir).args(["edge", "add", "1", "1"]).assert().failure();
}

#[test]
fn test_node_remove_moves_last_node() {
    let data_dir = spell_pair();
    castgraph(&data_dir).args(["node", "add", "--kind", "echo"]).assert().success();
    castgraph(&data_dir)
        .args(["node", "remove", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node 2 is now node 0"));
    castgraph(&data_dir)
        .args(["node", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0  echo"));
}

#[test]
fn test_run_shortest_path() {
    let data_dir = spell_pair();
    castgraph(&data_dir).args(["node", "add", "--kind", "relay"]).assert().success();
    castgraph(&data_dir).args(["edge", "add", "0", "1", "--weight", "9"]).assert().success();
    castgraph(&data_dir).args(["edge", "add", "0", "2", "--weight", "2"]).assert().success();
    castgraph(&data_dir).args(["edge", "add", "2", "1", "--weight", "3"]).assert().success();

    castgraph(&data_dir)
        .args(["run", "dijkstra", "--from", "0", "--to", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 -(2)-> 2 -(3)-> 1"));

    castgraph(&data_dir)
        .args(["--json", "run", "bellman-ford", "--from", "0", "--to", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 5"));

    castgraph(&data_dir)
        .args(["run", "dijkstra", "--from", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to is required"));
}

#[test]
fn test_run_arborescence_and_topo() {
    let data_dir = spell_pair();
    castgraph(&data_dir).args(["edge", "add", "0", "1", "--weight", "4"]).assert().success();

    castgraph(&data_dir)
        .args(["run", "arborescence", "--root", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total weight: 4"));

    castgraph(&data_dir)
        .args(["run", "arborescence", "--root", "1"])
        .assert()
        .failure();

    castgraph(&data_dir)
        .args(["run", "topo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("order: 0 1"));
}

#[test]
fn test_export_formats() {
    let data_dir = spell_pair();

    castgraph(&data_dir)
        .args(["export", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsatisfied"));

    castgraph(&data_dir)
        .args(["export", "--format", "json", "--draft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"fireball\""));

    castgraph(&data_dir).args(["edge", "add", "0", "1"]).assert().success();

    castgraph(&data_dir)
        .args(["export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph castgraph").and(predicate::str::contains("0 -> 1")));

    let out = data_dir.path().join("spells.toml");
    castgraph(&data_dir)
        .args(["export", "--format", "toml", "--output"])
        .arg(&out)
        .assert()
        .success();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("fireball"));
}

#[test]
fn test_graph_override_points_at_another_document() {
    let data_dir = spell_pair();
    let other = data_dir.path().join("other.json");
    castgraph(&data_dir)
        .args(["--graph"])
        .arg(&other)
        .arg("init")
        .assert()
        .success();
    castgraph(&data_dir)
        .args(["--graph"])
        .arg(&other)
        .args(["node", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No nodes defined"));
}

#[test]
fn test_completions_generation() {
    let data_dir = init_workspace();
    castgraph(&data_dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("castgraph"));
}

#[test]
fn test_no_color_accepts_conventional_values() {
    let data_dir = spell_pair();
    castgraph(&data_dir).args(["edge", "add", "0", "1"]).assert().success();
    for value in ["1", "true", "yes"] {
        castgraph(&data_dir)
            .env("NO_COLOR", value)
            .arg("validate")
            .assert()
            .success()
            .stdout(predicate::str::contains("valid:").and(predicate::str::contains("\u{1b}[").not()));
    }
    castgraph(&data_dir).env("NO_COLOR", "0").arg("validate").assert().success();
}

#[test]
fn test_quiet_silences_status_lines() {
    let data_dir = spell_pair();
    castgraph(&data_dir)
        .args(["-q", "edge", "add", "0", "1"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    castgraph(&data_dir)
        .args(["-q", "node", "add", "--kind", "echo"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    castgraph(&data_dir)
        .args(["-q", "edge", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 -> 1"));
}

#[test]
fn test_edge_set_and_remove_emit_json() {
    let data_dir = spell_pair();
    castgraph(&data_dir).args(["edge", "add", "0", "1", "--weight", "2"]).assert().success();
    castgraph(&data_dir)
        .args(["--json", "edge", "set", "0", "1", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"previous\": 2").and(predicate::str::contains("\"weight\": 7")));
    castgraph(&data_dir)
        .args(["--json", "edge", "remove", "0", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\"").and(predicate::str::contains("\"target\": 1")));
}
