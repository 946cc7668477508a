// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Run command - executes one graph algorithm and prints its result

use super::Workspace;
use crate::algorithms::{
    bellman_ford, chu_liu_edmonds, dijkstra, floyd_warshall, greedy_tsp, hierholzer, kruskal, prim,
};
use crate::graph::{Edge, Graph, NodeIndex};
use crate::path::Path;
use crate::traversal::{
    breadth_first, connected_components, depth_first, has_cycle, topological_sort, VisitOrder,
};
use crate::types::Spell;
use crate::validation::is_valid;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::json;
use tracing::{info, warn};

/// Algorithms available from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Single-pair shortest path, non-negative weights
    Dijkstra,
    /// Single-pair shortest path, negative weights allowed
    BellmanFord,
    /// All-pairs shortest paths
    FloydWarshall,
    /// Minimum spanning forest, edge-sorted
    Kruskal,
    /// Minimum spanning forest, grown from node 0
    Prim,
    /// Minimum spanning arborescence (Chu-Liu/Edmonds)
    Arborescence,
    /// Eulerian circuit (Hierholzer)
    Euler,
    /// Greedy travelling-salesman walk
    Tsp,
    /// Topological order
    Topo,
    /// Connected components
    Components,
    /// Cycle reachable from a node
    Cycle,
    /// Depth-first visit order
    Dfs,
    /// Breadth-first visit order
    Bfs,
}

/// Endpoints an algorithm may need
#[derive(Debug, Clone, Copy, Default)]
pub struct Endpoints {
    /// Start node
    pub from: Option<NodeIndex>,
    /// End node
    pub to: Option<NodeIndex>,
    /// Arborescence root
    pub root: Option<NodeIndex>,
}

fn required(value: Option<NodeIndex>, flag: &str, algorithm: Algorithm) -> Result<NodeIndex> {
    value.ok_or_else(|| anyhow::anyhow!("--{flag} is required for {algorithm:?}"))
}

fn print_path(ws: &Workspace, path: &Path) -> Result<()> {
    if ws.json {
        return ws.print_json(&json!({
            "nodes": path.nodes(),
            "weights": path.weights(),
            "total": path.total_weight(),
        }));
    }
    if path.is_empty() {
        println!("No path");
    } else {
        println!("{path}");
        println!("{}", ws.dim(&format!("total weight: {}", path.total_weight())));
    }
    Ok(())
}

fn print_tree(ws: &Workspace, tree: &Graph<Spell>) -> Result<()> {
    let edges: Vec<Edge> = tree.edges().collect();
    if ws.json {
        return ws.print_json(&json!({ "edges": edges, "total": tree.total_weight() }));
    }
    for edge in &edges {
        println!("  {} -> {}  ({})", edge.source, edge.target, edge.weight);
    }
    println!("{}", ws.dim(&format!("{} edge(s), total weight: {}", edges.len(), tree.total_weight())));
    Ok(())
}

fn print_nodes(ws: &Workspace, label: &str, nodes: &[NodeIndex]) -> Result<()> {
    if ws.json {
        return ws.print_json(nodes);
    }
    let list: Vec<String> = nodes.iter().map(ToString::to_string).collect();
    println!("{label}: {}", list.join(" "));
    Ok(())
}

/// Run `algorithm` over the stored graph
pub fn run(ws: &Workspace, algorithm: Algorithm, at: Endpoints) -> Result<()> {
    let graph = ws.load_draft()?;
    if !is_valid(&graph) {
        warn!("graph has unmet resource requirements; running anyway");
    }
    info!(?algorithm, nodes = graph.len(), "running algorithm");
    let failed = || format!("{algorithm:?} failed");

    match algorithm {
        Algorithm::Dijkstra | Algorithm::BellmanFord => {
            let from = required(at.from, "from", algorithm)?;
            let to = required(at.to, "to", algorithm)?;
            let path = if algorithm == Algorithm::Dijkstra {
                dijkstra(&graph, from, to)
            } else {
                bellman_ford(&graph, from, to)
            };
            print_path(ws, &path.with_context(failed)?)
        }
        Algorithm::FloydWarshall => {
            let all = floyd_warshall(&graph);
            if let (Some(from), Some(to)) = (at.from, at.to) {
                return print_path(ws, &all.path(from, to));
            }
            if ws.json {
                return ws.print_json(all.predecessors());
            }
            println!("Predecessors (row = source, column = target):");
            for (i, row) in all.predecessors().iter().enumerate() {
                let cells: Vec<String> = row
                    .iter()
                    .map(|p| p.map_or_else(|| "-".to_string(), |v| v.to_string()))
                    .collect();
                println!("  {i:>3}: {}", cells.join(" "));
            }
            Ok(())
        }
        Algorithm::Kruskal => print_tree(ws, &kruskal(&graph)),
        Algorithm::Prim => print_tree(ws, &prim(&graph)),
        Algorithm::Arborescence => {
            let tree = chu_liu_edmonds(&graph, at.root).with_context(failed)?;
            print_tree(ws, &tree)
        }
        Algorithm::Euler => print_path(ws, &hierholzer(&graph).with_context(failed)?),
        Algorithm::Tsp => print_path(ws, &greedy_tsp(&graph)),
        Algorithm::Topo => print_nodes(ws, "order", &topological_sort(&graph).with_context(failed)?),
        Algorithm::Components => {
            let components = connected_components(&graph);
            if ws.json {
                return ws.print_json(&components);
            }
            for (i, component) in components.iter().enumerate() {
                print_nodes(ws, &format!("component {i}"), component)?;
            }
            Ok(())
        }
        Algorithm::Cycle => {
            let from = at.from.unwrap_or_default();
            let found = has_cycle(&graph, from).with_context(failed)?;
            if ws.json {
                ws.print_json(&json!({ "from": from, "cycle": found }))
            } else if found {
                println!("{} reachable from node {from}", ws.bad("cycle"));
                Ok(())
            } else {
                println!("{} reachable from node {from}", ws.good("no cycle"));
                Ok(())
            }
        }
        Algorithm::Dfs | Algorithm::Bfs => {
            let from = at.from.unwrap_or_default();
            let mut order = VisitOrder::default();
            let walked = if algorithm == Algorithm::Dfs {
                depth_first(&graph, from, &mut order)
            } else {
                breadth_first(&graph, from, &mut order)
            };
            walked.with_context(failed)?;
            print_nodes(ws, "visit order", &order.0)
        }
    }
}
