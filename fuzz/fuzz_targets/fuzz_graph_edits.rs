// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fuzz target for graph edit sequences.
//!
//! Random edits followed by every algorithm; none may panic.

#![no_main]

use arbitrary::Arbitrary;
use castgraph::algorithms::{
    bellman_ford, chu_liu_edmonds, dijkstra, floyd_warshall, greedy_tsp, hierholzer, kruskal, prim,
};
use castgraph::prelude::*;
use castgraph::traversal::{connected_components, has_cycle, topological_sort};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum EditOp {
    Add,
    Remove(u8),
    Connect(u8, u8, i16),
    Disconnect(u8, u8),
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    directed: bool,
    ops: Vec<EditOp>,
}

fuzz_target!(|input: FuzzInput| {
    if input.ops.len() > 200 {
        return;
    }

    let flags = if input.directed { GraphFlags::default() } else { GraphFlags::undirected() };
    let mut graph: Graph<()> = Graph::with_flags(flags);
    for op in &input.ops {
        match *op {
            EditOp::Add => {
                if graph.len() < 24 {
                    graph.add_node(());
                }
            }
            EditOp::Remove(i) => {
                graph.remove_node(usize::from(i));
            }
            EditOp::Connect(a, b, w) => {
                graph.connect(usize::from(a), usize::from(b), Weight::from(w));
            }
            EditOp::Disconnect(a, b) => {
                graph.disconnect(usize::from(a), usize::from(b));
            }
        }
    }

    let _ = kruskal(&graph);
    let _ = prim(&graph);
    let _ = floyd_warshall(&graph);
    let _ = greedy_tsp(&graph);
    let _ = hierholzer(&graph);
    let _ = chu_liu_edmonds(&graph, None);
    let _ = topological_sort(&graph);
    let _ = connected_components(&graph);
    if !graph.is_empty() {
        let last = graph.len() - 1;
        let _ = dijkstra(&graph, 0, last);
        let _ = bellman_ford(&graph, 0, last);
        let _ = has_cycle(&graph, 0);
    }
});
