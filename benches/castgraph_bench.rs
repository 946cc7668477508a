// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for the graph algorithms
//!
//! Run with: cargo bench

use castgraph::algorithms::{bellman_ford, chu_liu_edmonds, dijkstra, floyd_warshall, kruskal, prim};
use castgraph::prelude::*;
use castgraph::traversal::{connected_components, topological_sort};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ============================================================================
// Synthetic graphs
// ============================================================================

/// Every node links forward to the next `fanout` nodes with a scrambled
/// weight, plus one back edge to node 0 so every node is reachable.
fn layered(n: usize, fanout: usize, back_edge: bool) -> Graph<()> {
    let mut graph = Graph::new();
    for _ in 0..n {
        graph.add_node(());
    }
    for i in 0..n {
        for j in (i + 1)..(i + 1 + fanout).min(n) {
            let weight = ((i * 31 + j * 17) % 97 + 1) as Weight;
            graph.connect(i, j, weight);
        }
    }
    if back_edge && n > 1 {
        graph.connect(n - 1, 0, 1);
    }
    graph
}

const SIZES: [usize; 3] = [32, 128, 256];

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");
    for n in SIZES {
        let graph = layered(n, 4, true);
        group.bench_with_input(BenchmarkId::new("dijkstra", n), &graph, |b, g| {
            b.iter(|| dijkstra(black_box(g), 0, n - 1));
        });
        group.bench_with_input(BenchmarkId::new("bellman_ford", n), &graph, |b, g| {
            b.iter(|| bellman_ford(black_box(g), 0, n - 1));
        });
        if n <= 128 {
            group.bench_with_input(BenchmarkId::new("floyd_warshall", n), &graph, |b, g| {
                b.iter(|| floyd_warshall(black_box(g)));
            });
        }
    }
    group.finish();
}

fn bench_spanning(c: &mut Criterion) {
    let mut group = c.benchmark_group("spanning");
    for n in SIZES {
        let graph = layered(n, 4, true);
        group.bench_with_input(BenchmarkId::new("kruskal", n), &graph, |b, g| {
            b.iter(|| kruskal(black_box(g)));
        });
        group.bench_with_input(BenchmarkId::new("prim", n), &graph, |b, g| {
            b.iter(|| prim(black_box(g)));
        });
        group.bench_with_input(BenchmarkId::new("chu_liu_edmonds", n), &graph, |b, g| {
            b.iter(|| chu_liu_edmonds(black_box(g), Some(0)));
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    for n in SIZES {
        let dag = layered(n, 4, false);
        group.bench_with_input(BenchmarkId::new("topological_sort", n), &dag, |b, g| {
            b.iter(|| topological_sort(black_box(g)));
        });
        group.bench_with_input(BenchmarkId::new("connected_components", n), &dag, |b, g| {
            b.iter(|| connected_components(black_box(g)));
        });
    }
    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    c.bench_function("remove_node/128", |b| {
        let graph = layered(128, 4, true);
        b.iter_batched(
            || graph.clone(),
            |mut g| {
                while !g.is_empty() {
                    g.remove_node(0);
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_shortest_paths, bench_spanning, bench_traversal, bench_edit);
criterion_main!(benches);
