// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Algorithm library
//!
//! Every entry point is a pure function of its graph argument: pathfinding
//! returns a [`Path`](crate::path::Path), spanning algorithms return a new
//! [`Graph`](crate::graph::Graph) holding the same nodes and only the
//! selected edges. The input graph is never mutated.

pub mod arborescence;
pub mod euler;
pub mod shortest_path;
pub mod spanning_tree;

pub use arborescence::{chu_liu_edmonds, ClusterNode};
pub use euler::{greedy_tsp, hierholzer};
pub use shortest_path::{bellman_ford, dijkstra, floyd_warshall, AllPairs};
pub use spanning_tree::{kruskal, prim, TreeRank};
