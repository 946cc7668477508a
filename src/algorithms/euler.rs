// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Eulerian circuits (Hierholzer) and a greedy travelling-salesman walk

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeIndex};
use crate::path::Path;
use tracing::debug;

fn to_path<P>(graph: &Graph<P>, nodes: &[NodeIndex]) -> Path {
    let mut path = Path::new();
    let mut previous: Option<NodeIndex> = None;
    for &node in nodes {
        let weight = previous.and_then(|p| graph.cost(p, node)).unwrap_or_default();
        path.push(node, weight);
        previous = Some(node);
    }
    path
}

/// Closed walk using every edge exactly once.
///
/// Requires a directed graph in which every node's in-degree equals its
/// out-degree and every edge is reachable from the first node that has
/// outgoing edges (node 0 whenever it has any). An edgeless graph yields
/// an empty path.
pub fn hierholzer<P>(graph: &Graph<P>) -> Result<Path> {
    if !graph.is_directed() {
        return Err(GraphError::Precondition(
            "Eulerian circuits are computed on directed graphs only".into(),
        ));
    }

    let n = graph.len();
    for node in 0..n {
        let (inward, outward) = (graph.in_degree(node), graph.out_degree(node));
        if inward != outward {
            return Err(GraphError::Precondition(format!(
                "graph is not Eulerian: node {node} has in-degree {inward} and out-degree {outward}"
            )));
        }
    }

    let total = graph.edge_count();
    let Some(start) = (0..n).find(|&v| graph.out_degree(v) > 0) else {
        return Ok(Path::new());
    };

    // unused outgoing edges, popped smallest target first
    let mut unused: Vec<Vec<NodeIndex>> = (0..n)
        .map(|v| {
            let mut targets = graph.successors(v);
            targets.reverse();
            targets
        })
        .collect();

    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(total + 1);
    while let Some(&v) = stack.last() {
        if let Some(next) = unused[v].pop() {
            stack.push(next);
        } else {
            circuit.push(v);
            stack.pop();
        }
    }
    circuit.reverse();

    if circuit.len() != total + 1 {
        return Err(GraphError::Precondition(format!(
            "graph is not Eulerian: only {} of {total} edges are reachable from node {start}",
            circuit.len() - 1
        )));
    }

    debug!(start, edges = total, "eulerian circuit found");
    Ok(to_path(graph, &circuit))
}

/// Nearest-neighbour tour heuristic for the travelling salesman problem.
///
/// Starts at node 0 and repeatedly moves along the cheapest outgoing edge
/// to a node not yet on the walk, stopping when there is none. This gives
/// no optimality guarantee and may not visit every node; it does not
/// return to the start.
#[must_use]
pub fn greedy_tsp<P>(graph: &Graph<P>) -> Path {
    if graph.is_empty() {
        return Path::new();
    }

    let mut visited = vec![false; graph.len()];
    let mut path = Path::starting_at(0);
    let mut current = 0;
    visited[0] = true;

    loop {
        let next = graph
            .successors(current)
            .into_iter()
            .filter(|&v| !visited[v])
            .filter_map(|v| graph.cost(current, v).map(|w| (w, v)))
            .min_by_key(|&(w, _)| w);
        let Some((weight, v)) = next else { break };
        visited[v] = true;
        path.push(v, weight);
        current = v;
    }

    debug!(visited = path.len(), of = graph.len(), "greedy tour finished");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphFlags;

    fn digraph(n: usize, edges: &[(usize, usize, i32)]) -> Graph<()> {
        let mut graph = Graph::new();
        for _ in 0..n {
            graph.add_node(());
        }
        for &(s, t, w) in edges {
            assert!(graph.connect(s, t, w));
        }
        graph
    }

    #[test]
    fn test_hierholzer_joins_two_loops() {
        let graph = digraph(4, &[(0, 1, 1), (1, 2, 2), (2, 0, 3), (0, 3, 4), (3, 0, 5)]);
        let circuit = hierholzer(&graph).unwrap();
        assert_eq!(circuit.nodes(), &[0, 1, 2, 0, 3, 0]);
        assert_eq!(circuit.weights(), &[1, 2, 3, 4, 5]);
        assert!(circuit.is_closed());
    }

    #[test]
    fn test_hierholzer_uses_self_loops() {
        let graph = digraph(2, &[(0, 1, 1), (1, 1, 1), (1, 0, 1)]);
        assert_eq!(hierholzer(&graph).unwrap().nodes(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_hierholzer_rejects_unbalanced_node() {
        let graph = digraph(3, &[(0, 1, 1), (0, 2, 1), (1, 0, 1)]);
        let err = hierholzer(&graph).unwrap_err();
        assert!(matches!(err, GraphError::Precondition(ref msg) if msg.contains("node 0")));
    }

    #[test]
    fn test_hierholzer_rejects_split_edge_sets() {
        let graph = digraph(4, &[(0, 1, 1), (1, 0, 1), (2, 3, 1), (3, 2, 1)]);
        assert!(matches!(hierholzer(&graph), Err(GraphError::Precondition(_))));
    }

    #[test]
    fn test_hierholzer_starts_at_first_node_with_edges() {
        let graph = digraph(3, &[(1, 2, 1), (2, 1, 1)]);
        assert_eq!(hierholzer(&graph).unwrap().nodes(), &[1, 2, 1]);
    }

    #[test]
    fn test_hierholzer_edgeless_and_undirected() {
        assert!(hierholzer(&digraph(3, &[])).unwrap().is_empty());
        let undirected: Graph<()> = Graph::with_flags(GraphFlags::undirected());
        assert!(hierholzer(&undirected).is_err());
    }

    #[test]
    fn test_greedy_tsp_follows_cheapest_unvisited_edge() {
        let graph = digraph(
            4,
            &[(0, 1, 5), (0, 2, 1), (0, 3, 9), (2, 0, 1), (2, 3, 2), (2, 1, 7), (3, 1, 1), (1, 0, 1)],
        );
        let tour = greedy_tsp(&graph);
        assert_eq!(tour.nodes(), &[0, 2, 3, 1]);
        assert_eq!(tour.total_weight(), 4);
    }

    #[test]
    fn test_greedy_tsp_stops_at_dead_end() {
        let graph = digraph(3, &[(0, 1, 1)]);
        assert_eq!(greedy_tsp(&graph).nodes(), &[0, 1]);
        assert!(greedy_tsp(&digraph(0, &[])).is_empty());
    }
}
