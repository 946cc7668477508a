// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Traversal engine: iterative DFS/BFS with visitor hooks, cycle detection,
//! topological sort and connected components

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeIndex};
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

/// Per-node traversal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Not reached yet
    Out,
    /// On the DFS stack or in the BFS queue
    Frontier,
    /// Fully processed
    Visited,
}

/// Hooks called during a traversal. Every hook defaults to a no-op.
pub trait Visitor {
    /// A node is reached for the first time
    fn visit(&mut self, _node: NodeIndex) {}
    /// An edge leads to an unmarked node
    fn discover(&mut self, _from: NodeIndex, _to: NodeIndex) {}
    /// An edge leads to a node that is already marked
    fn revisit(&mut self, _from: NodeIndex, _to: NodeIndex, _mark: Mark) {}
    /// DFS only: every edge out of `node` has been explored
    fn finish(&mut self, _node: NodeIndex) {}
}

impl Visitor for () {}

/// Collects nodes in visitation order
#[derive(Debug, Default)]
pub struct VisitOrder(pub Vec<NodeIndex>);

impl Visitor for VisitOrder {
    fn visit(&mut self, node: NodeIndex) {
        self.0.push(node);
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Outgoing,
    Either,
}

fn adjacent<P>(graph: &Graph<P>, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
    match direction {
        Direction::Outgoing => graph.successors(node),
        Direction::Either => graph.neighbors(node),
    }
}

fn walk_depth_first<P, V: Visitor + ?Sized>(
    graph: &Graph<P>,
    start: NodeIndex,
    marks: &mut [Mark],
    direction: Direction,
    visitor: &mut V,
) {
    marks[start] = Mark::Frontier;
    visitor.visit(start);
    let mut stack = vec![(start, adjacent(graph, start, direction), 0usize)];

    while let Some(frame) = stack.last_mut() {
        let from = frame.0;
        let next = frame.1.get(frame.2).copied();
        frame.2 += 1;

        match next {
            Some(to) => match marks[to] {
                Mark::Out => {
                    visitor.discover(from, to);
                    marks[to] = Mark::Frontier;
                    visitor.visit(to);
                    stack.push((to, adjacent(graph, to, direction), 0));
                }
                mark => visitor.revisit(from, to, mark),
            },
            None => {
                marks[from] = Mark::Visited;
                visitor.finish(from);
                stack.pop();
            }
        }
    }
}

/// Depth-first traversal from `start` following outgoing edges.
///
/// Returns the final marking; nodes left `Out` were not reachable.
pub fn depth_first<P, V: Visitor + ?Sized>(graph: &Graph<P>, start: NodeIndex, visitor: &mut V) -> Result<Vec<Mark>> {
    graph.ensure_node(start)?;
    let mut marks = vec![Mark::Out; graph.len()];
    walk_depth_first(graph, start, &mut marks, Direction::Outgoing, visitor);
    Ok(marks)
}

/// Breadth-first traversal from `start` following outgoing edges
pub fn breadth_first<P, V: Visitor + ?Sized>(graph: &Graph<P>, start: NodeIndex, visitor: &mut V) -> Result<Vec<Mark>> {
    graph.ensure_node(start)?;
    let mut marks = vec![Mark::Out; graph.len()];
    let mut queue = VecDeque::from([start]);
    marks[start] = Mark::Frontier;

    while let Some(node) = queue.pop_front() {
        visitor.visit(node);
        for to in graph.successors(node) {
            match marks[to] {
                Mark::Out => {
                    visitor.discover(node, to);
                    marks[to] = Mark::Frontier;
                    queue.push_back(to);
                }
                mark => visitor.revisit(node, to, mark),
            }
        }
        marks[node] = Mark::Visited;
    }

    Ok(marks)
}

/// Nodes reachable from `start` (including `start`); empty if `start` is absent
#[must_use]
pub fn reachable_from<P>(graph: &Graph<P>, start: NodeIndex) -> BTreeSet<NodeIndex> {
    let Ok(marks) = depth_first(graph, start, &mut ()) else {
        return BTreeSet::new();
    };
    marks
        .iter()
        .enumerate()
        .filter(|(_, &m)| m != Mark::Out)
        .map(|(i, _)| i)
        .collect()
}

struct CycleFinder {
    directed: bool,
    parent: Vec<Option<NodeIndex>>,
    found: Option<NodeIndex>,
}

impl Visitor for CycleFinder {
    fn discover(&mut self, from: NodeIndex, to: NodeIndex) {
        self.parent[to] = Some(from);
    }

    fn revisit(&mut self, from: NodeIndex, to: NodeIndex, mark: Mark) {
        if self.found.is_some() || mark != Mark::Frontier {
            return;
        }
        // undirected: the edge back to the DFS parent is the tree edge itself
        if self.directed || self.parent[from] != Some(to) {
            self.found = Some(to);
        }
    }
}

/// Is there a cycle reachable from `start`?
///
/// Cycles in parts of the graph `start` cannot reach are not reported;
/// iterate over [`connected_components`] for a whole-graph answer.
pub fn has_cycle<P>(graph: &Graph<P>, start: NodeIndex) -> Result<bool> {
    let mut finder = CycleFinder {
        directed: graph.is_directed(),
        parent: vec![None; graph.len()],
        found: None,
    };
    depth_first(graph, start, &mut finder)?;
    if let Some(node) = finder.found {
        debug!(start, node, "cycle found");
    }
    Ok(finder.found.is_some())
}

struct PostOrder {
    order: Vec<NodeIndex>,
    back_edge: Option<NodeIndex>,
}

impl Visitor for PostOrder {
    fn revisit(&mut self, _from: NodeIndex, to: NodeIndex, mark: Mark) {
        if mark == Mark::Frontier && self.back_edge.is_none() {
            self.back_edge = Some(to);
        }
    }

    fn finish(&mut self, node: NodeIndex) {
        self.order.push(node);
    }
}

/// Topological order of every node that has at least one edge.
///
/// Fails with [`GraphError::Cyclic`] on a cyclic graph and with
/// [`GraphError::Precondition`] on an undirected one.
pub fn topological_sort<P>(graph: &Graph<P>) -> Result<Vec<NodeIndex>> {
    if !graph.is_directed() {
        return Err(GraphError::Precondition(
            "topological sort requires a directed graph".into(),
        ));
    }

    let mut marks = vec![Mark::Out; graph.len()];
    let mut post = PostOrder {
        order: Vec::new(),
        back_edge: None,
    };
    for node in 0..graph.len() {
        if marks[node] != Mark::Out || graph.in_degree(node) + graph.out_degree(node) == 0 {
            continue;
        }
        walk_depth_first(graph, node, &mut marks, Direction::Outgoing, &mut post);
        if let Some(node) = post.back_edge {
            return Err(GraphError::Cyclic { node });
        }
    }

    post.order.reverse();
    Ok(post.order)
}

/// Connected components; edge direction is ignored
#[must_use]
pub fn connected_components<P>(graph: &Graph<P>) -> Vec<Vec<NodeIndex>> {
    let mut marks = vec![Mark::Out; graph.len()];
    let mut components = Vec::new();
    for node in 0..graph.len() {
        if marks[node] != Mark::Out {
            continue;
        }
        let mut component = VisitOrder::default();
        walk_depth_first(graph, node, &mut marks, Direction::Either, &mut component);
        components.push(component.0);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphFlags;

    fn graph_with(n: usize, edges: &[(usize, usize)]) -> Graph<()> {
        let mut graph = Graph::new();
        for _ in 0..n {
            graph.add_node(());
        }
        for &(s, t) in edges {
            graph.connect(s, t, 1);
        }
        graph
    }

    #[derive(Default)]
    struct Recorder {
        discovered: Vec<(NodeIndex, NodeIndex)>,
        revisited: Vec<(NodeIndex, NodeIndex, Mark)>,
        finished: Vec<NodeIndex>,
    }

    impl Visitor for Recorder {
        fn discover(&mut self, from: NodeIndex, to: NodeIndex) {
            self.discovered.push((from, to));
        }
        fn revisit(&mut self, from: NodeIndex, to: NodeIndex, mark: Mark) {
            self.revisited.push((from, to, mark));
        }
        fn finish(&mut self, node: NodeIndex) {
            self.finished.push(node);
        }
    }

    #[test]
    fn test_depth_first_order_and_hooks() {
        let graph = graph_with(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let mut order = VisitOrder::default();
        depth_first(&graph, 0, &mut order).unwrap();
        assert_eq!(order.0, vec![0, 1, 3, 2]);

        let mut rec = Recorder::default();
        depth_first(&graph, 0, &mut rec).unwrap();
        assert_eq!(rec.discovered, vec![(0, 1), (1, 3), (0, 2)]);
        assert_eq!(rec.revisited, vec![(2, 3, Mark::Visited)]);
        assert_eq!(rec.finished, vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_breadth_first_order() {
        let graph = graph_with(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);
        let mut order = VisitOrder::default();
        let marks = breadth_first(&graph, 0, &mut order).unwrap();
        assert_eq!(order.0, vec![0, 1, 2, 3, 4]);
        assert!(marks.iter().all(|&m| m == Mark::Visited));
    }

    #[test]
    fn test_traversal_rejects_absent_start() {
        let graph = graph_with(2, &[]);
        assert!(depth_first(&graph, 5, &mut ()).is_err());
        assert!(breadth_first(&graph, 2, &mut ()).is_err());
        assert!(reachable_from(&graph, 2).is_empty());
    }

    #[test]
    fn test_has_cycle_directed() {
        let dag = graph_with(3, &[(0, 1), (0, 2), (1, 2)]);
        assert!(!has_cycle(&dag, 0).unwrap());

        let cyclic = graph_with(3, &[(0, 1), (1, 2), (2, 1)]);
        assert!(has_cycle(&cyclic, 0).unwrap());
        // a cycle that node 0 cannot reach
        let island = graph_with(4, &[(1, 2), (2, 1)]);
        assert!(!has_cycle(&island, 0).unwrap());
    }

    #[test]
    fn test_has_cycle_undirected_ignores_tree_edges() {
        let mut tree: Graph<()> = Graph::with_flags(GraphFlags::undirected());
        for _ in 0..3 {
            tree.add_node(());
        }
        tree.connect(0, 1, 1);
        tree.connect(1, 2, 1);
        assert!(!has_cycle(&tree, 0).unwrap());

        tree.connect(2, 0, 1);
        assert!(has_cycle(&tree, 0).unwrap());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let graph = graph_with(2, &[(0, 1), (1, 1)]);
        assert!(has_cycle(&graph, 0).unwrap());
    }

    #[test]
    fn test_topological_sort() {
        let graph = graph_with(5, &[(3, 1), (1, 0), (3, 0), (0, 2)]);
        let order = topological_sort(&graph).unwrap();
        assert_eq!(order.len(), 4, "isolated node 4 is skipped");
        let pos = |n| order.iter().position(|&x| x == n).unwrap();
        assert!(pos(3) < pos(1));
        assert!(pos(1) < pos(0));
        assert!(pos(0) < pos(2));
    }

    #[test]
    fn test_topological_sort_rejects_cycles() {
        let graph = graph_with(3, &[(0, 1), (1, 2), (2, 0)]);
        assert!(matches!(topological_sort(&graph), Err(GraphError::Cyclic { .. })));
    }

    #[test]
    fn test_connected_components_ignore_direction() {
        let graph = graph_with(6, &[(1, 0), (2, 1), (4, 3)]);
        let components = connected_components(&graph);
        assert_eq!(components, vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
    }
}
