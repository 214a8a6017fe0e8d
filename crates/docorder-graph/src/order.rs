//! Dependency-first traversal order.

use petgraph::graph::NodeIndex;

use crate::cycles::resolve_cycles;
use crate::graph::{ComponentGraph, DependencyMap};

/// Nodes nothing depends on, in ascending id order.
pub fn root_nodes(graph: &ComponentGraph) -> Vec<NodeIndex> {
    graph.nodes().filter(|&n| !graph.has_incoming(n)).collect()
}

/// Order every node of `graph` so that, for each edge `u -> v`, `v` comes
/// before `u` wherever the graph is acyclic.
///
/// Each root is walked depth-first in ascending order, dependencies first;
/// nodes no root reaches are swept afterwards in ascending order. Every node
/// appears exactly once.
pub fn dependency_first_order(graph: &ComponentGraph) -> Vec<String> {
    let mut roots = root_nodes(graph);
    if roots.is_empty() {
        if let Some(first) = graph.nodes().next() {
            tracing::warn!(
                "No root nodes found in the graph, starting from {}",
                graph.id(first)
            );
            roots.push(first);
        }
    }

    let mut visited = vec![false; graph.node_count()];
    let mut order = Vec::with_capacity(graph.node_count());
    for root in roots {
        walk(graph, root, &mut visited, &mut order);
    }
    if order.len() != graph.node_count() {
        for node in graph.nodes() {
            walk(graph, node, &mut visited, &mut order);
        }
    }
    order.into_iter().map(|n| graph.id(n).to_string()).collect()
}

/// Post-order depth-first walk from `start`, appending each node after all
/// of its unvisited dependencies.
fn walk(graph: &ComponentGraph, start: NodeIndex, visited: &mut [bool], out: &mut Vec<NodeIndex>) {
    if visited[start.index()] {
        return;
    }
    visited[start.index()] = true;
    let mut stack = vec![(start, graph.successors(start), 0usize)];
    while let Some((node, successors, pos)) = stack.last_mut() {
        if let Some(&next) = successors.get(*pos) {
            *pos += 1;
            if !visited[next.index()] {
                visited[next.index()] = true;
                stack.push((next, graph.successors(next), 0));
            }
        } else {
            let node = *node;
            stack.pop();
            out.push(node);
        }
    }
}

/// Break cycles in a single pass, then order.
pub fn dependency_first_dfs(map: &DependencyMap) -> Vec<String> {
    let resolution = resolve_cycles(map);
    dependency_first_order(&resolution.graph)
}
