//! Cycle detection with Tarjan's strongly connected components algorithm,
//! and cycle breaking.

use docorder_core::config::CycleStrategy;
use petgraph::graph::NodeIndex;

use crate::graph::{ComponentGraph, DependencyMap};

/// Strongly connected components with more than one member.
///
/// Start nodes and successors are visited in ascending id order. Members of
/// each component are listed in the order they leave the Tarjan stack, so
/// the component's DFS root comes last.
pub fn find_cycles(graph: &ComponentGraph) -> Vec<Vec<NodeIndex>> {
    let n = graph.node_count();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<NodeIndex> = Vec::new();
    let mut counter = 0usize;
    let mut cycles = Vec::new();

    for start in graph.nodes() {
        if index[start.index()].is_some() {
            continue;
        }
        let mut frames: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();
        index[start.index()] = Some(counter);
        lowlink[start.index()] = counter;
        counter += 1;
        stack.push(start);
        on_stack[start.index()] = true;
        frames.push((start, graph.successors(start), 0));

        while let Some((node, successors, pos)) = frames.last_mut() {
            let v = *node;
            if let Some(&w) = successors.get(*pos) {
                *pos += 1;
                match index[w.index()] {
                    None => {
                        index[w.index()] = Some(counter);
                        lowlink[w.index()] = counter;
                        counter += 1;
                        stack.push(w);
                        on_stack[w.index()] = true;
                        frames.push((w, graph.successors(w), 0));
                    }
                    Some(w_index) if on_stack[w.index()] => {
                        lowlink[v.index()] = lowlink[v.index()].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some((parent, _, _)) = frames.last() {
                lowlink[parent.index()] = lowlink[parent.index()].min(lowlink[v.index()]);
            }
            if Some(lowlink[v.index()]) == index[v.index()] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member.index()] = false;
                    component.push(member);
                    if member == v {
                        break;
                    }
                }
                if component.len() > 1 {
                    cycles.push(component);
                }
            }
        }
    }
    cycles
}

/// Cycles of a dependency map, as id sequences.
pub fn detect_cycles(map: &DependencyMap) -> Vec<Vec<String>> {
    let graph = ComponentGraph::from_map(map);
    find_cycles(&graph)
        .iter()
        .map(|cycle| graph.ids(cycle))
        .collect()
}

/// Remove one edge of `cycle`: the first consecutive pair (wrapping around)
/// that is still an edge. When no forward pair is an edge, the reversed
/// sequence is walked instead; it starts at the component's DFS root, whose
/// first pair is a tree edge.
fn break_cycle(graph: &mut ComponentGraph, cycle: &[NodeIndex]) -> Option<(NodeIndex, NodeIndex)> {
    let n = cycle.len();
    let forward = (0..n).map(|i| (cycle[i], cycle[(i + 1) % n]));
    let backward = (0..n).map(|i| (cycle[n - 1 - i], cycle[(2 * n - 2 - i) % n]));
    let (from, to) = forward
        .chain(backward)
        .find(|&(from, to)| graph.has_edge(from, to))?;
    graph.remove_edge(from, to);
    Some((from, to))
}

/// Outcome of cycle resolution.
#[derive(Debug, Clone)]
pub struct CycleResolution {
    /// The graph with the removed edges gone.
    pub graph: ComponentGraph,
    /// Every cycle detected, across all detection rounds.
    pub cycles: Vec<Vec<String>>,
    /// Removed edges as `(from, to)`, in removal order.
    pub removed: Vec<(String, String)>,
    /// Whether `graph` is free of cycles.
    pub acyclic: bool,
}

/// Detect cycles once and remove one edge per detected cycle.
pub fn resolve_cycles(map: &DependencyMap) -> CycleResolution {
    resolve_cycles_with(map, CycleStrategy::SinglePass)
}

pub fn resolve_cycles_with(map: &DependencyMap, strategy: CycleStrategy) -> CycleResolution {
    break_cycles(ComponentGraph::from_map(map), strategy)
}

/// Break cycles of `graph` in place according to `strategy`.
///
/// With [`CycleStrategy::SinglePass`] a component whose strongly connected
/// component holds several overlapping cycles may stay cyclic; this is
/// reported with a warning. [`CycleStrategy::UntilAcyclic`] repeats detection
/// until nothing is left.
pub fn break_cycles(mut graph: ComponentGraph, strategy: CycleStrategy) -> CycleResolution {
    let mut cycles = Vec::new();
    let mut removed = Vec::new();

    loop {
        let found = find_cycles(&graph);
        if found.is_empty() {
            if cycles.is_empty() {
                tracing::info!("No cycles detected in the dependency graph");
            }
            break;
        }
        tracing::info!("Detected {} cycles in the dependency graph", found.len());
        for cycle in &found {
            let ids = graph.ids(cycle);
            tracing::info!("Cycle {}: {}", cycles.len() + 1, ids.join(" -> "));
            if let Some((from, to)) = break_cycle(&mut graph, cycle) {
                let edge = (graph.id(from).to_string(), graph.id(to).to_string());
                tracing::info!("Breaking cycle by removing dependency: {} -> {}", edge.0, edge.1);
                removed.push(edge);
            }
            cycles.push(ids);
        }
        if strategy == CycleStrategy::SinglePass {
            break;
        }
    }

    let acyclic = !graph.is_cyclic();
    if !acyclic {
        tracing::warn!("Dependency graph still contains cycles after a single breaking pass");
    }
    CycleResolution {
        graph,
        cycles,
        removed,
        acyclic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(edges: &[(&str, &[&str])]) -> DependencyMap {
        edges
            .iter()
            .map(|(from, to)| (from.to_string(), to.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn members_leave_the_stack_root_last() {
        let cycles = detect_cycles(&map(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]));
        assert_eq!(cycles, vec![vec!["c", "b", "a"]]);
    }

    #[test]
    fn backward_walk_breaks_long_cycles() {
        // Forward pairs c->b and b->a are not edges, the wraparound a->c is not
        // either; the reversed walk removes a->b.
        let resolution = resolve_cycles(&map(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]));
        assert_eq!(resolution.removed, vec![("a".to_string(), "b".to_string())]);
        assert!(resolution.acyclic);
    }

    #[test]
    fn separate_cycles_lose_one_edge_each() {
        let resolution = resolve_cycles(&map(&[
            ("a", &["b"]),
            ("b", &["a"]),
            ("x", &["y"]),
            ("y", &["x"]),
        ]));
        assert_eq!(resolution.cycles.len(), 2);
        assert_eq!(resolution.removed.len(), 2);
        assert!(resolution.acyclic);
    }

    #[test]
    fn break_cycle_prefers_forward_pairs() {
        let mut graph = ComponentGraph::from_map(&map(&[("a", &["b"]), ("b", &["a"])]));
        let (a, b) = (graph.find("a").unwrap(), graph.find("b").unwrap());
        assert_eq!(break_cycle(&mut graph, &[b, a]), Some((b, a)));
        assert_eq!(break_cycle(&mut graph, &[b, a]), Some((a, b)));
        assert_eq!(break_cycle(&mut graph, &[b, a]), None);
    }
}
