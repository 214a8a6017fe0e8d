//! Exhaustive checks over every directed graph (without self-loops) on up to
//! four nodes.

use std::collections::{BTreeSet, HashMap};

use docorder_core::config::CycleStrategy;
use docorder_graph::{
    dependency_first_order, detect_cycles, resolve_cycles_with, root_nodes, ComponentGraph,
    DependencyMap,
};

const NAMES: [&str; 4] = ["n0", "n1", "n2", "n3"];

fn all_graphs(nodes: usize) -> impl Iterator<Item = DependencyMap> {
    let pairs: Vec<(usize, usize)> = (0..nodes)
        .flat_map(|a| (0..nodes).filter(move |&b| b != a).map(move |b| (a, b)))
        .collect();
    (0u32..(1 << pairs.len())).map(move |mask| {
        let mut map: DependencyMap = (0..nodes)
            .map(|i| (NAMES[i].to_string(), BTreeSet::new()))
            .collect();
        for (bit, &(a, b)) in pairs.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                map.entry(NAMES[a].to_string())
                    .or_default()
                    .insert(NAMES[b].to_string());
            }
        }
        map
    })
}

fn every_graph() -> impl Iterator<Item = DependencyMap> {
    (1..=4).flat_map(all_graphs)
}

fn edges_of(map: &DependencyMap) -> BTreeSet<(String, String)> {
    map.iter()
        .flat_map(|(from, deps)| deps.iter().map(move |to| (from.clone(), to.clone())))
        .collect()
}

fn is_cyclic(map: &DependencyMap) -> bool {
    ComponentGraph::from_map(map).is_cyclic()
}

fn consecutive(cycle: &[String], edge: &(String, String)) -> bool {
    let n = cycle.len();
    (0..n).any(|i| {
        let (a, b) = (&cycle[i], &cycle[(i + 1) % n]);
        (a == &edge.0 && b == &edge.1) || (b == &edge.0 && a == &edge.1)
    })
}

#[test]
fn cycles_are_reported_exactly_for_cyclic_graphs() {
    for map in every_graph() {
        let cycles = detect_cycles(&map);
        assert_eq!(!cycles.is_empty(), is_cyclic(&map), "graph {map:?}");
        assert!(cycles.iter().all(|c| c.len() > 1));
    }
}

#[test]
fn detected_cycles_match_petgraph_components() {
    for map in every_graph() {
        let graph = ComponentGraph::from_map(&map);
        let mut ours: Vec<BTreeSet<String>> = detect_cycles(&map)
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect();
        ours.sort();

        let mut pg = petgraph::graph::DiGraph::<&str, ()>::new();
        let index: HashMap<&str, _> = graph
            .nodes()
            .map(|n| (graph.id(n), pg.add_node(graph.id(n))))
            .collect();
        for (from, to) in graph.edges() {
            pg.add_edge(index[from.as_str()], index[to.as_str()], ());
        }
        let mut theirs: Vec<BTreeSet<String>> = petgraph::algo::tarjan_scc(&pg)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|n| pg[n].to_string()).collect())
            .collect();
        theirs.sort();
        assert_eq!(ours, theirs, "graph {map:?}");
    }
}

#[test]
fn single_pass_removes_one_cycle_edge_per_cycle() {
    for map in every_graph() {
        let before = edges_of(&map);
        let resolution = resolve_cycles_with(&map, CycleStrategy::SinglePass);
        let after = edges_of(&resolution.graph.to_map());

        assert_eq!(resolution.removed.len(), resolution.cycles.len(), "graph {map:?}");
        assert!(after.is_subset(&before), "edges added for {map:?}");
        assert_eq!(before.len() - after.len(), resolution.removed.len());
        for (cycle, removed) in resolution.cycles.iter().zip(&resolution.removed) {
            assert!(before.contains(removed));
            assert!(consecutive(cycle, removed), "{removed:?} not on {cycle:?}");
        }
        assert_eq!(resolution.acyclic, !is_cyclic(&resolution.graph.to_map()));
    }
}

#[test]
fn order_is_a_dependency_first_permutation() {
    for map in every_graph() {
        for strategy in [CycleStrategy::SinglePass, CycleStrategy::UntilAcyclic] {
            let resolution = resolve_cycles_with(&map, strategy);
            let order = dependency_first_order(&resolution.graph);

            assert_eq!(order.len(), map.len(), "graph {map:?}");
            let unique: BTreeSet<&String> = order.iter().collect();
            assert_eq!(unique.len(), order.len());

            if strategy == CycleStrategy::UntilAcyclic {
                assert!(resolution.acyclic, "graph {map:?}");
            }
            if resolution.acyclic {
                let position: HashMap<&str, usize> =
                    order.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
                for (from, to) in resolution.graph.edges() {
                    assert!(
                        position[to.as_str()] < position[from.as_str()],
                        "{from} -> {to} in {order:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn roots_are_exactly_the_nodes_without_dependents() {
    for map in every_graph() {
        let graph = ComponentGraph::from_map(&map);
        let roots: BTreeSet<&str> = root_nodes(&graph).into_iter().map(|n| graph.id(n)).collect();
        let targets: BTreeSet<&str> = map.values().flatten().map(String::as_str).collect();
        for id in map.keys() {
            assert_eq!(
                roots.contains(id.as_str()),
                !targets.contains(id.as_str()),
                "graph {map:?}"
            );
        }
    }
}
