//! Interned component dependency graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use docorder_core::component::ComponentTable;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Component id to the ids it depends on.
pub type DependencyMap = BTreeMap<String, BTreeSet<String>>;

/// Keep, for every component, only the dependencies that are themselves
/// components. Every component gets an entry, even without dependencies.
pub fn build_graph_from_components(components: &ComponentTable) -> DependencyMap {
    components
        .iter()
        .map(|(id, component)| {
            let deps = component
                .depends_on
                .iter()
                .filter(|dep| components.contains_key(*dep))
                .cloned()
                .collect();
            (id.clone(), deps)
        })
        .collect()
}

/// A dependency graph whose nodes are interned component ids.
///
/// Edges point from a component to what it depends on. Nodes are inserted in
/// ascending id order, so comparing node indices compares ids.
#[derive(Debug, Clone, Default)]
pub struct ComponentGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl ComponentGraph {
    /// Build from a dependency map. Ids that only appear as dependencies
    /// become nodes too; self-loops are dropped.
    pub fn from_map(map: &DependencyMap) -> Self {
        let ids: BTreeSet<&String> = map.keys().chain(map.values().flatten()).collect();
        let mut graph = DiGraph::with_capacity(ids.len(), 0);
        let mut index = HashMap::with_capacity(ids.len());
        for id in ids {
            let idx = graph.add_node(id.clone());
            index.insert(id.clone(), idx);
        }
        let mut this = Self { graph, index };
        for (from, deps) in map {
            for to in deps {
                if from != to {
                    this.add_edge(from, to);
                }
            }
        }
        this
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        if let (Some(a), Some(b)) = (self.find(from), self.find(to)) {
            if self.graph.find_edge(a, b).is_none() {
                self.graph.add_edge(a, b, ());
            }
        }
    }

    /// Back to a dependency map with one entry per node.
    pub fn to_map(&self) -> DependencyMap {
        self.graph
            .node_indices()
            .map(|idx| {
                let deps = self
                    .successors(idx)
                    .into_iter()
                    .map(|dep| self.graph[dep].clone())
                    .collect();
                (self.graph[idx].clone(), deps)
            })
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    pub fn ids(&self, nodes: &[NodeIndex]) -> Vec<String> {
        nodes.iter().map(|&idx| self.graph[idx].clone()).collect()
    }

    /// Node indices in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct dependencies of a node, in ascending id order.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> =
            self.graph.neighbors_directed(idx, Direction::Outgoing).collect();
        out.sort_unstable();
        out
    }

    /// Nodes that depend on `idx`, in ascending id order.
    pub fn dependents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> =
            self.graph.neighbors_directed(idx, Direction::Incoming).collect();
        out.sort_unstable();
        out
    }

    pub fn has_incoming(&self, idx: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .is_some()
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.find_edge(from, to).is_some()
    }

    /// Whether `from -> to` is an edge, by id.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.find(from), self.find(to)) {
            (Some(a), Some(b)) => self.has_edge(a, b),
            _ => false,
        }
    }

    /// Remove `from -> to`. Returns whether the edge existed.
    pub fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        match self.graph.find_edge(from, to) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Every edge as `(from, to)` ids, sorted.
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .graph
            .edge_references()
            .map(|e| (self.graph[e.source()].clone(), self.graph[e.target()].clone()))
            .collect();
        out.sort();
        out
    }

    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use docorder_core::component::{Component, ComponentKind, SourceSpan};

    use super::*;

    fn map(edges: &[(&str, &[&str])]) -> DependencyMap {
        edges
            .iter()
            .map(|(from, to)| (from.to_string(), to.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn nodes_are_interned_in_id_order() {
        let graph = ComponentGraph::from_map(&map(&[("c", &["a"]), ("b", &[])]));
        let ids: Vec<&str> = graph.nodes().map(|n| graph.id(n)).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(graph.contains_edge("c", "a"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn self_loops_are_dropped() {
        let graph = ComponentGraph::from_map(&map(&[("a", &["a", "b"])]));
        assert_eq!(graph.edges(), vec![("a".to_string(), "b".to_string())]);
        assert!(!graph.is_cyclic());
    }

    #[test]
    fn to_map_lists_every_node() {
        let m = map(&[("a", &["b"])]);
        let back = ComponentGraph::from_map(&m).to_map();
        assert_eq!(back, map(&[("a", &["b"]), ("b", &[])]));
    }

    #[test]
    fn remove_edge_reports_presence() {
        let mut graph = ComponentGraph::from_map(&map(&[("a", &["b"]), ("b", &["a"])]));
        let (a, b) = (graph.find("a").unwrap(), graph.find("b").unwrap());
        assert!(graph.is_cyclic());
        assert!(graph.remove_edge(a, b));
        assert!(!graph.remove_edge(a, b));
        assert!(!graph.is_cyclic());
        assert_eq!(graph.dependents(a), vec![b]);
    }

    #[test]
    fn build_graph_keeps_component_edges_only() {
        let component = |id: &str, deps: &[&str]| Component {
            id: id.to_string(),
            kind: ComponentKind::Function,
            file_path: PathBuf::from("/r/m.py"),
            relative_path: PathBuf::from("m.py"),
            span: SourceSpan::default(),
            has_docstring: false,
            docstring: String::new(),
            depends_on: deps.iter().map(|s| s.to_string()).collect(),
        };
        let table: ComponentTable = [
            component("m.a", &["m.b", "m.gone", "other.thing"]),
            component("m.b", &[]),
        ]
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();

        assert_eq!(
            build_graph_from_components(&table),
            map(&[("m.a", &["m.b"]), ("m.b", &[])])
        );
    }
}
