//! Graph stages of the docorder pipeline: build the component dependency
//! graph, detect and break cycles, and produce a dependency-first order.

pub mod cycles;
pub mod graph;
pub mod order;

pub use cycles::{detect_cycles, resolve_cycles, resolve_cycles_with, CycleResolution};
pub use graph::{build_graph_from_components, ComponentGraph, DependencyMap};
pub use order::{dependency_first_dfs, dependency_first_order, root_nodes};
