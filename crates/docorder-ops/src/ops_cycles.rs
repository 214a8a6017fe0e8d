//! Operation: report dependency cycles and the edges that break them.

use std::path::Path;

use docorder_core::component::ComponentTable;
use docorder_core::config::{AnalyzerConfig, CycleStrategy};
use docorder_graph::{build_graph_from_components, resolve_cycles_with};
use serde::Serialize;

use crate::load_components;

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub strategy: CycleStrategy,
    pub cycles: Vec<Vec<String>>,
    pub removed_edges: Vec<(String, String)>,
    /// Whether the graph is acyclic once the edges are removed.
    pub acyclic: bool,
}

pub fn report_cycles(components: &ComponentTable, strategy: CycleStrategy) -> CycleReport {
    let resolution = resolve_cycles_with(&build_graph_from_components(components), strategy);
    CycleReport {
        strategy,
        cycles: resolution.cycles,
        removed_edges: resolution.removed,
        acyclic: resolution.acyclic,
    }
}

pub fn cycles(
    repo: &Path,
    config: &AnalyzerConfig,
    graph: Option<&Path>,
) -> miette::Result<CycleReport> {
    let components = load_components(repo, config, graph)?;
    Ok(report_cycles(&components, config.cycles.strategy))
}
