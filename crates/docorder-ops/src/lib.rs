pub mod ops_analyze;
pub mod ops_context;
pub mod ops_cycles;
pub mod ops_order;

use std::path::Path;

use docorder_analyzer::parse_repository;
use docorder_core::component::ComponentTable;
use docorder_core::config::AnalyzerConfig;
use docorder_core::graph_file::load_dependency_graph;

/// Components of a repository: loaded from a saved graph file when one is
/// given, otherwise produced by a fresh analysis.
pub fn load_components(
    repo: &Path,
    config: &AnalyzerConfig,
    graph: Option<&Path>,
) -> miette::Result<ComponentTable> {
    match graph {
        Some(path) => load_dependency_graph(path),
        None => Ok(parse_repository(repo, config)?.components),
    }
}
