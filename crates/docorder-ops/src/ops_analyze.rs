//! Operation: analyze a repository and save its dependency graph.

use std::path::{Path, PathBuf};

use docorder_analyzer::{parse_repository, Analysis};
use docorder_core::config::AnalyzerConfig;
use docorder_core::graph_file::save_dependency_graph;
use docorder_util::fs::sanitize_file_stem;

/// Where `analyze` writes the graph when no output path is given:
/// `<output.dir>/<repo_name>_dependency_graph.json`.
pub fn default_graph_path(repo: &Path, config: &AnalyzerConfig) -> PathBuf {
    let name = repo
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .or_else(|| repo.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "repository".to_string());
    PathBuf::from(&config.output.dir)
        .join(format!("{}_dependency_graph.json", sanitize_file_stem(&name)))
}

pub struct AnalyzeResult {
    pub analysis: Analysis,
    pub graph_path: PathBuf,
}

/// Parse the repository, resolve dependencies and save the graph file.
pub fn analyze(
    repo: &Path,
    config: &AnalyzerConfig,
    output: Option<&Path>,
) -> miette::Result<AnalyzeResult> {
    let analysis = parse_repository(repo, config)?;
    let graph_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_graph_path(repo, config));
    save_dependency_graph(&analysis.components, &graph_path)?;
    Ok(AnalyzeResult {
        analysis,
        graph_path,
    })
}
