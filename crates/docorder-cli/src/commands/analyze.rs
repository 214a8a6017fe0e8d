//! Handler for `docorder analyze`.

use std::path::Path;

use docorder_core::config::AnalyzerConfig;
use docorder_ops::ops_analyze;
use docorder_util::progress::{status, status_warn};
use miette::Result;

pub fn exec(repo: &Path, config: &AnalyzerConfig, output: Option<&Path>) -> Result<()> {
    status("Analyzing", &repo.display().to_string());
    let result = ops_analyze::analyze(repo, config, output)?;
    let stats = result.analysis.stats;

    if stats.parse_failures > 0 {
        status_warn(
            "Skipped",
            &format!("{} of {} files that could not be parsed", stats.parse_failures, stats.files),
        );
    }
    status(
        "Saved",
        &format!(
            "{} components from {} files to {}",
            result.analysis.components.len(),
            stats.files,
            result.graph_path.display()
        ),
    );
    Ok(())
}
