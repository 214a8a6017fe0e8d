//! Handler for `docorder cycles`.

use std::path::Path;

use docorder_core::config::AnalyzerConfig;
use docorder_ops::ops_cycles;
use docorder_util::progress::status_info;
use miette::Result;

pub fn exec(repo: &Path, config: &AnalyzerConfig, graph: Option<&Path>) -> Result<()> {
    let report = ops_cycles::cycles(repo, config, graph)?;

    if report.cycles.is_empty() {
        println!("No cycles detected");
        return Ok(());
    }
    for (i, cycle) in report.cycles.iter().enumerate() {
        println!("Cycle {}: {}", i + 1, cycle.join(" -> "));
    }
    for (from, to) in &report.removed_edges {
        println!("Removed: {from} -> {to}");
    }
    let outcome = if report.acyclic { "acyclic" } else { "still cyclic" };
    status_info(
        "Cycles",
        &format!(
            "{} found, {} edges removed, graph is {outcome}",
            report.cycles.len(),
            report.removed_edges.len()
        ),
    );
    Ok(())
}
