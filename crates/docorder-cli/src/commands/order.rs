//! Handler for `docorder order`.

use std::path::Path;

use docorder_core::config::AnalyzerConfig;
use docorder_ops::ops_order::{self, OrderMode, OrderOptions};
use docorder_util::errors::DocorderError;
use docorder_util::progress::{status, status_warn};
use miette::Result;

pub fn exec(
    repo: &Path,
    config: &AnalyzerConfig,
    graph: Option<&Path>,
    mode: OrderMode,
    seed: Option<u64>,
    skip_documented: bool,
    json: bool,
) -> Result<()> {
    let options = OrderOptions {
        mode,
        seed,
        strategy: config.cycles.strategy,
        skip_documented,
    };
    let plan = ops_order::order(repo, config, graph, &options)?;

    if json {
        let out = serde_json::to_string_pretty(&plan).map_err(|e| DocorderError::Generic {
            message: format!("failed to encode order plan: {e}"),
        })?;
        println!("{out}");
        return Ok(());
    }

    for component in &plan.order {
        println!("{}", component.id);
    }
    if !plan.removed_edges.is_empty() {
        status_warn(
            "Broke",
            &format!(
                "{} dependency cycles by removing {} edges",
                plan.cycles.len(),
                plan.removed_edges.len()
            ),
        );
    }
    if !plan.acyclic {
        status_warn("Warning", "the dependency graph still has cycles; see `docorder cycles`");
    }
    let skipped = if plan.skipped > 0 {
        format!(" ({} already documented)", plan.skipped)
    } else {
        String::new()
    };
    status("Ordered", &format!("{} components{skipped}", plan.order.len()));
    Ok(())
}
