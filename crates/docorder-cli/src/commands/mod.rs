//! Command dispatch and handler modules.

mod analyze;
mod context;
mod cycles;
mod order;

use std::path::Path;

use docorder_core::config::AnalyzerConfig;
use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let explicit = cli.config.as_deref();
    match cli.command {
        Command::Analyze { repo, output } => {
            let config = load_config(&repo, explicit)?;
            analyze::exec(&repo, &config, output.as_deref())
        }
        Command::Order {
            repo,
            graph,
            mode,
            seed,
            skip_documented,
            json,
        } => {
            let config = load_config(&repo, explicit)?;
            order::exec(
                &repo,
                &config,
                graph.as_deref(),
                mode.into(),
                seed,
                skip_documented,
                json,
            )
        }
        Command::Cycles { repo, graph } => {
            let config = load_config(&repo, explicit)?;
            cycles::exec(&repo, &config, graph.as_deref())
        }
        Command::Context {
            repo,
            component,
            graph,
        } => {
            let config = load_config(&repo, explicit)?;
            context::exec(&repo, &config, graph.as_deref(), &component)
        }
    }
}

fn load_config(repo: &Path, explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    match explicit {
        Some(path) => {
            tracing::debug!("Using configuration file {}", path.display());
            AnalyzerConfig::from_path(path)
        }
        None => AnalyzerConfig::load(repo),
    }
}
