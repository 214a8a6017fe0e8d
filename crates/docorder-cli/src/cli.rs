//! CLI argument definitions for docorder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use docorder_ops::ops_order::OrderMode;

#[derive(Parser, Debug)]
#[command(
    name = "docorder",
    version,
    about = "Dependency-first ordering of the components of a Python repository",
    long_about = "docorder extracts classes, functions and methods from a Python repository, \
                  resolves the dependencies between them, breaks dependency cycles and \
                  prints an order in which every component comes after what it depends on."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to docorder.toml in the repository)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a repository and save its dependency graph
    Analyze {
        /// Repository root
        repo: PathBuf,
        /// Where to write the graph file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the dependency-first processing order
    Order {
        /// Repository root
        repo: PathBuf,
        /// Use a saved dependency graph instead of analyzing
        #[arg(short, long)]
        graph: Option<PathBuf>,
        /// Ordering mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::Topo)]
        mode: ModeArg,
        /// Seed for the random modes
        #[arg(long)]
        seed: Option<u64>,
        /// Leave out components that already have a docstring
        #[arg(long)]
        skip_documented: bool,
        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report dependency cycles and the edges removed to break them
    Cycles {
        /// Repository root
        repo: PathBuf,
        /// Use a saved dependency graph instead of analyzing
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Show the source of a component's dependencies
    Context {
        /// Repository root
        repo: PathBuf,
        /// Component id, e.g. `models.product.Product`
        component: String,
        /// Use a saved dependency graph instead of analyzing
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Topo,
    RandomNode,
    RandomFile,
}

impl From<ModeArg> for OrderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Topo => OrderMode::Topo,
            ModeArg::RandomNode => OrderMode::RandomNode,
            ModeArg::RandomFile => OrderMode::RandomFile,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
