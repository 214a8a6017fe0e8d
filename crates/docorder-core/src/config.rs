use std::path::Path;

use docorder_util::errors::DocorderError;
use serde::{Deserialize, Serialize};

use crate::CONFIG_FILE_NAME;

/// Analyzer configuration loaded from `docorder.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub cycles: CycleConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Which files are analyzed, from `[discovery]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_exclude() -> Vec<String> {
    [
        "**/__pycache__/**",
        "**/.git/**",
        "**/.venv/**",
        "**/venv/**",
        "**/node_modules/**",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Name-resolution tuning from `[resolution]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default, rename = "extra-standard-modules")]
    pub extra_standard_modules: Vec<String>,
    #[serde(default, rename = "extra-builtins")]
    pub extra_builtins: Vec<String>,
    #[serde(default = "default_receivers")]
    pub receivers: Vec<String>,
    #[serde(default = "default_constructor")]
    pub constructor: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            extra_standard_modules: Vec::new(),
            extra_builtins: Vec::new(),
            receivers: default_receivers(),
            constructor: default_constructor(),
        }
    }
}

fn default_receivers() -> Vec<String> {
    vec!["self".to_string(), "cls".to_string()]
}

fn default_constructor() -> String {
    "__init__".to_string()
}

/// How cycles are broken before ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleStrategy {
    /// Detect once and remove one edge per detected cycle.
    #[default]
    SinglePass,
    /// Repeat detection and removal until no cycle remains.
    UntilAcyclic,
}

/// Cycle handling from `[cycles]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default)]
    pub strategy: CycleStrategy,
}

/// Output locations from `[output]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "output/dependency_graphs".to_string()
}

impl AnalyzerConfig {
    /// Parse a configuration file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DocorderError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            DocorderError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Load `docorder.toml` from the repository root, or return defaults if the file doesn't exist.
    pub fn load(repo_root: &Path) -> miette::Result<Self> {
        let path = repo_root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }
}
