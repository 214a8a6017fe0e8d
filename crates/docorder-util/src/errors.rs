use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all docorder operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DocorderError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed analyzer configuration (e.g. docorder.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your docorder.toml for syntax errors"))]
    Config { message: String },

    /// A source file could not be parsed into a syntax tree.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A serialized dependency graph could not be read or decoded.
    #[error("Invalid dependency graph file {}: {message}", path.display())]
    #[diagnostic(help("Re-run `docorder analyze` to regenerate the dependency graph"))]
    GraphFile { path: PathBuf, message: String },

    /// Dependency resolution could not proceed.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DocorderResult<T> = miette::Result<T>;
