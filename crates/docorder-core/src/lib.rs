//! Core data types for docorder.
//!
//! This crate defines the values that flow through the analysis pipeline:
//! extracted components, module paths, the module registry that separates
//! extraction from resolution, the serialized dependency graph, and the
//! analyzer configuration.
//!
//! This crate is intentionally free of parsing and graph algorithms.

/// File name of the per-repository analyzer configuration.
pub const CONFIG_FILE_NAME: &str = "docorder.toml";

pub mod component;
pub mod config;
pub mod graph_file;
pub mod module_path;
pub mod registry;
