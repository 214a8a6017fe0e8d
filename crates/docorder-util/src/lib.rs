//! Shared utilities for docorder.
//!
//! This crate provides cross-cutting concerns used by the other docorder
//! crates: the workspace error type, source-file discovery, and terminal
//! status/progress output.

pub mod errors;
pub mod fs;
pub mod progress;
