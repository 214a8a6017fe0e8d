//! Python front end of the docorder pipeline.
//!
//! Two passes over a repository:
//! 1. **Extraction**: discover source files, register every module, parse each
//!    file with tree-sitter and materialize classes, methods and top-level
//!    functions as [`Component`](docorder_core::component::Component)s.
//! 2. **Resolution**: for every component, collect the names and attribute
//!    chains referenced in its subtree and resolve them against the file's
//!    imports and the frozen module registry.
//!
//! The [`locate`] module serves dependency source text to downstream
//! consumers.

pub mod collector;
pub mod conventions;
pub mod extract;
pub mod imports;
pub mod locate;
pub mod repository;
pub mod resolver;
pub mod syntax;

pub use repository::{parse_repository, Analysis, AnalysisStats, Inventory, RepositoryParser};
