//! The serialized dependency graph: a JSON object mapping each component id
//! to its metadata. Syntax trees and raw source text are never written.
//!
//! The file is both an inspection artifact and a checkpoint: loading it gives
//! back the component table for steps that only need metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use docorder_util::errors::DocorderError;
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind, ComponentTable, SourceSpan};

/// On-disk form of a whole dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphFile {
    pub components: BTreeMap<String, ComponentRecord>,
}

/// On-disk form of a single component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(default)]
    pub id: String,
    pub component_type: ComponentKind,
    pub file_path: PathBuf,
    pub relative_path: PathBuf,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub start_line: usize,
    #[serde(default)]
    pub end_line: usize,
    #[serde(default)]
    pub has_docstring: bool,
    #[serde(default)]
    pub docstring: String,
}

impl From<&Component> for ComponentRecord {
    fn from(component: &Component) -> Self {
        Self {
            id: component.id.clone(),
            component_type: component.kind,
            file_path: component.file_path.clone(),
            relative_path: component.relative_path.clone(),
            depends_on: component.depends_on.iter().cloned().collect(),
            start_line: component.span.start_line,
            end_line: component.span.end_line,
            has_docstring: component.has_docstring,
            docstring: component.docstring.clone(),
        }
    }
}

impl ComponentRecord {
    /// Rebuild the in-memory component. The map key is authoritative for the id.
    pub fn into_component(self, id: String) -> Component {
        Component {
            id,
            kind: self.component_type,
            file_path: self.file_path,
            relative_path: self.relative_path,
            span: SourceSpan {
                start_line: self.start_line,
                end_line: self.end_line,
            },
            has_docstring: self.has_docstring,
            docstring: self.docstring,
            depends_on: self.depends_on.into_iter().collect(),
        }
    }
}

impl GraphFile {
    pub fn from_components(components: &ComponentTable) -> Self {
        Self {
            components: components
                .iter()
                .map(|(id, c)| (id.clone(), ComponentRecord::from(c)))
                .collect(),
        }
    }

    pub fn into_components(self) -> ComponentTable {
        self.components
            .into_iter()
            .map(|(id, record)| (id.clone(), record.into_component(id)))
            .collect()
    }

    /// Load and decode a graph file. Any read or decode failure is fatal.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DocorderError::GraphFile {
            path: path.to_path_buf(),
            message: format!("failed to read: {e}"),
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DocorderError::GraphFile {
                path: path.to_path_buf(),
                message: format!("failed to decode: {e}"),
            }
            .into()
        })
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the graph to `path`, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> miette::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            docorder_util::fs::ensure_dir(parent).map_err(DocorderError::Io)?;
        }
        let json = self.to_string_pretty().map_err(|e| DocorderError::GraphFile {
            path: path.to_path_buf(),
            message: format!("failed to encode: {e}"),
        })?;
        std::fs::write(path, json).map_err(DocorderError::Io)?;
        Ok(())
    }
}

/// Persist a component table as a dependency graph file.
pub fn save_dependency_graph(components: &ComponentTable, path: &Path) -> miette::Result<()> {
    GraphFile::from_components(components).write(path)?;
    tracing::info!(
        "saved dependency graph with {} components to {}",
        components.len(),
        path.display()
    );
    Ok(())
}

/// Reload a component table from a dependency graph file.
pub fn load_dependency_graph(path: &Path) -> miette::Result<ComponentTable> {
    let components = GraphFile::from_path(path)?.into_components();
    tracing::info!(
        "loaded {} components from {}",
        components.len(),
        path.display()
    );
    Ok(components)
}
