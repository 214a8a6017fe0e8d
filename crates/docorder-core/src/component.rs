use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What kind of code unit a component is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Class,
    Function,
    Method,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Class => "class",
            ComponentKind::Function => "function",
            ComponentKind::Method => "method",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based, inclusive line range of a component in its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl SourceSpan {
    /// Build a span from 0-based tree rows, clipped to `line_count`.
    pub fn from_rows(start_row: usize, end_row: usize, line_count: usize) -> Self {
        let last = line_count.max(1);
        let start_line = (start_row + 1).min(last);
        let end_line = (end_row + 1).clamp(start_line, last);
        Self {
            start_line,
            end_line,
        }
    }

    /// Slice this span out of `source`, clipping to the available lines.
    ///
    /// Returns `None` for an empty or inverted span, which a hand-edited
    /// graph file can carry.
    pub fn slice(&self, source: &str) -> Option<String> {
        let lines: Vec<&str> = source.split('\n').collect();
        let inverted = self.end_line < self.start_line;
        if self.start_line == 0 || self.start_line > lines.len() || inverted {
            return None;
        }
        let end = self.end_line.min(lines.len());
        Some(lines[self.start_line - 1..end].join("\n"))
    }
}

/// One analyzable unit of code: a class, a top-level function or a method.
///
/// `depends_on` holds component ids (or module-prefixed dotted names) and is
/// filled in by the resolver; everything else is fixed at extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    /// Absolute path of the defining file.
    pub file_path: PathBuf,
    /// Path of the defining file relative to the repository root.
    pub relative_path: PathBuf,
    pub span: SourceSpan,
    pub has_docstring: bool,
    pub docstring: String,
    pub depends_on: BTreeSet<String>,
}

impl Component {
    /// The last dotted segment of the id: the class, function or method name.
    pub fn name(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }

    /// For a method, the id of the class that defines it.
    pub fn enclosing_class(&self) -> Option<&str> {
        match self.kind {
            ComponentKind::Method => self.id.rsplit_once('.').map(|(class, _)| class),
            _ => None,
        }
    }
}

/// All components of a run keyed by id, in id order.
pub type ComponentTable = BTreeMap<String, Component>;
