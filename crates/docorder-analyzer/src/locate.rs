//! Source text of dependencies, used to build the context handed to
//! documentation consumers.

use std::path::{Path, PathBuf};

use docorder_core::component::{Component, ComponentTable, SourceSpan};
use docorder_core::module_path::file_path_of;
use tree_sitter::Node;

use crate::conventions::{CaseConvention, NameClassifier, SymbolPath, SymbolShape};
use crate::syntax::{find_definition, find_method, parse_source, python_parser};

static CASE_CONVENTION: CaseConvention = CaseConvention;

/// Where a located dependency was found relative to the requesting component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOrigin {
    /// The class that defines the requesting method.
    EnclosingClass,
    /// Another definition in the requesting component's file.
    SameFile,
    /// A definition in another file of the repository.
    OtherFile,
}

/// Outcome of a dependency lookup. Lookups never fail with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLookup {
    Found {
        origin: LookupOrigin,
        relative_path: PathBuf,
        span: SourceSpan,
        source: String,
    },
    NotFound {
        reason: String,
    },
}

impl SourceLookup {
    fn not_found(reason: impl Into<String>) -> Self {
        SourceLookup::NotFound {
            reason: reason.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SourceLookup::Found { .. })
    }

    /// The located source text, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            SourceLookup::Found { source, .. } => Some(source),
            SourceLookup::NotFound { .. } => None,
        }
    }
}

/// Finds the source text of dependency ids.
pub struct SourceLocator<'a> {
    root: &'a Path,
    components: &'a ComponentTable,
    classifier: &'a dyn NameClassifier,
    extension: String,
}

impl<'a> SourceLocator<'a> {
    /// A locator over an analyzed repository, splitting unknown ids with
    /// [`CaseConvention`].
    pub fn new(root: &'a Path, components: &'a ComponentTable) -> Self {
        Self {
            root,
            components,
            classifier: &CASE_CONVENTION,
            extension: "py".to_string(),
        }
    }

    pub fn with_classifier(mut self, classifier: &'a dyn NameClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn classifier(&self) -> &dyn NameClassifier {
        self.classifier
    }

    /// Look up the source of `dep` on behalf of `component`.
    pub fn lookup(&self, component: &Component, dep: &str) -> SourceLookup {
        if component.enclosing_class() == Some(dep) {
            return self.enclosing_class(component, dep);
        }
        if let Some(target) = self.components.get(dep) {
            let origin = if target.file_path == component.file_path {
                LookupOrigin::SameFile
            } else {
                LookupOrigin::OtherFile
            };
            return self.slice_component(target, origin);
        }
        let Some(symbol) = self.classifier.classify(dep) else {
            return SourceLookup::not_found(format!("cannot split `{dep}` into module and symbol"));
        };
        let module_file = self.root.join(file_path_of(&symbol.module, &self.extension));
        if module_file.is_file() {
            let origin = if module_file == component.file_path {
                LookupOrigin::SameFile
            } else {
                LookupOrigin::OtherFile
            };
            self.search_file(&module_file, &symbol, origin)
        } else {
            self.search_file(&component.file_path, &symbol, LookupOrigin::SameFile)
        }
    }

    fn enclosing_class(&self, component: &Component, class_id: &str) -> SourceLookup {
        if let Some(class) = self.components.get(class_id) {
            return self.slice_component(class, LookupOrigin::EnclosingClass);
        }
        let name = class_id.rsplit('.').next().unwrap_or(class_id);
        let symbol = SymbolPath {
            module: String::new(),
            class: None,
            name: name.to_string(),
            shape: SymbolShape::Class,
        };
        self.search_file(&component.file_path, &symbol, LookupOrigin::EnclosingClass)
    }

    fn slice_component(&self, target: &Component, origin: LookupOrigin) -> SourceLookup {
        let source = match self.read(&target.file_path, &target.relative_path) {
            Ok(source) => source,
            Err(reason) => return SourceLookup::not_found(reason),
        };
        match target.span.slice(&source) {
            Some(text) => SourceLookup::Found {
                origin,
                relative_path: target.relative_path.clone(),
                span: target.span,
                source: text,
            },
            None => SourceLookup::not_found(format!(
                "lines {}-{} of {} are out of range",
                target.span.start_line,
                target.span.end_line,
                target.relative_path.display()
            )),
        }
    }

    fn search_file(&self, path: &Path, symbol: &SymbolPath, origin: LookupOrigin) -> SourceLookup {
        let relative = path.strip_prefix(self.root).unwrap_or(path).to_path_buf();
        let source = match self.read(path, &relative) {
            Ok(source) => source,
            Err(reason) => return SourceLookup::not_found(reason),
        };
        let mut parser = match python_parser() {
            Ok(parser) => parser,
            Err(e) => return SourceLookup::not_found(e.to_string()),
        };
        let tree = match parse_source(&mut parser, &source) {
            Ok(tree) => tree,
            Err(e) => return SourceLookup::not_found(format!("{}: {e}", relative.display())),
        };
        let Some(node) = find_symbol(tree.root_node(), &source, symbol) else {
            return SourceLookup::not_found(format!(
                "`{}` is not defined in {}",
                symbol.name,
                relative.display()
            ));
        };
        let line_count = source.lines().count().max(1);
        let span =
            SourceSpan::from_rows(node.start_position().row, node.end_position().row, line_count);
        match span.slice(&source) {
            Some(text) => SourceLookup::Found {
                origin,
                relative_path: relative,
                span,
                source: text,
            },
            None => SourceLookup::not_found(format!("`{}` has no source text", symbol.name)),
        }
    }

    /// Read a component's file, falling back to its path under the root when
    /// the recorded absolute path no longer exists.
    fn read(&self, path: &Path, relative: &Path) -> Result<String, String> {
        std::fs::read_to_string(path)
            .or_else(|_| std::fs::read_to_string(self.root.join(relative)))
            .map_err(|e| format!("cannot read {}: {e}", relative.display()))
    }
}

fn find_symbol<'t>(root: Node<'t>, source: &str, symbol: &SymbolPath) -> Option<Node<'t>> {
    match symbol.shape {
        SymbolShape::Class => find_definition(root, source, "class_definition", &symbol.name),
        SymbolShape::Function => find_definition(root, source, "function_definition", &symbol.name),
        SymbolShape::Method => {
            let class = symbol.class.as_deref()?;
            let class = find_definition(root, source, "class_definition", class)?;
            find_method(class, source, &symbol.name)
        }
    }
}
