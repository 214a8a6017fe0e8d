//! Operation: gather the source of a component's dependencies.

use std::path::{Path, PathBuf};

use docorder_analyzer::conventions::SymbolShape;
use docorder_analyzer::locate::{LookupOrigin, SourceLocator, SourceLookup};
use docorder_core::component::{ComponentKind, ComponentTable};
use docorder_core::config::AnalyzerConfig;
use docorder_util::errors::DocorderError;

use crate::load_components;

/// A located dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub id: String,
    pub origin: LookupOrigin,
    pub relative_path: PathBuf,
    pub source: String,
}

/// Everything a documentation consumer needs about one component.
#[derive(Debug, Clone, Default)]
pub struct DependencyContext {
    pub id: String,
    /// Source of the component itself, when it can be read.
    pub source: Option<String>,
    pub classes: Vec<ContextEntry>,
    pub functions: Vec<ContextEntry>,
    pub methods: Vec<ContextEntry>,
    /// Dependencies whose source could not be located.
    pub missing: Vec<String>,
    /// Components that depend on this one.
    pub called_by: Vec<String>,
}

/// Build the context of `id` from an analyzed component table rooted at `root`.
pub fn dependency_context(
    root: &Path,
    components: &ComponentTable,
    id: &str,
) -> miette::Result<DependencyContext> {
    let component = components.get(id).ok_or_else(|| DocorderError::Resolution {
        message: format!("no component named `{id}`"),
    })?;
    let locator = SourceLocator::new(root, components);

    let mut context = DependencyContext {
        id: id.to_string(),
        source: locator.lookup(component, id).source().map(str::to_string),
        ..DependencyContext::default()
    };

    for dep in &component.depends_on {
        // A known component's kind beats the naming convention.
        let shape = match components.get(dep) {
            Some(known) => Some(shape_of(known.kind)),
            None => locator.classifier().classify(dep).map(|s| s.shape),
        };
        let (Some(shape), SourceLookup::Found { origin, relative_path, source, .. }) =
            (shape, locator.lookup(component, dep))
        else {
            tracing::debug!("{id}: could not locate {dep}");
            context.missing.push(dep.clone());
            continue;
        };
        let entry = ContextEntry {
            id: dep.clone(),
            origin,
            relative_path,
            source,
        };
        match shape {
            SymbolShape::Class => context.classes.push(entry),
            SymbolShape::Function => context.functions.push(entry),
            SymbolShape::Method => context.methods.push(entry),
        }
    }

    context.called_by = components
        .values()
        .filter(|c| c.id != id && c.depends_on.contains(id))
        .map(|c| c.id.clone())
        .collect();
    Ok(context)
}

fn shape_of(kind: ComponentKind) -> SymbolShape {
    match kind {
        ComponentKind::Class => SymbolShape::Class,
        ComponentKind::Function => SymbolShape::Function,
        ComponentKind::Method => SymbolShape::Method,
    }
}

pub fn context(
    repo: &Path,
    config: &AnalyzerConfig,
    graph: Option<&Path>,
    id: &str,
) -> miette::Result<DependencyContext> {
    let components = load_components(repo, config, graph)?;
    let root = repo.canonicalize().map_err(DocorderError::Io)?;
    dependency_context(&root, &components, id)
}
