//! Repository-level driver of extraction and resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use docorder_core::component::ComponentTable;
use docorder_core::config::AnalyzerConfig;
use docorder_core::module_path::module_path_of;
use docorder_core::registry::{ModuleRegistry, ModuleRegistryBuilder};
use docorder_util::errors::DocorderError;
use docorder_util::fs::{build_globset, collect_source_files};
use docorder_util::progress::progress_bar;

use crate::collector::collect_references;
use crate::conventions::Conventions;
use crate::extract::{extract_components, NodeSite};
use crate::imports::ImportTable;
use crate::resolver::{attach_class_methods, Resolver};
use crate::syntax::{parse_file, python_parser, ParsedFile};

/// Counters reported after an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Source files discovered.
    pub files: usize,
    /// Files skipped because they could not be read, decoded or parsed.
    pub parse_failures: usize,
    /// Components whose syntax node could not be found again during resolution.
    pub unresolved_components: usize,
    pub components: usize,
}

/// Result of a full two-pass analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub root: PathBuf,
    pub registry: ModuleRegistry,
    pub components: ComponentTable,
    pub stats: AnalysisStats,
}

/// Drives the analysis of one repository.
#[derive(Debug, Clone)]
pub struct RepositoryParser {
    root: PathBuf,
    config: AnalyzerConfig,
}

impl RepositoryParser {
    pub fn new(root: impl Into<PathBuf>, config: AnalyzerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Pass 1: discover files, register every module, parse and extract.
    ///
    /// Every discovered file registers its module before any file is parsed,
    /// including files that later fail to parse.
    pub fn extract(&self) -> miette::Result<Inventory> {
        let root = self.root.canonicalize().map_err(|e| DocorderError::Generic {
            message: format!("cannot open repository {}: {e}", self.root.display()),
        })?;
        if !root.is_dir() {
            return Err(DocorderError::Generic {
                message: format!("{} is not a directory", root.display()),
            }
            .into());
        }

        let exclude = build_globset(&self.config.discovery.exclude)?;
        let files = collect_source_files(&root, &self.config.discovery.extensions, &exclude);
        tracing::info!("Parsing repository at {} ({} files)", root.display(), files.len());

        let mut builder = ModuleRegistryBuilder::new();
        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            let module = module_path_of(&relative);
            builder.register(module.clone(), relative.clone());
            sources.push((path, relative, module));
        }
        let registry = builder.freeze();

        let mut stats = AnalysisStats {
            files: sources.len(),
            ..AnalysisStats::default()
        };
        let mut parser = python_parser()?;
        let bar = progress_bar(sources.len() as u64, "Parsing");
        let mut parsed = Vec::with_capacity(sources.len());
        for (path, relative, module) in &sources {
            match parse_file(&mut parser, path, relative, module) {
                Ok(file) => parsed.push(file),
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", relative.display());
                    stats.parse_failures += 1;
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        let mut components = ComponentTable::new();
        let mut sites = BTreeMap::new();
        for (index, file) in parsed.iter().enumerate() {
            for extracted in extract_components(file) {
                let id = extracted.component.id.clone();
                if components.insert(id.clone(), extracted.component).is_some() {
                    tracing::debug!("{id} is defined more than once; keeping the last definition");
                }
                sites.insert(id, (index, extracted.site));
            }
        }
        stats.components = components.len();

        Ok(Inventory {
            root,
            registry,
            files: parsed,
            components,
            sites,
            stats,
        })
    }

    /// Run both passes with conventions taken from the configuration.
    pub fn parse(&self) -> miette::Result<Analysis> {
        let conventions = Conventions::from_config(&self.config.resolution);
        Ok(self.extract()?.resolve(&conventions))
    }
}

/// Everything pass 1 produced: the frozen module registry, parsed files and
/// components without dependencies.
#[derive(Debug)]
pub struct Inventory {
    root: PathBuf,
    registry: ModuleRegistry,
    files: Vec<ParsedFile>,
    components: ComponentTable,
    sites: BTreeMap<String, (usize, NodeSite)>,
    stats: AnalysisStats,
}

impl Inventory {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn components(&self) -> &ComponentTable {
        &self.components
    }

    /// Pass 2: resolve each component's dependencies, then make classes
    /// depend on their methods.
    pub fn resolve(self, conventions: &Conventions) -> Analysis {
        let Inventory {
            root,
            registry,
            files,
            mut components,
            sites,
            mut stats,
        } = self;

        let ids: BTreeSet<String> = components.keys().cloned().collect();
        let resolver = Resolver::new(&registry, conventions, &ids);
        let imports: Vec<ImportTable> = files
            .iter()
            .map(|file| ImportTable::collect(file.root(), &file.source))
            .collect();

        for (id, component) in components.iter_mut() {
            let Some(&(index, site)) = sites.get(id) else {
                continue;
            };
            let file = &files[index];
            let Some(node) = site.locate(file) else {
                tracing::warn!(
                    "Could not locate the syntax node of {id}; leaving it without dependencies"
                );
                stats.unresolved_components += 1;
                continue;
            };
            let refs = collect_references(node, &file.source);
            let deps = resolver.resolve(&file.module, &imports[index], &refs);
            tracing::debug!("{id}: {} dependencies", deps.len());
            component.depends_on = deps;
        }

        attach_class_methods(&mut components, conventions.constructor());
        tracing::info!("Found {} code components", components.len());

        Analysis {
            root,
            registry,
            components,
            stats,
        }
    }
}

/// Analyze the repository at `root`: extract every component and resolve its
/// dependencies.
pub fn parse_repository(root: &Path, config: &AnalyzerConfig) -> miette::Result<Analysis> {
    RepositoryParser::new(root, config.clone()).parse()
}
