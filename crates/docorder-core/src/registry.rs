//! The set of in-repository modules.
//!
//! Extraction fills a [`ModuleRegistryBuilder`]; resolution only accepts the
//! frozen [`ModuleRegistry`] it produces, so no resolution can start before
//! every file of the repository has been registered.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Collects module paths while source files are discovered.
#[derive(Debug, Default)]
pub struct ModuleRegistryBuilder {
    modules: BTreeMap<String, PathBuf>,
}

impl ModuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module together with its repository-relative file.
    pub fn register(&mut self, module: impl Into<String>, relative_path: impl Into<PathBuf>) {
        self.modules.insert(module.into(), relative_path.into());
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Finish registration. The returned registry is immutable.
    pub fn freeze(self) -> ModuleRegistry {
        ModuleRegistry {
            modules: self.modules,
        }
    }
}

/// Immutable set of every module path found in the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, PathBuf>,
}

impl ModuleRegistry {
    /// Whether `module` names an in-repository module.
    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// The repository-relative file a module was registered from.
    pub fn file_of(&self, module: &str) -> Option<&Path> {
        self.modules.get(module).map(PathBuf::as_path)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<(String, PathBuf)> for ModuleRegistry {
    fn from_iter<I: IntoIterator<Item = (String, PathBuf)>>(iter: I) -> Self {
        let mut builder = ModuleRegistryBuilder::new();
        for (module, path) in iter {
            builder.register(module, path);
        }
        builder.freeze()
    }
}
