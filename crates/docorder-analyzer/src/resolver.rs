//! Pass 2: turn collected references into dependency ids.

use std::collections::{BTreeMap, BTreeSet};

use docorder_core::component::{ComponentKind, ComponentTable};
use docorder_core::module_path::leading_segment;
use docorder_core::registry::ModuleRegistry;

use crate::collector::References;
use crate::conventions::Conventions;
use crate::imports::ImportTable;

/// Resolves names against a frozen module registry.
///
/// Holding a [`ModuleRegistry`] rather than its builder means a resolver can
/// only exist once every module of the repository has been registered.
pub struct Resolver<'a> {
    registry: &'a ModuleRegistry,
    conventions: &'a Conventions,
    component_ids: &'a BTreeSet<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a ModuleRegistry,
        conventions: &'a Conventions,
        component_ids: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            registry,
            conventions,
            component_ids,
        }
    }

    /// Dependencies of a component defined in `module`, given its free
    /// references and the imports of its file. Only in-repository ids survive.
    pub fn resolve(
        &self,
        module: &str,
        imports: &ImportTable,
        refs: &References,
    ) -> BTreeSet<String> {
        let from_names = refs
            .names
            .iter()
            .filter_map(|name| self.resolve_name(module, imports, name));
        let from_chains = refs
            .chains
            .iter()
            .filter_map(|chain| self.resolve_chain(imports, chain));
        from_names
            .chain(from_chains)
            .filter(|dep| self.is_in_repository(dep))
            .collect()
    }

    /// Resolve a bare identifier.
    ///
    /// Builtins, receivers and names bound by `import` resolve
    /// to nothing. A name imported from an in-repository module resolves to
    /// `<module>.<name>`, one imported from elsewhere to nothing; anything
    /// else is assumed to live in the current module.
    pub fn resolve_name(&self, module: &str, imports: &ImportTable, name: &str) -> Option<String> {
        if self.conventions.is_builtin(name) || self.conventions.is_receiver(name) {
            return None;
        }
        if imports.module_for(name).is_some() {
            return None;
        }
        let in_repository = |m: &str| self.is_repository_module(m);
        if let Some((origin, original)) = imports.symbol_origin(name, in_repository) {
            return Some(format!("{origin}.{original}"));
        }
        // Imported, but from outside the repository.
        if imports.symbol_origin(name, |_| true).is_some() {
            return None;
        }
        Some(format!("{module}.{name}"))
    }

    /// Resolve an attribute chain such as `models.product.Product.create`.
    ///
    /// Chains rooted at a receiver resolve to nothing. For a
    /// root bound by `import`, the chain is expanded to its full dotted path
    /// and the longest registered module prefix picks the symbol after it.
    /// For a root bound by `from ... import`, the chain collapses to the
    /// imported symbol itself.
    pub fn resolve_chain(&self, imports: &ImportTable, chain: &[String]) -> Option<String> {
        let (root, rest) = chain.split_first()?;
        if rest.is_empty() || self.conventions.is_receiver(root) {
            return None;
        }
        if let Some(module) = imports.module_for(root) {
            if self.conventions.is_standard_module(module) {
                return None;
            }
            let module_len = module.split('.').count();
            let full: Vec<&str> = module
                .split('.')
                .chain(rest.iter().map(String::as_str))
                .collect();
            return (module_len..full.len()).rev().find_map(|k| {
                let prefix = full[..k].join(".");
                self.registry
                    .contains(&prefix)
                    .then(|| format!("{prefix}.{}", full[k]))
            });
        }
        imports
            .symbol_origin(root, |m| self.is_repository_module(m))
            .map(|(origin, original)| format!("{origin}.{original}"))
    }

    fn is_repository_module(&self, module: &str) -> bool {
        !self.conventions.is_standard_module(module) && self.registry.contains(module)
    }

    /// Whether `dep` names a known component, or something inside a
    /// registered top-level module.
    pub fn is_in_repository(&self, dep: &str) -> bool {
        self.component_ids.contains(dep) || self.registry.contains(leading_segment(dep))
    }
}

/// Make every class depend on its own methods, except the constructor.
pub fn attach_class_methods(components: &mut ComponentTable, constructor: &str) {
    let mut methods: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for component in components.values() {
        if component.kind != ComponentKind::Method || component.name() == constructor {
            continue;
        }
        if let Some(class) = component.enclosing_class() {
            methods
                .entry(class.to_string())
                .or_default()
                .push(component.id.clone());
        }
    }
    for (class, ids) in methods {
        if let Some(class) = components.get_mut(&class) {
            if class.kind == ComponentKind::Class {
                class.depends_on.extend(ids);
            }
        }
    }
}
