//! Per-file import tables.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::syntax::{named_children, node_text};

/// One name brought in by a `from ... import ...` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    /// Name as defined in the source module.
    pub name: String,
    /// Name it is bound to in the importing file (differs under `as`).
    pub bound: String,
}

/// A `from <module> import ...` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromImport {
    pub module: String,
    pub names: Vec<ImportedName>,
}

/// The imports of one file.
///
/// `import a.b` binds `a` to module `a`; `import a.b as c` binds `c` to
/// module `a.b`. Relative `from .m import x` records module `m`; `from . import
/// x` and wildcard imports record nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    modules: HashMap<String, String>,
    from_imports: Vec<FromImport>,
}

impl ImportTable {
    /// Collect every import statement in the tree, including those nested in
    /// functions.
    pub fn collect(root: Node<'_>, source: &str) -> Self {
        let mut table = Self::default();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" => table.add_import(node, source),
                "import_from_statement" => table.add_from_import(node, source),
                _ => {
                    let mut children = named_children(node);
                    children.reverse();
                    stack.extend(children);
                }
            }
        }
        table
    }

    fn add_import(&mut self, node: Node<'_>, source: &str) {
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            match name.kind() {
                "dotted_name" => {
                    let module = node_text(name, source);
                    let root = module.split('.').next().unwrap_or(module);
                    self.modules.insert(root.to_string(), root.to_string());
                }
                "aliased_import" => {
                    let module = name.child_by_field_name("name").map(|n| node_text(n, source));
                    let alias = name.child_by_field_name("alias").map(|n| node_text(n, source));
                    if let (Some(module), Some(alias)) = (module, alias) {
                        self.modules.insert(alias.to_string(), module.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    fn add_from_import(&mut self, node: Node<'_>, source: &str) {
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };
        let module = match module_node.kind() {
            "relative_import" => named_children(module_node)
                .into_iter()
                .find(|n| n.kind() == "dotted_name")
                .map(|n| node_text(n, source)),
            _ => Some(node_text(module_node, source)),
        };
        let Some(module) = module else {
            return;
        };

        let mut names = Vec::new();
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            match name.kind() {
                "dotted_name" => {
                    let text = node_text(name, source).to_string();
                    names.push(ImportedName {
                        name: text.clone(),
                        bound: text,
                    });
                }
                "aliased_import" => {
                    let original = name.child_by_field_name("name").map(|n| node_text(n, source));
                    let alias = name.child_by_field_name("alias").map(|n| node_text(n, source));
                    if let (Some(original), Some(alias)) = (original, alias) {
                        names.push(ImportedName {
                            name: original.to_string(),
                            bound: alias.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        if !names.is_empty() {
            self.from_imports.push(FromImport {
                module: module.to_string(),
                names,
            });
        }
    }

    /// The module bound to `name` by an `import` statement.
    pub fn module_for(&self, name: &str) -> Option<&str> {
        self.modules.get(name).map(String::as_str)
    }

    /// `from` imports in source order.
    pub fn from_imports(&self) -> &[FromImport] {
        &self.from_imports
    }

    /// Where a `from`-imported name comes from: the first statement binding
    /// `bound` whose module passes `accept`, as `(module, original_name)`.
    pub fn symbol_origin(
        &self,
        bound: &str,
        accept: impl Fn(&str) -> bool,
    ) -> Option<(&str, &str)> {
        self.from_imports
            .iter()
            .filter(|from| accept(&from.module))
            .find_map(|from| {
                from.names
                    .iter()
                    .find(|n| n.bound == bound)
                    .map(|n| (from.module.as_str(), n.name.as_str()))
            })
    }
}
