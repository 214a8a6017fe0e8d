//! Name-reference collection over one component's subtree.

use std::collections::{BTreeSet, HashSet};

use tree_sitter::Node;

use crate::syntax::{definition_of, named_children, named_children_except, node_text};

/// What a component's subtree refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    /// Bare identifiers read somewhere in the subtree and not bound in the
    /// scope that reads them.
    pub names: BTreeSet<String>,
    /// Free attribute chains rooted at an identifier, e.g. `["models", "Product", "create"]`.
    pub chains: BTreeSet<Vec<String>>,
    /// Names bound in the component's own scope: simple assignment targets,
    /// its parameters and the names of definitions directly inside it.
    pub bindings: HashSet<String>,
}

/// One binding scope: the body of a function, lambda or class.
#[derive(Default)]
struct Scope {
    parent: Option<usize>,
    /// Class bodies are not visible from the functions nested in them.
    class: bool,
    bindings: HashSet<String>,
}

/// Scopes plus every read recorded against the scope it happens in.
struct Walk {
    scopes: Vec<Scope>,
    own_scope: Option<usize>,
    names: Vec<(String, usize)>,
    chains: Vec<(Vec<String>, usize)>,
}

impl Walk {
    fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            own_scope: None,
            names: Vec::new(),
            chains: Vec::new(),
        }
    }

    fn open(&mut self, parent: usize, class: bool) -> usize {
        self.scopes.push(Scope {
            parent: Some(parent),
            class,
            bindings: HashSet::new(),
        });
        self.scopes.len() - 1
    }

    fn bind(&mut self, scope: usize, name: &str) {
        self.scopes[scope].bindings.insert(name.to_string());
    }

    fn is_bound(&self, mut scope: usize, name: &str) -> bool {
        let mut innermost = true;
        loop {
            let current = &self.scopes[scope];
            if (innermost || !current.class) && current.bindings.contains(name) {
                return true;
            }
            innermost = false;
            match current.parent {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }

    fn finish(mut self) -> References {
        let names = self
            .names
            .iter()
            .filter(|(name, scope)| !self.is_bound(*scope, name))
            .map(|(name, _)| name.clone())
            .collect();
        let chains = self
            .chains
            .iter()
            .filter(|(chain, scope)| !self.is_bound(*scope, &chain[0]))
            .map(|(chain, _)| chain.clone())
            .collect();
        let bindings = match self.own_scope {
            Some(own) => std::mem::take(&mut self.scopes[own].bindings),
            None => HashSet::new(),
        };
        References {
            names,
            chains,
            bindings,
        }
    }
}

enum Task<'t> {
    /// An expression or statement whose identifiers are reads.
    Node(Node<'t>, usize),
    /// An assignment target. Bare identifiers are writes; `simple` targets
    /// also become local bindings.
    Target(Node<'t>, bool, usize),
    /// A parameter list binding into the given scope.
    Parameters(Node<'t>, usize),
}

/// Node kinds whose identifiers never refer to anything.
const SKIPPED: &[&str] = &[
    "import_statement",
    "import_from_statement",
    "future_import_statement",
    "global_statement",
    "nonlocal_statement",
    "comment",
    "dotted_name",
];

/// Collect references from `node`, typically a class or function definition
/// (decorators included when the definition is decorated).
///
/// Parameters and nested definitions bind in the scope of the definition that
/// introduces them, so a method's parameters never hide names from the
/// class around it.
pub fn collect_references(node: Node<'_>, source: &str) -> References {
    let mut walk = Walk::new();
    let own = definition_of(node).id();
    let mut stack = vec![Task::Node(node, 0)];

    while let Some(task) = stack.pop() {
        match task {
            Task::Node(node, scope) => visit(node, scope, own, source, &mut walk, &mut stack),
            Task::Target(node, simple, scope) => match node.kind() {
                "identifier" => {
                    if simple {
                        walk.bind(scope, node_text(node, source));
                    }
                }
                "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern" | "tuple"
                | "list" | "expression_list" | "parenthesized_expression" | "as_pattern_target" => {
                    for child in named_children(node) {
                        stack.push(Task::Target(child, false, scope));
                    }
                }
                _ => stack.push(Task::Node(node, scope)),
            },
            Task::Parameters(node, scope) => {
                // Defaults and annotations are evaluated where the definition is.
                let outer = walk.scopes[scope].parent.unwrap_or(scope);
                for param in named_children(node) {
                    if let Some(name) = parameter_name(param, source) {
                        walk.bind(scope, name);
                    }
                    for field in ["type", "value"] {
                        if let Some(child) = param.child_by_field_name(field) {
                            stack.push(Task::Node(child, outer));
                        }
                    }
                }
            }
        }
    }
    walk.finish()
}

fn visit<'t>(
    node: Node<'t>,
    scope: usize,
    own: usize,
    source: &str,
    walk: &mut Walk,
    stack: &mut Vec<Task<'t>>,
) {
    let kind = node.kind();
    if SKIPPED.contains(&kind) {
        return;
    }
    match kind {
        "identifier" => walk.names.push((node_text(node, source).to_string(), scope)),
        "attribute" => match attribute_chain(node, source) {
            Some(chain) => {
                walk.names.push((chain[0].clone(), scope));
                walk.chains.push((chain, scope));
            }
            None => {
                if let Some(object) = node.child_by_field_name("object") {
                    stack.push(Task::Node(object, scope));
                }
            }
        },
        "assignment" | "augmented_assignment" => {
            if let Some(left) = node.child_by_field_name("left") {
                stack.push(Task::Target(left, kind == "assignment", scope));
            }
            push_all(stack, named_children_except(node, &["left"]), scope);
        }
        "for_statement" | "for_in_clause" => {
            if let Some(left) = node.child_by_field_name("left") {
                stack.push(Task::Target(left, false, scope));
            }
            push_all(stack, named_children_except(node, &["left"]), scope);
        }
        "named_expression" => push_all(stack, named_children_except(node, &["name"]), scope),
        "as_pattern_target" => stack.push(Task::Target(node, false, scope)),
        "function_definition" | "class_definition" => {
            if node.id() != own {
                if let Some(name) = node.child_by_field_name("name") {
                    walk.bind(scope, node_text(name, source));
                }
            }
            let inner = walk.open(scope, kind == "class_definition");
            if node.id() == own {
                walk.own_scope = Some(inner);
            }
            push_all(
                stack,
                named_children_except(node, &["name", "parameters", "body"]),
                scope,
            );
            if let Some(params) = node.child_by_field_name("parameters") {
                stack.push(Task::Parameters(params, inner));
            }
            if let Some(body) = node.child_by_field_name("body") {
                stack.push(Task::Node(body, inner));
            }
        }
        "lambda" => {
            let inner = walk.open(scope, false);
            if let Some(params) = node.child_by_field_name("parameters") {
                stack.push(Task::Parameters(params, inner));
            }
            if let Some(body) = node.child_by_field_name("body") {
                stack.push(Task::Node(body, inner));
            }
        }
        "keyword_argument" => push_all(stack, named_children_except(node, &["name"]), scope),
        _ => push_all(stack, named_children(node), scope),
    }
}

fn push_all<'t>(stack: &mut Vec<Task<'t>>, nodes: Vec<Node<'t>>, scope: usize) {
    stack.extend(nodes.into_iter().rev().map(|n| Task::Node(n, scope)));
}

/// Flatten `a.b.c` into `["a", "b", "c"]`. `None` when the chain is not rooted
/// at a plain identifier, as in `f().x`.
fn attribute_chain(node: Node<'_>, source: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = node;
    while current.kind() == "attribute" {
        let attr = current.child_by_field_name("attribute")?;
        parts.push(node_text(attr, source).to_string());
        current = current.child_by_field_name("object")?;
    }
    if current.kind() != "identifier" {
        return None;
    }
    parts.push(node_text(current, source).to_string());
    parts.reverse();
    Some(parts)
}

/// The name a parameter binds, for every parameter shape Python allows.
fn parameter_name<'s>(param: Node<'_>, source: &'s str) -> Option<&'s str> {
    match param.kind() {
        "identifier" => Some(node_text(param, source)),
        "default_parameter" | "typed_default_parameter" => param
            .child_by_field_name("name")
            .map(|n| node_text(n, source)),
        "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
            named_children(param)
                .into_iter()
                .find_map(|child| parameter_name(child, source))
        }
        _ => None,
    }
}

/// Names of the parameters of a function definition.
pub fn parameter_names(def: Node<'_>, source: &str) -> Vec<String> {
    def.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .filter_map(|p| parameter_name(p, source))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
