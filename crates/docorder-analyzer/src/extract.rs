//! Pass 1: materialize classes, methods and top-level functions of a parsed
//! file as components.

use std::collections::BTreeSet;

use docorder_core::component::{Component, ComponentKind, SourceSpan};
use tree_sitter::Node;

use crate::syntax::{
    body_statements, definition_name, definition_of, docstring_of, named_children, ParsedFile,
};

/// Byte range and kind of a syntax node, enough to find the node again in the
/// tree it came from without holding a borrow of that tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSite {
    pub start_byte: usize,
    pub end_byte: usize,
    pub kind: &'static str,
}

impl NodeSite {
    pub fn of(node: Node<'_>) -> Self {
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            kind: node.kind(),
        }
    }

    /// Find the node this site was taken from in `file`'s tree.
    pub fn locate<'t>(&self, file: &'t ParsedFile) -> Option<Node<'t>> {
        let mut node = file
            .root()
            .descendant_for_byte_range(self.start_byte, self.end_byte)?;
        loop {
            if node.kind() == self.kind
                && node.start_byte() == self.start_byte
                && node.end_byte() == self.end_byte
            {
                return Some(node);
            }
            node = node.parent()?;
        }
    }
}

/// A component together with the site of the node its references are
/// collected from. For decorated definitions the site covers the decorators.
#[derive(Debug, Clone)]
pub struct ExtractedComponent {
    pub component: Component,
    pub site: NodeSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Nested,
}

/// Extract every component of `file`, in source order.
///
/// Classes are emitted wherever they are defined; methods are the functions
/// defined directly in a class body; functions are emitted only at module
/// level, so nested functions and methods never become function components.
pub fn extract_components(file: &ParsedFile) -> Vec<ExtractedComponent> {
    let mut out = Vec::new();
    let mut stack: Vec<(Node<'_>, Scope)> = named_children(file.root())
        .into_iter()
        .rev()
        .map(|n| (n, Scope::Module))
        .collect();

    while let Some((node, scope)) = stack.pop() {
        let def = definition_of(node);
        match def.kind() {
            "class_definition" => {
                let class = component_of(file, node, file.module.clone(), ComponentKind::Class);
                if let Some(class) = class {
                    let class_id = class.component.id.clone();
                    out.push(class);
                    for statement in body_statements(def) {
                        let method = definition_of(statement);
                        if method.kind() != "function_definition" {
                            continue;
                        }
                        let kind = ComponentKind::Method;
                        if let Some(m) = component_of(file, statement, class_id.clone(), kind) {
                            out.push(m);
                        }
                    }
                }
                push_children(&mut stack, def, Scope::Nested);
            }
            "function_definition" => {
                if scope == Scope::Module {
                    let kind = ComponentKind::Function;
                    if let Some(function) = component_of(file, node, file.module.clone(), kind) {
                        out.push(function);
                    }
                }
                push_children(&mut stack, def, Scope::Nested);
            }
            _ => push_children(&mut stack, node, Scope::Nested),
        }
    }
    out
}

fn push_children<'t>(stack: &mut Vec<(Node<'t>, Scope)>, node: Node<'t>, scope: Scope) {
    let children = named_children(node);
    stack.extend(children.into_iter().rev().map(|c| (c, scope)));
}

/// Build the component for `node` (a definition, possibly decorated) whose id
/// is `<prefix>.<name>`.
fn component_of(
    file: &ParsedFile,
    node: Node<'_>,
    prefix: String,
    kind: ComponentKind,
) -> Option<ExtractedComponent> {
    let def = definition_of(node);
    let name = definition_name(def, &file.source)?;
    let docstring = docstring_of(def, &file.source);
    let span = SourceSpan::from_rows(
        def.start_position().row,
        def.end_position().row,
        file.line_count(),
    );
    let component = Component {
        id: format!("{prefix}.{name}"),
        kind,
        file_path: file.path.clone(),
        relative_path: file.relative_path.clone(),
        span,
        has_docstring: docstring.is_some(),
        docstring: docstring.unwrap_or_default(),
        depends_on: BTreeSet::new(),
    };
    Some(ExtractedComponent {
        component,
        site: NodeSite::of(node),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::syntax::{parse_source, python_parser};

    fn parsed(module: &str, source: &str) -> ParsedFile {
        let mut parser = python_parser().unwrap();
        let tree = parse_source(&mut parser, source).unwrap();
        ParsedFile {
            path: PathBuf::from(format!("/repo/{module}.py")),
            relative_path: PathBuf::from(format!("{module}.py")),
            module: module.to_string(),
            source: source.to_string(),
            tree,
        }
    }

    fn ids(components: &[ExtractedComponent]) -> Vec<(&str, ComponentKind)> {
        components
            .iter()
            .map(|c| (c.component.id.as_str(), c.component.kind))
            .collect()
    }

    #[test]
    fn class_method_and_function() {
        let file = parsed(
            "mod",
            "class Foo:\n    def bar(self):\n        return baz()\n\ndef baz():\n    return 1\n",
        );
        let components = extract_components(&file);
        assert_eq!(
            ids(&components),
            vec![
                ("mod.Foo", ComponentKind::Class),
                ("mod.Foo.bar", ComponentKind::Method),
                ("mod.baz", ComponentKind::Function),
            ]
        );
        let foo = &components[0].component;
        assert_eq!(foo.span, SourceSpan { start_line: 1, end_line: 3 });
        assert_eq!(components[2].component.span.start_line, 5);
    }

    #[test]
    fn nested_functions_are_not_components() {
        let file = parsed(
            "m",
            "def outer():\n    def inner():\n        pass\n    return inner\n\nif True:\n    def guarded():\n        pass\n",
        );
        assert_eq!(ids(&extract_components(&file)), vec![("m.outer", ComponentKind::Function)]);
    }

    #[test]
    fn decorated_and_async_definitions() {
        let file = parsed(
            "m",
            "import functools\n\n@functools.cache\nasync def fetch():\n    pass\n\nclass A:\n    @staticmethod\n    def make():\n        pass\n\n    async def run(self):\n        pass\n",
        );
        let components = extract_components(&file);
        assert_eq!(
            ids(&components),
            vec![
                ("m.fetch", ComponentKind::Function),
                ("m.A", ComponentKind::Class),
                ("m.A.make", ComponentKind::Method),
                ("m.A.run", ComponentKind::Method),
            ]
        );
        assert_eq!(components[0].site.kind, "decorated_definition");
        // The span starts at the `def`, not at the decorator.
        assert_eq!(components[0].component.span.start_line, 4);
    }

    #[test]
    fn nested_classes_use_module_prefix() {
        let file = parsed(
            "m",
            "class Outer:\n    class Inner:\n        def go(self):\n            pass\n\ndef factory():\n    class Local:\n        pass\n    return Local\n",
        );
        let extracted = extract_components(&file);
        let got = ids(&extracted);
        assert!(got.contains(&("m.Outer", ComponentKind::Class)));
        assert!(got.contains(&("m.Inner", ComponentKind::Class)));
        assert!(got.contains(&("m.Inner.go", ComponentKind::Method)));
        assert!(got.contains(&("m.Local", ComponentKind::Class)));
        assert!(got.contains(&("m.factory", ComponentKind::Function)));
        assert!(!got.iter().any(|(id, _)| *id == "m.Outer.Inner"));
    }

    #[test]
    fn docstrings_are_per_definition() {
        let file = parsed(
            "m",
            "class A:\n    \"\"\"Class doc.\"\"\"\n\n    def undocumented(self):\n        return 1\n\n    def documented(self):\n        'Method doc.'\n",
        );
        let components = extract_components(&file);
        let by_id = |id: &str| {
            components
                .iter()
                .find(|c| c.component.id == id)
                .map(|c| &c.component)
                .unwrap()
        };
        assert!(by_id("m.A").has_docstring);
        assert_eq!(by_id("m.A").docstring, "Class doc.");
        assert!(!by_id("m.A.undocumented").has_docstring);
        assert_eq!(by_id("m.A.undocumented").docstring, "");
        assert_eq!(by_id("m.A.documented").docstring, "Method doc.");
    }

    #[test]
    fn sites_relocate_their_nodes() {
        let file = parsed("m", "class A:\n    def f(self):\n        pass\n\n@dec\ndef g():\n    pass\n");
        for extracted in extract_components(&file) {
            let node = extracted.site.locate(&file).unwrap();
            assert_eq!(NodeSite::of(node), extracted.site);
        }
    }
}
