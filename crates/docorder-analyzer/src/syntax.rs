//! tree-sitter plumbing: parser setup, parsed files and small node helpers.

use std::path::{Path, PathBuf};

use docorder_util::errors::DocorderError;
use tree_sitter::{Language, Node, Parser, Tree};

/// The tree-sitter grammar used for Python sources.
pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Create a parser loaded with the Python grammar.
pub fn python_parser() -> Result<Parser, DocorderError> {
    let mut parser = Parser::new();
    parser
        .set_language(&python_language())
        .map_err(|e| DocorderError::Generic {
            message: format!("failed to load the Python grammar: {e}"),
        })?;
    Ok(parser)
}

/// A source file together with its syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Absolute path.
    pub path: PathBuf,
    /// Path relative to the repository root.
    pub relative_path: PathBuf,
    /// Dotted module path derived from `relative_path`.
    pub module: String,
    pub source: String,
    pub tree: Tree,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(node, &self.source)
    }

    pub fn line_count(&self) -> usize {
        self.source.lines().count().max(1)
    }
}

/// Read and parse a file. Undecodable bytes and syntax errors are reported as
/// [`DocorderError::Parse`].
pub fn parse_file(
    parser: &mut Parser,
    path: &Path,
    relative_path: &Path,
    module: &str,
) -> Result<ParsedFile, DocorderError> {
    let parse_error = |message: String| DocorderError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let bytes = std::fs::read(path).map_err(|e| parse_error(format!("failed to read: {e}")))?;
    let source =
        String::from_utf8(bytes).map_err(|e| parse_error(format!("not valid UTF-8: {e}")))?;
    let tree = parse_source(parser, &source).map_err(parse_error)?;
    Ok(ParsedFile {
        path: path.to_path_buf(),
        relative_path: relative_path.to_path_buf(),
        module: module.to_string(),
        source,
        tree,
    })
}

/// Parse source text, rejecting trees that contain syntax errors.
pub fn parse_source(parser: &mut Parser, source: &str) -> Result<Tree, String> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| "parser produced no tree".to_string())?;
    let root = tree.root_node();
    if root.has_error() {
        let line = first_error(root).map_or(1, |n| n.start_position().row + 1);
        return Err(format!("syntax error near line {line}"));
    }
    Ok(tree)
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut children = all_children(node);
            children.reverse();
            stack.extend(children);
        }
    }
    None
}

pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Named children of a node, in source order.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn all_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children of `node` except those attached to one of the `skip` fields.
pub fn named_children_except<'t>(node: Node<'t>, skip: &[&str]) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let mut out = Vec::new();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let skipped = cursor.field_name().is_some_and(|f| skip.contains(&f));
            if child.is_named() && !skipped {
                out.push(child);
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    out
}

/// Unwrap a `decorated_definition` to the class or function it decorates.
pub fn definition_of(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// Name of a class or function definition.
pub fn definition_name<'s>(def: Node<'_>, source: &'s str) -> Option<&'s str> {
    def.child_by_field_name("name").map(|n| node_text(n, source))
}

/// Statements of a definition's body, comments excluded.
pub fn body_statements(def: Node<'_>) -> Vec<Node<'_>> {
    def.child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter(|n| n.kind() != "comment")
                .collect()
        })
        .unwrap_or_default()
}

/// Find the first definition of `kind` named `name` anywhere under `root`,
/// in source order.
pub fn find_definition<'t>(
    root: Node<'t>,
    source: &str,
    kind: &str,
    name: &str,
) -> Option<Node<'t>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == kind && definition_name(node, source) == Some(name) {
            return Some(node);
        }
        let mut children = named_children(node);
        children.reverse();
        stack.extend(children);
    }
    None
}

/// Find a method defined directly in a class body.
pub fn find_method<'t>(class: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    body_statements(class)
        .into_iter()
        .map(definition_of)
        .find(|d| d.kind() == "function_definition" && definition_name(*d, source) == Some(name))
}

/// The docstring of a class or function: its first body statement when that
/// statement is a bare string literal.
pub fn docstring_of(def: Node<'_>, source: &str) -> Option<String> {
    let first = body_statements(def).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expressions = named_children(first);
    match expressions.as_slice() {
        [literal] => string_literal_value(*literal, source),
        _ => None,
    }
}

fn string_literal_value(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "string" => decode_string_literal(node_text(node, source)),
        "concatenated_string" => {
            let mut out = String::new();
            for part in named_children(node) {
                out.push_str(&string_literal_value(part, source)?);
            }
            Some(out)
        }
        _ => None,
    }
}

/// Decode the text of a Python string literal. Returns `None` for f-strings
/// and bytes literals, which are not docstrings.
pub fn decode_string_literal(text: &str) -> Option<String> {
    let quote_start = text.find(['\'', '"'])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let quoted = &text[quote_start..];
    let delimiter = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|d| quoted.starts_with(*d) && quoted.len() >= 2 * d.len())?;
    let inner = quoted.strip_prefix(delimiter)?.strip_suffix(delimiter)?;
    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some(esc @ ('x' | 'u' | 'U')) => {
                let width = match esc {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == width => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(esc);
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Tree {
        let mut parser = python_parser().unwrap();
        parse_source(&mut parser, source).unwrap()
    }

    #[test]
    fn decode_plain_and_triple_quoted() {
        assert_eq!(decode_string_literal("'abc'").as_deref(), Some("abc"));
        assert_eq!(
            decode_string_literal("\"\"\"Multi\nline\"\"\"").as_deref(),
            Some("Multi\nline")
        );
        assert_eq!(decode_string_literal("''").as_deref(), Some(""));
    }

    #[test]
    fn decode_escapes_unless_raw() {
        assert_eq!(decode_string_literal(r#""a\tb""#).as_deref(), Some("a\tb"));
        assert_eq!(decode_string_literal(r#"r"a\tb""#).as_deref(), Some(r"a\tb"));
        assert_eq!(decode_string_literal(r#""\x41\u00e9""#).as_deref(), Some("Aé"));
    }

    #[test]
    fn fstrings_and_bytes_are_not_docstrings() {
        assert_eq!(decode_string_literal("f'x'"), None);
        assert_eq!(decode_string_literal("b'x'"), None);
        assert_eq!(decode_string_literal("Rb'x'"), None);
    }

    #[test]
    fn syntax_errors_are_rejected() {
        let mut parser = python_parser().unwrap();
        let err = parse_source(&mut parser, "def foo(\n").unwrap_err();
        assert!(err.contains("syntax error"), "got: {err}");
    }

    #[test]
    fn docstring_of_function_and_class() {
        let source = "class A:\n    \"\"\"Doc A.\"\"\"\n    x = 1\n\ndef f():\n    # comment\n    'doc f'\n    return 1\n\ndef g():\n    return 'not a doc'\n";
        let tree = parse(source);
        let root = tree.root_node();
        let class = find_definition(root, source, "class_definition", "A").unwrap();
        let f = find_definition(root, source, "function_definition", "f").unwrap();
        let g = find_definition(root, source, "function_definition", "g").unwrap();
        assert_eq!(docstring_of(class, source).as_deref(), Some("Doc A."));
        assert_eq!(docstring_of(f, source).as_deref(), Some("doc f"));
        assert_eq!(docstring_of(g, source), None);
    }

    #[test]
    fn find_method_looks_through_decorators() {
        let source = "class A:\n    @property\n    def size(self):\n        return 1\n";
        let tree = parse(source);
        let class = find_definition(tree.root_node(), source, "class_definition", "A").unwrap();
        let method = find_method(class, source, "size").unwrap();
        assert_eq!(method.kind(), "function_definition");
        assert_eq!(method.start_position().row, 2);
    }
}
