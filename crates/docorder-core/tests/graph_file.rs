use std::collections::BTreeSet;
use std::path::PathBuf;

use docorder_core::component::{Component, ComponentKind, ComponentTable, SourceSpan};
use docorder_core::graph_file::{load_dependency_graph, save_dependency_graph, GraphFile};
use tempfile::TempDir;

fn component(id: &str, kind: ComponentKind, deps: &[&str]) -> Component {
    Component {
        id: id.to_string(),
        kind,
        file_path: PathBuf::from("/repo/mod.py"),
        relative_path: PathBuf::from("mod.py"),
        span: SourceSpan {
            start_line: 3,
            end_line: 9,
        },
        has_docstring: kind == ComponentKind::Class,
        docstring: if kind == ComponentKind::Class {
            "A class.".to_string()
        } else {
            String::new()
        },
        depends_on: deps.iter().map(|d| d.to_string()).collect::<BTreeSet<_>>(),
    }
}

fn sample_table() -> ComponentTable {
    [
        component("mod.Foo", ComponentKind::Class, &["mod.Foo.bar"]),
        component("mod.Foo.bar", ComponentKind::Method, &["mod.baz"]),
        component("mod.baz", ComponentKind::Function, &[]),
    ]
    .into_iter()
    .map(|c| (c.id.clone(), c))
    .collect()
}

#[test]
fn round_trip_preserves_metadata() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("graphs").join("repo_dependency_graph.json");
    let table = sample_table();

    save_dependency_graph(&table, &path).unwrap();
    let loaded = load_dependency_graph(&path).unwrap();

    assert_eq!(loaded, table);
}

#[test]
fn serialized_record_uses_documented_field_names() {
    let json = GraphFile::from_components(&sample_table())
        .to_string_pretty()
        .unwrap();
    for field in [
        "\"component_type\": \"method\"",
        "\"file_path\"",
        "\"relative_path\"",
        "\"depends_on\"",
        "\"start_line\": 3",
        "\"end_line\": 9",
        "\"has_docstring\"",
        "\"docstring\": \"A class.\"",
    ] {
        assert!(json.contains(field), "missing {field} in {json}");
    }
}

#[test]
fn optional_fields_default_on_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("graph.json");
    std::fs::write(
        &path,
        r#"{
  "helper.util": {
    "component_type": "function",
    "file_path": "/repo/helper.py",
    "relative_path": "helper.py"
  }
}"#,
    )
    .unwrap();

    let loaded = load_dependency_graph(&path).unwrap();
    let util = &loaded["helper.util"];
    assert_eq!(util.id, "helper.util");
    assert_eq!(util.kind, ComponentKind::Function);
    assert!(util.depends_on.is_empty());
    assert_eq!(util.span, SourceSpan::default());
    assert!(!util.has_docstring);
}

#[test]
fn corrupt_graph_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("graph.json");
    std::fs::write(&path, "{ \"a\": { \"component_type\": ").unwrap();

    let err = load_dependency_graph(&path).unwrap_err();
    assert!(
        err.to_string().contains("Invalid dependency graph file"),
        "got: {err}"
    );
}

#[test]
fn unknown_component_type_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("graph.json");
    std::fs::write(
        &path,
        r#"{"a.b": {"component_type": "module", "file_path": "a", "relative_path": "a"}}"#,
    )
    .unwrap();
    assert!(load_dependency_graph(&path).is_err());
}

#[test]
fn missing_graph_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    assert!(load_dependency_graph(&tmp.path().join("absent.json")).is_err());
}
