use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn docorder_cmd() -> Command {
    Command::cargo_bin("docorder").unwrap()
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn repository() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "mod.py",
        "class Foo:\n    def bar(self):\n        return baz()\n\ndef baz():\n    \"\"\"Documented.\"\"\"\n    return 1\n",
    );
    write(
        tmp.path(),
        "loop.py",
        "def ping():\n    return pong()\n\ndef pong():\n    return ping()\n",
    );
    tmp
}

#[test]
fn test_order_prints_dependencies_first() {
    let tmp = repository();

    let output = docorder_cmd()
        .arg("order")
        .arg(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Ordered"))
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    let position = |id: &str| lines.iter().position(|l| *l == id).unwrap();

    assert_eq!(lines.len(), 5);
    assert!(position("mod.baz") < position("mod.Foo.bar"));
    assert!(position("mod.Foo.bar") < position("mod.Foo"));
}

#[test]
fn test_order_skip_documented() {
    let tmp = repository();

    docorder_cmd()
        .args(["order", "--skip-documented"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mod.baz").not())
        .stderr(predicate::str::contains("1 already documented"));
}

#[test]
fn test_order_json_plan() {
    let tmp = repository();

    let output = docorder_cmd()
        .args(["order", "--json", "--mode", "random-node", "--seed", "42"])
        .arg(tmp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let plan: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(plan["mode"], "random-node");
    assert_eq!(plan["order"].as_array().unwrap().len(), 5);
    assert_eq!(plan["cycles"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cycles_reports_removed_edge() {
    let tmp = repository();

    docorder_cmd()
        .arg("cycles")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle 1:"))
        .stdout(predicate::str::contains("Removed: loop."));
}

#[test]
fn test_analyze_then_order_from_graph() {
    let tmp = repository();
    let out = TempDir::new().unwrap();
    let graph = out.path().join("graph.json");

    docorder_cmd()
        .arg("analyze")
        .arg(tmp.path())
        .arg("--output")
        .arg(&graph)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved"));
    assert!(graph.is_file());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&graph).unwrap()).unwrap();
    assert_eq!(saved["mod.Foo"]["component_type"], "class");
    assert_eq!(saved["mod.baz"]["has_docstring"], true);

    docorder_cmd()
        .arg("order")
        .arg(tmp.path())
        .arg("--graph")
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::contains("mod.Foo.bar"));
}

#[test]
fn test_corrupt_graph_file_fails() {
    let tmp = repository();
    let graph = tmp.path().join("broken.json");
    fs::write(&graph, "{ not json").unwrap();

    docorder_cmd()
        .arg("order")
        .arg(tmp.path())
        .arg("--graph")
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid dependency graph file"));
}
