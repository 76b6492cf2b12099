use adjgraph::parser::RecordParser;
use adjgraph::processor::palette::{CONFLICT_SHAPE, HIGHLIGHT_COLOR, INTERSECT_COLOR, NON_INTERSECT_COLORS};
use adjgraph::processor::{GraphProcessor, ProcessOptions, StyleRule};
use adjgraph::visualization::{GraphmlFormatter, TraversalRenderer};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const G1: &str = "app:app:jar:1=lib:lib:jar:1.0:compile,only1:x:jar:1\n";
const G2: &str = "app:app:jar:1=lib:lib:jar:2.0:compile\n";

fn graph(name: &str, records: &str) -> adjgraph::graph::GraphModel {
    let mut p = RecordParser::named(name);
    p.parse_lines(records.lines());
    p.finish()
}

#[test]
fn library_pipeline_squashes_analyzes_and_highlights() {
    let opts = ProcessOptions { squash_versions: true, analyze: true, ..ProcessOptions::default() };
    let rules = vec![StyleRule::highlight("only1:.*").unwrap()];
    let merged = GraphProcessor::new(rules).process(vec![graph("g1", G1), graph("g2", G2)], &opts).unwrap();

    let attr = |n: &str, k: &str| merged.find_node(n).unwrap().attributes.get(k).cloned();
    assert_eq!(attr("app:app:jar", "fillcolor").as_deref(), Some(INTERSECT_COLOR));
    assert_eq!(attr("lib:lib:jar", "fillcolor").as_deref(), Some(INTERSECT_COLOR));
    assert_eq!(attr("lib:lib:jar", "shape").as_deref(), Some(CONFLICT_SHAPE));
    assert_eq!(attr("app:app:jar", "shape"), None);
    assert_eq!(attr("only1:x:jar", "fillcolor").as_deref(), Some(HIGHLIGHT_COLOR));
    // parallel edges from both inputs survive the merge
    assert_eq!(merged.edge_count(), 3);
    assert!(merged.find_node("lib:lib:jar:1.0:compile").is_none());
}

#[test]
fn flat_graphml_lists_every_node_and_edge() {
    let opts = ProcessOptions { analyze: true, ..ProcessOptions::default() };
    let merged = GraphProcessor::default().process(vec![graph("a", "X=Y"), graph("b", "X=Z")], &opts).unwrap();
    let out = TraversalRenderer::render_flat(&merged, &GraphmlFormatter::default());
    assert_eq!(out.matches("<node id=").count(), 3);
    assert_eq!(out.matches("<edge ").count(), 2);
    assert!(out.contains(&format!(r#"<y:Fill color="{}""#, NON_INTERSECT_COLORS[1])));
    let x = out.find(r#"<node id="X">"#).unwrap();
    let z = out.find(r#"<node id="Z">"#).unwrap();
    assert!(x < z);
}

#[test]
fn cli_merge_with_squash_analyze_and_highlight() {
    let dir = tempdir().unwrap();
    let g1 = dir.path().join("g1.txt");
    let g2 = dir.path().join("g2.txt");
    fs::write(&g1, G1).unwrap();
    fs::write(&g2, G2).unwrap();

    let assert = Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["merge", "--squash-versions", "--analyze", "--highlight-pattern", "only1:.*"])
        .arg(&g1)
        .arg(&g2)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r##""lib:lib:jar" [label="lib:lib:jar", fillcolor="#00FF00", shape="tripleoctagon", style="filled"];"##,
        ))
        .stdout(predicate::str::contains(r##""only1:x:jar" [label="only1:x:jar", fillcolor="#FF66FF""##));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("\"app:app:jar\" -> \"lib:lib:jar\"").count(), 2);
}

#[test]
fn cli_merge_applies_style_file_before_highlight() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let styles = dir.path().join("styles.json");
    fs::write(&a, "core=util\n").unwrap();
    fs::write(&b, "core=log\n").unwrap();
    fs::write(
        &styles,
        r#"[{"pattern": "u.*|l.*", "attributes": {"fillcolor": "red", "shape": "box"}},
            {"pattern": "core", "attributes": {}, "edge_attributes": {"color": "grey"}}]"#,
    )
    .unwrap();
    let out = dir.path().join("merged.dot");

    Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["merge", "--highlight-pattern", "log", "--styles"])
        .arg(&styles)
        .arg("-o")
        .arg(&out)
        .arg(&a)
        .arg(&b)
        .assert()
        .success();

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.contains(r##""util" [label="util", fillcolor="red", shape="box"];"##));
    assert!(dot.contains(r##""log" [label="log", fillcolor="#FF66FF", shape="box", style="filled"];"##));
    assert!(!dot.contains("color=\"grey\""));
}

#[test]
fn cli_merge_rejects_malformed_style_file() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let styles = dir.path().join("styles.json");
    fs::write(&a, "A=B\n").unwrap();
    fs::write(&styles, "{not json").unwrap();
    Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["merge", "--styles"])
        .arg(&styles)
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid style rules"));
}

#[test]
fn cli_merge_rejects_style_keys_that_are_not_identifiers() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let styles = dir.path().join("styles.json");
    let out = dir.path().join("merged.dot");
    fs::write(&a, "A=B\n").unwrap();
    fs::write(&styles, r#"[{"pattern": "A", "attributes": {"fill color\"];evil": "red"}}]"#).unwrap();
    Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["merge", "--styles"])
        .arg(&styles)
        .arg("-o")
        .arg(&out)
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid attribute name 'fill color\"];evil'"));
    assert!(!out.exists());
}
