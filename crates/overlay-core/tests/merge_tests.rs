//! Bulk merge behaviour

use assert_fs::prelude::*;
use overlay_core::{Error, LayerSet, merge, verify};
use overlay_test_utils::TestLayers;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_scenario_merge() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("high/a.txt").write_str("1").unwrap();
    temp.child("low/a.txt").write_str("2").unwrap();
    temp.child("low/b.txt").write_str("3").unwrap();
    let layers = LayerSet::from_roots([temp.path().join("high"), temp.path().join("low")]).unwrap();

    merge(&layers, &temp.path().join("out")).unwrap();

    temp.child("out/a.txt").assert("1");
    temp.child("out/b.txt").assert("3");
    temp.child("out/c.txt").assert(predicate::path::missing());
}

#[test]
fn test_merge_is_deterministic() {
    let project = TestLayers::new(&["brand", "theme", "base"]);
    project.write("base", "index.html", "<base>");
    project.write("base", "css/site.css", "base-css");
    project.write("theme", "css/site.css", "theme-css");
    project.write("theme", "img/bg.png", "bg");
    project.write("brand", "img/logo.svg", "logo");
    project.write("brand", "index.html", "<brand>");
    let layers = LayerSet::from_roots(project.layer_roots()).unwrap();

    let first = project.root().join("first");
    let second = project.root().join("second");
    merge(&layers, &first).unwrap();
    merge(&layers, &second).unwrap();

    let a = TestLayers::snapshot(&first);
    assert_eq!(a, TestLayers::snapshot(&second));
    assert_eq!(a.get("index.html").map(Vec::as_slice), Some(&b"<brand>"[..]));
    assert_eq!(a.get("css/site.css").map(Vec::as_slice), Some(&b"theme-css"[..]));
    assert_eq!(a.len(), 4);
}

#[test]
fn test_remerge_after_layer_changes_matches_layers() {
    let project = TestLayers::new(&["high", "low"]);
    project.write("high", "a.txt", "1");
    project.write("low", "b.txt", "2");
    let layers = LayerSet::from_roots(project.layer_roots()).unwrap();
    merge(&layers, &project.output()).unwrap();

    project.remove("high", "a.txt");
    project.write("low", "c.txt", "3");
    merge(&layers, &project.output()).unwrap();

    assert!(verify(&layers, &project.output(), &[]).unwrap().is_healthy());
    project.assert_absent(&project.output(), "a.txt");
}

#[test]
fn test_missing_layer_root_keeps_earlier_copies() {
    let project = TestLayers::new(&["present"]);
    project.write("present", "kept.txt", "k");
    // Highest priority layer is missing; lower layers are copied first
    let layers = LayerSet::from_roots([
        project.public().join("missing"),
        project.layer_root("present"),
    ])
    .unwrap();

    let result = merge(&layers, &project.output());

    match result {
        Err(Error::MissingLayerRoot { index, name, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(name, "missing");
        }
        other => panic!("expected MissingLayerRoot, got {other:?}"),
    }
    project.assert_file(&project.output(), "kept.txt", "k");
}

#[test]
fn test_merge_report_counts() {
    let project = TestLayers::new(&["a", "b", "c"]);
    project.write("a", "x", "a");
    project.write("b", "x", "b");
    project.write("c", "x", "c");
    project.write("c", "y", "c");
    let layers = LayerSet::from_roots(project.layer_roots()).unwrap();

    let report = merge(&layers, &project.output()).unwrap();

    assert_eq!(report.layers, 3);
    assert_eq!(report.files_copied, 4);
    assert_eq!(report.files_overwritten, 2);
    project.assert_file(&project.output(), "x", "a");
}
