//! Whole-pipeline scenarios: config, bulk merge, live events, drift check.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
use overlay_core::{CONFIG_FILE, IGNORE_MARKER, MergeLayout, Mode, ProjectConfig};
use overlay_test_utils::TestLayers;
use overlay_watch::{LayerWatcher, LiveSession, ServeStats};
use pretty_assertions::assert_eq;

fn serve_layout(project: &TestLayers) -> MergeLayout {
    let config = ProjectConfig::load(&project.root().join(CONFIG_FILE)).unwrap();
    config.layout(project.root(), Mode::Serve).unwrap()
}

fn event(kind: EventKind, path: PathBuf) -> notify::Event {
    notify::Event::new(kind).add_path(path)
}

/// Output minus the ignore marker, for comparing against a fresh build.
fn content(layout: &MergeLayout) -> std::collections::BTreeMap<String, Vec<u8>> {
    let mut snapshot = TestLayers::snapshot(layout.output());
    snapshot.remove(IGNORE_MARKER);
    snapshot
}

#[test]
fn three_layer_walkthrough() {
    let project = TestLayers::new(&["brand", "theme", "base"]);
    project.write("base", "index.html", "base index");
    project.write("base", "css/site.css", "base css");
    project.write("theme", "css/site.css", "theme css");
    project.write("brand", "img/logo.svg", "brand logo");
    project.write("base", "img/logo.svg", "base logo");
    project.write_config();

    let layout = serve_layout(&project);
    layout.merge().unwrap();
    let out = layout.output().to_path_buf();
    let session = LiveSession::new(&layout);
    let mut stats = ServeStats::default();

    project.assert_file(&out, "index.html", "base index");
    project.assert_file(&out, "css/site.css", "theme css");
    project.assert_file(&out, "img/logo.svg", "brand logo");
    project.assert_file(&out, IGNORE_MARKER, "*");

    // Edit in a shadowed layer is invisible
    project.write("base", "css/site.css", "base css v2");
    session.handle(
        &event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            project.layer_root("base").join("css/site.css"),
        ),
        &mut stats,
    );
    project.assert_file(&out, "css/site.css", "theme css");

    // Removing the winner exposes the next layer
    project.remove("theme", "css/site.css");
    session.handle(
        &event(
            EventKind::Remove(RemoveKind::File),
            project.layer_root("theme").join("css/site.css"),
        ),
        &mut stats,
    );
    project.assert_file(&out, "css/site.css", "base css v2");

    // A new file in the top layer takes over
    project.write("brand", "index.html", "brand index");
    session.handle(
        &event(
            EventKind::Create(CreateKind::File),
            project.layer_root("brand").join("index.html"),
        ),
        &mut stats,
    );
    project.assert_file(&out, "index.html", "brand index");

    // Last copy gone, output copy gone
    project.remove("brand", "img/logo.svg");
    project.remove("base", "img/logo.svg");
    for layer in ["brand", "base"] {
        session.handle(
            &event(
                EventKind::Remove(RemoveKind::File),
                project.layer_root(layer).join("img/logo.svg"),
            ),
            &mut stats,
        );
    }
    project.assert_absent(&out, "img/logo.svg");

    assert_eq!(stats.failed, 0);
    assert!(layout.check().unwrap().is_healthy());

    // Live output equals a fresh build of the same layers
    let config = ProjectConfig::load(&project.root().join(CONFIG_FILE)).unwrap();
    let build = config.layout(project.root(), Mode::Build).unwrap();
    build.merge().unwrap();
    assert_eq!(content(&layout), TestLayers::snapshot(build.output()));
}

#[test]
fn restart_rebuilds_from_scratch() {
    let project = TestLayers::new(&["high", "low"]);
    project.write("low", "a.txt", "a");
    project.write("low", "b.txt", "b");
    project.write_config();
    let layout = serve_layout(&project);
    layout.merge().unwrap();

    // Changes made while nothing was watching
    project.remove("low", "b.txt");
    project.write("high", "a.txt", "A");
    std::fs::write(layout.output().join("stray.txt"), "x").unwrap();
    assert!(!layout.check().unwrap().is_healthy());

    layout.merge().unwrap();

    project.assert_file(layout.output(), "a.txt", "A");
    project.assert_absent(layout.output(), "b.txt");
    project.assert_absent(layout.output(), "stray.txt");
    assert!(layout.check().unwrap().is_healthy());
}

#[test]
fn live_watcher_reconciles_real_changes() {
    let project = TestLayers::new(&["high", "low"]);
    project.write("low", "page.html", "low");
    project.write_config();
    let layout = serve_layout(&project);
    layout.merge().unwrap();
    let session = LiveSession::new(&layout);
    let watcher = LayerWatcher::new(&session.roots()).unwrap();

    project.write("high", "page.html", "high");

    let target = layout.output().join("page.html");
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut stats = ServeStats::default();
    while Instant::now() < deadline {
        if let Some(Ok(raw)) = watcher.recv_timeout(Duration::from_millis(200)) {
            session.handle(&raw, &mut stats);
        }
        if std::fs::read_to_string(&target).ok().as_deref() == Some("high") {
            break;
        }
    }

    project.assert_file(layout.output(), "page.html", "high");
    assert_eq!(stats.failed, 0);
}
