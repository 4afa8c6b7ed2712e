use criterion::{Criterion, black_box, criterion_group, criterion_main};
use overlay_core::{ChangeEvent, ChangeReconciler, LayerSet, merge};
use overlay_fs::RelativePath;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn populate(root: &Path, layer: &str, files: usize) {
    for i in 0..files {
        let path = root.join(layer).join(format!("dir{}", i % 10)).join(format!("f{i}.txt"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("{layer}-{i}")).unwrap();
    }
}

fn bulk_merge_benchmark(c: &mut Criterion) {
    c.bench_function("merge (3 layers x 200 files)", |b| {
        let dir = tempdir().unwrap();
        for layer in ["a", "b", "c"] {
            populate(dir.path(), layer, 200);
        }
        let layers = LayerSet::from_roots(["a", "b", "c"].map(|l| dir.path().join(l))).unwrap();
        let out = dir.path().join("out");

        b.iter(|| {
            merge(black_box(&layers), black_box(&out)).unwrap();
        })
    });
}

fn reconcile_benchmark(c: &mut Criterion) {
    c.bench_function("ChangeReconciler::apply (fallthrough)", |b| {
        let dir = tempdir().unwrap();
        for layer in ["a", "b", "c"] {
            populate(dir.path(), layer, 20);
        }
        let layers = LayerSet::from_roots(["a", "b", "c"].map(|l| dir.path().join(l))).unwrap();
        let out = dir.path().join("out");
        merge(&layers, &out).unwrap();
        fs::remove_file(dir.path().join("a/dir0/f0.txt")).unwrap();
        let reconciler = ChangeReconciler::new(layers, &out);
        let event = ChangeEvent::remove(0, RelativePath::new("dir0/f0.txt").unwrap());

        b.iter(|| {
            reconciler.apply(black_box(&event)).unwrap();
        })
    });
}

criterion_group!(benches, bulk_merge_benchmark, reconcile_benchmark);
criterion_main!(benches);
