// benches/pack_benchmark.rs
use archive_builder::pack::write_image;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A romdisk-sized dataset: a handful of small programs and one larger blob.
fn make_dataset() -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut paths = Vec::new();
    for (i, size) in [512usize, 2048, 4096, 300, 16 * 1024].iter().enumerate() {
        let path = dir.path().join(format!("prog{}.bin", i));
        let data: Vec<u8> = (0..*size).map(|b| (b % 251) as u8).collect();
        fs::write(&path, data).expect("write dataset file");
        paths.push(path);
    }
    (dir, paths)
}

fn bench_buffer_sizes(c: &mut Criterion) {
    let (_dir, paths) = make_dataset();
    let mut group = c.benchmark_group("write_image");
    for buffer_size in [64usize, 1024, 64 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(buffer_size), &buffer_size, |b, &size| {
            b.iter(|| {
                let (image, _) =
                    write_image(Vec::new(), &paths, size, Path::new("bench.img")).expect("pack");
                black_box(image)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_buffer_sizes);
criterion_main!(benches);
