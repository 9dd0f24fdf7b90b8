#![allow(unused_must_use)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::{fs::File, io::Write, num::NonZeroUsize};
use tempfile::tempdir;
use textscout::{is_valid_utf8, scan, NoopObserver, ScanRequest};

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.path().join(format!("test_{}.txt", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(
                file,
                "Line {} TODO: fix bug {} FIXME: optimize line {} NOTE: important task {}",
                j, j, j, j
            )?;
        }
    }
    Ok(())
}

fn bench_utf8_validation(c: &mut Criterion) {
    let ascii = vec![b'a'; 1024];
    let mixed = "héllo wörld € 😀 ".repeat(50).into_bytes();

    let mut group = c.benchmark_group("UTF-8 Validation");
    group.bench_function("ascii_chunk", |b| {
        b.iter(|| black_box(is_valid_utf8(black_box(&ascii))))
    });
    group.bench_function("mixed_chunk", |b| {
        b.iter(|| black_box(is_valid_utf8(black_box(&mixed[..1024]))))
    });
    group.finish();
}

fn bench_file_scaling(c: &mut Criterion) -> std::io::Result<()> {
    let dir = tempdir()?;
    let file_counts = [1, 10, 100, 1000];

    let mut group = c.benchmark_group("File Scaling");
    for &count in &file_counts {
        create_test_files(&dir, count, 10)?;
        let request = ScanRequest::new(dir.path(), "NOTE");

        group.bench_function(format!("files_{}", count), |b| {
            b.iter(|| black_box(scan(&request, &mut NoopObserver).unwrap()));
        });
    }
    group.finish();
    Ok(())
}

fn bench_thread_count(c: &mut Criterion) -> std::io::Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, 200, 50)?;

    let mut group = c.benchmark_group("Thread Count");
    for threads in [1, 2, 4, 8] {
        let request = ScanRequest::new(dir.path(), "important task 49")
            .with_case_sensitive(true)
            .with_thread_count(NonZeroUsize::new(threads).unwrap());

        group.bench_function(format!("threads_{}", threads), |b| {
            b.iter(|| black_box(scan(&request, &mut NoopObserver).unwrap()));
        });
    }
    group.finish();
    Ok(())
}

criterion_group!(
    benches,
    bench_utf8_validation,
    bench_file_scaling,
    bench_thread_count
);
criterion_main!(benches);
