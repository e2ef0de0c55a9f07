use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_scout::config::ScanConfig;
use csv_scout::detect;
use csv_scout::diagnostics::DiagnosticSink;
use csv_scout::scan;
use encoding_rs::UTF_8;
use tempfile::TempDir;

fn generate_orders(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("orders.csv");
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(file, "id,ordered_at,amount,status").expect("header");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let day = (i % 28) + 1;
        writeln!(
            file,
            "{i},2024-01-{day:02},{units}.{cents:02},{status}",
            units = i % 500,
            cents = i % 100
        )
        .expect("row");
    }
    (temp_dir, csv_path)
}

fn sample_lines(path: &Path, limit: usize) -> Vec<String> {
    let reader = BufReader::new(File::open(path).expect("open csv"));
    reader
        .lines()
        .take(limit)
        .map(|line| line.expect("read line"))
        .collect()
}

fn bench_detect_vs_scan(c: &mut Criterion) {
    let (temp_dir, csv_path) = generate_orders(50_000);
    let lines = sample_lines(&csv_path, 200);
    let sampled_config = ScanConfig::default();
    let full_config = ScanConfig {
        read_lines: 0,
        ..ScanConfig::default()
    };

    let mut group = c.benchmark_group("scan");

    group.bench_function("detect_separator_sample", |b| {
        b.iter_batched(
            || (),
            |_| {
                let mut sink = DiagnosticSink::new(false);
                detect::detect_separator(lines.iter().map(|line| line.as_str()), &mut sink)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("scan_sampled", |b| {
        b.iter_batched(
            || (),
            |_| scan::scan_file(&csv_path, &sampled_config, UTF_8).expect("scan sampled"),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("scan_full", |b| {
        b.iter_batched(
            || (),
            |_| scan::scan_file(&csv_path, &full_config, UTF_8).expect("scan full"),
            BatchSize::SmallInput,
        );
    });

    drop(temp_dir);
    group.finish();
}

criterion_group!(benches, bench_detect_vs_scan);
criterion_main!(benches);
