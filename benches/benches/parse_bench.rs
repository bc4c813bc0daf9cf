use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;
use tmrlog_core::DataFileWriter;
use tmrlog_benchmark::sensor_lines;
use tmrlog_types::{parse_line, Reading, Sample, DEFAULT_DELIMITER};

fn bench_parse_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");

    group.bench_function("valid", |b| {
        b.iter(|| parse_line(black_box("0.8123x3.2971x25.43\r\n"), DEFAULT_DELIMITER))
    });
    group.bench_function("incomplete", |b| {
        b.iter(|| parse_line(black_box("0.8123x3.29"), DEFAULT_DELIMITER))
    });
    group.bench_function("non_numeric", |b| {
        b.iter(|| parse_line(black_box("#?x3.2971x25.43"), DEFAULT_DELIMITER))
    });

    let lines = sensor_lines(1_000, DEFAULT_DELIMITER, 10);
    group.bench_function("mixed_1000", |b| {
        b.iter(|| {
            lines
                .iter()
                .filter(|l| parse_line(black_box(l), DEFAULT_DELIMITER).is_ok())
                .count()
        })
    });

    group.finish();
}

fn bench_append_batch(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let writer = DataFileWriter::new(dir.path().join("bench.csv"));
    let batch: Vec<Sample> = (0..100)
        .map(|i| Sample::now(Reading::new(i as f64 * 0.01, 3.3, 25.0)))
        .collect();

    c.bench_function("append_batch_100", |b| {
        b.iter_batched(
            || batch.clone(),
            |batch| writer.append_batch(&batch).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_parse_line, bench_append_batch);
criterion_main!(benches);
