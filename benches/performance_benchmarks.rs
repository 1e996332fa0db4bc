use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use steptrack::{ActivityCalculator, RecordParser};

/// Performance benchmarks for record parsing and summaries

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Record Parsing");

    for &size in &[1, 100, 10_000] {
        let records = create_training_records(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("parse_training", size),
            &records,
            |b, records| {
                b.iter(|| {
                    for record in records {
                        let _ = RecordParser::parse_training(black_box(record));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_summaries(c: &mut Criterion) {
    let calculator = ActivityCalculator::default();
    let mut group = c.benchmark_group("Summaries");

    group.bench_function("day_action_summary", |b| {
        b.iter(|| calculator.day_action_summary(black_box("12000,2h30m"), 75.0, 175.0));
    });

    group.bench_function("training_summary", |b| {
        b.iter(|| calculator.training_summary(black_box("6000,running,45m"), 75.0, 175.0));
    });

    group.finish();
}

fn create_training_records(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let activity = if i % 2 == 0 { "running" } else { "Walking" };
            format!("{},{},{}m", 1000 + i, activity, 10 + i % 50)
        })
        .collect()
}

criterion_group!(benches, bench_parsing, bench_summaries);

criterion_main!(benches);
