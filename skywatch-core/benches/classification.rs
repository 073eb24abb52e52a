//! Criterion benchmarks for the analysis engine
//!
//! Measures append, slope and full classification cost across history sizes.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use skywatch_core::{testing::reading_with_humidity, trend, Classifier, History, ThresholdConfig};

const SIZES: [usize; 3] = [10, 60, 600];

fn filled_history(capacity: usize) -> History {
    let mut history = History::new(capacity).unwrap();
    history.initialize(reading_with_humidity(0, 50.0)).unwrap();
    for i in 1..capacity {
        let humidity = 50.0 + (i % 17) as f64 * 0.5;
        history.append(reading_with_humidity(i as u64, humidity)).unwrap();
    }
    history
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_append");
    for &size in &SIZES {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut history = filled_history(size);
            let mut timestamp = size as u64;
            b.iter(|| {
                timestamp += 1;
                black_box(history.append(reading_with_humidity(timestamp, 55.0)).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_slope(c: &mut Criterion) {
    let mut group = c.benchmark_group("humidity_slope");
    for &size in &SIZES {
        let history = filled_history(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &history, |b, history| {
            b.iter(|| black_box(trend::humidity_slope(history, size).unwrap()));
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let config = ThresholdConfig::default();
    let mut group = c.benchmark_group("classifier_evaluate");
    for &size in &SIZES {
        let history = filled_history(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &history, |b, history| {
            let mut classifier = Classifier::new();
            b.iter(|| black_box(classifier.evaluate(history, &config).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_append, bench_slope, bench_evaluate);
criterion_main!(benches);
