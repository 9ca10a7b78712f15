//! Criterion benchmarks for rust_event_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_event_logger::prelude::*;
use rust_event_logger::render;
use std::sync::Arc;
use std::time::Duration;

/// Downstream that discards everything, so benchmarks measure the logger itself
struct NullAppender;

impl Appender for NullAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        black_box(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn null_events(min_level: LogLevel) -> EventLogger {
    let logger = Logger::builder()
        .min_level(min_level)
        .appender(NullAppender)
        .build();
    EventLogger::with_system_clock(Arc::new(logger), fields!(run = "bench"))
}

// ============================================================================
// Step Benchmarks
// ============================================================================

fn bench_step_enter_exit(c: &mut Criterion) {
    let mut group = c.benchmark_group("steps");
    group.throughput(Throughput::Elements(1));

    let events = null_events(LogLevel::Info);
    group.bench_function("flat", |b| {
        b.iter(|| {
            let _step = events.step("load {table}", fields!(table = "dx"));
        });
    });

    group.bench_function("nested_3", |b| {
        b.iter(|| {
            let _a = events.step("etl", LogContext::new());
            let _b = events.step("load {table}", fields!(table = "dx"));
            let mut chunk = events.step("chunk {n}", fields!(n = 7));
            chunk.append(": {rows} rows").set_arg("rows", 1200);
        });
    });

    let quiet = null_events(LogLevel::Error);
    group.bench_function("filtered_by_level", |b| {
        b.iter(|| {
            let _step = quiet.step("load {table}", fields!(table = "dx"));
        });
    });

    group.finish();
}

// ============================================================================
// Template Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let args = fields!(depth = 20, temp = 65, material = "concrete");
    for (name, template) in [
        ("literal", "lay foundation"),
        ("one_arg", "lay foundation {depth} ft deep"),
        ("three_args", "lay {material} foundation {depth} ft deep at {temp} degrees"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), template, |b, t| {
            b.iter(|| render(black_box(t), &args));
        });
    }

    group.finish();
}

// ============================================================================
// Debounce Benchmarks
// ============================================================================

fn bench_debounce_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("debounce_submit");
    group.throughput(Throughput::Elements(1));

    for capacity in [2usize, 64, 1024] {
        let debounce = DebounceAppender::new(
            DebounceConfig::new(capacity, Duration::from_millis(50), LogLevel::Error),
            NullAppender,
        )
        .expect("valid config");
        let record = LogRecord::new(LogLevel::Info, "tick", chrono::Utc::now());

        group.bench_with_input(
            BenchmarkId::new("buffered", capacity),
            &capacity,
            |b, _| {
                b.iter(|| debounce.submit(black_box(record.clone())));
            },
        );
        debounce.stop();
    }

    let debounce = DebounceAppender::with_defaults(NullAppender).expect("valid config");
    let severe = LogRecord::new(LogLevel::Error, "failed", chrono::Utc::now());
    group.bench_function("immediate_flush", |b| {
        b.iter(|| debounce.submit(black_box(severe.clone())));
    });
    debounce.stop();

    group.finish();
}

// ============================================================================
// Export Benchmarks
// ============================================================================

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let start = chrono::Utc::now();
    let record = LogRecord::new(LogLevel::Info, "0:00:03 [1, 2] load dx.", start)
        .with_context(fields!(run = "bench", host = "etl-01"))
        .with_breadcrumb(vec![1, 2])
        .with_phase(StepPhase::End)
        .with_elapsed(Elapsed::measured(start, chrono::Duration::seconds(3)));

    group.bench_function("text_line", |b| {
        b.iter(|| record.render_line(black_box(&TimestampFormat::Iso8601)));
    });

    group.bench_function("json_export", |b| {
        b.iter(|| serde_json::to_string(&record.to_exported()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_step_enter_exit,
    bench_render,
    bench_debounce_submit,
    bench_serialization,
);

criterion_main!(benches);
