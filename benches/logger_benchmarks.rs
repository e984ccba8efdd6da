//! Criterion benchmarks for logfacade

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logfacade::prelude::*;
use logfacade::{build_fields, default_mask, kv, mask_sensitive};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

fn buffered(engine: EngineKind, builder: ConfigBuilder) -> (Logger, BufferSink) {
    let sink = BufferSink::new();
    let config = builder
        .engine(engine)
        .console_sink(Arc::new(sink.clone()))
        .build();
    (Logger::new(config).unwrap(), sink)
}

// ============================================================================
// Field Assembly Benchmarks
// ============================================================================

fn bench_build_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_fields");
    group.throughput(Throughput::Elements(1));

    let ctx = CallContext::new()
        .with_request_id("req-1")
        .with_user_info(json!({"id": 1}))
        .with_source(json!("bench"));

    group.bench_function("no_context", |b| {
        b.iter(|| black_box(build_fields(None, None)));
    });

    group.bench_function("context_and_metadata", |b| {
        b.iter(|| black_box(build_fields(Some(&ctx), Some(kv! { "n" => 1, "s" => "v" }))));
    });

    group.finish();
}

// ============================================================================
// Masking Benchmarks
// ============================================================================

fn bench_masking(c: &mut Criterion) {
    let mut group = c.benchmark_group("masking");
    let keys: HashSet<String> = ["password", "token"].iter().map(|k| k.to_string()).collect();

    for depth in [1usize, 4, 16] {
        let mut metadata = kv! { "password" => "hunter2", "name" => "ana" };
        for n in 0..depth {
            metadata = kv! { format!("level{n}") => metadata, "token" => "abc" };
        }

        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter_batched(
                || metadata.clone(),
                |mut map| {
                    mask_sensitive(&mut map, &keys, &default_mask);
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(1));

    for engine in [EngineKind::Event, EngineKind::Field] {
        let (logger, sink) = buffered(engine, Config::builder().use_json(true));
        let ctx = CallContext::new().with_request_id("req-1");

        group.bench_function(format!("{engine}_json"), |b| {
            b.iter(|| {
                logger.info(Some(&ctx), None, Some(kv! { "n" => 1 }), black_box("message"));
                sink.clear();
            });
        });

        let (logger, sink) = buffered(engine, Config::builder());
        group.bench_function(format!("{engine}_console"), |b| {
            b.iter(|| {
                logger.info(Some(&ctx), None, None, black_box("message"));
                sink.clear();
            });
        });

        let (logger, _sink) = buffered(engine, Config::builder().level(LogLevel::Error));
        group.bench_function(format!("{engine}_filtered"), |b| {
            b.iter(|| logger.debug(Some(&ctx), None, None, black_box("dropped")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_fields, bench_masking, bench_emit);
criterion_main!(benches);
