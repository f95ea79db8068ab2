//! Benchmark for one full regeneration.
//!
//! Run with: cargo bench --package grotto --bench pipeline_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grotto::{GeneratorConfig, TerrainPipeline};

fn benchmark_generate(c: &mut Criterion) {
    let pipeline = TerrainPipeline::default();
    let config = GeneratorConfig::default();

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);
    group.bench_function("default_config", |b| b.iter(|| black_box(pipeline.generate(&config))));
    group.finish();
}

criterion_group!(benches, benchmark_generate);
criterion_main!(benches);
