//! Benchmark for noise plane synthesis.
//!
//! Run with: cargo bench --package grotto_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grotto_procedural::noise::{noise_plane, PerlinNoise, PlaneParams, WorldSeed};
use grotto_shared::IVec2;

fn benchmark_sample(c: &mut Criterion) {
    let noise = PerlinNoise::default();

    c.bench_function("perlin_sample", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 0.173;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_plane(c: &mut Criterion) {
    let noise = PerlinNoise::default();
    let mut group = c.benchmark_group("noise_plane");

    for octaves in [1u32, 4, 8] {
        // 128x128 = one 8x8-chunk grid
        group.throughput(Throughput::Elements(128 * 128));
        group.bench_with_input(BenchmarkId::from_parameter(octaves), &octaves, |b, &octaves| {
            let params = PlaneParams {
                width: 128,
                depth: 128,
                offset: IVec2::new(12, -40),
                scale: 1.0,
                octaves,
                lacunarity: 2.0,
                persistence: 0.5,
            };
            b.iter(|| black_box(noise_plane(&noise, &params, WorldSeed::new(42))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sample, benchmark_plane);
criterion_main!(benches);
