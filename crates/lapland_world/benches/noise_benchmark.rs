//! Benchmark for noise sampling and per-column terrain queries.
//!
//! Run with: cargo bench --package lapland_world --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lapland_world::noise::{cell_rng, NoiseLayer, SimplexNoise, WorldSeed};
use lapland_world::terrain::TerrainGenerator;
use rand::Rng;

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(12345));

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_octaved_layer(c: &mut Criterion) {
    let layer = NoiseLayer::new(WorldSeed::new(12345), 0, 0.02, 4, 0.5);

    let mut group = c.benchmark_group("noise_layer");
    group.throughput(Throughput::Elements(256));
    group.bench_function("4_octaves_one_chunk_footprint", |b| {
        b.iter(|| {
            for z in 0..16 {
                for x in 0..16 {
                    black_box(layer.at(x, z));
                }
            }
        });
    });
    group.finish();
}

fn benchmark_height_at(c: &mut Criterion) {
    let gen = TerrainGenerator::with_seed(WorldSeed::new(12345));

    c.bench_function("terrain_height_at", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            black_box(gen.height_at(black_box(x), black_box(x / 3)))
        });
    });
}

fn benchmark_cell_rng(c: &mut Criterion) {
    let seed = WorldSeed::new(12345);

    c.bench_function("cell_rng_draw", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            let roll: f64 = cell_rng(black_box(x), 7, seed, 1).gen();
            black_box(roll)
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_octaved_layer,
    benchmark_height_at,
    benchmark_cell_rng,
);
criterion_main!(benches);
