use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pixshuffle::{Levels, Pixel, PixelMatrix, RemapConfig, remap};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::hint::black_box;

fn noise(size: usize, seed: u64) -> PixelMatrix {
    let mut rng = SmallRng::seed_from_u64(seed);
    PixelMatrix::from_fn(size, size, |_| {
        Pixel::new(rng.random(), rng.random(), rng.random())
    })
}

fn bench_sequential_vs_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap_sequential_vs_parallel");
    group.sample_size(20);

    for size in [64, 256, 512].iter() {
        let source = noise(*size, 1);
        let target = noise(*size, 2);
        let config = RemapConfig::default().with_seed(42);

        group.bench_with_input(
            BenchmarkId::new("sequential", size),
            size,
            |b, _| {
                b.iter(|| {
                    black_box(remap(
                        black_box(&source),
                        black_box(&target),
                        &config,
                    ))
                })
            },
        );

        #[cfg(feature = "rayon")]
        group.bench_with_input(
            BenchmarkId::new("parallel", size),
            size,
            |b, _| {
                b.iter(|| {
                    black_box(pixshuffle::remap_parallel(
                        black_box(&source),
                        black_box(&target),
                        &config,
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap_levels");
    group.sample_size(20);

    // Fewer levels means fuller bins and fewer fallback scans.
    let source = noise(128, 3);
    let target = noise(128, 4);

    for levels in [1u32, 4, 16, 32].iter() {
        let config = RemapConfig::default()
            .with_levels(Levels::new(*levels).unwrap())
            .with_seed(42);

        group.bench_with_input(
            BenchmarkId::new("sequential", levels),
            levels,
            |b, _| b.iter(|| black_box(remap(&source, &target, &config))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sequential_vs_parallel, bench_levels);
criterion_main!(benches);
