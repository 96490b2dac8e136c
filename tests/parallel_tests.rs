#[cfg(feature = "rayon")]
mod parallel_tests {
    use core::num::NonZeroUsize;
    use pixshuffle::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn sorted(pixels: &[Pixel]) -> Vec<Pixel> {
        let mut pixels = pixels.to_vec();
        pixels.sort();
        pixels
    }

    fn noise(width: usize, height: usize, seed: u64) -> PixelMatrix {
        use rand::Rng;
        let mut rng = SmallRng::seed_from_u64(seed);
        PixelMatrix::from_fn(width, height, |_| {
            Pixel::new(rng.random(), rng.random(), rng.random())
        })
    }

    #[test]
    fn test_parallel_dimension_mismatch() {
        let source = PixelMatrix::filled(4, 4, Pixel::default());
        let target = PixelMatrix::filled(4, 5, Pixel::default());

        assert_eq!(
            remap_parallel(&source, &target, &RemapConfig::default()),
            Err(RemapError::DimensionMismatch {
                source_size: (4, 4),
                target_size: (4, 5),
            })
        );
    }

    #[test]
    fn test_parallel_conserves_pixels() {
        let source = noise(64, 48, 1);
        let target = noise(64, 48, 2);

        let remapped =
            remap_parallel(&source, &target, &RemapConfig::default().with_seed(3))
                .unwrap();

        assert_eq!(remapped.matrix.dimensions(), (64, 48));
        assert_eq!(remapped.stats.total(), 64 * 48);
        assert_eq!(remapped.stats.substituted, 0);
        assert_eq!(sorted(remapped.matrix.pixels()), sorted(source.pixels()));
    }

    #[test]
    fn test_parallel_and_sequential_agree_on_multiset() {
        let source = noise(40, 30, 10);
        let target = noise(40, 30, 20);
        let config = RemapConfig::default()
            .with_levels(Levels::new(8).unwrap())
            .with_seed(4);

        let sequential = remap(&source, &target, &config).unwrap();
        let parallel = remap_parallel(&source, &target, &config).unwrap();

        assert_eq!(
            sorted(sequential.matrix.pixels()),
            sorted(parallel.matrix.pixels())
        );
        assert_eq!(sequential.stats.total(), parallel.stats.total());
    }

    #[test]
    fn test_single_worker_matches_sequential() {
        // One worker pops in queue order, which is the shuffle order.
        let source = noise(25, 25, 7);
        let target = noise(25, 25, 8);
        let levels = Levels::new(4).unwrap();

        let sequential = remap_with_rng(
            &source,
            &target,
            levels,
            &mut SmallRng::seed_from_u64(99),
        )
        .unwrap();
        let parallel = remap_parallel_with_rng(
            &source,
            &target,
            levels,
            NonZeroUsize::new(1),
            &mut SmallRng::seed_from_u64(99),
        )
        .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_more_workers_than_positions() {
        let source = PixelMatrix::from_rows(vec![vec![
            Pixel::new(0, 0, 0),
            Pixel::new(65535, 65535, 65535),
        ]])
        .unwrap();
        let target = PixelMatrix::filled(2, 1, Pixel::new(0, 0, 0));
        let config = RemapConfig::default()
            .with_seed(1)
            .with_workers(NonZeroUsize::new(64).unwrap());

        let remapped = remap_parallel(&source, &target, &config).unwrap();
        assert_eq!(sorted(remapped.matrix.pixels()), sorted(source.pixels()));
        assert_eq!(remapped.stats.exact, 1);
        assert_eq!(remapped.stats.nearest, 1);
    }

    #[test]
    fn test_parallel_single_level_permutation() {
        let source = PixelMatrix::from_rows(vec![
            vec![Pixel::new(0, 0, 0), Pixel::new(65535, 65535, 65535)],
            vec![Pixel::new(30000, 0, 0), Pixel::new(0, 30000, 0)],
        ])
        .unwrap();
        let target = noise(2, 2, 5);
        let config = RemapConfig::default()
            .with_levels(Levels::new(1).unwrap())
            .with_seed(6);

        let remapped = remap_parallel(&source, &target, &config).unwrap();
        assert_eq!(sorted(remapped.matrix.pixels()), sorted(source.pixels()));
    }

    #[test]
    fn test_processor_remaps_against_preloaded_target() {
        let target = noise(16, 16, 30);
        let processor = Processor::new(
            target.clone(),
            RemapConfig::default().with_seed(2),
        );
        let source = noise(16, 16, 31);

        let out = processor.apply_op_byte(3, source.clone()).unwrap();
        assert_eq!(out.dimensions(), target.dimensions());
        assert_eq!(sorted(out.pixels()), sorted(source.pixels()));
    }
}
