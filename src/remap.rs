use crate::{
    Levels, Pixel, PixelMatrix, Popped, Position, RemapError, SupplyPool,
    quantize, sequence,
};
use core::num::NonZeroUsize;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Settings for a remap call.
///
/// ```
/// use pixshuffle::{Levels, RemapConfig};
///
/// let config = RemapConfig::default()
///     .with_levels(Levels::new(8)?)
///     .with_seed(42);
/// assert_eq!(config.levels.get(), 8);
/// # Ok::<(), pixshuffle::RemapError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemapConfig {
    /// Quantization buckets per channel.
    pub levels: Levels,
    /// Seed for the position shuffle. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
    /// Worker count for [`remap_parallel()`]. `None` uses one worker per
    /// thread of the `rayon` pool. Never more workers than positions are
    /// started.
    pub workers: Option<NonZeroUsize>,
}

impl RemapConfig {
    pub fn with_levels(mut self, levels: Levels) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

/// How each output cell was filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapStats {
    /// Served from the bin the target pixel asked for.
    pub exact: usize,
    /// Served from the nearest non-empty bin.
    pub nearest: usize,
    /// Pool was exhausted; the target's own pixel was kept.
    pub substituted: usize,
}

impl RemapStats {
    /// Cells written; always `width × height` of the target.
    pub fn total(&self) -> usize {
        self.exact + self.nearest + self.substituted
    }
}

/// Result of a remap call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub matrix: PixelMatrix,
    pub stats: RemapStats,
}

impl Remapped {
    pub fn into_matrix(self) -> PixelMatrix {
        self.matrix
    }
}

/// Refuse empty or differently sized matrices before any work happens.
fn validate(
    source: &PixelMatrix,
    target: &PixelMatrix,
) -> Result<(), RemapError> {
    if source.is_empty() || target.is_empty() {
        return Err(RemapError::EmptyMatrix);
    }
    if source.dimensions() != target.dimensions() {
        return Err(RemapError::DimensionMismatch {
            source_size: source.dimensions(),
            target_size: target.dimensions(),
        });
    }
    Ok(())
}

/// Rearrange `source`'s pixels to approximate `target`'s color histogram.
///
/// Runs on the calling thread. The shuffle is seeded from `config.seed`.
/// See [`remap_with_rng()`] to supply the generator directly.
pub fn remap(
    source: &PixelMatrix,
    target: &PixelMatrix,
    config: &RemapConfig,
) -> Result<Remapped, RemapError> {
    remap_with_rng(source, target, config.levels, &mut config.rng())
}

/// Sequential remap with a caller supplied random number generator.
///
/// Every target position, in an order drawn from `rng`, takes one pixel out
/// of the supply pool built from `source`: from the bin of the target pixel
/// at that position or from the nearest non-empty bin. If the pool is ever
/// exhausted the target's own pixel is kept at that position.
///
/// ## Errors
///
/// [`RemapError::EmptyMatrix`] or [`RemapError::DimensionMismatch`]; nothing
/// is computed in either case.
pub fn remap_with_rng<R>(
    source: &PixelMatrix,
    target: &PixelMatrix,
    levels: Levels,
    rng: &mut R,
) -> Result<Remapped, RemapError>
where
    R: Rng + ?Sized,
{
    validate(source, target)?;

    let (width, height) = target.dimensions();
    log::debug!("remap {width}x{height}, {} levels", levels.get());

    let mut pool = SupplyPool::build(source, levels);
    let positions = sequence::shuffled(width, height, rng);

    let mut output = target.pixels().to_vec();
    let mut stats = RemapStats::default();

    for position in positions {
        let wanted = target[position];
        let popped = pool.pop(quantize(wanted, levels));
        output[position.y * width + position.x] =
            settle(popped, wanted, position, &mut stats);
    }

    log::debug!("remap done: {stats:?}");

    Ok(Remapped {
        matrix: PixelMatrix::from_parts(width, height, output),
        stats,
    })
}

/// Pick the pixel for one cell from the result of a pop.
#[inline]
fn settle(
    popped: Option<Popped>,
    wanted: Pixel,
    position: Position,
    stats: &mut RemapStats,
) -> Pixel {
    match popped {
        Some(popped) if popped.fallback => {
            stats.nearest += 1;
            popped.pixel
        }
        Some(popped) => {
            stats.exact += 1;
            popped.pixel
        }
        None => {
            log::warn!(
                "supply exhausted at ({}, {}), keeping target pixel",
                position.x,
                position.y
            );
            stats.substituted += 1;
            wanted
        }
    }
}

#[cfg(feature = "rayon")]
pub use parallel::{remap_parallel, remap_parallel_with_rng};

#[cfg(feature = "rayon")]
mod parallel {
    use super::*;
    use crate::sequence::PositionQueue;
    use parking_lot::Mutex;
    use std::sync::OnceLock;

    /// Parallel counterpart of [`remap()`].
    ///
    /// Produces the same pixel count and the same value multiset as the
    /// sequential driver. Which pixel lands where also depends on how the
    /// workers interleave, so it is not reproducible from the seed alone.
    pub fn remap_parallel(
        source: &PixelMatrix,
        target: &PixelMatrix,
        config: &RemapConfig,
    ) -> Result<Remapped, RemapError> {
        remap_parallel_with_rng(
            source,
            target,
            config.levels,
            config.workers,
            &mut config.rng(),
        )
    }

    /// Parallel remap with a caller supplied random number generator.
    ///
    /// The supply pool and the shuffled positions are prepared on the calling
    /// thread. The positions then go into a closed [`PositionQueue`] that a
    /// fixed set of workers drains inside one `rayon` scope; the call returns
    /// once every worker has finished. The pool sits behind a single mutex
    /// that is held for one [`SupplyPool::pop()`] at a time. Output cells are
    /// written without locking since each position is handed out once.
    pub fn remap_parallel_with_rng<R>(
        source: &PixelMatrix,
        target: &PixelMatrix,
        levels: Levels,
        workers: Option<NonZeroUsize>,
        rng: &mut R,
    ) -> Result<Remapped, RemapError>
    where
        R: Rng + ?Sized,
    {
        validate(source, target)?;

        let (width, height) = target.dimensions();
        let pool = Mutex::new(SupplyPool::build(source, levels));
        let queue = PositionQueue::load(sequence::shuffled(width, height, rng));

        let workers = workers
            .map_or_else(rayon::current_num_threads, NonZeroUsize::get)
            .clamp(1, queue.len());
        log::debug!(
            "parallel remap {width}x{height}, {} levels, {workers} workers",
            levels.get()
        );

        let cells: Vec<OnceLock<Pixel>> =
            (0..queue.len()).map(|_| OnceLock::new()).collect();
        let totals = Mutex::new(RemapStats::default());

        rayon::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|_| {
                    let mut stats = RemapStats::default();
                    while let Some(position) = queue.next() {
                        let wanted = target[position];
                        let bin = quantize(wanted, levels);
                        let popped = pool.lock().pop(bin);
                        let pixel =
                            settle(popped, wanted, position, &mut stats);

                        let written =
                            cells[position.y * width + position.x].set(pixel);
                        debug_assert!(written.is_ok(), "cell written twice");
                    }

                    let mut totals = totals.lock();
                    totals.exact += stats.exact;
                    totals.nearest += stats.nearest;
                    totals.substituted += stats.substituted;
                });
            }
        });

        // Every cell is set once the scope has joined.
        let output = cells
            .into_iter()
            .zip(target.pixels())
            .map(|(cell, &fallback)| cell.into_inner().unwrap_or(fallback))
            .collect();
        let stats = totals.into_inner();

        log::debug!("parallel remap done: {stats:?}");

        Ok(Remapped {
            matrix: PixelMatrix::from_parts(width, height, output),
            stats,
        })
    }
}
