use crate::{Levels, Pixel, PixelMatrix, bin_center, quantize, squared_distance};
use smallvec::SmallVec;

type Bag = SmallVec<[Pixel; 4]>;

/// A pixel taken out of a [`SupplyPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popped {
    pub pixel: Pixel,
    /// The bin the pixel was actually taken from.
    pub bin: usize,
    /// `true` if the requested bin was empty and the pixel came from the
    /// nearest non-empty one instead.
    pub fallback: bool,
}

/// Source pixels grouped by color bin, depleted one pixel at a time.
///
/// Bins only ever shrink. At any time
/// `remaining() + popped() == initial()`.
#[derive(Debug, Clone)]
pub struct SupplyPool {
    levels: Levels,
    bags: Vec<Bag>,
    initial: usize,
    remaining: usize,
}

impl SupplyPool {
    /// Sort every pixel of `source` into the bag of its bin, unchanged.
    pub fn build(source: &PixelMatrix, levels: Levels) -> Self {
        let mut bags = vec![Bag::new(); levels.bin_count()];
        for &pixel in source.pixels() {
            bags[quantize(pixel, levels)].push(pixel);
        }

        log::debug!(
            "supply pool: {} pixels in {} bins ({} occupied)",
            source.len(),
            bags.len(),
            bags.iter().filter(|bag| !bag.is_empty()).count()
        );

        Self {
            levels,
            bags,
            initial: source.len(),
            remaining: source.len(),
        }
    }

    /// Take one pixel for a position that wants color bin `bin`.
    ///
    /// If that bin is empty the non-empty bin whose center is closest to
    /// `bin`'s center is used instead. Among equally close bins the lowest
    /// index wins. An out-of-range `bin` searches from the last bin.
    ///
    /// Returns `None` only once the whole pool is exhausted.
    pub fn pop(&mut self, bin: usize) -> Option<Popped> {
        if let Some(pixel) = self.bags.get_mut(bin).and_then(Bag::pop) {
            self.remaining -= 1;
            return Some(Popped {
                pixel,
                bin,
                fallback: false,
            });
        }

        let nearest = self.nearest_occupied(bin)?;
        let pixel = self.bags[nearest].pop()?;
        self.remaining -= 1;

        Some(Popped {
            pixel,
            bin: nearest,
            fallback: true,
        })
    }

    /// Linear scan over every bin center.
    fn nearest_occupied(&self, bin: usize) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        let wanted = bin_center(bin.min(self.bags.len() - 1), self.levels);
        self.bags
            .iter()
            .enumerate()
            .filter(|(_, bag)| !bag.is_empty())
            .map(|(index, _)| {
                let distance =
                    squared_distance(wanted, bin_center(index, self.levels));
                (distance, index)
            })
            // Tuples compare distance first, then index.
            .min()
            .map(|(_, index)| index)
    }

    #[inline]
    pub fn levels(&self) -> Levels {
        self.levels
    }

    /// Pixels the pool was built with.
    #[inline]
    pub fn initial(&self) -> usize {
        self.initial
    }

    /// Pixels still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Pixels handed out so far.
    #[inline]
    pub fn popped(&self) -> usize {
        self.initial - self.remaining
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Number of pixels left in `bin`; 0 for an out-of-range bin.
    #[inline]
    pub fn bag_len(&self, bin: usize) -> usize {
        self.bags.get(bin).map_or(0, |bag| bag.len())
    }
}
