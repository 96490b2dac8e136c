//! Uniform color-cube bucketing.
use crate::{Pixel, PixelMatrix, RemapError};

/// Number of buckets per channel.
///
/// The color cube is split into `levels³` bins. Valid values are `1..=256`;
/// at 256 every bucket spans one value of a channel's high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Levels(u32);

impl Levels {
    pub const MAX: u32 = 256;

    /// 16 buckets per channel, 4096 bins.
    pub const DEFAULT: Self = Self(16);

    pub fn new(levels: u32) -> Result<Self, RemapError> {
        if (1..=Self::MAX).contains(&levels) {
            Ok(Self(levels))
        } else {
            Err(RemapError::InvalidLevels(levels))
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Width of one bucket: `65536 / levels`.
    #[inline]
    pub const fn step(self) -> u32 {
        65536 / self.0
    }

    /// Total number of bins: `levels³`.
    #[inline]
    pub const fn bin_count(self) -> usize {
        let levels = self.0 as usize;
        levels * levels * levels
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Levels {
    type Error = RemapError;

    fn try_from(levels: u32) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<Levels> for u32 {
    fn from(levels: Levels) -> Self {
        levels.0
    }
}

#[inline(always)]
fn bucket(channel: u16, levels: Levels) -> usize {
    // 65535 / step can land one past the last bucket when step does not
    // divide 65536 evenly.
    (channel as u32 / levels.step()).min(levels.get() - 1) as usize
}

/// Map a pixel to its bin index in `0..levels³`.
///
/// Buckets are combined with radix `levels`, red most significant:
/// *index = (r × levels + g) × levels + b*.
///
/// ## Examples
///
/// ```
/// use pixshuffle::{Levels, Pixel, quantize};
///
/// let levels = Levels::new(16)?;
/// assert_eq!(quantize(Pixel::new(0, 0, 0), levels), 0);
/// assert_eq!(quantize(Pixel::new(65535, 65535, 65535), levels), 4095);
/// // Red bucket 1 of 16 is the 256th bin.
/// assert_eq!(quantize(Pixel::new(4096, 0, 0), levels), 256);
/// # Ok::<(), pixshuffle::RemapError>(())
/// ```
#[inline]
pub fn quantize(pixel: Pixel, levels: Levels) -> usize {
    let n = levels.get() as usize;
    (bucket(pixel.red, levels) * n + bucket(pixel.green, levels)) * n
        + bucket(pixel.blue, levels)
}

/// Approximate mid value of each channel's bucket for bin `index`.
///
/// Only used to compare bins by distance; it does not reconstruct a pixel.
#[inline]
pub fn bin_center(index: usize, levels: Levels) -> [u32; 3] {
    let n = levels.get() as usize;
    let step = levels.step();
    let plane = n * n;

    let red = (index / plane) as u32;
    let green = ((index % plane) / n) as u32;
    let blue = (index % n) as u32;

    [
        red * step + step / 2,
        green * step + step / 2,
        blue * step + step / 2,
    ]
}

/// Squared Euclidean distance between two channel triples.
#[inline(always)]
pub fn squared_distance(a: [u32; 3], b: [u32; 3]) -> u64 {
    a.iter()
        .zip(b.iter())
        .map(|(&a, &b)| {
            let d = a.abs_diff(b) as u64;
            d * d
        })
        .sum()
}

/// Count how many pixels of `matrix` fall into each bin.
///
/// The returned vector has `levels³` entries.
pub fn histogram(matrix: &PixelMatrix, levels: Levels) -> Vec<u32> {
    let mut counts = vec![0u32; levels.bin_count()];
    for &pixel in matrix.pixels() {
        counts[quantize(pixel, levels)] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_levels() {
        assert_eq!(Levels::new(0), Err(RemapError::InvalidLevels(0)));
        assert_eq!(Levels::new(257), Err(RemapError::InvalidLevels(257)));
        assert!(Levels::new(1).is_ok());
        assert!(Levels::new(256).is_ok());
    }

    #[test]
    fn max_channel_clamps_to_last_bucket() {
        // 65536 / 3 = 21845, 65535 / 21845 = 3.
        let levels = Levels::new(3).unwrap();
        assert_eq!(bucket(65535, levels), 2);
        assert_eq!(quantize(Pixel::new(65535, 65535, 65535), levels), 26);
    }

    #[test]
    fn center_matches_bucket_layout() {
        let levels = Levels::new(16).unwrap();
        let index = quantize(Pixel::new(4096, 8192, 65535), levels);
        assert_eq!(bin_center(index, levels), [6144, 10240, 63488]);
    }

    #[test]
    fn single_level_is_one_bin() {
        let levels = Levels::new(1).unwrap();
        assert_eq!(levels.bin_count(), 1);
        assert_eq!(quantize(Pixel::new(65535, 0, 12345), levels), 0);
        assert_eq!(bin_center(0, levels), [32768, 32768, 32768]);
    }

    #[test]
    fn distance_is_symmetric_and_squared() {
        assert_eq!(squared_distance([0, 0, 0], [3, 4, 0]), 25);
        assert_eq!(squared_distance([3, 4, 0], [0, 0, 0]), 25);
        assert_eq!(
            squared_distance([0, 0, 0], [65535, 65535, 65535]),
            3 * 65535u64 * 65535
        );
    }
}
