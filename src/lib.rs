//! Rearrange the pixels of a source image onto the layout of a target image.
//!
//! The output approximates the target's color distribution while every pixel
//! value in it is taken, unchanged, from the source. Only positions move.
//!
//! Each source pixel is sorted into a color bin (see [`quantize()`]). The
//! target's coordinates are visited in a random order and each one takes a
//! pixel out of the bin its own target color falls into, or out of the
//! nearest non-empty bin once that one runs dry (see [`SupplyPool::pop()`]).
//!
//! # Sequential & Parallel
//!
//! [`remap()`] runs on the calling thread. With the `rayon` feature (on by
//! default) [`remap_parallel()`] drains the same shuffled positions with a
//! fixed worker pool. Both conserve the pixel count and the source's value
//! multiset. Exact pixel-to-position assignment differs between the two.
//!
//! ```
//! use pixshuffle::{Levels, Pixel, PixelMatrix, RemapConfig, remap};
//!
//! let source = PixelMatrix::from_rows(vec![
//!     vec![Pixel::new(0, 0, 0), Pixel::new(65535, 65535, 65535)],
//!     vec![Pixel::new(30000, 0, 0), Pixel::new(0, 30000, 0)],
//! ])?;
//! let target = PixelMatrix::filled(2, 2, Pixel::new(0, 0, 0));
//!
//! let config = RemapConfig::default()
//!     .with_levels(Levels::new(1)?)
//!     .with_seed(7);
//! let remapped = remap(&source, &target, &config)?;
//!
//! let mut used = remapped.matrix.pixels().to_vec();
//! let mut original = source.pixels().to_vec();
//! used.sort();
//! original.sort();
//! assert_eq!(used, original);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `rayon` -- Parallel remap driver & parallel filters.
//! - `image` -- Conversion from/to [`image`](https://docs.rs/image) buffers.
//! - `serde` -- `Serialize`/`Deserialize` on the public value types.
#![forbid(unsafe_code)]

#[cfg(feature = "image")]
pub mod convert;
mod error;
pub mod filter;
mod matrix;
mod operation;
mod pool;
mod quantize;
mod remap;
pub mod sequence;

pub use error::{MatrixError, OperationError, RemapError};
pub use matrix::PixelMatrix;
pub use operation::{DEFAULT_DOWNSCALE_FACTOR, Operation, Processor};
pub use pool::{Popped, SupplyPool};
pub use quantize::{Levels, bin_center, histogram, quantize, squared_distance};
#[cfg(feature = "rayon")]
pub use remap::{remap_parallel, remap_parallel_with_rng};
pub use remap::{RemapConfig, RemapStats, Remapped, remap, remap_with_rng};

/// A 16-bit-per-channel RGB value.
///
/// There is no alpha. Remapping never changes a `Pixel`, it only moves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Pixel {
    #[inline]
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Channels widened to `u32` for distance math.
    #[inline]
    pub const fn channels(self) -> [u32; 3] {
        [self.red as u32, self.green as u32, self.blue as u32]
    }
}

impl From<[u16; 3]> for Pixel {
    #[inline]
    fn from([red, green, blue]: [u16; 3]) -> Self {
        Self { red, green, blue }
    }
}

impl From<Pixel> for [u16; 3] {
    #[inline]
    fn from(pixel: Pixel) -> Self {
        [pixel.red, pixel.green, pixel.blue]
    }
}

/// A cell coordinate: column `x`, row `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}
