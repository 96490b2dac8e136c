//! Per-pixel and per-block filters.
//!
//! Each filter has a sequential form and, with the `rayon` feature, a `_par`
//! form that splits the work by rows and returns identical output.
use crate::{Pixel, PixelMatrix};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Rec. 601 luma of a pixel, truncated.
#[inline(always)]
pub fn luma(pixel: Pixel) -> u16 {
    (0.299 * pixel.red as f64
        + 0.587 * pixel.green as f64
        + 0.114 * pixel.blue as f64) as u16
}

#[inline(always)]
fn gray(pixel: &mut Pixel) {
    let value = luma(*pixel);
    *pixel = Pixel::new(value, value, value);
}

/// Replace every pixel by its luma on all three channels, in place.
pub fn grayscale(matrix: &mut PixelMatrix) {
    matrix.pixels_mut().iter_mut().for_each(gray);
}

/// Parallel [`grayscale()`].
#[cfg(feature = "rayon")]
pub fn grayscale_par(matrix: &mut PixelMatrix) {
    let width = matrix.width().max(1);
    matrix
        .pixels_mut()
        .par_chunks_mut(width)
        .for_each(|row| row.iter_mut().for_each(gray));
}

/// Pixelate without changing the size.
///
/// Every `factor × factor` block, clipped at the right and bottom edges, is
/// filled with the integer mean of its pixels. A `factor` of 0 or 1 returns
/// an unchanged copy. Any larger `factor` is accepted; one at least as large
/// as both sides fills the whole matrix with its mean.
///
/// ```
/// use pixshuffle::{Pixel, PixelMatrix, filter::downscale};
///
/// let matrix = PixelMatrix::from_rows(vec![
///     vec![Pixel::new(0, 0, 0), Pixel::new(10, 20, 30)],
///     vec![Pixel::new(20, 40, 60), Pixel::new(30, 60, 90)],
/// ])?;
/// let blocky = downscale(&matrix, 2);
/// assert!(blocky.pixels().iter().all(|&p| p == Pixel::new(15, 30, 45)));
/// # Ok::<(), pixshuffle::MatrixError>(())
/// ```
pub fn downscale(matrix: &PixelMatrix, factor: usize) -> PixelMatrix {
    if factor <= 1 || matrix.is_empty() {
        return matrix.clone();
    }

    // One block covering the whole matrix gives the same output.
    let factor = factor.min(matrix.width().max(matrix.height()));
    let mut out = matrix.clone();
    let band = factor * matrix.width();
    out.pixels_mut()
        .chunks_mut(band)
        .enumerate()
        .for_each(|(block_row, rows)| {
            average_band(matrix, factor, block_row * factor, rows)
        });
    out
}

/// Parallel [`downscale()`], one band of block rows per task.
#[cfg(feature = "rayon")]
pub fn downscale_par(matrix: &PixelMatrix, factor: usize) -> PixelMatrix {
    if factor <= 1 || matrix.is_empty() {
        return matrix.clone();
    }

    // One block covering the whole matrix gives the same output.
    let factor = factor.min(matrix.width().max(matrix.height()));
    let mut out = matrix.clone();
    let band = factor * matrix.width();
    out.pixels_mut()
        .par_chunks_mut(band)
        .enumerate()
        .for_each(|(block_row, rows)| {
            average_band(matrix, factor, block_row * factor, rows)
        });
    out
}

/// Fill `rows` (the output rows starting at `top`) with block means read
/// from `matrix`.
fn average_band(
    matrix: &PixelMatrix,
    factor: usize,
    top: usize,
    rows: &mut [Pixel],
) {
    let width = matrix.width();
    let bottom = (top + factor).min(matrix.height());
    let source = &matrix.pixels()[top * width..bottom * width];

    for left in (0..width).step_by(factor) {
        let right = (left + factor).min(width);

        let mut sum = [0u64; 3];
        for row in source.chunks_exact(width) {
            for pixel in &row[left..right] {
                sum[0] += pixel.red as u64;
                sum[1] += pixel.green as u64;
                sum[2] += pixel.blue as u64;
            }
        }

        let count = ((bottom - top) * (right - left)) as u64;
        let mean = Pixel::new(
            (sum[0] / count) as u16,
            (sum[1] / count) as u16,
            (sum[2] / count) as u16,
        );

        for row in rows.chunks_exact_mut(width) {
            row[left..right].fill(mean);
        }
    }
}
