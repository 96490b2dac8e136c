//! Conversion between [`PixelMatrix`] and [`image`] buffers.
//!
//! Decoding and encoding files is left to the `image` crate itself.
use crate::{MatrixError, Pixel, PixelMatrix};
use image::{DynamicImage, ImageBuffer, Rgb, RgbaImage};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// 16-bit RGB buffer as produced by [`DynamicImage::to_rgb16()`].
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Extract a matrix from any decoded image, keeping 16 bits per channel.
///
/// Alpha is dropped. Row `y`, column `x` of the matrix is pixel `(x, y)` of
/// the image.
pub fn extract(image: &DynamicImage) -> PixelMatrix {
    from_rgb16(&image.to_rgb16())
}

/// Parallel [`extract()`].
#[cfg(feature = "rayon")]
pub fn extract_par(image: &DynamicImage) -> PixelMatrix {
    let buffer = image.to_rgb16();
    let pixels = buffer
        .as_raw()
        .par_chunks_exact(3)
        .map(|rgb| Pixel::new(rgb[0], rgb[1], rgb[2]))
        .collect();

    PixelMatrix::from_parts(
        buffer.width() as usize,
        buffer.height() as usize,
        pixels,
    )
}

pub fn from_rgb16(buffer: &Rgb16Image) -> PixelMatrix {
    let pixels = buffer
        .as_raw()
        .chunks_exact(3)
        .map(|rgb| Pixel::new(rgb[0], rgb[1], rgb[2]))
        .collect();

    PixelMatrix::from_parts(
        buffer.width() as usize,
        buffer.height() as usize,
        pixels,
    )
}

/// Render a matrix as an opaque 8-bit image.
///
/// Each channel keeps only its high byte. A 0×0 matrix gives an empty image.
///
/// ```
/// use pixshuffle::{Pixel, PixelMatrix, convert::materialize};
///
/// let matrix = PixelMatrix::filled(2, 1, Pixel::new(0xABCD, 0x00FF, 0xFF00));
/// let image = materialize(&matrix)?;
/// assert_eq!(image.get_pixel(1, 0).0, [0xAB, 0x00, 0xFF, 0xFF]);
/// # Ok::<(), pixshuffle::MatrixError>(())
/// ```
///
/// ## Errors
///
/// [`MatrixError::TooLarge`] if a side does not fit in `u32`.
pub fn materialize(matrix: &PixelMatrix) -> Result<RgbaImage, MatrixError> {
    let (width, height) = matrix.dimensions();
    let too_large = || MatrixError::TooLarge { width, height };
    let image_width = u32::try_from(width).map_err(|_| too_large())?;
    let image_height = u32::try_from(height).map_err(|_| too_large())?;

    let raw: Vec<u8> = matrix
        .pixels()
        .iter()
        .flat_map(|pixel| {
            [
                (pixel.red >> 8) as u8,
                (pixel.green >> 8) as u8,
                (pixel.blue >> 8) as u8,
                u8::MAX,
            ]
        })
        .collect();

    let len = raw.len();
    RgbaImage::from_raw(image_width, image_height, raw).ok_or(
        MatrixError::LengthMismatch {
            len: len / 4,
            width,
            height,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_keeps_sixteen_bits_and_layout() {
        let buffer = Rgb16Image::from_fn(3, 2, |x, y| {
            Rgb([x as u16 * 1000 + 7, y as u16 * 2000 + 3, 65535])
        });
        let matrix = from_rgb16(&buffer);

        assert_eq!(matrix.dimensions(), (3, 2));
        assert_eq!(
            matrix[crate::Position::new(2, 1)],
            Pixel::new(2007, 2003, 65535)
        );
    }

    #[test]
    fn empty_matrix_materializes() {
        let image = materialize(&PixelMatrix::default()).unwrap();
        assert_eq!(image.dimensions(), (0, 0));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_side_is_rejected() {
        // Zero rows, so no pixel storage is needed.
        let wide = PixelMatrix::filled(u32::MAX as usize + 1, 0, Pixel::default());
        assert_eq!(
            materialize(&wide),
            Err(MatrixError::TooLarge {
                width: u32::MAX as usize + 1,
                height: 0,
            })
        );
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_extract_matches() {
        let buffer = Rgb16Image::from_fn(9, 5, |x, y| {
            Rgb([x as u16 * 300, y as u16 * 700, (x * y) as u16])
        });
        let image = DynamicImage::ImageRgb16(buffer);
        assert_eq!(extract_par(&image), extract(&image));
    }
}
