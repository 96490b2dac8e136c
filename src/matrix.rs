use crate::{MatrixError, Pixel, Position};
use core::ops::Index;

/// A rectangular, row-major grid of [`Pixel`]s.
///
/// Every row has the same length; this is enforced at construction. A matrix
/// with zero rows or zero columns is representable (it materializes to an
/// empty image) but the remap drivers reject it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelMatrix {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelMatrix {
    /// Wraps a flat row-major buffer.
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<Pixel>,
    ) -> Result<Self, MatrixError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(MatrixError::LengthMismatch {
                len: pixels.len(),
                width,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wraps a buffer the caller already sized to `width × height`.
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        pixels: Vec<Pixel>,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Builds a matrix from nested rows, rejecting ragged input.
    ///
    /// ```
    /// use pixshuffle::{MatrixError, Pixel, PixelMatrix};
    ///
    /// let ragged = PixelMatrix::from_rows(vec![
    ///     vec![Pixel::default(); 3],
    ///     vec![Pixel::default(); 2],
    /// ]);
    /// assert_eq!(
    ///     ragged,
    ///     Err(MatrixError::RaggedRow { row: 1, expected: 3, found: 2 })
    /// );
    /// ```
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Result<Self, MatrixError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(MatrixError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        // A row list of empty rows is still 0 pixels wide.
        let height = if width == 0 { 0 } else { height };

        Ok(Self {
            width,
            height,
            pixels: rows.into_iter().flatten().collect(),
        })
    }

    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    /// Builds a matrix by evaluating `f` at every position, row by row.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(Position) -> Pixel,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(Position::new(x, y)));
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Flat buffer offset of `position`, if it lies inside the matrix.
    #[inline]
    pub fn index_of(&self, position: Position) -> Option<usize> {
        (position.x < self.width && position.y < self.height)
            .then(|| position.y * self.width + position.x)
    }

    #[inline]
    pub fn get(&self, position: Position) -> Option<Pixel> {
        self.index_of(position).map(|index| self.pixels[index])
    }

    /// The row-major pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Pixel]> {
        // `chunks_exact(0)` panics, an empty matrix has no rows anyway.
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// Every position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        crate::sequence::row_major(self.width, self.height)
    }
}

impl Index<Position> for PixelMatrix {
    type Output = Pixel;

    #[inline]
    fn index(&self, position: Position) -> &Pixel {
        &self.pixels[position.y * self.width + position.x]
    }
}
