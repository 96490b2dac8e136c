use thiserror::Error;

/// Reasons a remap call refuses to run.
///
/// Validation happens before the supply pool is built, so a returned error
/// always means no work was done and no output exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemapError {
    #[error(
        "source is {}x{} but target is {}x{}",
        .source_size.0, .source_size.1, .target_size.0, .target_size.1
    )]
    DimensionMismatch {
        /// `(width, height)` of the source matrix.
        source_size: (usize, usize),
        /// `(width, height)` of the target matrix.
        target_size: (usize, usize),
    },

    #[error("cannot remap an empty pixel matrix")]
    EmptyMatrix,

    #[error("quantization levels must be between 1 and 256, got {0}")]
    InvalidLevels(u32),
}

/// Errors constructing a [`PixelMatrix`](crate::PixelMatrix).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error(
        "pixel buffer length {len} does not match dimensions {width}x{height}"
    )]
    LengthMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("row {row} has {found} pixels, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{width}x{height} exceeds the image size limit of u32 per side")]
    TooLarge { width: usize, height: usize },
}

/// Errors from dispatching an [`Operation`](crate::Operation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("unknown operation byte {0}")]
    UnknownOp(u8),

    #[error(transparent)]
    Remap(#[from] RemapError),
}
