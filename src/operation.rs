use crate::{OperationError, PixelMatrix, RemapConfig, filter};

/// Block size used by [`Operation::Downscale`] when selected by op byte.
pub const DEFAULT_DOWNSCALE_FACTOR: usize = 4;

/// One of the selectable image operations.
///
/// A request names its operation with a single leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Convert to gray (op byte `1`).
    Grayscale,
    /// Pixelate with the given block size (op byte `2`).
    Downscale(usize),
    /// Remap onto the processor's target (op byte `3`).
    Remap,
}

impl Operation {
    /// Decode a leading op byte.
    ///
    /// ```
    /// use pixshuffle::{Operation, OperationError};
    ///
    /// assert_eq!(Operation::from_op_byte(3), Ok(Operation::Remap));
    /// assert_eq!(
    ///     Operation::from_op_byte(9),
    ///     Err(OperationError::UnknownOp(9))
    /// );
    /// ```
    pub fn from_op_byte(byte: u8) -> Result<Self, OperationError> {
        match byte {
            1 => Ok(Self::Grayscale),
            2 => Ok(Self::Downscale(DEFAULT_DOWNSCALE_FACTOR)),
            3 => Ok(Self::Remap),
            other => Err(OperationError::UnknownOp(other)),
        }
    }

    pub fn op_byte(self) -> u8 {
        match self {
            Self::Grayscale => 1,
            Self::Downscale(_) => 2,
            Self::Remap => 3,
        }
    }
}

/// Applies operations against a fixed, pre-loaded remap target.
#[derive(Debug, Clone)]
pub struct Processor {
    target: PixelMatrix,
    config: RemapConfig,
}

impl Processor {
    pub fn new(target: PixelMatrix, config: RemapConfig) -> Self {
        Self { target, config }
    }

    pub fn target(&self) -> &PixelMatrix {
        &self.target
    }

    pub fn config(&self) -> &RemapConfig {
        &self.config
    }

    /// Run `operation` on `source`.
    ///
    /// Only [`Operation::Remap`] can fail, when `source` does not have the
    /// target's dimensions.
    pub fn apply(
        &self,
        operation: Operation,
        mut source: PixelMatrix,
    ) -> Result<PixelMatrix, OperationError> {
        log::debug!(
            "applying {operation:?} to {}x{}",
            source.width(),
            source.height()
        );

        Ok(match operation {
            Operation::Grayscale => {
                #[cfg(feature = "rayon")]
                filter::grayscale_par(&mut source);
                #[cfg(not(feature = "rayon"))]
                filter::grayscale(&mut source);
                source
            }
            Operation::Downscale(factor) => {
                #[cfg(feature = "rayon")]
                let out = filter::downscale_par(&source, factor);
                #[cfg(not(feature = "rayon"))]
                let out = filter::downscale(&source, factor);
                out
            }
            Operation::Remap => {
                #[cfg(feature = "rayon")]
                let remapped =
                    crate::remap_parallel(&source, &self.target, &self.config)?;
                #[cfg(not(feature = "rayon"))]
                let remapped =
                    crate::remap(&source, &self.target, &self.config)?;
                remapped.into_matrix()
            }
        })
    }

    /// Decode the op byte, then [`apply()`](Self::apply).
    pub fn apply_op_byte(
        &self,
        byte: u8,
        source: PixelMatrix,
    ) -> Result<PixelMatrix, OperationError> {
        self.apply(Operation::from_op_byte(byte)?, source)
    }
}
