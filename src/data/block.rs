use std::fmt::{self, Display};

use thiserror::Error;

/// Square block sizes the kernels operate on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[expect(non_camel_case_types)]
pub enum BlockSize {
    /// 4x4 samples.
    BLOCK_4X4,
    /// 8x8 samples.
    BLOCK_8X8,
    /// 16x16 samples.
    BLOCK_16X16,
}

impl BlockSize {
    /// # Errors
    ///
    /// - Returns `InvalidBlockSize` if the given `w` and `h` do not produce a
    ///   valid block size.
    #[inline]
    pub const fn from_width_and_height_opt(w: usize, h: usize) -> Result<BlockSize, BlockError> {
        match (w, h) {
            (4, 4) => Ok(BlockSize::BLOCK_4X4),
            (8, 8) => Ok(BlockSize::BLOCK_8X8),
            (16, 16) => Ok(BlockSize::BLOCK_16X16),
            _ => Err(BlockError::InvalidBlockSize {
                width: w,
                height: h,
            }),
        }
    }

    /// Base-2 logarithm of the side length.
    #[inline]
    #[must_use]
    pub const fn width_log2(self) -> usize {
        match self {
            BlockSize::BLOCK_4X4 => 2,
            BlockSize::BLOCK_8X8 => 3,
            BlockSize::BLOCK_16X16 => 4,
        }
    }

    /// Side length in samples.
    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        1 << self.width_log2()
    }

    /// Blocks are square, so this is the same as [`BlockSize::width`].
    #[inline]
    #[must_use]
    pub const fn height(self) -> usize {
        self.width()
    }

    /// Number of samples in the block.
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        1 << self.area_log2()
    }

    /// Base-2 logarithm of [`BlockSize::area`].
    #[inline]
    #[must_use]
    pub const fn area_log2(self) -> usize {
        2 * self.width_log2()
    }

    /// Minimum number of elements a buffer needs to hold this block when its
    /// rows are `stride` elements apart.
    ///
    /// Saturates at `usize::MAX`, which no slice can hold.
    #[inline]
    #[must_use]
    pub const fn footprint(self, stride: usize) -> usize {
        (self.height() - 1)
            .saturating_mul(stride)
            .saturating_add(self.width())
    }

    /// # Errors
    ///
    /// - Returns `StrideTooSmall` if rows would overlap.
    /// - Returns `BufferTooSmall` if `len` elements cannot hold the block.
    #[inline]
    pub const fn check_footprint(self, len: usize, stride: usize) -> Result<(), BlockError> {
        if stride < self.width() {
            return Err(BlockError::StrideTooSmall {
                stride,
                width: self.width(),
            });
        }
        let needed = self.footprint(stride);
        if len < needed {
            return Err(BlockError::BufferTooSmall { len, needed });
        }
        Ok(())
    }

    #[track_caller]
    pub(crate) fn assert_footprint(self, len: usize, stride: usize) {
        if let Err(e) = self.check_footprint(len, stride) {
            panic!("{self} block: {e}");
        }
    }
}

impl Display for BlockSize {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

/// Errors from the checked block entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockError {
    /// The requested dimensions are not a supported square block.
    #[error("invalid block size {width}x{height}")]
    InvalidBlockSize {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The block size is valid but the operation has no kernel for it.
    #[error("{operation} is not defined for {bsize} blocks")]
    Unsupported {
        /// The rejected size.
        bsize: BlockSize,
        /// Name of the operation that rejected it.
        operation: &'static str,
    },
    /// Row stride is smaller than the row width.
    #[error("stride {stride} is smaller than the row width {width}")]
    StrideTooSmall {
        /// Supplied stride in elements.
        stride: usize,
        /// Row width in elements.
        width: usize,
    },
    /// The input buffer ends before the last row does.
    #[error("buffer holds {len} elements but {needed} are needed")]
    BufferTooSmall {
        /// Supplied buffer length.
        len: usize,
        /// Elements covered by the block.
        needed: usize,
    },
    /// The block starting at column `x` runs past the end of its row.
    #[error("block at column {x} is {width} wide but rows are {stride} elements apart")]
    ColumnOutOfRange {
        /// Column of the block origin.
        x: usize,
        /// Block width in elements.
        width: usize,
        /// Supplied stride in elements.
        stride: usize,
    },
    /// The output buffer does not have exactly one slot per coefficient.
    #[error("output holds {len} coefficients but the block produces {expected}")]
    OutputLength {
        /// Supplied output length.
        len: usize,
        /// Coefficients the transform writes.
        expected: usize,
    },
}
