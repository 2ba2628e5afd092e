use std::{iter::FusedIterator, slice};

use super::block::{BlockError, BlockSize};

/// Bounded, validated view of one block inside a larger buffer.
///
/// The buffer may be a whole picture plane; the view starts at the block's
/// top-left element and rows are `stride` elements apart.
#[derive(Debug, Clone, Copy)]
pub struct BlockRegion<'a, T> {
    data: &'a [T],
    stride: usize,
    bsize: BlockSize,
}

impl<'a, T> BlockRegion<'a, T> {
    /// Wraps `data`, whose first element is the block's top-left sample.
    ///
    /// # Errors
    ///
    /// - Returns `StrideTooSmall` or `BufferTooSmall` if the block does not fit.
    #[inline]
    pub fn new(data: &'a [T], stride: usize, bsize: BlockSize) -> Result<Self, BlockError> {
        bsize.check_footprint(data.len(), stride)?;
        Ok(Self {
            data: &data[..bsize.footprint(stride)],
            stride,
            bsize,
        })
    }

    /// Selects the block whose top-left sample is at column `x`, row `y` of
    /// a plane with the given `stride`.
    ///
    /// # Errors
    ///
    /// - Returns `ColumnOutOfRange` if `x` plus the block width exceeds `stride`.
    /// - Returns `BufferTooSmall` if the block runs past the end of `plane`.
    #[inline]
    pub fn from_plane(
        plane: &'a [T],
        stride: usize,
        x: usize,
        y: usize,
        bsize: BlockSize,
    ) -> Result<Self, BlockError> {
        if x.saturating_add(bsize.width()) > stride {
            return Err(BlockError::ColumnOutOfRange {
                x,
                width: bsize.width(),
                stride,
            });
        }
        let origin = y.saturating_mul(stride).saturating_add(x);
        let needed = origin.saturating_add(bsize.footprint(stride));
        if plane.len() < needed {
            return Err(BlockError::BufferTooSmall {
                len: plane.len(),
                needed,
            });
        }
        Self::new(&plane[origin..], stride, bsize)
    }

    /// Elements from the block origin through the last sample of the last row.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &'a [T] {
        self.data
    }

    /// Distance between rows, in elements.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Size of the viewed block.
    #[inline]
    #[must_use]
    pub const fn bsize(&self) -> BlockSize {
        self.bsize
    }

    /// Iterates over the rows of the block, each exactly one block wide.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> BlockRows<'a, T> {
        BlockRows {
            chunks: self.data.chunks(self.stride),
            width: self.bsize.width(),
        }
    }
}

/// Iterator over the rows of a [`BlockRegion`].
#[derive(Debug, Clone)]
pub struct BlockRows<'a, T> {
    chunks: slice::Chunks<'a, T>,
    width: usize,
}

impl<'a, T> Iterator for BlockRows<'a, T> {
    type Item = &'a [T];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(|row| &row[..self.width])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T> ExactSizeIterator for BlockRows<'_, T> {}
impl<T> FusedIterator for BlockRows<'_, T> {}
