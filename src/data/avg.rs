#[cfg_attr(simd_x86_64, allow(dead_code))]
mod rust;
#[cfg(simd_x86_64)]
mod sse2;


use cfg_if::cfg_if;

use super::{
    block::{BlockError, BlockSize},
    region::BlockRegion,
};

/// Rounded mean of a block's samples: `(sum + area / 2) >> log2(area)`.
///
/// `sum` must be the exact total; rounding partial sums first changes the
/// result for some inputs.
const fn rounded_mean(sum: u32, bsize: BlockSize) -> u32 {
    let shift = bsize.area_log2() as u32;
    (sum + (1 << (shift - 1))) >> shift
}

/// Rounded mean of a 4x4 block of 8-bit samples.
///
/// `src` starts at the top-left sample and rows are `stride` samples apart.
///
/// # Panics
///
/// - If `stride < 4` or `src` is too short to hold the block.
#[inline]
#[must_use]
pub fn avg_4x4(src: &[u8], stride: usize) -> u32 {
    BlockSize::BLOCK_4X4.assert_footprint(src.len(), stride);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            // SAFETY: SSE2 is part of the x86_64 baseline
            unsafe { sse2::avg_4x4(src, stride) }
        } else {
            rust::avg_4x4(src, stride)
        }
    }
}

/// Rounded mean of an 8x8 block of 8-bit samples.
///
/// `src` starts at the top-left sample and rows are `stride` samples apart.
///
/// # Panics
///
/// - If `stride < 8` or `src` is too short to hold the block.
#[inline]
#[must_use]
pub fn avg_8x8(src: &[u8], stride: usize) -> u32 {
    BlockSize::BLOCK_8X8.assert_footprint(src.len(), stride);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            // SAFETY: SSE2 is part of the x86_64 baseline
            unsafe { sse2::avg_8x8(src, stride) }
        } else {
            rust::avg_8x8(src, stride)
        }
    }
}

/// Rounded mean of a validated block.
///
/// # Errors
///
/// - Returns `Unsupported` for sizes other than 4x4 and 8x8.
#[inline]
pub fn avg_block(region: &BlockRegion<'_, u8>) -> Result<u32, BlockError> {
    match region.bsize() {
        BlockSize::BLOCK_4X4 => Ok(avg_4x4(region.data(), region.stride())),
        BlockSize::BLOCK_8X8 => Ok(avg_8x8(region.data(), region.stride())),
        bsize => Err(BlockError::Unsupported {
            bsize,
            operation: "block average",
        }),
    }
}
