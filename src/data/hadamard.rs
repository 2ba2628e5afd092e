#[cfg(simd_x86_64)]
mod avx2;
#[cfg_attr(simd_x86_64, allow(dead_code))]
mod rust;
#[cfg(simd_x86_64)]
mod sse2;

#[cfg(test)]
mod tests;

use aligned::{A16, Aligned};
use cfg_if::cfg_if;

use super::{
    block::{BlockError, BlockSize},
    region::BlockRegion,
};

/// Index pairs combined by each stage of the order-8 butterfly network.
///
/// Stage `s` pairs elements `2^s` apart, which yields the natural-order
/// (Sylvester) basis `y[k] = sum_n (-1)^popcount(k & n) * x[n]`.
const BUTTERFLY_PAIRS: [[(usize, usize); 4]; 3] = [
    [(0, 1), (2, 3), (4, 5), (6, 7)],
    [(0, 2), (1, 3), (4, 6), (5, 7)],
    [(0, 4), (1, 5), (2, 6), (3, 7)],
];

/// Offset of the top-left sample of quadrant `q` (TL, TR, BL, BR) in a
/// 16x16 block with the given stride.
const fn tile_origin(q: usize, stride: usize) -> usize {
    (q >> 1) * 8 * stride + (q & 1) * 8
}

/// 2-D Walsh-Hadamard transform of an 8x8 block.
///
/// The output is written contiguously with a row stride of 8. No scaling is
/// applied and arithmetic wraps in 16 bits, so inputs must be small enough
/// for the caller's purposes.
///
/// # Panics
///
/// - If `src_stride < 8` or `src` is too short to hold the block.
#[inline]
pub fn hadamard_8x8(src: &[i16], src_stride: usize, coeff: &mut [i16; 64]) {
    BlockSize::BLOCK_8X8.assert_footprint(src.len(), src_stride);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            // SAFETY: SSE2 is part of the x86_64 baseline
            unsafe { sse2::hadamard_8x8(src, src_stride, coeff) }
        } else {
            rust::hadamard_8x8(src, src_stride, coeff)
        }
    }
}

/// Transforms an 8x8 block in place, keeping its row stride.
///
/// Only the 8 leading elements of each row are written.
///
/// # Panics
///
/// - If `stride < 8` or `block` is too short to hold the block.
#[inline]
pub fn hadamard_8x8_in_place(block: &mut [i16], stride: usize) {
    let mut coeff: Aligned<A16, [i16; 64]> = Aligned([0; 64]);
    hadamard_8x8(block, stride, &mut coeff);

    for (row, out) in block.chunks_mut(stride).zip(coeff.chunks_exact(8)) {
        row[..8].copy_from_slice(out);
    }
}

/// First phase of the 16x16 transform: the 8x8 transform of each quadrant.
///
/// Quadrant `q` (top-left, top-right, bottom-left, bottom-right) is stored
/// at `coeff[64 * q..64 * q + 64]`.
///
/// # Panics
///
/// - If `src_stride < 16` or `src` is too short to hold the block.
#[inline]
pub fn hadamard_16x16_tiles(src: &[i16], src_stride: usize, coeff: &mut [i16; 256]) {
    BlockSize::BLOCK_16X16.assert_footprint(src.len(), src_stride);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            if crate::cpu::has_avx2() {
                // SAFETY: call to SIMD function
                unsafe { avx2::hadamard_16x16_tiles(src, src_stride, coeff) }
            } else {
                // SAFETY: SSE2 is part of the x86_64 baseline
                unsafe { sse2::hadamard_16x16_tiles(src, src_stride, coeff) }
            }
        } else {
            rust::hadamard_16x16_tiles(src, src_stride, coeff)
        }
    }
}

/// Second phase of the 16x16 transform.
///
/// For every coefficient position `i` the four tile values are combined
/// with an order-4 butterfly. The horizontal pairs are halved with an
/// arithmetic shift before the vertical pairs are added:
///
/// ```text
/// b0 = (a0 + a1) >> 1    b1 = (a0 - a1) >> 1
/// b2 = (a2 + a3) >> 1    b3 = (a2 - a3) >> 1
/// tile0 = b0 + b2        tile1 = b1 + b3
/// tile2 = b0 - b2        tile3 = b1 - b3
/// ```
#[inline]
pub fn combine_16x16_tiles(coeff: &mut [i16; 256]) {
    cfg_if! {
        if #[cfg(simd_x86_64)] {
            if crate::cpu::has_avx2() {
                // SAFETY: call to SIMD function
                unsafe { avx2::combine_16x16_tiles(coeff) }
            } else {
                // SAFETY: SSE2 is part of the x86_64 baseline
                unsafe { sse2::combine_16x16_tiles(coeff) }
            }
        } else {
            rust::combine_16x16_tiles(coeff)
        }
    }
}

/// 16x16 Hadamard transform: [`hadamard_16x16_tiles`] followed by
/// [`combine_16x16_tiles`].
///
/// The coefficients stay in tile order, 64 per quadrant.
///
/// # Panics
///
/// - If `src_stride < 16` or `src` is too short to hold the block.
#[inline]
pub fn hadamard_16x16(src: &[i16], src_stride: usize, coeff: &mut [i16; 256]) {
    hadamard_16x16_tiles(src, src_stride, coeff);
    combine_16x16_tiles(coeff);
}

/// Hadamard transform of a validated block into `coeff`.
///
/// # Errors
///
/// - Returns `Unsupported` for 4x4 blocks.
/// - Returns `OutputLength` if `coeff` does not hold exactly one element per
///   sample of the block.
#[inline]
pub fn hadamard_block(region: &BlockRegion<'_, i16>, coeff: &mut [i16]) -> Result<(), BlockError> {
    let bsize = region.bsize();
    let output_length = BlockError::OutputLength {
        len: coeff.len(),
        expected: bsize.area(),
    };

    match bsize {
        BlockSize::BLOCK_8X8 => {
            let coeff = <&mut [i16; 64]>::try_from(coeff).map_err(|_| output_length)?;
            hadamard_8x8(region.data(), region.stride(), coeff);
        }
        BlockSize::BLOCK_16X16 => {
            let coeff = <&mut [i16; 256]>::try_from(coeff).map_err(|_| output_length)?;
            hadamard_16x16(region.data(), region.stride(), coeff);
        }
        BlockSize::BLOCK_4X4 => {
            return Err(BlockError::Unsupported {
                bsize,
                operation: "Hadamard transform",
            });
        }
    }

    Ok(())
}
