use std::arch::x86_64::*;

use super::rounded_mean;
use crate::data::block::BlockSize;

/// Adds the two 64-bit lanes produced by `psadbw`.
#[target_feature(enable = "sse2")]
unsafe fn hsum_sad(sad: __m128i) -> u32 {
    _mm_cvtsi128_si32(_mm_add_epi64(sad, _mm_srli_si128(sad, 8))) as u32
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn avg_4x4(src: &[u8], stride: usize) -> u32 {
    let row = |r: usize| {
        let line = &src[r * stride..r * stride + 4];
        i32::from_le_bytes([line[0], line[1], line[2], line[3]])
    };

    let rows = _mm_setr_epi32(row(0), row(1), row(2), row(3));
    let sum = hsum_sad(_mm_sad_epu8(rows, _mm_setzero_si128()));

    rounded_mean(sum, BlockSize::BLOCK_4X4)
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn avg_8x8(src: &[u8], stride: usize) -> u32 {
    let zero = _mm_setzero_si128();
    let mut acc = zero;

    for r in (0..8).step_by(2) {
        let top = &src[r * stride..r * stride + 8];
        let bottom = &src[(r + 1) * stride..(r + 1) * stride + 8];
        // SAFETY: each slice holds exactly the 8 bytes `movq` reads
        let pair = _mm_unpacklo_epi64(
            _mm_loadl_epi64(top.as_ptr().cast()),
            _mm_loadl_epi64(bottom.as_ptr().cast()),
        );
        acc = _mm_add_epi64(acc, _mm_sad_epu8(pair, zero));
    }

    rounded_mean(hsum_sad(acc), BlockSize::BLOCK_8X8)
}
