use std::arch::x86_64::*;

use super::{BUTTERFLY_PAIRS, tile_origin};

/// Runs the order-8 butterfly across eight row registers, i.e. down every
/// column at once.
#[target_feature(enable = "sse2")]
unsafe fn butterfly_rows(rows: &mut [__m128i; 8]) {
    for stage in &BUTTERFLY_PAIRS {
        for &(i, j) in stage {
            let (a, b) = (rows[i], rows[j]);
            rows[i] = _mm_add_epi16(a, b);
            rows[j] = _mm_sub_epi16(a, b);
        }
    }
}

#[target_feature(enable = "sse2")]
unsafe fn transpose_8x8(rows: &mut [__m128i; 8]) {
    let [r0, r1, r2, r3, r4, r5, r6, r7] = *rows;

    let a0 = _mm_unpacklo_epi16(r0, r1);
    let a1 = _mm_unpackhi_epi16(r0, r1);
    let a2 = _mm_unpacklo_epi16(r2, r3);
    let a3 = _mm_unpackhi_epi16(r2, r3);
    let a4 = _mm_unpacklo_epi16(r4, r5);
    let a5 = _mm_unpackhi_epi16(r4, r5);
    let a6 = _mm_unpacklo_epi16(r6, r7);
    let a7 = _mm_unpackhi_epi16(r6, r7);

    let b0 = _mm_unpacklo_epi32(a0, a2);
    let b1 = _mm_unpackhi_epi32(a0, a2);
    let b2 = _mm_unpacklo_epi32(a1, a3);
    let b3 = _mm_unpackhi_epi32(a1, a3);
    let b4 = _mm_unpacklo_epi32(a4, a6);
    let b5 = _mm_unpackhi_epi32(a4, a6);
    let b6 = _mm_unpacklo_epi32(a5, a7);
    let b7 = _mm_unpackhi_epi32(a5, a7);

    *rows = [
        _mm_unpacklo_epi64(b0, b4),
        _mm_unpackhi_epi64(b0, b4),
        _mm_unpacklo_epi64(b1, b5),
        _mm_unpackhi_epi64(b1, b5),
        _mm_unpacklo_epi64(b2, b6),
        _mm_unpackhi_epi64(b2, b6),
        _mm_unpacklo_epi64(b3, b7),
        _mm_unpackhi_epi64(b3, b7),
    ];
}

#[target_feature(enable = "sse2")]
unsafe fn load8(src: &[i16]) -> __m128i {
    _mm_loadu_si128(src[..8].as_ptr().cast())
}

#[target_feature(enable = "sse2")]
unsafe fn store8(dst: &mut [i16], v: __m128i) {
    _mm_storeu_si128(dst[..8].as_mut_ptr().cast(), v);
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn hadamard_8x8(src: &[i16], stride: usize, coeff: &mut [i16]) {
    let mut rows = [_mm_setzero_si128(); 8];
    for (r, row) in rows.iter_mut().enumerate() {
        *row = load8(&src[r * stride..]);
    }

    for _ in 0..2 {
        butterfly_rows(&mut rows);
        transpose_8x8(&mut rows);
    }

    for (out, row) in coeff.chunks_exact_mut(8).zip(rows) {
        store8(out, row);
    }
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn hadamard_16x16_tiles(src: &[i16], stride: usize, coeff: &mut [i16; 256]) {
    for (q, tile) in coeff.chunks_exact_mut(64).enumerate() {
        hadamard_8x8(&src[tile_origin(q, stride)..], stride, tile);
    }
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn combine_16x16_tiles(coeff: &mut [i16; 256]) {
    for i in (0..64).step_by(8) {
        let a0 = load8(&coeff[i..]);
        let a1 = load8(&coeff[64 + i..]);
        let a2 = load8(&coeff[128 + i..]);
        let a3 = load8(&coeff[192 + i..]);

        let b0 = _mm_srai_epi16(_mm_add_epi16(a0, a1), 1);
        let b1 = _mm_srai_epi16(_mm_sub_epi16(a0, a1), 1);
        let b2 = _mm_srai_epi16(_mm_add_epi16(a2, a3), 1);
        let b3 = _mm_srai_epi16(_mm_sub_epi16(a2, a3), 1);

        store8(&mut coeff[i..], _mm_add_epi16(b0, b2));
        store8(&mut coeff[64 + i..], _mm_add_epi16(b1, b3));
        store8(&mut coeff[128 + i..], _mm_sub_epi16(b0, b2));
        store8(&mut coeff[192 + i..], _mm_sub_epi16(b1, b3));
    }
}
