use std::arch::x86_64::*;

use super::BUTTERFLY_PAIRS;

// Each 256-bit register holds one 16-sample row: the low lane belongs to the
// left tile and the high lane to the right one. The unpack instructions work
// within lanes, so one sequence transposes both tiles.

#[target_feature(enable = "avx2")]
unsafe fn butterfly_rows(rows: &mut [__m256i; 8]) {
    for stage in &BUTTERFLY_PAIRS {
        for &(i, j) in stage {
            let (a, b) = (rows[i], rows[j]);
            rows[i] = _mm256_add_epi16(a, b);
            rows[j] = _mm256_sub_epi16(a, b);
        }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn transpose_8x8_lanes(rows: &mut [__m256i; 8]) {
    let [r0, r1, r2, r3, r4, r5, r6, r7] = *rows;

    let a0 = _mm256_unpacklo_epi16(r0, r1);
    let a1 = _mm256_unpackhi_epi16(r0, r1);
    let a2 = _mm256_unpacklo_epi16(r2, r3);
    let a3 = _mm256_unpackhi_epi16(r2, r3);
    let a4 = _mm256_unpacklo_epi16(r4, r5);
    let a5 = _mm256_unpackhi_epi16(r4, r5);
    let a6 = _mm256_unpacklo_epi16(r6, r7);
    let a7 = _mm256_unpackhi_epi16(r6, r7);

    let b0 = _mm256_unpacklo_epi32(a0, a2);
    let b1 = _mm256_unpackhi_epi32(a0, a2);
    let b2 = _mm256_unpacklo_epi32(a1, a3);
    let b3 = _mm256_unpackhi_epi32(a1, a3);
    let b4 = _mm256_unpacklo_epi32(a4, a6);
    let b5 = _mm256_unpackhi_epi32(a4, a6);
    let b6 = _mm256_unpacklo_epi32(a5, a7);
    let b7 = _mm256_unpackhi_epi32(a5, a7);

    *rows = [
        _mm256_unpacklo_epi64(b0, b4),
        _mm256_unpackhi_epi64(b0, b4),
        _mm256_unpacklo_epi64(b1, b5),
        _mm256_unpackhi_epi64(b1, b5),
        _mm256_unpacklo_epi64(b2, b6),
        _mm256_unpackhi_epi64(b2, b6),
        _mm256_unpacklo_epi64(b3, b7),
        _mm256_unpackhi_epi64(b3, b7),
    ];
}

#[target_feature(enable = "avx2")]
unsafe fn load16(src: &[i16]) -> __m256i {
    _mm256_loadu_si256(src[..16].as_ptr().cast())
}

#[target_feature(enable = "avx2")]
unsafe fn store16(dst: &mut [i16], v: __m256i) {
    _mm256_storeu_si256(dst[..16].as_mut_ptr().cast(), v);
}

/// Transforms the two side-by-side 8x8 tiles of eight 16-sample rows.
#[target_feature(enable = "avx2")]
unsafe fn hadamard_8x16(src: &[i16], stride: usize, left: &mut [i16], right: &mut [i16]) {
    let mut rows = [_mm256_setzero_si256(); 8];
    for (r, row) in rows.iter_mut().enumerate() {
        *row = load16(&src[r * stride..]);
    }

    for _ in 0..2 {
        butterfly_rows(&mut rows);
        transpose_8x8_lanes(&mut rows);
    }

    for (r, row) in rows.into_iter().enumerate() {
        let out = 8 * r..8 * r + 8;
        _mm_storeu_si128(left[out.clone()].as_mut_ptr().cast(), _mm256_castsi256_si128(row));
        _mm_storeu_si128(right[out].as_mut_ptr().cast(), _mm256_extracti128_si256(row, 1));
    }
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn hadamard_16x16_tiles(src: &[i16], stride: usize, coeff: &mut [i16; 256]) {
    let (top, bottom) = coeff.split_at_mut(128);
    let (tl, tr) = top.split_at_mut(64);
    let (bl, br) = bottom.split_at_mut(64);

    hadamard_8x16(src, stride, tl, tr);
    hadamard_8x16(&src[8 * stride..], stride, bl, br);
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn combine_16x16_tiles(coeff: &mut [i16; 256]) {
    for i in (0..64).step_by(16) {
        let a0 = load16(&coeff[i..]);
        let a1 = load16(&coeff[64 + i..]);
        let a2 = load16(&coeff[128 + i..]);
        let a3 = load16(&coeff[192 + i..]);

        let b0 = _mm256_srai_epi16(_mm256_add_epi16(a0, a1), 1);
        let b1 = _mm256_srai_epi16(_mm256_sub_epi16(a0, a1), 1);
        let b2 = _mm256_srai_epi16(_mm256_add_epi16(a2, a3), 1);
        let b3 = _mm256_srai_epi16(_mm256_sub_epi16(a2, a3), 1);

        store16(&mut coeff[i..], _mm256_add_epi16(b0, b2));
        store16(&mut coeff[64 + i..], _mm256_add_epi16(b1, b3));
        store16(&mut coeff[128 + i..], _mm256_sub_epi16(b0, b2));
        store16(&mut coeff[192 + i..], _mm256_sub_epi16(b1, b3));
    }
}
