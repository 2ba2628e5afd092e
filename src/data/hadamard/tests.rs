use cfg_if::cfg_if;

use super::{
    combine_16x16_tiles, hadamard_8x8, hadamard_8x8_in_place, hadamard_16x16,
    hadamard_16x16_tiles, hadamard_block,
};
use crate::data::{
    block::{BlockError, BlockSize},
    region::BlockRegion,
    test_util::Xorshift,
};

fn hadamard_8x8_verify_simd(src: &[i16], stride: usize) -> [i16; 64] {
    let mut rust_output = [0; 64];
    super::rust::hadamard_8x8(src, stride, &mut rust_output);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            let mut simd_output = [0; 64];
            // SAFETY: call to SIMD function
            unsafe { super::sse2::hadamard_8x8(src, stride, &mut simd_output) };
            assert_eq!(rust_output, simd_output);
        }
    }

    let mut output = [0; 64];
    hadamard_8x8(src, stride, &mut output);
    assert_eq!(rust_output, output);
    rust_output
}

fn hadamard_16x16_tiles_verify_simd(src: &[i16], stride: usize) -> [i16; 256] {
    let mut rust_output = [0; 256];
    super::rust::hadamard_16x16_tiles(src, stride, &mut rust_output);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            let mut simd_output = [0; 256];
            // SAFETY: call to SIMD function
            unsafe { super::sse2::hadamard_16x16_tiles(src, stride, &mut simd_output) };
            assert_eq!(rust_output, simd_output);

            if crate::cpu::has_avx2() {
                let mut simd_output = [0; 256];
                // SAFETY: call to SIMD function
                unsafe { super::avx2::hadamard_16x16_tiles(src, stride, &mut simd_output) };
                assert_eq!(rust_output, simd_output);
            }
        }
    }

    let mut output = [0; 256];
    hadamard_16x16_tiles(src, stride, &mut output);
    assert_eq!(rust_output, output);
    rust_output
}

fn combine_16x16_tiles_verify_simd(tiles: &[i16; 256]) -> [i16; 256] {
    let mut rust_output = *tiles;
    super::rust::combine_16x16_tiles(&mut rust_output);

    cfg_if! {
        if #[cfg(simd_x86_64)] {
            let mut simd_output = *tiles;
            // SAFETY: call to SIMD function
            unsafe { super::sse2::combine_16x16_tiles(&mut simd_output) };
            assert_eq!(rust_output, simd_output);

            if crate::cpu::has_avx2() {
                let mut simd_output = *tiles;
                // SAFETY: call to SIMD function
                unsafe { super::avx2::combine_16x16_tiles(&mut simd_output) };
                assert_eq!(rust_output, simd_output);
            }
        }
    }

    let mut output = *tiles;
    combine_16x16_tiles(&mut output);
    assert_eq!(rust_output, output);
    rust_output
}

fn hadamard_16x16_verify_simd(src: &[i16], stride: usize) -> [i16; 256] {
    let output = combine_16x16_tiles_verify_simd(&hadamard_16x16_tiles_verify_simd(src, stride));

    let mut composed = [0; 256];
    hadamard_16x16(src, stride, &mut composed);
    assert_eq!(output, composed);
    output
}

const fn sign(k: usize, n: usize) -> i32 {
    if (k & n).count_ones() % 2 == 0 { 1 } else { -1 }
}

/// Direct evaluation of `sum (-1)^popcount(u & r) (-1)^popcount(v & c) x[r][c]`.
fn naive_8x8(src: &[i16], stride: usize) -> [i32; 64] {
    let mut out = [0; 64];
    for u in 0..8 {
        for v in 0..8 {
            let mut acc = 0;
            for r in 0..8 {
                for c in 0..8 {
                    acc += sign(u, r) * sign(v, c) * i32::from(src[r * stride + c]);
                }
            }
            out[u * 8 + v] = acc;
        }
    }
    out
}

fn naive_16x16(src: &[i16], stride: usize) -> [i32; 256] {
    let tiles: Vec<[i32; 64]> = (0..4)
        .map(|q| naive_8x8(&src[(q >> 1) * 8 * stride + (q & 1) * 8..], stride))
        .collect();

    let mut out = [0; 256];
    for i in 0..64 {
        let b0 = (tiles[0][i] + tiles[1][i]) >> 1;
        let b1 = (tiles[0][i] - tiles[1][i]) >> 1;
        let b2 = (tiles[2][i] + tiles[3][i]) >> 1;
        let b3 = (tiles[2][i] - tiles[3][i]) >> 1;
        out[i] = b0 + b2;
        out[64 + i] = b1 + b3;
        out[128 + i] = b0 - b2;
        out[192 + i] = b1 - b3;
    }
    out
}

fn widen<const N: usize>(coeff: [i16; N]) -> [i32; N] {
    coeff.map(i32::from)
}

#[test]
fn zero_block_transforms_to_zero() {
    assert_eq!(hadamard_8x8_verify_simd(&[0; 64], 8), [0; 64]);
    assert_eq!(hadamard_16x16_verify_simd(&[0; 256], 16), [0; 256]);
}

#[test]
fn impulses_produce_basis_patterns() {
    for r in 0..8 {
        for c in 0..8 {
            let mut src = [0i16; 64];
            src[r * 8 + c] = 1;
            let coeff = hadamard_8x8_verify_simd(&src, 8);
            for u in 0..8 {
                for v in 0..8 {
                    assert_eq!(
                        i32::from(coeff[u * 8 + v]),
                        sign(u, r) * sign(v, c),
                        "impulse at ({r}, {c}), coefficient ({u}, {v})"
                    );
                }
            }
        }
    }
}

#[test]
fn constant_block_has_only_dc() {
    let coeff = hadamard_8x8_verify_simd(&[1; 64], 8);
    assert_eq!(coeff[0], 64);
    assert!(coeff[1..].iter().all(|&c| c == 0));
}

#[test]
fn ramp_8x8() {
    let src: Vec<i16> = (0..64).collect();
    let mut expected = [0i16; 64];
    expected[0] = 2016;
    expected[1] = -32;
    expected[2] = -64;
    expected[4] = -128;
    expected[8] = -256;
    expected[16] = -512;
    expected[32] = -1024;

    assert_eq!(hadamard_8x8_verify_simd(&src, 8), expected);
}

#[test]
fn hadamard_8x8_is_linear() {
    let mut rng = Xorshift::new(3);
    for _ in 0..50 {
        let x = rng.coeffs(64, 8);
        let y = rng.coeffs(64, 8);
        let (a, b) = (3, -2);
        let mixed: Vec<i16> = x.iter().zip(&y).map(|(&x, &y)| a * x + b * y).collect();

        let tx = hadamard_8x8_verify_simd(&x, 8);
        let ty = hadamard_8x8_verify_simd(&y, 8);
        let tm = hadamard_8x8_verify_simd(&mixed, 8);
        for i in 0..64 {
            assert_eq!(tm[i], a * tx[i] + b * ty[i]);
        }
    }
}

#[test]
fn applying_8x8_twice_scales_by_64() {
    let mut rng = Xorshift::new(99);
    for _ in 0..50 {
        let x = rng.coeffs(64, 3);
        let once = hadamard_8x8_verify_simd(&x, 8);
        let twice = hadamard_8x8_verify_simd(&once, 8);
        for (t, &v) in twice.iter().zip(&x) {
            assert_eq!(*t, 64 * v);
        }
    }
}

#[test]
fn hadamard_8x8_matches_naive_reference() {
    let mut rng = Xorshift::new(0xdead);
    for stride in [8, 13, 32] {
        for _ in 0..50 {
            let src = rng.coeffs(stride * 8, 255);
            assert_eq!(
                widen(hadamard_8x8_verify_simd(&src, stride)),
                naive_8x8(&src, stride)
            );
        }
    }
}

#[test]
fn strided_8x8_ignores_padding() {
    let stride = 19;
    let mut rng = Xorshift::new(5);
    let plane = rng.coeffs(stride * 8, 200);

    let mut packed = [0i16; 64];
    for (y, row) in packed.chunks_exact_mut(8).enumerate() {
        row.copy_from_slice(&plane[y * stride..y * stride + 8]);
    }

    assert_eq!(
        hadamard_8x8_verify_simd(&plane, stride),
        hadamard_8x8_verify_simd(&packed, 8)
    );
}

#[test]
fn in_place_matches_out_of_place() {
    let stride = 11;
    let mut rng = Xorshift::new(42);
    let original = rng.coeffs(stride * 8, 255);

    let mut block = original.clone();
    hadamard_8x8_in_place(&mut block, stride);
    let expected = hadamard_8x8_verify_simd(&original, stride);

    for (y, (row, orig)) in block.chunks(stride).zip(original.chunks(stride)).enumerate() {
        assert_eq!(row[..8], expected[y * 8..y * 8 + 8]);
        assert_eq!(row[8..], orig[8..], "padding of row {y} changed");
    }
}

#[test]
fn overflowing_input_wraps() {
    // 8 * 32767 wraps to -8 per row, then 8 * -8 down the DC column.
    let coeff = hadamard_8x8_verify_simd(&[i16::MAX; 64], 8);
    assert_eq!(coeff[0], -64);
    assert!(coeff[1..].iter().all(|&c| c == 0));
}

#[test]
fn random_wrapping_blocks_match_scalar() {
    let mut rng = Xorshift::new(0xabcd);
    for _ in 0..100 {
        let src = rng.any_i16(64);
        hadamard_8x8_verify_simd(&src, 8);

        let src = rng.any_i16(24 * 16);
        hadamard_16x16_verify_simd(&src, 24);

        let tiles: [i16; 256] = rng.any_i16(256).try_into().unwrap();
        combine_16x16_tiles_verify_simd(&tiles);
    }
}

#[test]
fn tiles_are_quadrant_transforms() {
    let stride = 20;
    let mut rng = Xorshift::new(8);
    let src = rng.coeffs(stride * 16, 255);

    let tiles = hadamard_16x16_tiles_verify_simd(&src, stride);
    for (q, (y, x)) in [(0, 0), (0, 8), (8, 0), (8, 8)].into_iter().enumerate() {
        let quadrant = hadamard_8x8_verify_simd(&src[y * stride + x..], stride);
        assert_eq!(tiles[64 * q..64 * q + 64], quadrant, "quadrant {q}");
    }
}

#[test]
fn combine_applies_halving_butterfly() {
    let mut rng = Xorshift::new(1234);
    let tiles: [i16; 256] = rng.any_i16(256).try_into().unwrap();
    let combined = combine_16x16_tiles_verify_simd(&tiles);

    for i in 0..64 {
        let (a0, a1, a2, a3) = (tiles[i], tiles[64 + i], tiles[128 + i], tiles[192 + i]);
        let b0 = a0.wrapping_add(a1) >> 1;
        let b1 = a0.wrapping_sub(a1) >> 1;
        let b2 = a2.wrapping_add(a3) >> 1;
        let b3 = a2.wrapping_sub(a3) >> 1;
        assert_eq!(combined[i], b0.wrapping_add(b2));
        assert_eq!(combined[64 + i], b1.wrapping_add(b3));
        assert_eq!(combined[128 + i], b0.wrapping_sub(b2));
        assert_eq!(combined[192 + i], b1.wrapping_sub(b3));
    }
}

#[test]
fn constant_16x16_has_only_dc() {
    let coeff = hadamard_16x16_verify_simd(&[1; 256], 16);
    assert_eq!(coeff[0], 128);
    assert!(coeff[1..].iter().all(|&c| c == 0));
}

#[test]
fn combine_shift_rounds_toward_negative_infinity() {
    let mut src = [0i16; 256];
    src[0] = -1;
    assert_eq!(hadamard_16x16_verify_simd(&src, 16), [-1; 256]);

    src[0] = 1;
    assert_eq!(hadamard_16x16_verify_simd(&src, 16), [0; 256]);
}

#[test]
fn ramp_16x16() {
    let src: Vec<i16> = (0..256).collect();
    let mut expected = [0i16; 256];
    expected[0] = 16320;
    expected[1] = -64;
    expected[2] = -128;
    expected[4] = -256;
    expected[8] = -1024;
    expected[16] = -2048;
    expected[32] = -4096;
    expected[64] = -512;
    expected[128] = -8192;

    assert_eq!(hadamard_16x16_verify_simd(&src, 16), expected);
}

#[test]
fn hadamard_16x16_matches_naive_reference() {
    let mut rng = Xorshift::new(77);
    for stride in [16, 17, 40] {
        for _ in 0..20 {
            let src = rng.coeffs(stride * 16, 100);
            assert_eq!(
                widen(hadamard_16x16_verify_simd(&src, stride)),
                naive_16x16(&src, stride)
            );
        }
    }
}

#[test]
fn hadamard_block_dispatches_on_size() {
    let mut rng = Xorshift::new(6);
    let plane = rng.coeffs(32 * 16, 255);

    let region = BlockRegion::new(&plane, 32, BlockSize::BLOCK_8X8).unwrap();
    let mut coeff = vec![0; 64];
    assert_eq!(hadamard_block(&region, &mut coeff), Ok(()));
    assert_eq!(coeff, hadamard_8x8_verify_simd(&plane, 32));

    let region = BlockRegion::new(&plane, 32, BlockSize::BLOCK_16X16).unwrap();
    let mut coeff = vec![0; 256];
    assert_eq!(hadamard_block(&region, &mut coeff), Ok(()));
    assert_eq!(coeff, hadamard_16x16_verify_simd(&plane, 32));
}

#[test]
fn hadamard_block_rejects_bad_requests() {
    let plane = [0i16; 256];

    let region = BlockRegion::new(&plane, 16, BlockSize::BLOCK_4X4).unwrap();
    assert_eq!(
        hadamard_block(&region, &mut [0; 16]),
        Err(BlockError::Unsupported {
            bsize: BlockSize::BLOCK_4X4,
            operation: "Hadamard transform",
        })
    );

    let region = BlockRegion::new(&plane, 16, BlockSize::BLOCK_8X8).unwrap();
    assert_eq!(
        hadamard_block(&region, &mut [0; 63]),
        Err(BlockError::OutputLength {
            len: 63,
            expected: 64
        })
    );

    let region = BlockRegion::new(&plane, 16, BlockSize::BLOCK_16X16).unwrap();
    assert_eq!(
        hadamard_block(&region, &mut [0; 257]),
        Err(BlockError::OutputLength {
            len: 257,
            expected: 256
        })
    );
}

#[test]
#[should_panic(expected = "stride 15 is smaller")]
fn hadamard_16x16_rejects_narrow_stride() {
    hadamard_16x16(&[0; 256], 15, &mut [0; 256]);
}

#[test]
#[should_panic(expected = "buffer holds 70 elements")]
fn hadamard_8x8_in_place_rejects_short_buffer() {
    hadamard_8x8_in_place(&mut [0; 70], 9);
}
