use super::{BUTTERFLY_PAIRS, tile_origin};

pub(super) const fn butterfly(a: i16, b: i16) -> (i16, i16) {
    (a.wrapping_add(b), a.wrapping_sub(b))
}

fn hadamard8_1d(row: &mut [i16; 8]) {
    for stage in &BUTTERFLY_PAIRS {
        for &(i, j) in stage {
            (row[i], row[j]) = butterfly(row[i], row[j]);
        }
    }
}

fn transpose(grid: &mut [[i16; 8]; 8]) {
    for y in 0..8 {
        for x in (y + 1)..8 {
            let t = grid[y][x];
            grid[y][x] = grid[x][y];
            grid[x][y] = t;
        }
    }
}

pub(super) fn hadamard_8x8(src: &[i16], stride: usize, coeff: &mut [i16]) {
    let mut grid = [[0i16; 8]; 8];
    for (row, line) in grid.iter_mut().zip(src.chunks(stride)) {
        row.copy_from_slice(&line[..8]);
    }

    // Rows, then columns; each pass leaves the grid transposed.
    for _ in 0..2 {
        grid.iter_mut().for_each(hadamard8_1d);
        transpose(&mut grid);
    }

    for (out, row) in coeff.chunks_exact_mut(8).zip(&grid) {
        out.copy_from_slice(row);
    }
}

pub(super) fn hadamard_16x16_tiles(src: &[i16], stride: usize, coeff: &mut [i16; 256]) {
    for (q, tile) in coeff.chunks_exact_mut(64).enumerate() {
        hadamard_8x8(&src[tile_origin(q, stride)..], stride, tile);
    }
}

pub(super) fn combine_16x16_tiles(coeff: &mut [i16; 256]) {
    let (top, bottom) = coeff.split_at_mut(128);
    let (t0, t1) = top.split_at_mut(64);
    let (t2, t3) = bottom.split_at_mut(64);

    for (((a0, a1), a2), a3) in t0.iter_mut().zip(t1).zip(t2).zip(t3) {
        let (b0, b1) = butterfly(*a0, *a1);
        let (b2, b3) = butterfly(*a2, *a3);
        let (b0, b1, b2, b3) = (b0 >> 1, b1 >> 1, b2 >> 1, b3 >> 1);
        (*a0, *a2) = butterfly(b0, b2);
        (*a1, *a3) = butterfly(b1, b3);
    }
}
