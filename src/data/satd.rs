/// Sum of absolute transformed differences over a block of coefficients.
///
/// Usually applied to the output of a Hadamard transform of a residual.
/// `i16::MIN` counts as 32768.
#[inline]
#[must_use]
pub fn satd(coeff: &[i16]) -> u32 {
    coeff.iter().map(|&c| u32::from(c.unsigned_abs())).sum()
}

#[cfg(test)]
mod tests {
    use super::satd;
    use crate::data::hadamard::hadamard_8x8;

    #[test]
    fn satd_sums_magnitudes() {
        assert_eq!(satd(&[]), 0);
        assert_eq!(satd(&[3, -4, 0, 5]), 12);
        assert_eq!(satd(&[i16::MIN, i16::MAX]), 32768 + 32767);
    }

    #[test]
    fn satd_of_transformed_impulse() {
        let mut src = [0i16; 64];
        src[9] = 2;
        let mut coeff = [0; 64];
        hadamard_8x8(&src, 8, &mut coeff);
        // Every basis function has magnitude one.
        assert_eq!(satd(&coeff), 128);
    }
}
