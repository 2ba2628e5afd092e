/// Deterministic xorshift generator for test blocks.
pub(crate) struct Xorshift(u32);

impl Xorshift {
    pub(crate) const fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift.
        Self(seed | 1)
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    pub(crate) fn pixels(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| (self.next_u32() >> 24) as u8).collect()
    }

    /// Values uniformly drawn from `-range..=range`.
    pub(crate) fn coeffs(&mut self, len: usize, range: i16) -> Vec<i16> {
        let span = 2 * u32::from(range.unsigned_abs()) + 1;
        (0..len)
            .map(|_| ((self.next_u32() % span) as i32 - i32::from(range)) as i16)
            .collect()
    }

    /// Arbitrary 16-bit values, including ones that overflow the transforms.
    pub(crate) fn any_i16(&mut self, len: usize) -> Vec<i16> {
        (0..len).map(|_| (self.next_u32() >> 16) as u16 as i16).collect()
    }
}
