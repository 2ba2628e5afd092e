use std::fmt::{self, Display};

#[cfg(simd_x86_64)]
cpufeatures::new!(cpuid_avx2, "avx2");

#[cfg(simd_x86_64)]
pub use cpuid_avx2::get as has_avx2;

/// The most capable kernel family the dispatchers select on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum CpuFeatureLevel {
    /// Portable scalar reference kernels.
    Rust,
    /// 128-bit kernels. Always available on x86_64.
    SSE2,
    /// 256-bit kernels, used for the 16x16 transform.
    AVX2,
}

impl CpuFeatureLevel {
    /// Detects the kernel family used by the dispatching entry points.
    ///
    /// Detection is cached by `cpufeatures`, so this is cheap to call.
    #[inline]
    #[must_use]
    pub fn detect() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(simd_x86_64)] {
                if has_avx2() {
                    CpuFeatureLevel::AVX2
                } else {
                    CpuFeatureLevel::SSE2
                }
            } else {
                CpuFeatureLevel::Rust
            }
        }
    }
}

impl Display for CpuFeatureLevel {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CpuFeatureLevel::Rust => "rust",
            CpuFeatureLevel::SSE2 => "sse2",
            CpuFeatureLevel::AVX2 => "avx2",
        })
    }
}
