//! Block-level kernels for video encoder search loops.
//!
//! Provides the rounded mean of 4x4 and 8x8 blocks of 8-bit samples and the
//! natural-order 2-D Walsh-Hadamard transform of 8x8 and 16x16 blocks of
//! 16-bit samples, with SIMD versions selected at runtime on x86_64.
//! A plane-level analysis built on top of them is also provided.

mod analyze;
mod cpu;
mod data;

pub use crate::{
    analyze::{AnalysisOptions, PlaneAnalysis, analyze_plane},
    cpu::CpuFeatureLevel,
    data::{
        avg::{avg_4x4, avg_8x8, avg_block},
        block::{BlockError, BlockSize},
        hadamard::{
            combine_16x16_tiles, hadamard_8x8, hadamard_8x8_in_place, hadamard_16x16,
            hadamard_16x16_tiles, hadamard_block,
        },
        region::{BlockRegion, BlockRows},
        satd::satd,
    },
};
