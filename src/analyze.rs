use aligned::{A16, Aligned};
use log::{debug, trace};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{
    cpu::CpuFeatureLevel,
    data::{
        avg::avg_block,
        block::{BlockError, BlockSize},
        hadamard::hadamard_block,
        region::BlockRegion,
        satd::satd,
    },
};

/// Options determining how a plane is analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Size of the blocks whose transform activity is measured.
    /// Must be 8x8 or 16x16.
    pub block_size: BlockSize,
    /// Count the DC coefficient towards the activity of a block.
    /// Without it, a flat block has no activity regardless of its brightness.
    pub keep_dc: bool,
}

impl Default for AnalysisOptions {
    #[inline]
    fn default() -> Self {
        AnalysisOptions {
            block_size: BlockSize::BLOCK_16X16,
            keep_dc: false,
        }
    }
}

/// Per-block statistics of one 8-bit plane.
///
/// Only blocks lying fully inside the plane are measured; both maps are in
/// raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct PlaneAnalysis {
    /// Size of the blocks in `activity`.
    pub block_size: BlockSize,
    /// Number of 8x8 blocks in a row of `means`.
    pub mean_cols: usize,
    /// Number of rows of `means`.
    pub mean_rows: usize,
    /// Rounded mean of every 8x8 block.
    pub means: Vec<u8>,
    /// Number of blocks in a row of `activity`.
    pub activity_cols: usize,
    /// Number of rows of `activity`.
    pub activity_rows: usize,
    /// SATD of the Hadamard transform of every `block_size` block.
    pub activity: Vec<u32>,
}

impl PlaneAnalysis {
    /// Mean of the 8x8 block means, or `None` if the plane holds no full block.
    #[inline]
    #[must_use]
    pub fn mean_of_means(&self) -> Option<f64> {
        if self.means.is_empty() {
            return None;
        }
        let sum: u64 = self.means.iter().map(|&m| u64::from(m)).sum();
        Some(sum as f64 / self.means.len() as f64)
    }

    /// Sum of the activity of every block.
    #[inline]
    #[must_use]
    pub fn total_activity(&self) -> u64 {
        self.activity.iter().map(|&a| u64::from(a)).sum()
    }

    /// Activity of the busiest block.
    #[inline]
    #[must_use]
    pub fn max_activity(&self) -> Option<u32> {
        self.activity.iter().copied().max()
    }
}

/// Computes block means and transform activity over an 8-bit plane.
///
/// `plane` starts at the top-left visible sample and rows are `stride`
/// samples apart. Rows of blocks are processed in parallel.
///
/// # Errors
///
/// - Returns `Unsupported` if `opts.block_size` is 4x4.
/// - Returns `StrideTooSmall` if `stride < width`.
/// - Returns `BufferTooSmall` if `plane` cannot hold `height` rows.
#[inline]
pub fn analyze_plane(
    plane: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    opts: AnalysisOptions,
) -> Result<PlaneAnalysis, BlockError> {
    if opts.block_size == BlockSize::BLOCK_4X4 {
        return Err(BlockError::Unsupported {
            bsize: opts.block_size,
            operation: "plane analysis",
        });
    }
    if stride < width {
        return Err(BlockError::StrideTooSmall { stride, width });
    }
    if height > 0 {
        let needed = (height - 1).saturating_mul(stride).saturating_add(width);
        if plane.len() < needed {
            return Err(BlockError::BufferTooSmall {
                len: plane.len(),
                needed,
            });
        }
    }

    let mean_cols = width / 8;
    let mean_rows = height / 8;
    let mut means = vec![0u8; mean_cols * mean_rows];
    if mean_cols > 0 {
        means
            .par_chunks_mut(mean_cols)
            .enumerate()
            .try_for_each(|(by, row)| -> Result<(), BlockError> {
                for (bx, mean) in row.iter_mut().enumerate() {
                    let region =
                        BlockRegion::from_plane(plane, stride, bx * 8, by * 8, BlockSize::BLOCK_8X8)?;
                    // The mean of 8-bit samples fits in 8 bits.
                    *mean = avg_block(&region)? as u8;
                }
                Ok(())
            })?;
    }

    let n = opts.block_size.width();
    let activity_cols = width / n;
    let activity_rows = height / n;
    let mut activity = vec![0u32; activity_cols * activity_rows];
    if activity_cols > 0 {
        activity
            .par_chunks_mut(activity_cols)
            .enumerate()
            .try_for_each(|(by, row)| -> Result<(), BlockError> {
                for (bx, cost) in row.iter_mut().enumerate() {
                    let region =
                        BlockRegion::from_plane(plane, stride, bx * n, by * n, opts.block_size)?;
                    *cost = block_activity(&region, opts.keep_dc)?;
                }
                Ok(())
            })?;
    }

    debug!(
        "[Analyze] {}x{} plane: {} mean blocks, {} {} activity blocks ({})",
        width,
        height,
        means.len(),
        activity.len(),
        opts.block_size,
        CpuFeatureLevel::detect()
    );

    let res = PlaneAnalysis {
        block_size: opts.block_size,
        mean_cols,
        mean_rows,
        means,
        activity_cols,
        activity_rows,
        activity,
    };
    trace!(
        "[Analyze] activity total={} max={:?}",
        res.total_activity(),
        res.max_activity()
    );
    Ok(res)
}

fn block_activity(region: &BlockRegion<'_, u8>, keep_dc: bool) -> Result<u32, BlockError> {
    let bsize = region.bsize();
    let n = bsize.width();
    let area = bsize.area();

    let mut samples: Aligned<A16, [i16; 256]> = Aligned([0; 256]);
    for (dst, row) in samples.chunks_exact_mut(n).zip(region.rows()) {
        for (d, &s) in dst.iter_mut().zip(row) {
            *d = i16::from(s);
        }
    }
    let samples = BlockRegion::new(&samples[..area], n, bsize)?;

    let mut coeff: Aligned<A16, [i16; 256]> = Aligned([0; 256]);
    let coeff = &mut coeff[..area];
    hadamard_block(&samples, coeff)?;

    let dc = if keep_dc {
        0
    } else {
        u32::from(coeff[0].unsigned_abs())
    };
    Ok(satd(coeff) - dc)
}
