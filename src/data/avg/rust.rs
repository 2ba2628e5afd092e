use super::rounded_mean;
use crate::data::block::BlockSize;

fn block_sum(src: &[u8], stride: usize, bsize: BlockSize) -> u32 {
    let w = bsize.width();
    src.chunks(stride)
        .take(bsize.height())
        .map(|row| row[..w].iter().map(|&p| u32::from(p)).sum::<u32>())
        .sum()
}

pub(super) fn avg_4x4(src: &[u8], stride: usize) -> u32 {
    rounded_mean(block_sum(src, stride, BlockSize::BLOCK_4X4), BlockSize::BLOCK_4X4)
}

pub(super) fn avg_8x8(src: &[u8], stride: usize) -> u32 {
    rounded_mean(block_sum(src, stride, BlockSize::BLOCK_8X8), BlockSize::BLOCK_8X8)
}
