//! 解码参数

use crate::bitpack::Packing;
use crate::model::Dimensions;

/// 每个区域默认最多输出的方块数
pub const DEFAULT_MAX_BLOCKS: usize = 100_000;

/// 所有尺寸策略失败时使用的尺寸
pub const DEFAULT_DIMENSIONS: Dimensions = Dimensions::new(16, 16, 16);

/// 单次解码的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// 每个区域的方块输出上限
    pub max_blocks_per_region: usize,
    /// 位打包约定，`Auto` 时按数组长度判定
    pub packing: Packing,
    /// 多区域文件是否并行解码
    pub parallel_regions: bool,
    /// 尺寸回退值
    pub default_dimensions: Dimensions,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_blocks_per_region: DEFAULT_MAX_BLOCKS,
            packing: Packing::Auto,
            parallel_regions: true,
            default_dimensions: DEFAULT_DIMENSIONS,
        }
    }
}
