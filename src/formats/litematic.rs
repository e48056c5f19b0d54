//! Litematica `.litematic` 格式
//!
//! 所有方块数据位于 `Regions` 下的命名区域中，每个区域带自己的调色板、
//! 位打包的 `BlockStates` 以及在全局坐标系中的 `Position`。

use crate::diagnostics::Diagnostics;
use crate::error::{DecodeError, Result};
use crate::model::{Block, Format};
use crate::options::DecodeOptions;
use crate::region::{composite, extract_regions};
use crate::tree;
use fastnbt::Value;

fn log_metadata(tree: &Value) {
    let name = tree::get_str(tree, "Metadata.Name").unwrap_or("-");
    let author = tree::get_str(tree, "Metadata.Author").unwrap_or("-");
    match tree::get_int(tree, "Metadata.RegionCount") {
        Some(count) => log::debug!("Litematica: {} (作者 {}), 声明 {} 个区域", name, author, count),
        None => log::debug!("Litematica: {} (作者 {})", name, author),
    }
}

/// 提取所有区域的非空气方块
pub fn extract(
    tree: &Value,
    options: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<Vec<Block>> {
    let regions = extract_regions(tree, diags).ok_or_else(|| DecodeError::Structural {
        format: Format::Litematic,
        missing: vec!["Regions"],
    })?;
    log_metadata(tree);
    log::debug!("{} 个可解码区域", regions.len());
    Ok(composite(&regions, options, diags).into_blocks())
}
