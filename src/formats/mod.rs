//! 格式分派：按扩展名选择解码流程，输出统一的 [`CanonicalSchematic`]

pub mod classic;
pub mod litematic;
pub mod worldedit;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::dimensions::resolve_dimensions_with;
use crate::error::{DecodeError, Result};
use crate::model::{Block, CanonicalSchematic, Format};
use crate::options::DecodeOptions;
use crate::palette::is_air;
use crate::region::to_i32;
use fastnbt::Value;

/// 按扩展名解码（默认参数，丢弃诊断）
pub fn decode_file(tree: &Value, extension: &str) -> Result<CanonicalSchematic> {
    decode_file_with(tree, extension, &DecodeOptions::default(), &mut Diagnostics::new())
}

/// 按扩展名解码
pub fn decode_file_with(
    tree: &Value,
    extension: &str,
    options: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<CanonicalSchematic> {
    let format = Format::from_extension(extension)
        .ok_or_else(|| DecodeError::UnsupportedExtension(extension.to_string()))?;
    decode_tree(tree, format, options, diags)
}

/// 按已知格式解码
pub fn decode_tree(
    tree: &Value,
    format: Format,
    options: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<CanonicalSchematic> {
    let blocks = match format {
        Format::Classic => classic::extract(tree, options, diags)?,
        Format::Litematic => litematic::extract(tree, options, diags)?,
        Format::WorldEdit => worldedit::extract(tree, options, diags)?,
    };
    let dimensions =
        resolve_dimensions_with(tree, format, options.default_dimensions, diags).dimensions;
    if blocks.is_empty() {
        diags.push(Diagnostic::NoBlocks);
    }
    log::info!("{} 解码完成: 尺寸 {}, {} 个方块", format, dimensions, blocks.len());
    Ok(CanonicalSchematic {
        format,
        dimensions,
        blocks,
    })
}

/// 必需字段检查：全部存在时返回 `Ok`
pub(crate) fn require(format: Format, checks: &[(&'static str, bool)]) -> Result<()> {
    let missing: Vec<&'static str> = checks
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::Structural { format, missing })
    }
}

/// 单区域格式共用的方块收集器：过滤空气、施加偏移、执行输出上限
pub(crate) struct CellSink {
    blocks: Vec<Block>,
    offset: [i64; 3],
    cap: usize,
    capped: bool,
}

impl CellSink {
    pub(crate) fn new(offset: [i64; 3], cap: usize) -> Self {
        Self {
            blocks: Vec::new(),
            offset,
            cap,
            capped: false,
        }
    }

    /// 收下一个格子；达到上限后返回 `false`，调用方应停止遍历
    pub(crate) fn push(&mut self, id: &str, (x, y, z): (u32, u32, u32)) -> bool {
        if is_air(id) {
            return true;
        }
        if self.blocks.len() >= self.cap {
            self.capped = true;
            return false;
        }
        self.blocks.push(Block {
            id: id.to_string(),
            x: to_i32(self.offset[0].saturating_add(x as i64)),
            y: to_i32(self.offset[1].saturating_add(y as i64)),
            z: to_i32(self.offset[2].saturating_add(z as i64)),
        });
        true
    }

    pub(crate) fn finish(self, region: &str, diags: &mut Diagnostics) -> Vec<Block> {
        if self.capped {
            diags.push(Diagnostic::EmissionCapReached {
                region: region.to_string(),
                cap: self.cap,
            });
        }
        self.blocks
    }
}
