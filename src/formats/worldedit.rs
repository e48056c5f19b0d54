//! WorldEdit (Sponge) `.schem` 格式
//!
//! v1/v2 的字段在根标签下：`Palette`（名称 → 索引）与 `BlockData`。
//! v3 把所有内容放进 `Schematic`，方块数据位于 `Blocks.Palette` / `Blocks.Data`。
//! `BlockData` 是 varint 字节流，调色板小于 128 项时每格恰好一个字节。

use super::{require, CellSink};
use crate::bitpack::RegionSize;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::model::{Block, Format};
use crate::options::DecodeOptions;
use crate::palette::BlockDescriptor;
use crate::tree;
use fastnbt::Value;
use std::collections::HashMap;

/// 反转 `名称 → 索引` 映射；索引越界或重复的条目记录后丢弃
pub fn invert_palette(
    palette: &HashMap<String, Value>,
    diags: &mut Diagnostics,
) -> Vec<Option<BlockDescriptor>> {
    let mut slots: Vec<Option<BlockDescriptor>> = vec![None; palette.len()];
    // 排序保证重复索引时结果确定
    let mut entries: Vec<(&String, &Value)> = palette.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (state, index) in entries {
        let slot = tree::as_int(index)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| slots.get_mut(i));
        match slot {
            Some(slot) if slot.is_none() => *slot = Some(BlockDescriptor::parse_state(state)),
            Some(_) => diags.degraded("Palette", format!("{} 的索引与其他条目重复", state)),
            None => diags.degraded("Palette", format!("{} 的索引 {:?} 无效", state, index)),
        }
    }
    slots
}

/// 解码无符号 LEB128 varint 流，最多 `limit` 个值
pub fn read_varints(bytes: &[i8], limit: usize, diags: &mut Diagnostics) -> Vec<u32> {
    let mut values = Vec::with_capacity(limit.min(bytes.len()));
    let mut value: u32 = 0;
    let mut shift = 0;
    for &byte in bytes {
        if values.len() >= limit {
            break;
        }
        let byte = byte as u8;
        if shift >= 32 {
            diags.degraded("BlockData", format!("第 {} 个 varint 过长，停止解码", values.len()));
            return values;
        }
        value |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            values.push(value);
            value = 0;
            shift = 0;
        } else {
            shift += 7;
        }
    }
    if shift != 0 {
        diags.degraded("BlockData", "末尾 varint 不完整");
    }
    values
}

/// 负数索引映射为必然越界的值
fn palette_index(v: i64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

/// 把 `path` 处的方块数据展开为每格一个调色板索引
fn block_indices(body: &Value, path: &str, limit: usize, diags: &mut Diagnostics) -> Vec<u32> {
    if let Some(bytes) = tree::get_bytes(body, path) {
        return read_varints(bytes, limit, diags);
    }
    if let Some(ints) = tree::get_ints(body, path) {
        return ints.iter().take(limit).map(|&v| palette_index(v as i64)).collect();
    }
    match tree::get_int_vec(body, path) {
        Some(values) => values.into_iter().take(limit).map(palette_index).collect(),
        None => {
            diags.degraded("BlockData", "类型无法识别");
            Vec::new()
        }
    }
}

/// 提取 WorldEdit 格式的所有非空气方块
pub fn extract(
    tree: &Value,
    options: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<Vec<Block>> {
    let body = match tree::get(tree, "Schematic") {
        Some(inner @ Value::Compound(_)) => inner,
        _ => tree,
    };
    if let Some(version) = tree::get_int(body, "Version") {
        log::debug!("Sponge 原理图版本 {}", version);
    }

    let width = tree::get_int(body, "Width");
    let height = tree::get_int(body, "Height");
    let length = tree::get_int(body, "Length");
    let palette = tree::get_compound(body, "Palette")
        .or_else(|| tree::get_compound(body, "Blocks.Palette"));
    let data_path = ["BlockData", "Blocks.Data"]
        .into_iter()
        .find(|path| tree::get(body, path).is_some());
    require(
        Format::WorldEdit,
        &[
            ("Width", width.is_some()),
            ("Height", height.is_some()),
            ("Length", length.is_some()),
            ("Palette", palette.is_some()),
            ("BlockData", data_path.is_some()),
        ],
    )?;
    let (Some(width), Some(height), Some(length), Some(palette), Some(data_path)) =
        (width, height, length, palette, data_path)
    else {
        return Ok(Vec::new());
    };

    let axis = |v: i64| u32::try_from(v).unwrap_or(0);
    let size = RegionSize::new(axis(width), axis(height), axis(length));
    let Some(volume) = size.volume().filter(|v| *v > 0) else {
        diags.degraded(
            "Width/Height/Length",
            format!("尺寸无效: {}x{}x{}", width, height, length),
        );
        return Ok(Vec::new());
    };

    let palette = invert_palette(palette, diags);
    let indices = block_indices(body, data_path, volume, diags);
    if indices.len() < volume {
        diags.degraded(
            "BlockData",
            format!("只有 {} 个条目（应为 {}），其余格子跳过", indices.len(), volume),
        );
    }

    let offset = tree::get_triple(body, "Offset").unwrap_or([0, 0, 0]);
    let mut sink = CellSink::new(offset, options.max_blocks_per_region);
    let mut out_of_range = 0usize;
    for (index, &palette_index) in indices.iter().enumerate() {
        let Some(Some(block)) = palette.get(palette_index as usize) else {
            out_of_range += 1;
            continue;
        };
        if !sink.push(&block.name, size.position(index)) {
            break;
        }
    }
    if out_of_range > 0 {
        diags.degraded(
            "BlockData",
            format!("{} 个索引超出调色板大小 {}", out_of_range, palette.len()),
        );
    }
    Ok(sink.finish(Format::WorldEdit.as_str(), diags))
}
