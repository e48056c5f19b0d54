//! 多区域合成
//!
//! 每个区域独立解码，按各自的位置偏移放入同一全局坐标系后拼接。

use crate::bitpack::{self, RegionSize};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::Block;
use crate::options::DecodeOptions;
use crate::palette::BlockDescriptor;
use crate::tree;
use fastnbt::Value;
use rayon::prelude::*;

/// 按名称排序的区域列表；没有 `Regions` 复合标签时返回 `None`
pub fn sorted_regions(tree: &Value) -> Option<Vec<(&str, &Value)>> {
    let regions = tree::get_compound(tree, "Regions")?;
    let mut entries: Vec<(&str, &Value)> = regions.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    Some(entries)
}

/// 一个独立解码单元，方块状态数组直接借用自 NBT 树
#[derive(Debug, Clone)]
pub struct Region<'a> {
    pub name: String,
    pub size: RegionSize,
    /// 区域最小角在全局坐标系中的位置
    pub origin: [i64; 3],
    pub palette: Vec<BlockDescriptor>,
    pub block_states: &'a [i64],
}

impl<'a> Region<'a> {
    /// 从 Litematica 区域标签构造；缺少必需数据时记录诊断并返回 `None`
    pub fn from_tree(name: &str, value: &'a Value, diags: &mut Diagnostics) -> Option<Self> {
        let size = tree::get_triple(value, "Size");
        let palette = tree::get_list(value, "BlockStatePalette");
        let block_states = tree::get_longs(value, "BlockStates");

        let (Some(size), Some(palette), Some(block_states)) = (size, palette, block_states) else {
            let mut missing = Vec::new();
            if size.is_none() {
                missing.push("Size");
            }
            if palette.is_none() {
                missing.push("BlockStatePalette");
            }
            if block_states.is_none() {
                missing.push("BlockStates");
            }
            diags.push(Diagnostic::RegionSkipped {
                region: name.to_string(),
                missing,
            });
            return None;
        };

        let axis = |v: i64| u32::try_from(v.unsigned_abs()).ok();
        let region_size = match (axis(size[0]), axis(size[1]), axis(size[2])) {
            (Some(x), Some(y), Some(z)) => Some(RegionSize::new(x, y, z)),
            _ => None,
        };
        let Some(region_size) = region_size.filter(|s| s.volume().is_some()) else {
            diags.degraded(
                format!("Regions.{}.Size", name),
                format!("尺寸超出范围: {:?}", size),
            );
            diags.push(Diagnostic::RegionSkipped {
                region: name.to_string(),
                missing: vec!["Size"],
            });
            return None;
        };

        let position = tree::get_triple(value, "Position").unwrap_or_else(|| {
            diags.degraded(format!("Regions.{}.Position", name), "缺失，使用零偏移");
            [0, 0, 0]
        });
        // 负尺寸表示区域从 Position 向负方向延伸
        let mut origin = position;
        for axis in 0..3 {
            if size[axis] < 0 {
                origin[axis] = origin[axis].saturating_add(size[axis]).saturating_add(1);
            }
        }

        let palette = palette
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                BlockDescriptor::from_nbt(entry).unwrap_or_else(|| {
                    let id = format!("minecraft:unknown_palette_{}", i);
                    diags.unknown(&id);
                    BlockDescriptor::new(id)
                })
            })
            .collect();

        Some(Self {
            name: name.to_string(),
            size: region_size,
            origin,
            palette,
            block_states,
        })
    }
}

/// 读取所有区域；没有 `Regions` 时返回 `None`，损坏的区域被跳过
pub fn extract_regions<'a>(tree: &'a Value, diags: &mut Diagnostics) -> Option<Vec<Region<'a>>> {
    let entries = sorted_regions(tree)?;
    Some(
        entries
            .into_iter()
            .filter_map(|(name, value)| Region::from_tree(name, value, diags))
            .collect(),
    )
}

/// 合成结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composite {
    Blocks(Vec<Block>),
    /// 所有区域都没有产生方块
    Empty,
}

impl Composite {
    pub fn into_blocks(self) -> Vec<Block> {
        match self {
            Composite::Blocks(blocks) => blocks,
            Composite::Empty => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Composite::Empty)
    }
}

pub(crate) fn to_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// 解码单个区域并平移到全局坐标
pub fn decode_region(region: &Region<'_>, options: &DecodeOptions) -> (Vec<Block>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let (mut decoder, exact) = bitpack::decode(
        &region.palette,
        region.block_states,
        region.size,
        options.packing,
        options.max_blocks_per_region,
    );
    let field = format!("Regions.{}.BlockStates", region.name);
    if !exact {
        let layout = decoder.layout();
        diags.degraded(
            field.clone(),
            format!(
                "长度 {} 与任何已知打包方式都不匹配，按 {} 位 {:?} 解码",
                region.block_states.len(),
                layout.bits,
                layout.packing
            ),
        );
    }

    let [ox, oy, oz] = region.origin;
    let blocks: Vec<Block> = decoder
        .by_ref()
        .map(|b| Block {
            id: b.block.name.clone(),
            x: to_i32(ox.saturating_add(b.x as i64)),
            y: to_i32(oy.saturating_add(b.y as i64)),
            z: to_i32(oz.saturating_add(b.z as i64)),
        })
        .collect();

    if decoder.out_of_range() > 0 {
        diags.degraded(
            field.clone(),
            format!("{} 个索引超出调色板大小 {}", decoder.out_of_range(), region.palette.len()),
        );
    }
    if decoder.missing() > 0 {
        diags.degraded(field, format!("数组过短，缺少 {} 个条目", decoder.missing()));
    }
    if decoder.capped() {
        diags.push(Diagnostic::EmissionCapReached {
            region: region.name.clone(),
            cap: options.max_blocks_per_region,
        });
    }
    log::debug!("区域 {}: 提取 {} 个方块", region.name, blocks.len());
    (blocks, diags)
}

/// 解码所有区域并拼接；区域之间没有共享状态，可以并行
pub fn composite(
    regions: &[Region<'_>],
    options: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Composite {
    let results: Vec<(Vec<Block>, Diagnostics)> = if options.parallel_regions && regions.len() > 1 {
        regions.par_iter().map(|r| decode_region(r, options)).collect()
    } else {
        regions.iter().map(|r| decode_region(r, options)).collect()
    };

    let mut blocks = Vec::new();
    for (region_blocks, region_diags) in results {
        blocks.extend(region_blocks);
        diags.extend(region_diags);
    }
    if blocks.is_empty() {
        Composite::Empty
    } else {
        Composite::Blocks(blocks)
    }
}
