//! MCEdit 经典 `.schematic` 格式
//!
//! 字段：`Width`/`Height`/`Length`（Short），`Blocks`（每格一个字节的数字 ID），
//! 可选 `Data`（数据值）、`AddBlocks`（ID 高 4 位）以及名称映射表。

use super::{require, CellSink};
use crate::bitpack::RegionSize;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::legacy;
use crate::model::{Block, Format};
use crate::options::DecodeOptions;
use crate::tree;
use fastnbt::Value;
use std::collections::HashMap;

/// 文件自带的 ID → 名称映射
#[derive(Debug, Default)]
pub struct NameMapping {
    /// `BlockStates`：ID → 数据值 → 名称
    states: HashMap<u16, HashMap<u8, String>>,
    /// `SchematicaMapping` / `BlockIDs`：ID → 名称
    names: HashMap<u16, String>,
}

impl NameMapping {
    pub fn from_tree(tree: &Value) -> Self {
        let mut mapping = Self::default();

        // { "<name>": { id: <int>, states: { "<meta>": ... } } }
        if let Some(states) = tree::get_compound(tree, "BlockStates") {
            for (name, info) in states {
                let Some(id) = tree::get_int(info, "id").and_then(|v| u16::try_from(v).ok()) else {
                    continue;
                };
                let metas = mapping.states.entry(id).or_default();
                for meta in tree::get_compound(info, "states").into_iter().flat_map(|m| m.keys()) {
                    if let Ok(meta) = meta.parse::<u8>() {
                        metas.insert(meta, name.clone());
                    }
                }
            }
        }

        // Schematica: { "<name>": <short id> }
        if let Some(table) = tree::get_compound(tree, "SchematicaMapping") {
            for (name, id) in table {
                if let Some(id) = tree::as_int(id).and_then(|v| u16::try_from(v).ok()) {
                    mapping.names.insert(id, name.clone());
                }
            }
        }

        // MCEdit: { "<id>": "<name>" }
        if let Some(table) = tree::get_compound(tree, "BlockIDs") {
            for (id, name) in table {
                if let (Ok(id), Value::String(name)) = (id.parse::<u16>(), name) {
                    mapping.names.entry(id).or_insert_with(|| name.clone());
                }
            }
        }
        mapping
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.names.is_empty()
    }

    /// 查找顺序：`BlockStates`，名称表，旧版方块表；第二个值表示是否为未知 ID
    pub fn resolve(&self, id: u16, aux: u8) -> (String, bool) {
        if let Some(metas) = self.states.get(&id) {
            return match metas.get(&aux) {
                Some(name) => (name.clone(), false),
                None => (legacy::placeholder(id, aux), true),
            };
        }
        if let Some(name) = self.names.get(&id) {
            return (name.clone(), false);
        }
        match legacy::lookup(id, aux) {
            Some(name) => (name, false),
            None => (legacy::placeholder(id, aux), true),
        }
    }
}

/// `AddBlocks` 每字节存两格的高 4 位，偶数格在高半字节
fn add_bits(add: &[i8], index: usize) -> u16 {
    let Some(&byte) = add.get(index >> 1) else {
        return 0;
    };
    let byte = byte as u8;
    let nibble = if index & 1 == 0 { byte >> 4 } else { byte & 0x0F };
    (nibble as u16) << 8
}

/// 提取经典格式的所有非空气方块
pub fn extract(
    tree: &Value,
    options: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<Vec<Block>> {
    let width = tree::get_int(tree, "Width");
    let height = tree::get_int(tree, "Height");
    let length = tree::get_int(tree, "Length");
    let ids = tree::get_bytes(tree, "Blocks");
    require(
        Format::Classic,
        &[
            ("Width", width.is_some()),
            ("Height", height.is_some()),
            ("Length", length.is_some()),
            ("Blocks", ids.is_some()),
        ],
    )?;
    let (Some(width), Some(height), Some(length), Some(ids)) = (width, height, length, ids) else {
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
    if ids.len() != volume {
        diags.degraded(
            "Blocks",
            format!("长度 {} 与尺寸不符（应为 {}），超出部分跳过", ids.len(), volume),
        );
    }

    let data = tree::get_bytes(tree, "Data").unwrap_or_else(|| {
        log::debug!("缺少 Data，数据值按 0 处理");
        &[]
    });
    if !data.is_empty() && data.len() < ids.len().min(volume) {
        diags.degraded("Data", format!("长度 {} 小于方块数，缺失部分按 0 处理", data.len()));
    }
    let add = tree::get_bytes(tree, "AddBlocks").unwrap_or(&[]);

    let mapping = NameMapping::from_tree(tree);
    if !mapping.is_empty() {
        log::debug!("使用文件自带的方块名称映射");
    }

    let mut names: HashMap<(u16, u8), String> = HashMap::new();
    let mut sink = CellSink::new([0, 0, 0], options.max_blocks_per_region);
    for (index, &raw) in ids.iter().enumerate().take(volume) {
        let id = raw as u8 as u16 | add_bits(add, index);
        if id == 0 {
            continue;
        }
        let aux = data.get(index).map_or(0, |&d| d as u8 & 0x0F);
        let name = names.entry((id, aux)).or_insert_with(|| {
            let (name, unknown) = mapping.resolve(id, aux);
            if unknown {
                diags.unknown(&name);
            }
            name
        });
        if !sink.push(name, size.position(index)) {
            break;
        }
    }
    Ok(sink.finish(Format::Classic.as_str(), diags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use fastnbt::ByteArray;

    fn compound(entries: Vec<(&str, Value)>) -> Value {
        Value::Compound(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn schematic(
        w: i16,
        h: i16,
        l: i16,
        blocks: Vec<i8>,
        data: Option<Vec<i8>>,
    ) -> Vec<(&'static str, Value)> {
        let mut entries = vec![
            ("Width", Value::Short(w)),
            ("Height", Value::Short(h)),
            ("Length", Value::Short(l)),
            ("Blocks", Value::ByteArray(ByteArray::new(blocks))),
        ];
        if let Some(data) = data {
            entries.push(("Data", Value::ByteArray(ByteArray::new(data))));
        }
        entries
    }

    fn decode(entries: Vec<(&str, Value)>) -> Vec<Block> {
        extract(&compound(entries), &DecodeOptions::default(), &mut Diagnostics::new()).unwrap()
    }

    fn ids(blocks: &[Block]) -> Vec<(&str, i32, i32, i32)> {
        blocks.iter().map(|b| (b.id.as_str(), b.x, b.y, b.z)).collect()
    }

    #[test]
    fn decodes_with_data_variants() {
        let tree = compound(schematic(2, 2, 1, vec![35, 5, 0, 17], Some(vec![14, 2, 0, 1 | 4])));
        let mut diags = Diagnostics::new();
        let blocks = extract(&tree, &DecodeOptions::default(), &mut diags).unwrap();
        assert_eq!(
            ids(&blocks),
            vec![
                ("minecraft:red_wool", 0, 0, 0),
                ("minecraft:birch_planks", 1, 0, 0),
                ("minecraft:spruce_log", 1, 1, 0),
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn length_mismatch_is_degraded_not_fatal() {
        let tree = compound(schematic(2, 2, 2, vec![1, 1, 1], None));
        let mut diags = Diagnostics::new();
        let blocks = extract(&tree, &DecodeOptions::default(), &mut diags).unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(matches!(
            &diags.entries()[0],
            Diagnostic::DegradedField { field, .. } if field == "Blocks"
        ));

        let tree = compound(schematic(1, 1, 1, vec![1, 1, 1], None));
        let blocks = extract(&tree, &DecodeOptions::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn unknown_ids_become_placeholders() {
        let tree = compound(schematic(2, 1, 1, vec![-3, -3], Some(vec![7, 7])));
        let mut diags = Diagnostics::new();
        let blocks = extract(&tree, &DecodeOptions::default(), &mut diags).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, "minecraft:unknown_253_7");
        assert_eq!(
            diags.entries(),
            &[Diagnostic::UnknownIdentifier {
                id: "minecraft:unknown_253_7".to_string()
            }]
        );
    }

    #[test]
    fn add_blocks_extend_ids() {
        assert_eq!(add_bits(&[0x12], 0), 0x100);
        assert_eq!(add_bits(&[0x12], 1), 0x200);
        assert_eq!(add_bits(&[], 1), 0);

        let mut entries = schematic(1, 1, 1, vec![1], None);
        entries.push(("AddBlocks", Value::ByteArray(ByteArray::new(vec![0x10]))));
        let blocks = decode(entries);
        assert_eq!(blocks[0].id, "minecraft:unknown_257_0");
    }

    #[test]
    fn block_states_mapping_takes_precedence() {
        let states = compound(vec![(
            "minecraft:polished_blackstone",
            compound(vec![
                ("id", Value::Int(1)),
                ("states", compound(vec![("0", Value::Byte(0))])),
            ]),
        )]);
        let mut entries = schematic(2, 1, 1, vec![1, 1], Some(vec![0, 3]));
        entries.push(("BlockStates", states));
        let blocks = decode(entries);
        assert_eq!(blocks[0].id, "minecraft:polished_blackstone");
        assert_eq!(blocks[1].id, "minecraft:unknown_1_3");
    }

    #[test]
    fn schematica_mapping_overrides_legacy_table() {
        let mut entries = schematic(1, 1, 1, vec![20], None);
        entries.push((
            "SchematicaMapping",
            compound(vec![("minecraft:tinted_glass", Value::Short(20))]),
        ));
        let blocks = decode(entries);
        assert_eq!(blocks[0].id, "minecraft:tinted_glass");
    }

    #[test]
    fn overflowing_dimensions_are_degraded() {
        let tree = compound(vec![
            ("Width", Value::Int(i32::MAX)),
            ("Height", Value::Int(i32::MAX)),
            ("Length", Value::Int(i32::MAX)),
            ("Blocks", Value::ByteArray(ByteArray::new(vec![1, 0]))),
        ]);
        let mut diags = Diagnostics::new();
        let blocks = extract(&tree, &DecodeOptions::default(), &mut diags).unwrap();
        assert!(blocks.is_empty());
        assert!(matches!(
            &diags.entries()[0],
            Diagnostic::DegradedField { field, .. } if field == "Width/Height/Length"
        ));
    }

    #[test]
    fn emission_cap_applies() {
        let tree = compound(schematic(4, 1, 1, vec![1, 1, 1, 1], None));
        let options = DecodeOptions {
            max_blocks_per_region: 2,
            ..DecodeOptions::default()
        };
        let mut diags = Diagnostics::new();
        assert_eq!(extract(&tree, &options, &mut diags).unwrap().len(), 2);
        assert!(matches!(diags.entries()[0], Diagnostic::EmissionCapReached { cap: 2, .. }));
    }
}
