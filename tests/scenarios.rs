//! 端到端场景：直接构造 NBT 树并解码

use fastnbt::{ByteArray, LongArray, Value};
use flate2::write::GzEncoder;
use flate2::Compression;
use mcschem::{
    decode_file, decode_file_with, read_tree, Block, CanonicalSchematic, DecodeError,
    DecodeOptions, Diagnostic, Diagnostics, Dimensions, Format,
};
use std::io::Write;

fn compound(entries: Vec<(&str, Value)>) -> Value {
    Value::Compound(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn xyz(x: i32, y: i32, z: i32) -> Value {
    compound(vec![("x", Value::Int(x)), ("y", Value::Int(y)), ("z", Value::Int(z))])
}

fn block(id: &str, x: i32, y: i32, z: i32) -> Block {
    Block {
        id: id.to_string(),
        x,
        y,
        z,
    }
}

fn classic_two_cells() -> Value {
    compound(vec![
        ("Width", Value::Short(2)),
        ("Height", Value::Short(1)),
        ("Length", Value::Short(1)),
        ("Blocks", Value::ByteArray(ByteArray::new(vec![1, 0]))),
        ("Data", Value::ByteArray(ByteArray::new(vec![0, 0]))),
    ])
}

#[test]
fn classic_stone_and_air() {
    let out = decode_file(&classic_two_cells(), ".schematic").unwrap();
    assert_eq!(
        out,
        CanonicalSchematic {
            format: Format::Classic,
            dimensions: Dimensions::new(2, 1, 1),
            blocks: vec![block("minecraft:stone", 0, 0, 0)],
        }
    );
}

#[test]
fn worldedit_palette_and_varints() {
    let tree = compound(vec![
        ("Width", Value::Short(2)),
        ("Height", Value::Short(1)),
        ("Length", Value::Short(1)),
        (
            "Palette",
            compound(vec![("minecraft:air", Value::Int(0)), ("minecraft:stone", Value::Int(1))]),
        ),
        ("BlockData", Value::ByteArray(ByteArray::new(vec![1, 0]))),
    ]);
    let out = decode_file(&tree, ".schem").unwrap();
    assert_eq!(out.format, Format::WorldEdit);
    assert_eq!(out.dimensions, Dimensions::new(2, 1, 1));
    assert_eq!(out.blocks, vec![block("minecraft:stone", 0, 0, 0)]);
}

#[test]
fn litematic_single_region_with_offset() {
    let region = compound(vec![
        ("Size", xyz(1, 1, 2)),
        ("Position", xyz(10, 0, 0)),
        (
            "BlockStatePalette",
            Value::List(vec![
                compound(vec![("Name", Value::String("minecraft:air".to_string()))]),
                compound(vec![("Name", Value::String("minecraft:glass".to_string()))]),
            ]),
        ),
        // 1 位宽，索引 [0, 1]
        ("BlockStates", Value::LongArray(LongArray::new(vec![0b10]))),
    ]);
    let tree = compound(vec![("Regions", compound(vec![("main", region)]))]);
    let out = decode_file(&tree, ".litematic").unwrap();
    assert_eq!(out.dimensions, Dimensions::new(1, 1, 2));
    assert_eq!(out.blocks, vec![block("minecraft:glass", 10, 0, 1)]);
}

#[test]
fn litematic_regions_without_palette_still_decode() {
    let tree = compound(vec![(
        "Regions",
        compound(vec![
            ("a", compound(vec![("Size", xyz(3, 2, 5)), ("Position", xyz(0, 0, 0))])),
            ("b", compound(vec![("Size", xyz(9, 9, 9))])),
        ]),
    )]);
    let mut diags = Diagnostics::new();
    let out = decode_file_with(&tree, "litematic", &DecodeOptions::default(), &mut diags).unwrap();
    assert!(out.blocks.is_empty());
    assert_eq!(out.dimensions, Dimensions::new(3, 2, 5));
    let skipped = diags
        .iter()
        .filter(|d| matches!(d, Diagnostic::RegionSkipped { .. }))
        .count();
    assert_eq!(skipped, 2);
    assert!(diags.iter().any(|d| *d == Diagnostic::NoBlocks));
}

#[test]
fn out_of_range_index_is_excluded() {
    let tree = compound(vec![
        ("Width", Value::Short(3)),
        ("Height", Value::Short(1)),
        ("Length", Value::Short(1)),
        (
            "Palette",
            compound(vec![("minecraft:air", Value::Int(0)), ("minecraft:stone", Value::Int(1))]),
        ),
        ("BlockData", Value::ByteArray(ByteArray::new(vec![1, 5, 1]))),
    ]);
    let mut diags = Diagnostics::new();
    let out = decode_file_with(&tree, "schem", &DecodeOptions::default(), &mut diags).unwrap();
    assert_eq!(
        out.blocks,
        vec![block("minecraft:stone", 0, 0, 0), block("minecraft:stone", 2, 0, 0)]
    );
    assert!(diags
        .iter()
        .any(|d| matches!(d, Diagnostic::DegradedField { field, .. } if field == "BlockData")));
}

#[test]
fn empty_tree_is_structural_for_every_format() {
    let tree = compound(vec![]);
    for ext in ["schematic", "schem", "litematic", "nbt"] {
        assert!(matches!(decode_file(&tree, ext), Err(DecodeError::Structural { .. })));
    }
}

#[test]
fn dimensions_fall_back_when_nothing_matches() {
    let tree = compound(vec![(
        "Regions",
        compound(vec![("a", compound(vec![("Size", xyz(0, 0, 0))]))]),
    )]);
    let options = DecodeOptions {
        default_dimensions: Dimensions::new(7, 7, 7),
        ..DecodeOptions::default()
    };
    let mut diags = Diagnostics::new();
    let out = decode_file_with(&tree, "litematic", &options, &mut diags).unwrap();
    assert_eq!(out.dimensions, Dimensions::new(7, 7, 7));
    assert!(diags.iter().any(|d| *d == Diagnostic::DimensionsDefaulted));
}

#[test]
fn gzip_file_round_trip() {
    let raw = fastnbt::to_bytes(&classic_two_cells()).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    let packed = encoder.finish().unwrap();

    let name = format!("mcschem_scenario_{}.schematic", std::process::id());
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, packed).unwrap();
    let (tree, ext) = read_tree(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(ext, "schematic");
    let out = decode_file(&tree, &ext).unwrap();
    assert_eq!(out.blocks, vec![block("minecraft:stone", 0, 0, 0)]);
}

#[test]
fn extreme_sizes_decode_without_panicking() {
    let huge = compound(vec![
        ("Width", Value::Int(i32::MAX)),
        ("Height", Value::Int(i32::MAX)),
        ("Length", Value::Int(i32::MAX)),
        ("Blocks", Value::ByteArray(ByteArray::new(vec![1, 0]))),
    ]);
    let out = decode_file(&huge, "schematic").unwrap();
    assert!(out.blocks.is_empty());

    for size in [
        xyz(i32::MAX, i32::MAX, i32::MAX),
        Value::LongArray(LongArray::new(vec![i64::MIN, 1, 1])),
    ] {
        let region = compound(vec![
            ("Size", size),
            ("Position", xyz(0, 0, 0)),
            (
                "BlockStatePalette",
                Value::List(vec![compound(vec![(
                    "Name",
                    Value::String("minecraft:stone".to_string()),
                )])]),
            ),
            ("BlockStates", Value::LongArray(LongArray::new(vec![0]))),
        ]);
        let tree = compound(vec![("Regions", compound(vec![("main", region)]))]);
        let mut diags = Diagnostics::new();
        let out = decode_file_with(&tree, "litematic", &DecodeOptions::default(), &mut diags)
            .unwrap();
        assert!(out.blocks.is_empty());
        assert!(diags
            .iter()
            .any(|d| matches!(d, Diagnostic::RegionSkipped { .. })));
    }
}
