//! 尺寸解析：按固定优先级依次尝试已知字段布局

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{Dimensions, Format};
use crate::options::DEFAULT_DIMENSIONS;
use crate::region::sorted_regions;
use crate::tree;
use fastnbt::Value;
use once_cell::sync::Lazy;
use regex::Regex;

/// 单个尺寸策略
pub struct Strategy {
    pub name: &'static str,
    applies: fn(Format) -> bool,
    detect: fn(&Value, Format) -> Option<Dimensions>,
}

impl Strategy {
    pub fn applies(&self, format: Format) -> bool {
        (self.applies)(format)
    }

    pub fn detect(&self, tree: &Value, format: Format) -> Option<Dimensions> {
        (self.detect)(tree, format)
    }
}

/// 策略表，按优先级排列
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "explicit-size",
        applies: |_| true,
        detect: explicit_size,
    },
    Strategy {
        name: "first-region",
        applies: |format| format == Format::Litematic,
        detect: first_region,
    },
    Strategy {
        name: "top-level",
        applies: |_| true,
        detect: top_level,
    },
    Strategy {
        name: "total-size",
        applies: |_| true,
        detect: total_size,
    },
    Strategy {
        name: "name-pattern",
        applies: |_| true,
        detect: name_pattern,
    },
];

fn from_triple(t: [i64; 3]) -> Option<Dimensions> {
    Dimensions::positive(t[0], t[1], t[2])
}

fn explicit_size(tree: &Value, format: Format) -> Option<Dimensions> {
    let paths: &[&str] = match format {
        Format::Litematic => &["Metadata.EnclosingSize"],
        Format::Classic | Format::WorldEdit => &["Size"],
    };
    paths
        .iter()
        .find_map(|path| tree::get_triple(tree, path).and_then(from_triple))
}

fn first_region(tree: &Value, _format: Format) -> Option<Dimensions> {
    let (_, region) = sorted_regions(tree)?.into_iter().next()?;
    // Litematica 用符号表示区域延伸方向
    let [x, y, z] = tree::get_triple(region, "Size")?;
    Dimensions::positive(x.checked_abs()?, y.checked_abs()?, z.checked_abs()?)
}

fn top_level(tree: &Value, _format: Format) -> Option<Dimensions> {
    ["", "Schematic."].iter().find_map(|prefix| {
        Dimensions::positive(
            tree::get_int(tree, &format!("{}Width", prefix))?,
            tree::get_int(tree, &format!("{}Height", prefix))?,
            tree::get_int(tree, &format!("{}Length", prefix))?,
        )
    })
}

fn total_size(tree: &Value, _format: Format) -> Option<Dimensions> {
    tree::get_triple(tree, "Metadata.TotalSize").and_then(from_triple)
}

static SIZE_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[xX*×]\s*(\d+)\s*[xX*×]\s*(\d+)").ok());

/// 从名称中解析 `NxNxN`
pub fn parse_name_dimensions(name: &str) -> Option<Dimensions> {
    SIZE_PATTERN.as_ref()?.captures_iter(name).find_map(|caps| {
        let axis = |i: usize| caps.get(i)?.as_str().parse::<i64>().ok();
        Dimensions::positive(axis(1)?, axis(2)?, axis(3)?)
    })
}

fn name_pattern(tree: &Value, _format: Format) -> Option<Dimensions> {
    ["Metadata.Name", "Name"]
        .iter()
        .filter_map(|path| tree::get_str(tree, path))
        .find_map(parse_name_dimensions)
}

/// 解析结果与胜出的策略名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub dimensions: Dimensions,
    /// `None` 表示使用了默认值
    pub strategy: Option<&'static str>,
}

/// 全函数：总能返回三个正整数
pub fn resolve_dimensions(tree: &Value, format: Format) -> Dimensions {
    resolve_dimensions_with(tree, format, DEFAULT_DIMENSIONS, &mut Diagnostics::new()).dimensions
}

/// 按策略表解析尺寸，全部失败时返回 `fallback` 并记录诊断
pub fn resolve_dimensions_with(
    tree: &Value,
    format: Format,
    fallback: Dimensions,
    diags: &mut Diagnostics,
) -> Resolved {
    for strategy in STRATEGIES.iter().filter(|s| s.applies(format)) {
        if let Some(dimensions) = strategy.detect(tree, format) {
            log::debug!("尺寸 {} (策略 {})", dimensions, strategy.name);
            return Resolved {
                dimensions,
                strategy: Some(strategy.name),
            };
        }
    }
    diags.push(Diagnostic::DimensionsDefaulted);
    Resolved {
        dimensions: fallback,
        strategy: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastnbt::{IntArray, LongArray};
    use std::collections::HashMap;

    fn compound(entries: Vec<(&str, Value)>) -> Value {
        Value::Compound(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn xyz(x: i32, y: i32, z: i32) -> Value {
        compound(vec![("x", Value::Int(x)), ("y", Value::Int(y)), ("z", Value::Int(z))])
    }

    #[test]
    fn empty_compound_falls_back_to_default() {
        let tree = Value::Compound(HashMap::new());
        for format in [Format::Classic, Format::Litematic, Format::WorldEdit] {
            assert_eq!(resolve_dimensions(&tree, format), DEFAULT_DIMENSIONS);
        }
        let mut diags = Diagnostics::new();
        let resolved =
            resolve_dimensions_with(&tree, Format::Litematic, Dimensions::new(1, 2, 3), &mut diags);
        assert_eq!(resolved.dimensions, Dimensions::new(1, 2, 3));
        assert_eq!(resolved.strategy, None);
        assert_eq!(diags.entries(), &[Diagnostic::DimensionsDefaulted]);
    }

    #[test]
    fn non_compound_root_is_total() {
        assert_eq!(resolve_dimensions(&Value::Int(7), Format::Classic), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn enclosing_size_wins_over_regions() {
        let tree = compound(vec![
            ("Metadata", compound(vec![("EnclosingSize", xyz(5, 6, 7))])),
            (
                "Regions",
                compound(vec![("a", compound(vec![("Size", xyz(1, 1, 1))]))]),
            ),
        ]);
        let mut diags = Diagnostics::new();
        let r = resolve_dimensions_with(&tree, Format::Litematic, DEFAULT_DIMENSIONS, &mut diags);
        assert_eq!(r.dimensions, Dimensions::new(5, 6, 7));
        assert_eq!(r.strategy, Some("explicit-size"));
    }

    #[test]
    fn first_region_uses_absolute_size() {
        let tree = compound(vec![(
            "Regions",
            compound(vec![
                ("b", compound(vec![("Size", xyz(9, 9, 9))])),
                ("a", compound(vec![("Size", xyz(-3, 4, -2))])),
            ]),
        )]);
        assert_eq!(resolve_dimensions(&tree, Format::Litematic), Dimensions::new(3, 4, 2));
    }

    #[test]
    fn extreme_region_size_falls_through() {
        let tree = compound(vec![
            (
                "Regions",
                compound(vec![(
                    "a",
                    compound(vec![(
                        "Size",
                        Value::LongArray(LongArray::new(vec![i64::MIN, 1, 1])),
                    )]),
                )]),
            ),
            ("Metadata", compound(vec![("Name", Value::String("2x3x4".to_string()))])),
        ]);
        assert_eq!(resolve_dimensions(&tree, Format::Litematic), Dimensions::new(2, 3, 4));
    }

    #[test]
    fn region_strategy_only_for_litematic() {
        let tree = compound(vec![(
            "Regions",
            compound(vec![("a", compound(vec![("Size", xyz(3, 4, 2))]))]),
        )]);
        assert_eq!(resolve_dimensions(&tree, Format::WorldEdit), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn top_level_scalars_and_sponge_v3() {
        let classic = compound(vec![
            ("Width", Value::Short(2)),
            ("Height", Value::Short(3)),
            ("Length", Value::Short(4)),
        ]);
        assert_eq!(resolve_dimensions(&classic, Format::Classic), Dimensions::new(2, 3, 4));
        let v3 = compound(vec![("Schematic", classic)]);
        assert_eq!(resolve_dimensions(&v3, Format::WorldEdit), Dimensions::new(2, 3, 4));
    }

    #[test]
    fn total_size_accepts_arrays() {
        let tree = compound(vec![(
            "Metadata",
            compound(vec![("TotalSize", Value::IntArray(IntArray::new(vec![8, 1, 8])))]),
        )]);
        assert_eq!(resolve_dimensions(&tree, Format::Litematic), Dimensions::new(8, 1, 8));
    }

    #[test]
    fn zero_sizes_fall_through_to_name() {
        let tree = compound(vec![(
            "Metadata",
            compound(vec![
                ("EnclosingSize", xyz(0, 0, 0)),
                ("Name", Value::String("castle 32 x 20X48 v2".to_string())),
            ]),
        )]);
        assert_eq!(resolve_dimensions(&tree, Format::Litematic), Dimensions::new(32, 20, 48));
    }

    #[test]
    fn name_pattern_parsing() {
        assert_eq!(parse_name_dimensions("farm_16x4x16"), Some(Dimensions::new(16, 4, 16)));
        assert_eq!(parse_name_dimensions("3×3×3 cube"), Some(Dimensions::new(3, 3, 3)));
        assert_eq!(parse_name_dimensions("0x4x4 then 2x2x2"), Some(Dimensions::new(2, 2, 2)));
        assert_eq!(parse_name_dimensions("house"), None);
    }
}
