//! 导出解码结果为 JSON / YAML

use crate::config::{Config, OutputConfig, OutputFormat};
use crate::diagnostics::Diagnostics;
use crate::formats::decode_file_with;
use crate::load::read_tree;
use crate::model::{CanonicalSchematic, Dimensions, Format, SUPPORTED_EXTENSIONS};
use crate::options::DecodeOptions;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 输出文件内容：规范化原理图，可附带诊断
#[derive(Serialize)]
struct Record<'a> {
    #[serde(flatten)]
    schematic: &'a CanonicalSchematic,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a Diagnostics>,
}

/// 读取并解码单个文件；`extension` 覆盖文件自身的扩展名
pub fn decode_path(
    path: &Path,
    extension: Option<&str>,
    options: &DecodeOptions,
) -> Result<(CanonicalSchematic, Diagnostics)> {
    let (tree, file_ext) = read_tree(path)?;
    let extension = extension.unwrap_or(&file_ext);
    let mut diags = Diagnostics::new();
    let schematic = decode_file_with(&tree, extension, options, &mut diags)
        .with_context(|| format!("解码失败: {:?}", path))?;
    Ok((schematic, diags))
}

/// 按输出配置序列化
pub fn render(
    schematic: &CanonicalSchematic,
    diagnostics: &Diagnostics,
    output: &OutputConfig,
) -> Result<String> {
    let record = Record {
        schematic,
        diagnostics: output.include_diagnostics.then_some(diagnostics),
    };
    let text = match (output.format, output.pretty) {
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&record)?,
        (OutputFormat::Json, false) => serde_json::to_string(&record)?,
        (OutputFormat::Yaml, _) => serde_yaml::to_string(&record)?,
    };
    Ok(text)
}

/// `<out_dir>/<stem>.<json|yaml>`
pub fn output_path_for(input: &Path, out_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schematic".to_string());
    out_dir.join(format!("{}.{}", stem, format.extension()))
}

/// 导出单个文件，返回方块数
pub fn export_file(
    input: &Path,
    output: &Path,
    extension: Option<&str>,
    config: &Config,
) -> Result<usize> {
    let (schematic, diags) = decode_path(input, extension, &config.decode.to_options())?;
    let text = render(&schematic, &diags, &config.output)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, text).with_context(|| format!("无法写入 {:?}", output))?;
    Ok(schematic.blocks.len())
}

/// 目录下所有受支持扩展名的文件
pub fn find_schematics(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

/// 批量导出结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub exported: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// 批量导出目录中的所有原理图（并行处理），输出保持原目录结构
pub fn export_dir(input_dir: &Path, output_dir: &Path, config: &Config) -> Result<BatchReport> {
    let files = find_schematics(input_dir);
    fs::create_dir_all(output_dir)?;
    println!("导出 {} 个原理图文件 (并行处理)", files.len());

    let results: Vec<(PathBuf, Result<usize>)> = files
        .par_iter()
        .map(|path| {
            let relative = path
                .parent()
                .and_then(|p| p.strip_prefix(input_dir).ok())
                .unwrap_or_else(|| Path::new(""));
            let target = output_path_for(path, &output_dir.join(relative), config.output.format);
            let result = export_file(path, &target, None, config);
            let name = path.file_name().unwrap_or_default();
            match &result {
                Ok(count) => println!("  完成 {:?} ({} 个方块)", name, count),
                Err(e) => eprintln!("  失败 {:?}: {:#}", name, e),
            }
            (path.clone(), result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(_) => report.exported += 1,
            Err(e) => report.failed.push((path, format!("{:#}", e))),
        }
    }
    println!("导出完成: 成功 {}, 失败 {}", report.exported, report.failed.len());
    Ok(report)
}

/// 方块统计摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub format: Format,
    pub dimensions: Dimensions,
    pub block_count: usize,
    pub distinct: usize,
    /// 数量最多的方块类型，数量相同时按名称排序
    pub top: Vec<(String, usize)>,
}

/// 统计方块分布，保留前 `top` 种
pub fn summarize(schematic: &CanonicalSchematic, top: usize) -> Summary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for block in &schematic.blocks {
        *counts.entry(block.id.as_str()).or_insert(0) += 1;
    }
    let distinct = counts.len();
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    Summary {
        format: schematic.format,
        dimensions: schematic.dimensions,
        block_count: schematic.blocks.len(),
        distinct,
        top: ranked
            .into_iter()
            .take(top)
            .map(|(id, n)| (id.to_string(), n))
            .collect(),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "格式: {}", self.format)?;
        writeln!(f, "尺寸: {}", self.dimensions)?;
        writeln!(f, "方块: {} 个, {} 种", self.block_count, self.distinct)?;
        for (id, n) in &self.top {
            writeln!(f, "  {:>8}  {}", n, id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn schematic(ids: &[&str]) -> CanonicalSchematic {
        CanonicalSchematic {
            format: Format::WorldEdit,
            dimensions: Dimensions::new(4, 1, 1),
            blocks: ids
                .iter()
                .enumerate()
                .map(|(i, id)| Block {
                    id: id.to_string(),
                    x: i as i32,
                    y: 0,
                    z: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn summary_ranks_by_count_then_name() {
        let s = summarize(
            &schematic(&[
                "minecraft:dirt",
                "minecraft:stone",
                "minecraft:stone",
                "minecraft:air_x",
            ]),
            2,
        );
        assert_eq!(s.block_count, 4);
        assert_eq!(s.distinct, 3);
        assert_eq!(
            s.top,
            vec![("minecraft:stone".to_string(), 2), ("minecraft:air_x".to_string(), 1)]
        );
    }

    #[test]
    fn render_matches_canonical_shape() {
        let s = schematic(&["minecraft:stone"]);
        let mut diags = Diagnostics::new();
        diags.degraded("Data", "short");
        let output = OutputConfig {
            pretty: false,
            ..OutputConfig::default()
        };
        let text = render(&s, &diags, &output).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "format": "schem",
                "dimensions": {"width": 4, "height": 1, "length": 1},
                "blocks": [{"id": "minecraft:stone", "x": 0, "y": 0, "z": 0}]
            })
        );

        let output = OutputConfig {
            include_diagnostics: true,
            format: OutputFormat::Yaml,
            ..OutputConfig::default()
        };
        let yaml = render(&s, &diags, &output).unwrap();
        assert!(yaml.contains("kind: degraded_field"));
        assert!(yaml.contains("format: schem"));
    }

    #[test]
    fn output_path_uses_stem() {
        assert_eq!(
            output_path_for(Path::new("in/house.litematic"), Path::new("out"), OutputFormat::Yaml),
            PathBuf::from("out/house.yaml")
        );
    }
}
