//! 统一输出模型：尺寸、方块与规范化原理图

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 原理图来源格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// MCEdit 经典 `.schematic`
    #[serde(rename = "schematic")]
    Classic,
    /// Litematica `.litematic` / `.nbt`
    #[serde(rename = "litematic")]
    Litematic,
    /// WorldEdit (Sponge) `.schem`
    #[serde(rename = "schem")]
    WorldEdit,
}

impl Format {
    /// 按文件扩展名选择格式（忽略大小写，可带前导点）
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "schematic" => Some(Format::Classic),
            "litematic" | "nbt" => Some(Format::Litematic),
            "schem" => Some(Format::WorldEdit),
            _ => None,
        }
    }

    /// 输出中使用的格式名
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Classic => "schematic",
            Format::Litematic => "litematic",
            Format::WorldEdit => "schem",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 所有支持的扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["schematic", "litematic", "nbt", "schem"];

/// 整体尺寸，三个分量均为正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    /// 三个分量都为正时才构造
    pub fn positive(width: i64, height: i64, length: i64) -> Option<Self> {
        let axis = |v: i64| u32::try_from(v).ok().filter(|v| *v > 0);
        Some(Self::new(axis(width)?, axis(height)?, axis(length)?))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.length)
    }
}

impl FromStr for Dimensions {
    type Err = String;

    /// 解析 `WxHxL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<i64> = s
            .split(['x', 'X'])
            .map(|p| p.trim().parse::<i64>().map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [w, h, l] => {
                Dimensions::positive(*w, *h, *l).ok_or_else(|| format!("尺寸必须为正: {}", s))
            }
            _ => Err(format!("无效的尺寸: {}", s)),
        }
    }
}

/// 全局坐标系中的单个非空气方块
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// 规范化原理图：解码核心的唯一输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSchematic {
    pub format: Format,
    pub dimensions: Dimensions,
    pub blocks: Vec<Block>,
}
