//! 解码诊断收集器
//!
//! 每次解码显式传入一个 [`Diagnostics`]，降级字段与未知标识都记录在这里，
//! 调用方无需解析日志文本即可知道哪些内容被替换或跳过。

use serde::Serialize;

/// 单条诊断
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 可选或部分损坏的字段，已用安全默认值替代
    DegradedField { field: String, detail: String },
    /// 没有映射的方块标识，已替换为占位标识
    UnknownIdentifier { id: String },
    /// 区域缺少必需数据，整个区域被跳过
    RegionSkipped {
        region: String,
        missing: Vec<&'static str>,
    },
    /// 区域达到方块输出上限，提前停止
    EmissionCapReached { region: String, cap: usize },
    /// 所有尺寸策略均失败，使用默认尺寸
    DimensionsDefaulted,
    /// 解码结束但没有任何非空气方块
    NoBlocks,
}

/// 诊断累加器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录降级字段
    pub fn degraded(&mut self, field: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::DegradedField {
            field: field.into(),
            detail: detail.into(),
        });
    }

    /// 记录未知标识（同一标识只记一次）
    pub fn unknown(&mut self, id: &str) {
        let seen = self
            .entries
            .iter()
            .any(|d| matches!(d, Diagnostic::UnknownIdentifier { id: known } if known == id));
        if !seen {
            self.push(Diagnostic::UnknownIdentifier { id: id.to_string() });
        }
    }

    /// 记录其他诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::RegionSkipped { region, missing } => {
                log::warn!("跳过区域 {}: 缺少 {}", region, missing.join(", "))
            }
            Diagnostic::EmissionCapReached { region, cap } => {
                log::info!("区域 {} 达到方块上限 ({})，停止提取", region, cap)
            }
            Diagnostic::DimensionsDefaulted => log::warn!("无法确定尺寸，使用默认值"),
            Diagnostic::NoBlocks => log::warn!("没有提取到任何方块"),
            Diagnostic::DegradedField { field, detail } => {
                log::warn!("字段降级 {}: {}", field, detail)
            }
            Diagnostic::UnknownIdentifier { id } => log::debug!("未知方块标识: {}", id),
        }
        self.entries.push(diagnostic);
    }

    /// 合并另一个收集器（例如并行解码的区域）
    pub fn extend(&mut self, other: Diagnostics) {
        for diagnostic in other.entries {
            match diagnostic {
                Diagnostic::UnknownIdentifier { id } => self.unknown(&id),
                d => self.entries.push(d),
            }
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}
