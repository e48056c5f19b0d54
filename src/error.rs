//! 解码错误类型

use crate::model::Format;
use thiserror::Error;

/// 解码核心的结果类型
pub type Result<T> = std::result::Result<T, DecodeError>;

/// 只有结构性缺失会作为硬错误返回，其余问题记录在 [`crate::Diagnostics`] 中
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// 格式的必需顶层字段完全缺失
    #[error("{format} 文件缺少必需字段: {}", missing.join(", "))]
    Structural {
        /// 按扩展名判定的格式
        format: Format,
        /// 缺失的字段名
        missing: Vec<&'static str>,
    },
    /// 不支持的文件扩展名
    #[error("不支持的原理图格式: {0:?}")]
    UnsupportedExtension(String),
}
