//! 原理图文件读取：可选的 gzip 解压 + NBT 解析

use anyhow::{Context, Result};
use fastnbt::Value;
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;

/// gzip 文件头
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// 是否为 gzip 压缩数据
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// 有 gzip 头时解压，否则原样返回
pub fn decompress(data: Vec<u8>) -> Result<Vec<u8>> {
    if !is_gzip(&data) {
        return Ok(data);
    }
    let mut decoder = GzDecoder::new(data.as_slice());
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).context("gzip 解压失败")?;
    Ok(decompressed)
}

/// 把（可能压缩的）字节解析为 NBT 树
pub fn parse_bytes(data: Vec<u8>) -> Result<Value> {
    let raw = decompress(data)?;
    let value: Value = fastnbt::from_bytes(&raw).context("NBT 解析失败")?;
    Ok(value)
}

/// 文件扩展名（小写，不含点）
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// 读取原理图文件，返回 NBT 树与扩展名
pub fn read_tree(path: &Path) -> Result<(Value, String)> {
    let data = fs::read(path).with_context(|| format!("无法读取 {:?}", path))?;
    let extension = extension_of(path).unwrap_or_default();
    let value = parse_bytes(data).with_context(|| format!("无法解析 {:?}", path))?;
    log::debug!("已读取 {:?} ({})", path, extension);
    Ok((value, extension))
}
