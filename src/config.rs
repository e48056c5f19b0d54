//! 配置文件加载与管理

use crate::bitpack::Packing;
use crate::model::Dimensions;
use crate::options::{DecodeOptions, DEFAULT_DIMENSIONS, DEFAULT_MAX_BLOCKS};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 当前目录下的配置文件名
pub const LOCAL_CONFIG: &str = "mcschem.toml";

/// 主配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 解码配置
    pub decode: DecodeConfig,
    /// 输出配置
    pub output: OutputConfig,
}

/// 解码配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// 每个区域最多输出的方块数
    pub max_blocks_per_region: usize,
    /// 位打包约定：auto / spanning / aligned
    pub packing: Packing,
    /// 多区域并行解码
    pub parallel_regions: bool,
    /// 无法确定尺寸时的默认值 [宽, 高, 长]
    pub default_dimensions: [u32; 3],
}

/// 输出文件格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// 输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON 缩进输出
    pub pretty: bool,
    /// 输出格式
    pub format: OutputFormat,
    /// 在输出中附带诊断
    pub include_diagnostics: bool,
}

// ============== 默认值 ==============

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_blocks_per_region: DEFAULT_MAX_BLOCKS,
            packing: Packing::Auto,
            parallel_regions: true,
            default_dimensions: [
                DEFAULT_DIMENSIONS.width,
                DEFAULT_DIMENSIONS.height,
                DEFAULT_DIMENSIONS.length,
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            format: OutputFormat::Json,
            include_diagnostics: false,
        }
    }
}

// ============== 转换 ==============

impl DecodeConfig {
    /// 转换为库使用的解码参数；非正的默认尺寸退回内置值
    pub fn to_options(&self) -> DecodeOptions {
        let [w, h, l] = self.default_dimensions;
        let default_dimensions =
            Dimensions::positive(w as i64, h as i64, l as i64).unwrap_or_else(|| {
                log::warn!("default_dimensions 必须为正，使用 {}", DEFAULT_DIMENSIONS);
                DEFAULT_DIMENSIONS
            });
        DecodeOptions {
            max_blocks_per_region: self.max_blocks_per_region,
            packing: self.packing,
            parallel_regions: self.parallel_regions,
            default_dimensions,
        }
    }
}

// ============== 配置加载 ==============

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mcschem").join("config.toml"))
    }

    /// 按优先级加载配置：
    /// 1. 当前目录的 mcschem.toml
    /// 2. 用户配置目录的 config.toml
    /// 3. 默认配置
    pub fn load() -> Self {
        let local_config = Path::new(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(local_config) {
                Ok(config) => {
                    log::info!("已加载配置: {}", LOCAL_CONFIG);
                    return config;
                }
                Err(e) => log::warn!("无法加载配置 {}: {}", LOCAL_CONFIG, e),
            }
        }

        if let Some(user_config) = Self::default_config_path() {
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("已加载配置: {}", user_config.display());
                        return config;
                    }
                    Err(e) => log::warn!("无法加载配置 {}: {}", user_config.display(), e),
                }
            }
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_default_loads_back() {
        let name = format!("mcschem_config_{}.toml", std::process::id());
        let path = std::env::temp_dir().join(name);
        Config::default().save_to_file(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(text.contains("[decode]"));
        assert!(text.contains("packing = \"auto\""));
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let text = concat!(
            "[decode]\nmax_blocks_per_region = 10\npacking = \"aligned\"\n\n",
            "[output]\nformat = \"yaml\"\n",
        );
        let parsed: Config = toml::from_str(text).unwrap();
        assert_eq!(parsed.decode.max_blocks_per_region, 10);
        assert_eq!(parsed.decode.packing, Packing::Aligned);
        assert!(parsed.decode.parallel_regions);
        assert_eq!(parsed.output.format, OutputFormat::Yaml);
        assert!(parsed.output.pretty);
    }

    #[test]
    fn options_reject_zero_default_dimensions() {
        let config = DecodeConfig {
            default_dimensions: [0, 4, 4],
            ..DecodeConfig::default()
        };
        assert_eq!(config.to_options().default_dimensions, DEFAULT_DIMENSIONS);

        let config = DecodeConfig {
            default_dimensions: [1, 2, 3],
            ..DecodeConfig::default()
        };
        assert_eq!(config.to_options().default_dimensions, Dimensions::new(1, 2, 3));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("mcschem_cfg_{}", std::process::id()))
            .join("config.toml");
        let mut config = Config::default();
        config.output.include_diagnostics = true;
        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
        assert_eq!(loaded, config);
    }
}
