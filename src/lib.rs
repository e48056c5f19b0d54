//! Minecraft 原理图统一解码工具
//!
//! 将 `.schematic`、`.litematic`/`.nbt`、`.schem` 三类原理图解码为统一的
//! [`CanonicalSchematic`]：整体尺寸加上全局坐标系中的非空气方块列表。

pub mod bitpack;
pub mod config;
pub mod diagnostics;
pub mod dimensions;
pub mod error;
pub mod export;
pub mod formats;
pub mod legacy;
pub mod load;
pub mod model;
pub mod options;
pub mod palette;
pub mod region;
pub mod tree;

pub use bitpack::{BitLayout, PackedArray, Packing};
pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use dimensions::{resolve_dimensions, resolve_dimensions_with};
pub use error::{DecodeError, Result};
pub use export::{export_dir, export_file, summarize, Summary};
pub use formats::{decode_file, decode_file_with, decode_tree};
pub use legacy::legacy_name;
pub use load::read_tree;
pub use model::{Block, CanonicalSchematic, Dimensions, Format};
pub use options::DecodeOptions;
pub use palette::BlockDescriptor;
