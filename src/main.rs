//! Minecraft 原理图解码工具

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use mcschem::config::OutputFormat;
use mcschem::export::{decode_path, export_dir, export_file, render, summarize};
use mcschem::Config;

/// Minecraft 原理图解码工具 - schematic / litematic / schem 转 JSON
#[derive(Parser)]
#[command(name = "mcschem", version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 解码单个原理图文件
    Decode {
        /// 原理图文件路径
        file: PathBuf,
        /// 输出文件路径（默认输出到标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 按指定扩展名解码（覆盖文件扩展名）
        #[arg(long)]
        ext: Option<String>,
        /// 在输出中附带诊断
        #[arg(long)]
        diagnostics: bool,
        /// 输出 YAML
        #[arg(long)]
        yaml: bool,
    },
    /// 批量解码目录中的原理图
    Batch {
        /// 原理图文件夹路径
        dir: PathBuf,
        /// 输出文件夹路径
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 覆盖已存在的输出目录
        #[arg(long, visible_alias = "override")]
        overwrite: bool,
    },
    /// 显示原理图摘要
    Info {
        /// 原理图文件路径
        file: PathBuf,
        /// 显示数量最多的前 N 种方块
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// 生成默认配置文件
    Config {
        /// 输出路径（默认: mcschem.toml）
        #[arg(short, long, default_value = "mcschem.toml")]
        output: PathBuf,
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

fn load_config(config_path: Option<PathBuf>) -> Config {
    if let Some(path) = config_path {
        match Config::load_from_file(&path) {
            Ok(config) => {
                log::info!("已加载配置: {}", path.display());
                return config;
            }
            Err(e) => {
                log::warn!("无法加载配置 {}: {}", path.display(), e);
            }
        }
    }
    Config::load()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config);

    match cli.command {
        Commands::Decode {
            file,
            output,
            ext,
            diagnostics,
            yaml,
        } => {
            // 命令行参数优先于配置
            if diagnostics {
                config.output.include_diagnostics = true;
            }
            if yaml {
                config.output.format = OutputFormat::Yaml;
            }

            match output {
                Some(output_path) => {
                    let start = Instant::now();
                    let count = export_file(&file, &output_path, ext.as_deref(), &config)?;
                    println!("已写入 {:?}: {} 个方块", output_path, count);
                    println!("耗时: {:.2}s", start.elapsed().as_secs_f64());
                }
                None => {
                    let options = config.decode.to_options();
                    let (schematic, diags) = decode_path(&file, ext.as_deref(), &options)?;
                    println!("{}", render(&schematic, &diags, &config.output)?);
                }
            }
        }

        Commands::Batch {
            dir,
            output,
            overwrite,
        } => {
            let output_path = output.unwrap_or_else(|| {
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "schematics".to_string());
                dir.with_file_name(format!("{}_{}", name, config.output.format.extension()))
            });

            if output_path.exists() {
                if overwrite {
                    fs::remove_dir_all(&output_path)?;
                } else {
                    anyhow::bail!("输出目录已存在: {:?}\n使用 --overwrite 覆盖", output_path);
                }
            }

            println!("解码目录: {:?}", dir);
            println!("输出目录: {:?}", output_path);
            println!();

            let start = Instant::now();
            let report = export_dir(&dir, &output_path, &config)?;
            println!("\n耗时: {:.2}s", start.elapsed().as_secs_f64());
            if !report.failed.is_empty() {
                anyhow::bail!("{} 个文件解码失败", report.failed.len());
            }
        }

        Commands::Info { file, top } => {
            let (schematic, diags) = decode_path(&file, None, &config.decode.to_options())?;
            print!("{}", summarize(&schematic, top));
            if !diags.is_empty() {
                println!("诊断: {} 条", diags.len());
            }
        }

        Commands::Config { output, force } => {
            if output.exists() && !force {
                anyhow::bail!("文件已存在: {:?}\n使用 --force 覆盖", output);
            }

            let default_config = Config::default();
            default_config.save_to_file(&output)?;
            println!("已生成配置文件: {:?}", output);
            println!("\n配置项说明:");
            println!("  [decode]");
            println!(
                "    max_blocks_per_region = {}  # 每个区域的方块上限",
                default_config.decode.max_blocks_per_region
            );
            println!("    packing = \"auto\"            # auto / spanning / aligned");
            println!(
                "    parallel_regions = {}       # 多区域并行解码",
                default_config.decode.parallel_regions
            );
            println!("    default_dimensions = [...]    # 无法确定尺寸时的默认值");
            println!("  [output]");
            println!("    pretty = {}                 # JSON 缩进", default_config.output.pretty);
            println!("    format = \"json\"             # json / yaml");
            println!(
                "    include_diagnostics = {}   # 附带诊断",
                default_config.output.include_diagnostics
            );
        }
    }

    Ok(())
}
