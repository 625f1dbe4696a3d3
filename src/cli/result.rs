//! # report / export / plot 子命令 CLI 定义
//!
//! 三者都以保存的结果 JSON 为输入，离线生成输出。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/report.rs`, `commands/export.rs`, `commands/plot.rs`

use crate::report::PlotPreset;

use clap::Args;
use std::path::PathBuf;

/// report 子命令参数
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Result JSON produced by `run --save-result`
    pub result: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// export 子命令参数
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Result JSON produced by `run --save-result`
    pub result: PathBuf,

    /// Output directory for CSV files
    #[arg(short, long, default_value = "outcsvs")]
    pub dir: PathBuf,

    /// Base name for CSV files (defaults to the result file name)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Result JSON produced by `run --save-result`
    pub result: PathBuf,

    /// Series preset
    #[arg(short, long, value_enum, default_value_t = PlotPreset::Profile)]
    pub preset: PlotPreset,

    /// Output image (PNG or SVG by extension)
    #[arg(short, long, default_value = "plume.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,
}
