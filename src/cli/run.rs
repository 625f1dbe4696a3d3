//! # run 子命令 CLI 定义
//!
//! 运行单个场景或整个目录的场景。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use crate::batch::collector::DEFAULT_PATTERN;
use crate::report::PlotPreset;

use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario file (.toml) or directory of scenarios
    pub input: PathBuf,

    /// Engine command line; receives the scenario as JSON on stdin
    #[arg(short, long, env = "PLUMEKIT_ENGINE")]
    pub engine: Option<String>,

    /// Skip the engine and report a previously saved result JSON
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Write CSV tables to this directory
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Base name for CSV files (defaults to the scenario file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Save the engine result as JSON (file in single mode, flag in directory mode)
    #[arg(long, num_args = 0..=1, value_name = "FILE")]
    pub save_result: Option<Option<PathBuf>>,

    /// Write a debug plot (PNG or SVG by extension)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Series preset for the debug plot
    #[arg(long, value_enum, default_value_t = PlotPreset::Profile)]
    pub preset: PlotPreset,

    /// Output directory in directory mode
    #[arg(short, long, default_value = "plumekit-out")]
    pub output: PathBuf,

    /// Glob pattern for scenario files in directory mode
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Re-run scenarios whose report already exists
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
