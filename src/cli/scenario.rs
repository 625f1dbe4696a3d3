//! # scenario 子命令 CLI 定义
//!
//! 场景文件工具：
//! - `show`: 表格形式展示场景参数
//! - `check`: 校验参数和时间序列文件
//! - `init`: 生成入门场景
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scenario.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// scenario 主命令参数
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    #[command(subcommand)]
    pub command: ScenarioCommands,
}

/// scenario 子命令
#[derive(Subcommand, Debug)]
pub enum ScenarioCommands {
    /// Print scenario parameters as tables
    Show(ScenarioFileArgs),

    /// Validate a scenario and its time-series files
    Check(ScenarioFileArgs),

    /// Write the single-port tutorial scenario
    Init(InitArgs),
}

/// 以场景文件为输入的子命令参数
#[derive(Args, Debug)]
pub struct ScenarioFileArgs {
    /// Scenario file (.toml)
    pub scenario: PathBuf,
}

/// init 子命令参数
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output scenario file
    #[arg(default_value = "tutorial.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
