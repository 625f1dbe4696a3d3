//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 运行场景（单文件或目录）
//! - `report`: 由结果 JSON 生成文本报告
//! - `export`: 由结果 JSON 导出 CSV
//! - `plot`: 由结果 JSON 绘制调试图
//! - `scenario`: 场景文件工具（嵌套子命令）
//!   - `show` / `check` / `init`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run, result, scenario

pub mod result;
pub mod run;
pub mod scenario;

use clap::{ArgAction, Parser, Subcommand};

/// plumekit - 羽流模拟场景运行与报告工具
#[derive(Parser)]
#[command(name = "plumekit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Scenario runner and report formatter for buoyant-jet plume simulations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario file or a directory of scenarios
    Run(run::RunArgs),

    /// Render a saved result JSON as a text report
    Report(result::ReportArgs),

    /// Export a saved result JSON to CSV tables
    Export(result::ExportArgs),

    /// Plot graph series from a saved result JSON
    Plot(result::PlotArgs),

    /// Inspect, validate or create scenario files
    Scenario(scenario::ScenarioArgs),
}
