//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `engine/`, `parsers/`, `report/`, `batch/`, `utils/`
//! - 子模块: run, report, export, plot, scenario

pub mod export;
pub mod plot;
pub mod report;
pub mod run;
pub mod scenario;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Run(args) => run::execute(args),
        Commands::Report(args) => report::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Plot(args) => plot::execute(args),
        Commands::Scenario(args) => scenario::execute(args),
    }
}
