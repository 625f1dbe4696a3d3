//! # plumekit - 羽流模拟场景运行与报告工具
//!
//! 用 TOML 描述排放口场景，交给外部羽流模拟引擎运行，
//! 再把引擎返回的结果整理成定宽文本报告、CSV 表和调试图。
//!
//! ## 子命令
//! - `run`      - 运行场景（单文件或目录批量）
//! - `report`   - 由保存的结果生成文本报告
//! - `export`   - 由保存的结果导出 CSV
//! - `plot`     - 由保存的结果绘制调试图
//! - `scenario` - 场景文件工具 (show / check / init)
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (目录批量运行)
//!   │     ├── engine/    (模拟引擎接口)
//!   │     ├── parsers/   (场景、结果、时间序列读取)
//!   │     ├── report/    (文本报告、CSV、绘图)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (日志、状态输出、进度条)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod engine;
mod error;
mod models;
mod parsers;
mod report;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init_logging(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
