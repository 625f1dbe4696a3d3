//! # 批量运行模块
//!
//! 目录模式下收集场景文件并并行运行。
//!
//! ## 功能
//! - 按 glob 模式收集场景文件
//! - rayon 线程池并行运行
//! - 每个场景独立写出报告与 CSV
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod job;
pub mod runner;

pub use collector::ScenarioCollector;
pub use job::{prepare_scenario, scenario_stem, ScenarioJob};
pub use runner::BatchRunner;
