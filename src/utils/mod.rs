//! # 工具函数模块
//!
//! 提供日志初始化、状态输出和进度条。
//!
//! ## 依赖关系
//! - 被 `main.rs`, `commands/`, `batch/` 使用
//! - 子模块: logging, output, progress

pub mod logging;
pub mod output;
pub mod progress;
