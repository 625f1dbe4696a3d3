//! # 解析器模块
//!
//! 读取场景文件、结果 JSON 和时间序列输入。
//!
//! ## 依赖关系
//! - 被 `commands/`, `engine/`, `batch/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: scenario, results, timeseries

pub mod results;
pub mod scenario;
pub mod timeseries;

pub use results::{load_result, save_result};
pub use scenario::{load_scenario, save_scenario};
