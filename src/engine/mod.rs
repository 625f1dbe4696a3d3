//! # 模拟引擎模块
//!
//! 羽流模型本身不在本工具内实现，而是通过 `SimulationEngine` 接口调用。
//!
//! ## 实现
//! - `ExternalEngine`: 启动外部命令，stdin 写入场景 JSON，stdout 读回结果 JSON
//! - `ReplayEngine`: 读取先前保存的结果 JSON，用于离线出报告
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `batch/` 使用
//! - 使用 `models/` 的 Scenario, RunOutput
//! - 使用 `parsers/results.rs` 读取结果

pub mod external;
pub mod replay;

pub use external::ExternalEngine;
pub use replay::ReplayEngine;

use crate::error::{PlumeError, Result};
use crate::models::{RunOutput, Scenario};

use std::path::Path;
use tracing::debug;

/// 模拟引擎接口
pub trait SimulationEngine: Send + Sync {
    /// 引擎名称（用于日志和报告）
    fn name(&self) -> &str;

    /// 运行一个场景。引擎报告的模拟失败以 `success = false` 返回，而不是 Err
    fn run(&self, scenario: &Scenario) -> Result<RunOutput>;
}

/// 按命令行选项选择引擎，`--replay` 优先
pub fn select_engine(
    engine: Option<&str>,
    replay: Option<&Path>,
) -> Result<Box<dyn SimulationEngine>> {
    if let Some(path) = replay {
        debug!("Using replay engine: {}", path.display());
        return Ok(Box::new(ReplayEngine::new(path)));
    }

    match engine.map(str::trim).filter(|s| !s.is_empty()) {
        Some(command_line) => {
            let engine = ExternalEngine::from_command_line(command_line)?;
            debug!("Using external engine: {}", engine.name());
            Ok(Box::new(engine))
        }
        None => Err(PlumeError::EngineNotConfigured),
    }
}
