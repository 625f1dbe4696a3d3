//! # 回放引擎
//!
//! 忽略场景内容，直接返回已保存的结果 JSON。

use crate::engine::SimulationEngine;
use crate::error::Result;
use crate::models::{RunOutput, Scenario};
use crate::parsers::results::load_result;

use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ReplayEngine {
    path: PathBuf,
}

impl ReplayEngine {
    pub fn new(path: &Path) -> Self {
        ReplayEngine {
            path: path.to_path_buf(),
        }
    }
}

impl SimulationEngine for ReplayEngine {
    fn name(&self) -> &str {
        "replay"
    }

    fn run(&self, scenario: &Scenario) -> Result<RunOutput> {
        info!(
            "Replaying {} for scenario '{}'",
            self.path.display(),
            scenario.name
        );
        load_result(&self.path)
    }
}
