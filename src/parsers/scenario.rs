//! # 场景文件解析器
//!
//! 场景以 TOML 描述，字段与 `models/scenario.rs` 一一对应。
//!
//! ## 格式示例
//! ```text
//! name = "tutorial"
//!
//! [model]
//! max_dilution = 10000.0
//!
//! [diffuser]
//! num_ports = 1
//! diameter = { value = 0.05, units = "meters" }
//! ...
//!
//! [[ambient.layers]]
//! z = 0.0
//! current_speed = 0.1
//! ```
//!
//! 时间序列文件的相对路径以场景文件所在目录为基准。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/scenario.rs`, `batch/` 使用
//! - 使用 `toml` 反序列化

use crate::error::{PlumeError, Result};
use crate::models::Scenario;

use std::fs;
use std::path::Path;
use tracing::debug;

/// 读取并解析场景文件
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    if !path.is_file() {
        return Err(PlumeError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| PlumeError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut scenario = parse_scenario_content(&content, &path.display().to_string())?;

    if let Some(base) = path.parent() {
        resolve_series_paths(&mut scenario, base);
    }

    debug!(
        "Loaded scenario '{}' ({} ambient layers, {} outputs)",
        scenario.name,
        scenario.ambient.layers.len(),
        scenario.outputs.len()
    );
    Ok(scenario)
}

/// 从字符串解析场景
pub fn parse_scenario_content(content: &str, source: &str) -> Result<Scenario> {
    toml::from_str(content).map_err(|e| PlumeError::ParseError {
        format: "scenario TOML".to_string(),
        path: source.to_string(),
        reason: e.to_string(),
    })
}

/// 把时间序列文件的相对路径补全为相对场景目录的路径
fn resolve_series_paths(scenario: &mut Scenario, base: &Path) {
    if let Some(ts) = scenario.timeseries.as_mut() {
        let files = ts
            .ambient
            .iter_mut()
            .map(|s| &mut s.file)
            .chain(ts.diffuser.iter_mut().map(|s| &mut s.file));
        for file in files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }
}

/// 检查场景，有问题时返回 `InvalidScenario`
pub fn ensure_valid(scenario: &Scenario) -> Result<()> {
    let problems = scenario.validate();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(PlumeError::InvalidScenario {
            name: scenario.name.clone(),
            problems,
        })
    }
}

/// 写出场景文件
pub fn save_scenario(scenario: &Scenario, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(scenario).map_err(|e| PlumeError::Other(format!(
        "Failed to serialize scenario '{}': {}",
        scenario.name, e
    )))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PlumeError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    fs::write(path, content).map_err(|e| PlumeError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
