//! # 单个场景的运行流程
//!
//! 读取、检查、运行场景，再写出报告、CSV、结果 JSON 和调试图。
//! 目录模式下每个场景的输出（`{sub}` 为场景相对输入目录的子目录）：
//! - `{out}/{sub}/{stem}.report.txt`
//! - `{csv}/{sub}/{stem}/` 下的 CSV 文件（`--csv <dir>`）
//! - `{out}/{sub}/{stem}.result.json`（`--save-result`）
//! - `{out}/{sub}/{stem}.{preset}.png`（`--plot`）
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `parsers/`, `engine/`, `report/`

use crate::batch::runner::ProcessResult;
use crate::engine::SimulationEngine;
use crate::error::{PlumeError, Result};
use crate::models::Scenario;
use crate::parsers::scenario::{ensure_valid, load_scenario};
use crate::parsers::timeseries::check_timeseries;
use crate::parsers::save_result;
use crate::report::{export_csv, generate_plot, write_report, PlotPreset};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 调试图默认尺寸
pub const PLOT_SIZE: (u32, u32) = (1024, 768);

/// 读取场景并做运行前检查：参数校验和时间序列文件检查
pub fn prepare_scenario(path: &Path) -> Result<Scenario> {
    let scenario = load_scenario(path)?;
    ensure_valid(&scenario)?;

    if let Some(ts) = &scenario.timeseries {
        for summary in check_timeseries(ts)? {
            if !summary.covers_window() {
                warn!(
                    "{}: {} rows cover {:.2} h, time window is {:.2} h",
                    summary.path.display(),
                    summary.rows,
                    summary.coverage_hours,
                    summary.window_hours.unwrap_or_default()
                );
            }
        }
    }
    Ok(scenario)
}

/// 场景文件名（不含扩展名）
pub fn scenario_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scenario")
        .to_string()
}

/// 目录模式下单个场景的运行设置
pub struct ScenarioJob<'a> {
    pub engine: &'a dyn SimulationEngine,
    /// 场景所在的输入目录，子目录结构在输出中保留
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// CSV 根目录，每个场景一个子目录
    pub csv_dir: Option<PathBuf>,
    pub save_result: bool,
    pub plot: Option<PlotPreset>,
    pub overwrite: bool,
}

impl ScenarioJob<'_> {
    /// `root` 下与场景所在子目录对应的目录
    fn mirrored_dir(&self, root: &Path, scenario_file: &Path) -> PathBuf {
        match scenario_file
            .strip_prefix(&self.input_dir)
            .ok()
            .and_then(Path::parent)
        {
            Some(sub) if !sub.as_os_str().is_empty() => root.join(sub),
            _ => root.to_path_buf(),
        }
    }

    pub fn report_path(&self, scenario_file: &Path) -> PathBuf {
        self.mirrored_dir(&self.output_dir, scenario_file)
            .join(format!("{}.report.txt", scenario_stem(scenario_file)))
    }

    /// 运行一个场景，错误转为 `Failed`
    pub fn process(&self, scenario_file: &Path) -> ProcessResult {
        let report_path = self.report_path(scenario_file);
        if report_path.exists() && !self.overwrite {
            return ProcessResult::Skipped(report_path.display().to_string());
        }

        match self.run_one(scenario_file, &report_path) {
            Ok(()) => ProcessResult::Success(report_path.display().to_string()),
            Err(e) => ProcessResult::Failed(scenario_file.display().to_string(), e.to_string()),
        }
    }

    fn run_one(&self, scenario_file: &Path, report_path: &Path) -> Result<()> {
        let stem = scenario_stem(scenario_file);
        let scenario = prepare_scenario(scenario_file)?;
        let output = self.engine.run(&scenario)?;

        let out_dir = self.mirrored_dir(&self.output_dir, scenario_file);
        fs::create_dir_all(&out_dir).map_err(|e| PlumeError::FileWriteError {
            path: out_dir.display().to_string(),
            source: e,
        })?;

        // 失败的运行也保留结果，便于排查
        if self.save_result {
            save_result(&output, &out_dir.join(format!("{}.result.json", stem)))?;
        }

        if !output.success {
            return Err(PlumeError::SimulationFailed(output.failure_message()));
        }

        write_report(&output, report_path)?;

        if let Some(csv_dir) = &self.csv_dir {
            let folder = self.mirrored_dir(csv_dir, scenario_file).join(&stem);
            export_csv(&output, &folder, &stem)?;
        }

        if let Some(preset) = self.plot {
            let plot_path = out_dir.join(format!("{}.{}.png", stem, preset.name()));
            generate_plot(&output, preset, &plot_path, PLOT_SIZE.0, PLOT_SIZE.1)?;
        }

        info!(
            "Scenario '{}' finished: {} cases -> {}",
            scenario.name,
            output.cases,
            report_path.display()
        );
        Ok(())
    }
}
