//! # 时间序列文件检查
//!
//! 运行前检查场景引用的时间序列 CSV：文件可读、格式正确、
//! 行数足以覆盖模拟时间窗口。插值由引擎完成。
//!
//! ## 环境序列格式
//! ```text
//! 0 m, 10 m, 25 m, 50 m
//! 0.12, 0.10, 0.08, 0.05
//! 0.14, 0.11, 0.09, 0.05
//! ```
//! 表头为各层深度（或高度），可带单位后缀；之后每行对应一个时间步。
//!
//! ## 扩散器序列格式
//! 单列数值，首行可为表头。
//!
//! ## 依赖关系
//! - 被 `commands/scenario.rs` (check) 和 `commands/run.rs` 使用
//! - 使用 `csv` 读取，`regex` 解析深度表头

use crate::error::{PlumeError, Result};
use crate::models::scenario::{AmbientSeries, DiffuserSeries, TimeseriesConfig};

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// 深度表头：`25`, `25.5 m`, `-3e1ft`
fn depth_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-?\d+(?:\.\d*)?(?:[eE][-+]?\d+)?)\s*([A-Za-z]+)?$").unwrap()
    })
}

/// 解析后的环境序列表
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientTable {
    /// 各层深度（或高度）
    pub levels: Vec<f64>,
    /// 表头中的单位后缀（若有）
    pub level_units: Option<String>,
    /// 每个时间步一行，每层一个值
    pub rows: Vec<Vec<f64>>,
}

/// 单个序列文件的检查结果
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    /// 变量名，如 `current_speed`
    pub variable: String,
    pub path: PathBuf,
    pub rows: usize,
    /// 层数；扩散器序列为 1
    pub levels: usize,
    /// 覆盖时长（小时）= 行数 × 时间间隔
    pub coverage_hours: f64,
    /// 模拟时间窗口长度（小时）
    pub window_hours: Option<f64>,
}

impl SeriesSummary {
    /// 序列是否覆盖整个时间窗口
    pub fn covers_window(&self) -> bool {
        match self.window_hours {
            Some(window) => self.coverage_hours + 1e-9 >= window,
            None => true,
        }
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> PlumeError {
    PlumeError::InvalidTimeseries {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn read_records(content: &str, path: &str) -> Result<Vec<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| invalid(path, e.to_string()))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

fn parse_value(cell: &str, path: &str, row: usize, col: usize) -> Result<f64> {
    cell.parse::<f64>()
        .map_err(|_| invalid(path, format!("row {}, column {}: '{}' is not a number", row, col + 1, cell)))
}

/// 解析环境序列内容
pub fn parse_ambient_content(content: &str, path: &str, z_is_depth: bool) -> Result<AmbientTable> {
    let records = read_records(content, path)?;
    let (header, data) = records
        .split_first()
        .ok_or_else(|| invalid(path, "file is empty"))?;

    let mut levels = Vec::with_capacity(header.len());
    let mut level_units: Option<String> = None;
    for cell in header.iter() {
        let caps = depth_header_re()
            .captures(cell)
            .ok_or_else(|| invalid(path, format!("header '{}' is not a layer depth", cell)))?;
        let level = parse_value(&caps[1], path, 1, levels.len())?;

        if let Some(suffix) = caps.get(2).map(|m| m.as_str()) {
            match &level_units {
                Some(units) if units != suffix => {
                    return Err(invalid(
                        path,
                        format!("mixed depth units in header: '{}' and '{}'", units, suffix),
                    ))
                }
                Some(_) => {}
                None => level_units = Some(suffix.to_string()),
            }
        }
        levels.push(level);
    }

    let ordered = levels.windows(2).all(|w| {
        if z_is_depth {
            w[0] < w[1]
        } else {
            w[0] > w[1]
        }
    });
    if !ordered {
        let direction = if z_is_depth { "increasing depth" } else { "decreasing height" };
        return Err(invalid(path, format!("layers must be listed by {}", direction)));
    }

    let mut rows = Vec::with_capacity(data.len());
    for (i, record) in data.iter().enumerate() {
        let row_number = i + 2;
        if record.len() != levels.len() {
            return Err(invalid(
                path,
                format!(
                    "row {} has {} values, expected {}",
                    row_number,
                    record.len(),
                    levels.len()
                ),
            ));
        }
        let values = record
            .iter()
            .enumerate()
            .map(|(col, cell)| parse_value(cell, path, row_number, col))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }

    if rows.is_empty() {
        return Err(invalid(path, "no data rows"));
    }

    Ok(AmbientTable {
        levels,
        level_units,
        rows,
    })
}

/// 解析扩散器序列内容
pub fn parse_diffuser_content(content: &str, path: &str) -> Result<Vec<f64>> {
    let records = read_records(content, path)?;
    let mut values = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        if record.len() != 1 {
            return Err(invalid(
                path,
                format!("row {} has {} columns, expected 1", i + 1, record.len()),
            ));
        }
        let cell = &record[0];
        match cell.parse::<f64>() {
            Ok(value) => values.push(value),
            // 首行可为表头
            Err(_) if i == 0 => continue,
            Err(_) => return Err(invalid(path, format!("row {}: '{}' is not a number", i + 1, cell))),
        }
    }

    if values.is_empty() {
        return Err(invalid(path, "no data rows"));
    }
    Ok(values)
}

fn read_series_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(PlumeError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| PlumeError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

fn variable_name<T: serde::Serialize>(variable: &T) -> String {
    serde_json::to_value(variable)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// 检查单个环境序列
pub fn check_ambient_series(series: &AmbientSeries, window_hours: Option<f64>) -> Result<SeriesSummary> {
    let content = read_series_file(&series.file)?;
    let path = series.file.display().to_string();
    let table = parse_ambient_content(&content, &path, series.z_is_depth)?;

    // 表头带单位时须与 depth_units 一致
    if let Some(units) = &table.level_units {
        let expected = series.depth_units.label();
        if !units.eq_ignore_ascii_case(expected) {
            return Err(invalid(
                &path,
                format!(
                    "header depths are in '{}' but depth_units is '{}'",
                    units, expected
                ),
            ));
        }
    }

    Ok(SeriesSummary {
        variable: variable_name(&series.variable),
        path: series.file.clone(),
        rows: table.rows.len(),
        levels: table.levels.len(),
        coverage_hours: table.rows.len() as f64 * series.increment_hours,
        window_hours,
    })
}

/// 检查单个扩散器序列
pub fn check_diffuser_series(series: &DiffuserSeries, window_hours: Option<f64>) -> Result<SeriesSummary> {
    let content = read_series_file(&series.file)?;
    let values = parse_diffuser_content(&content, &series.file.display().to_string())?;

    Ok(SeriesSummary {
        variable: variable_name(&series.variable),
        path: series.file.clone(),
        rows: values.len(),
        levels: 1,
        coverage_hours: values.len() as f64 * series.increment_hours,
        window_hours,
    })
}

/// 检查场景中的全部时间序列，遇到第一个无法解析的文件即返回错误
pub fn check_timeseries(config: &TimeseriesConfig) -> Result<Vec<SeriesSummary>> {
    let window = config.window_hours().map(|(start, end, _)| end - start);

    let mut summaries = Vec::with_capacity(config.ambient.len() + config.diffuser.len());
    for series in &config.ambient {
        summaries.push(check_ambient_series(series, window)?);
    }
    for series in &config.diffuser {
        summaries.push(check_diffuser_series(series, window)?);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scenario::{AmbientVariable, DiffuserVariable};
    use crate::models::Unit;

    #[test]
    fn test_parse_ambient() {
        let content = "0 m, 10 m, 25.5m\n0.12, 0.10, 0.08\n\n0.14, 0.11, 0.09\n";
        let table = parse_ambient_content(content, "speed.csv", true).unwrap();
        assert_eq!(table.levels, vec![0.0, 10.0, 25.5]);
        assert_eq!(table.level_units.as_deref(), Some("m"));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec![0.14, 0.11, 0.09]);
    }

    #[test]
    fn test_parse_ambient_heights_without_units() {
        let content = "# heights above bottom\n50,20,0\n33.1,33.2,33.4\n";
        let table = parse_ambient_content(content, "sal.csv", false).unwrap();
        assert_eq!(table.levels, vec![50.0, 20.0, 0.0]);
        assert_eq!(table.level_units, None);
    }

    #[test]
    fn test_parse_ambient_errors() {
        let err = parse_ambient_content("0,10\n1.0\n", "a.csv", true).unwrap_err();
        assert!(err.to_string().contains("row 2 has 1 values, expected 2"));

        let err = parse_ambient_content("10,0\n1,2\n", "a.csv", true).unwrap_err();
        assert!(err.to_string().contains("increasing depth"));

        let err = parse_ambient_content("0 m,10 ft\n1,2\n", "a.csv", true).unwrap_err();
        assert!(err.to_string().contains("mixed depth units"));

        let err = parse_ambient_content("surface,bottom\n1,2\n", "a.csv", true).unwrap_err();
        assert!(err.to_string().contains("not a layer depth"));

        let err = parse_ambient_content("0,10\n", "a.csv", true).unwrap_err();
        assert!(err.to_string().contains("no data rows"));

        let err = parse_ambient_content("0,10\n1,x\n", "a.csv", true).unwrap_err();
        assert!(err.to_string().contains("row 2, column 2"));
    }

    #[test]
    fn test_parse_diffuser() {
        assert_eq!(
            parse_diffuser_content("flow\n0.05\n0.06\n", "flow.csv").unwrap(),
            vec![0.05, 0.06]
        );
        assert_eq!(parse_diffuser_content("1.5\n2\n", "flow.csv").unwrap(), vec![1.5, 2.0]);

        let err = parse_diffuser_content("flow\n1.0\noops\n", "flow.csv").unwrap_err();
        assert!(err.to_string().contains("row 3"));

        let err = parse_diffuser_content("1.0,2.0\n", "flow.csv").unwrap_err();
        assert!(err.to_string().contains("expected 1"));
    }

    #[test]
    fn test_check_timeseries_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let speed = dir.path().join("speed.csv");
        let flow = dir.path().join("flow.csv");
        fs::write(&speed, "0,10\n0.1,0.2\n0.1,0.2\n0.1,0.2\n").unwrap();
        fs::write(&flow, "flow\n0.05\n0.06\n").unwrap();

        let config = TimeseriesConfig {
            start_time: 0.0,
            end_time: 3.0,
            time_increment: 1.0,
            time_units: Unit::Hours,
            ambient: vec![AmbientSeries {
                variable: AmbientVariable::CurrentSpeed,
                file: speed.clone(),
                units: Unit::MetersPerSecond,
                increment_hours: 1.0,
                z_is_depth: true,
                depth_units: Unit::Meters,
            }],
            diffuser: vec![DiffuserSeries {
                variable: DiffuserVariable::EffluentFlow,
                file: flow,
                units: Unit::MegagallonsPerDay,
                increment_hours: 1.0,
            }],
        };

        let summaries = check_timeseries(&config).unwrap();
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].variable, "current_speed");
        assert_eq!(summaries[0].path, speed);
        assert_eq!(summaries[0].rows, 3);
        assert_eq!(summaries[0].levels, 2);
        assert!(summaries[0].covers_window());

        assert_eq!(summaries[1].variable, "effluent_flow");
        assert_eq!(summaries[1].rows, 2);
        assert!(!summaries[1].covers_window());
    }

    #[test]
    fn test_check_depth_units_match_header() {
        let dir = tempfile::tempdir().unwrap();
        let speed = dir.path().join("speed.csv");
        fs::write(&speed, "0 ft, 10 ft\n0.1, 0.2\n").unwrap();

        let mut series = AmbientSeries {
            variable: AmbientVariable::CurrentSpeed,
            file: speed,
            units: Unit::MetersPerSecond,
            increment_hours: 1.0,
            z_is_depth: true,
            depth_units: Unit::Meters,
        };

        let err = check_ambient_series(&series, None).unwrap_err();
        match err {
            PlumeError::InvalidTimeseries { reason, .. } => {
                assert!(reason.contains("'ft'"), "{}", reason);
                assert!(reason.contains("'m'"), "{}", reason);
            }
            other => panic!("unexpected error: {}", other),
        }

        series.depth_units = Unit::Feet;
        let summary = check_ambient_series(&series, None).unwrap();
        assert_eq!(summary.levels, 2);
    }

    #[test]
    fn test_check_missing_file() {
        let config = TimeseriesConfig {
            start_time: 0.0,
            end_time: 1.0,
            time_increment: 1.0,
            time_units: Unit::Hours,
            ambient: vec![],
            diffuser: vec![DiffuserSeries {
                variable: DiffuserVariable::EffluentFlow,
                file: PathBuf::from("/nonexistent/flow.csv"),
                units: Unit::MegagallonsPerDay,
                increment_hours: 1.0,
            }],
        };
        assert!(matches!(
            check_timeseries(&config),
            Err(PlumeError::FileNotFound { .. })
        ));
    }
}
