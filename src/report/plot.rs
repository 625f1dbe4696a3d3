//! # 调试图
//!
//! 使用 `plotters` 把结果中的 `graphs` 坐标序列画成散点加折线图。
//!
//! ## 预设
//! - profile: trajectory, boundary1, boundary2（纵轴翻转）
//! - plan: path, out1, out2
//! - density: density, ambdensity（纵轴翻转）
//! - dilution: dilution, cldilution
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs`, `commands/run.rs` 调用
//! - 使用 `models/results.rs` 的 GraphSeries
//! - 使用 `plotters` 渲染 PNG/SVG

use crate::error::{PlumeError, Result};
use crate::models::results::GraphSeries;
use crate::models::RunOutput;

use clap::ValueEnum;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

/// 序列颜色，依次对应第 1/2/3 条序列
const SERIES_COLORS: [RGBColor; 3] = [BLACK, BLUE, GREEN];

/// 绘图预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotPreset {
    /// 羽流轨迹与边界（侧视）
    Profile,
    /// 平面路径
    Plan,
    /// 羽流与环境密度
    Density,
    /// 稀释度
    Dilution,
}

impl PlotPreset {
    /// 预设包含的序列名，第一条为必需
    pub fn series(&self) -> &'static [&'static str] {
        match self {
            PlotPreset::Profile => &["trajectory", "boundary1", "boundary2"],
            PlotPreset::Plan => &["path", "out1", "out2"],
            PlotPreset::Density => &["density", "ambdensity"],
            PlotPreset::Dilution => &["dilution", "cldilution"],
        }
    }

    /// 纵轴是否向下增长（深度类图）
    pub fn flip_y(&self) -> bool {
        matches!(self, PlotPreset::Profile | PlotPreset::Density)
    }

    /// 文件名中使用的预设名
    pub fn name(&self) -> &'static str {
        match self {
            PlotPreset::Profile => "profile",
            PlotPreset::Plan => "plan",
            PlotPreset::Density => "density",
            PlotPreset::Dilution => "dilution",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PlotPreset::Profile => "Plume profile",
            PlotPreset::Plan => "Plume plan view",
            PlotPreset::Density => "Density",
            PlotPreset::Dilution => "Dilution",
        }
    }
}

/// 选出预设对应的序列。首条缺失时报错，其余缺失时跳过
pub fn select_series<'a>(
    output: &'a RunOutput,
    preset: PlotPreset,
) -> Result<Vec<(&'static str, &'a GraphSeries)>> {
    let mut selected = Vec::new();
    for (i, name) in preset.series().iter().enumerate() {
        match output.graphs.get(*name) {
            Some(series) => selected.push((*name, series)),
            None if i == 0 => return Err(PlumeError::MissingSeries(name.to_string())),
            None => debug!("Series '{}' not in result, skipped", name),
        }
    }
    Ok(selected)
}

/// 所有序列的坐标范围，两端各留 5% 余量
fn plot_bounds(series: &[(&str, &GraphSeries)], flip_y: bool) -> ((f64, f64), (f64, f64)) {
    let points = series
        .iter()
        .flat_map(|(_, s)| s.coords.iter())
        .filter(|[x, y]| x.is_finite() && y.is_finite());

    let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
    for [x, y] in points {
        let y = if flip_y { -y } else { *y };
        x_range = (x_range.0.min(*x), x_range.1.max(*x));
        y_range = (y_range.0.min(y), y_range.1.max(y));
    }

    (padded(x_range), padded(y_range))
}

fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

/// 生成调试图，按扩展名选择 SVG 或 PNG
pub fn generate_plot(
    output: &RunOutput,
    preset: PlotPreset,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    let series = select_series(output, preset)?;
    let use_svg = output_path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    debug!(
        "Plotting {} series to {} ({}x{})",
        series.len(),
        output_path.display(),
        width,
        height
    );

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, &series, preset)?;
        root.present()
            .map_err(|e| PlumeError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, &series, preset)?;
        root.present()
            .map_err(|e| PlumeError::PlotError(e.to_string()))?;
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    series: &[(&str, &GraphSeries)],
    preset: PlotPreset,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| PlumeError::PlotError(format!("{:?}", e)))?;

    let flip_y = preset.flip_y();
    let ((x_min, x_max), (y_min, y_max)) = plot_bounds(series, flip_y);

    let mut chart = ChartBuilder::on(root)
        .caption(preset.title(), ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| PlumeError::PlotError(format!("{:?}", e)))?;

    // 翻转时内部存 -y，刻度显示回原值
    let y_formatter = |y: &f64| {
        let y = if flip_y { -*y } else { *y };
        format!("{:.1}", y)
    };

    chart
        .configure_mesh()
        .y_label_formatter(&y_formatter)
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .draw()
        .map_err(|e| PlumeError::PlotError(format!("{:?}", e)))?;

    for ((name, data), color) in series.iter().zip(SERIES_COLORS) {
        let points: Vec<(f64, f64)> = data
            .coords
            .iter()
            .map(|[x, y]| (*x, if flip_y { -*y } else { *y }))
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.mix(0.2).stroke_width(1),
            ))
            .map_err(|e| PlumeError::PlotError(format!("{:?}", e)))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));

        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 1, color.filled())))
            .map_err(|e| PlumeError::PlotError(format!("{:?}", e)))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlumeError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphs(names: &[&str]) -> RunOutput {
        let mut output = RunOutput::default();
        for name in names {
            output.graphs.insert(
                name.to_string(),
                GraphSeries {
                    coords: vec![[0.0, 49.0], [1.5, 40.0], [3.0, 20.0]],
                },
            );
        }
        output
    }

    #[test]
    fn test_preset_series() {
        assert_eq!(
            PlotPreset::Profile.series(),
            &["trajectory", "boundary1", "boundary2"]
        );
        assert!(PlotPreset::Profile.flip_y());
        assert!(PlotPreset::Density.flip_y());
        assert!(!PlotPreset::Plan.flip_y());
        assert!(!PlotPreset::Dilution.flip_y());
    }

    #[test]
    fn test_select_series() {
        let output = graphs(&["trajectory", "boundary2"]);
        let selected = select_series(&output, PlotPreset::Profile).unwrap();
        let names: Vec<&str> = selected.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["trajectory", "boundary2"]);

        let err = select_series(&output, PlotPreset::Dilution).unwrap_err();
        assert!(matches!(err, PlumeError::MissingSeries(ref n) if n == "dilution"));
    }

    #[test]
    fn test_bounds_flip() {
        let output = graphs(&["trajectory"]);
        let selected = select_series(&output, PlotPreset::Profile).unwrap();

        let ((x_min, x_max), (y_min, y_max)) = plot_bounds(&selected, true);
        assert!((x_min - -0.15).abs() < 1e-9);
        assert!((x_max - 3.15).abs() < 1e-9);
        assert!((y_min - -50.45).abs() < 1e-9);
        assert!((y_max - -18.55).abs() < 1e-9);

        let (_, (y_min, y_max)) = plot_bounds(&selected, false);
        assert!((y_min - 18.55).abs() < 1e-9);
        assert!((y_max - 50.45).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_degenerate() {
        assert_eq!(padded((2.0, 2.0)), (1.0, 3.0));
        assert_eq!(padded((f64::INFINITY, f64::NEG_INFINITY)), (0.0, 1.0));
    }
}
