//! # 文本报告
//!
//! 把一次运行的结果渲染为多 case、多表格的文本报告。
//!
//! ## 报告结构
//! 1. 模型参数说明
//! 2. 每个 case：标题、时间序列说明、扩散器表、环境表、
//!    羽流说明、羽流表、后续说明、远场说明与远场表
//! 3. 潮汐污染累积 (TPB) 说明
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/report.rs`, `batch/` 调用
//! - 使用 `report/layout.rs`

use crate::error::{PlumeError, Result};
use crate::models::{RunOutput, Scalar};
use crate::report::layout::{
    ambient_layout, diffuser_layout, farfield_layout, plume_layout, TableLayout,
};

use std::fs;
use std::path::Path;

/// case 标题上下的分隔线
pub const CASE_RULE: &str = "---------------------------------------------------";

/// 按行累积报告文本
#[derive(Default)]
struct ReportBuffer {
    text: String,
}

impl ReportBuffer {
    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            self.line(line.as_ref());
        }
    }

    /// 非空时先空一行再输出
    fn memo_block<S: AsRef<str>>(&mut self, memos: &[S]) {
        if !memos.is_empty() {
            self.blank();
            self.lines(memos);
        }
    }

    fn table_head(&mut self, layout: &TableLayout) {
        self.line(&layout.header);
        self.line(&layout.units);
    }
}

/// 整次运行共用的表格布局
struct ReportLayouts {
    diffuser: TableLayout,
    ambient: TableLayout,
    plume: TableLayout,
    farfield: Option<TableLayout>,
}

impl ReportLayouts {
    fn new(output: &RunOutput) -> Self {
        let farfield = if output.farfield_has_table() {
            farfield_layout(&output.farfield.headers)
        } else {
            None
        };

        ReportLayouts {
            diffuser: diffuser_layout(&output.diffuser.headers),
            ambient: ambient_layout(&output.ambient.headers),
            plume: plume_layout(&output.plume.headers),
            farfield,
        }
    }
}

/// 渲染完整报告
pub fn render_report(output: &RunOutput) -> String {
    let layouts = ReportLayouts::new(output);
    let mut buf = ReportBuffer::default();

    if let Some(params) = &output.modelparams {
        buf.lines(&params.memos);
        buf.blank();
    }

    for case in 0..output.cases {
        render_case(&mut buf, output, &layouts, case);
    }

    if output.tpb.was_run {
        buf.blank();
        buf.line(CASE_RULE);
        buf.blank();
        buf.lines(&output.tpb.memos);
    }

    buf.text
}

/// case 标题：`Case 3 (+2.00 hrs):`
pub fn case_title(output: &RunOutput, case: usize) -> String {
    format!("Case {} (+{:.2} hrs):", case + 1, output.case_hours(case))
}

fn render_case(buf: &mut ReportBuffer, output: &RunOutput, layouts: &ReportLayouts, case: usize) {
    buf.blank();
    buf.line(CASE_RULE);
    buf.line(&case_title(output, case));
    buf.line(CASE_RULE);

    if let Some(memos) = output
        .timeseries
        .as_ref()
        .and_then(|ts| ts.memos.get(case))
    {
        buf.lines(memos);
    }

    // 扩散器
    buf.blank();
    buf.table_head(&layouts.diffuser);
    if let Some(row) = output.diffuser.outputs.get(case) {
        buf.line(&layouts.diffuser.render(row));
    }

    // 环境
    buf.blank();
    buf.table_head(&layouts.ambient);
    for level in output.ambient.outputs.get(case).into_iter().flatten() {
        buf.line(&layouts.ambient.render(level));
    }

    // 羽流
    if let Some(memos) = output.plume.memos.get(case) {
        buf.memo_block(memos);
    }
    buf.blank();
    buf.table_head(&layouts.plume);
    for step in output.plume.outputs.get(case).into_iter().flatten() {
        let mut values = Vec::with_capacity(step.values.len() + 1);
        values.push(Scalar::Integer(step.step));
        values.extend(step.values.iter().cloned());
        buf.line(&format!(
            "{};  {}",
            layouts.plume.render(&values),
            step.status
        ));
    }
    if let Some(memos) = output.plume.postmemos.get(case) {
        buf.memo_block(memos);
    }

    // 远场
    if output.farfield.was_run {
        buf.blank();
        if let Some(memos) = output.farfield.memos.get(case) {
            buf.lines(memos);
        }
        buf.blank();
        if let Some(layout) = &layouts.farfield {
            buf.table_head(layout);
            for row in output.farfield.outputs.get(case).into_iter().flatten() {
                if !row.values.is_empty() {
                    buf.line(&layout.render(&row.values));
                }
            }
        }
    }
}

/// 打印报告到标准输出
pub fn print_report(output: &RunOutput) {
    print!("{}", render_report(output));
}

/// 写入报告文件
pub fn write_report(output: &RunOutput, path: &Path) -> Result<()> {
    fs::write(path, render_report(output)).map_err(|e| PlumeError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::results::{
        AmbientSection, DiffuserSection, FarfieldRow, FarfieldSection, ModelParamsSection,
        PlumeSection, PlumeStep, TimeseriesSection, TpbSection,
    };
    use crate::models::{ColumnHeader, UnitClass};

    fn sample_output() -> RunOutput {
        RunOutput {
            success: true,
            error: None,
            cases: 1,
            casetime: vec![0.0],
            diffuser: DiffuserSection {
                headers: vec![
                    ColumnHeader::new("diameter", "P-dia", UnitClass::Length, "m"),
                    ColumnHeader::new("effluent_flow", "Ttl-flo", UnitClass::FlowRate, "MGD"),
                ],
                outputs: vec![vec![Scalar::Number(0.05), Scalar::Number(0.05)]],
            },
            ambient: AmbientSection {
                headers: vec![ColumnHeader::new("depth", "Depth", UnitClass::Length, "m")],
                outputs: vec![vec![vec![Scalar::Number(0.0)], vec![Scalar::Number(50.0)]]],
            },
            plume: PlumeSection {
                headers: vec![ColumnHeader::new(
                    "dilution",
                    "Dilution",
                    UnitClass::Unitless,
                    "",
                )],
                outputs: vec![vec![
                    PlumeStep {
                        step: 0,
                        values: vec![Scalar::Number(1.0)],
                        status: String::new(),
                    },
                    PlumeStep {
                        step: 467,
                        values: vec![Scalar::Number(10156.3)],
                        status: "stop dilution reached".to_string(),
                    },
                ]],
                memos: vec![vec!["Froude No: 9.620;".to_string()]],
                postmemos: vec![vec![]],
            },
            modelparams: Some(ModelParamsSection {
                memos: vec!["Model: UM3".to_string()],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_single_case() {
        let text = render_report(&sample_output());
        let expected = [
            "Model: UM3",
            "",
            "",
            CASE_RULE,
            "Case 1 (+0.00 hrs):",
            CASE_RULE,
            "",
            "P-dia  Ttl-flo",
            "  (m)    (MGD)",
            "0.05000  0.05000",
            "",
            "  Depth",
            "    (m)",
            "  0.000",
            " 50.000",
            "",
            "Froude No: 9.620;",
            "",
            " Step  Dilution",
            "               ",
            "    0     1.000;  ",
            "  467 10,156.300;  stop dilution reached",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_farfield_and_tpb_sections() {
        let mut output = sample_output();
        output.modelparams = None;
        output.farfield = FarfieldSection {
            was_run: true,
            headers: vec![ColumnHeader::new(
                "concentration",
                "Conc",
                UnitClass::Concentration,
                "ppm",
            )],
            outputs: vec![vec![
                FarfieldRow {
                    values: vec![Scalar::Number(0.01234)],
                },
                FarfieldRow { values: vec![] },
            ]],
            memos: vec![vec!["Farfield dispersion based on wastefield width".to_string()]],
        };
        output.tpb = TpbSection {
            was_run: true,
            memos: vec!["Tidal pollution buildup".to_string()],
        };

        let text = render_report(&output);
        let tail = [
            "",
            "Farfield dispersion based on wastefield width",
            "",
            "  Conc",
            " (ppm)",
            "0.0123",
            "",
            CASE_RULE,
            "",
            "Tidal pollution buildup",
            "",
        ]
        .join("\n");
        assert!(text.ends_with(&tail), "{}", text);
        assert!(text.starts_with("\n"));
    }

    #[test]
    fn test_farfield_skipped_when_not_run() {
        let mut output = sample_output();
        output.farfield.memos = vec![vec!["should not appear".to_string()]];
        let text = render_report(&output);
        assert!(!text.contains("should not appear"));
    }

    #[test]
    fn test_timeseries_memos_and_case_hours() {
        let mut output = sample_output();
        output.cases = 2;
        output.casetime = vec![0.0, 3600.0];
        output.timeseries = Some(TimeseriesSection {
            memos: vec![
                vec!["current_speed index 0".to_string()],
                vec!["current_speed index 1".to_string()],
            ],
        });

        let text = render_report(&output);
        assert!(text.contains("Case 2 (+1.00 hrs):\n"));
        assert!(text.contains(&format!("{}\ncurrent_speed index 1\n", CASE_RULE)));
        // 第二个 case 没有扩散器数据行，只输出表头
        assert_eq!(text.matches("P-dia  Ttl-flo").count(), 2);
        assert_eq!(text.matches("0.05000  0.05000").count(), 1);
    }
}
