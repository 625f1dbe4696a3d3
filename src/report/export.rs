//! # CSV 导出
//!
//! 把一次运行的结果按 case 拆分为 CSV 表和文本说明文件。
//!
//! ## 输出文件
//! - `{name}.params.txt`: 模型参数说明
//! - `{name}.diffuser.csv`: 扩散器表，每个 case 一行
//! - `{name}.{NN}.ambient.csv`: 环境表
//! - `{name}.{NN}.memos.txt`: case 标题与各类说明
//! - `{name}.{NN}.plume.csv`: 羽流表（末列为状态）
//! - `{name}.{NN}.farfield.csv`: 远场表（仅在运行远场模型时）
//! - `{name}.tpb.txt`: 潮汐污染累积说明（仅在运行 TPB 时）
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/export.rs`, `batch/` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{PlumeError, Result};
use crate::models::results::ColumnHeader;
use crate::models::{RunOutput, Scalar};
use crate::report::format::format_number;
use crate::report::text::{case_title, CASE_RULE};

use std::fs;
use std::path::{Path, PathBuf};

/// case 编号的位数：`floor(log10(cases))`，至少 2 位
pub fn case_digits(cases: usize) -> usize {
    if cases == 0 {
        return 2;
    }
    ((cases as f64).log10().floor() as usize).max(2)
}

/// 去掉文件名模板末尾的 `.csv`（不区分大小写）
pub fn strip_csv_suffix(name: &str) -> &str {
    if name.len() >= 4 && name.is_char_boundary(name.len() - 4) {
        let (stem, ext) = name.split_at(name.len() - 4);
        if ext.eq_ignore_ascii_case(".csv") {
            return stem;
        }
    }
    name
}

/// 最短往返文本，指数至少两位并带符号：`1e-05`, `1.5e+16`
fn float_text(x: f64) -> String {
    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// CSV 单元格文本
pub fn csv_cell(value: &Scalar) -> String {
    match value {
        Scalar::Integer(i) => i.to_string(),
        Scalar::Number(x) if !x.is_finite() => format_number(*x, 0, false),
        Scalar::Number(x) => float_text(*x),
        Scalar::Text(s) => s.clone(),
        Scalar::Missing => String::new(),
    }
}

fn header_cells(leading: Option<&str>, headers: &[ColumnHeader]) -> Vec<String> {
    leading
        .map(str::to_string)
        .into_iter()
        .chain(headers.iter().map(ColumnHeader::csv_header))
        .collect()
}

/// 逐行写入的 CSV 文件
struct CsvFile {
    path: PathBuf,
    writer: csv::Writer<fs::File>,
}

impl CsvFile {
    fn create(path: PathBuf, header: &[String]) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(PlumeError::CsvError)?;
        writer.write_record(header).map_err(PlumeError::CsvError)?;
        Ok(CsvFile { path, writer })
    }

    fn row<I: IntoIterator<Item = String>>(&mut self, cells: I) -> Result<()> {
        let cells: Vec<String> = cells.into_iter().collect();
        self.writer
            .write_record(&cells)
            .map_err(PlumeError::CsvError)
    }

    fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush().map_err(|e| PlumeError::FileWriteError {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(self.path)
    }
}

fn write_text(path: PathBuf, content: &str) -> Result<PathBuf> {
    fs::write(&path, content).map_err(|e| PlumeError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

/// 导出全部结果，返回写出的文件列表
pub fn export_csv(output: &RunOutput, folder: &Path, filename_format: &str) -> Result<Vec<PathBuf>> {
    let name = strip_csv_suffix(filename_format);
    let digits = case_digits(output.cases);

    fs::create_dir_all(folder).map_err(|e| PlumeError::FileWriteError {
        path: folder.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::new();

    // 模型参数说明
    let memos = output
        .modelparams
        .as_ref()
        .map(|p| p.memos.as_slice())
        .unwrap_or_default();
    let params_text = if memos.is_empty() {
        String::new()
    } else {
        format!("{}\n", memos.join("\n"))
    };
    written.push(write_text(
        folder.join(format!("{}.params.txt", name)),
        &params_text,
    )?);

    // 扩散器表
    let mut diffuser = CsvFile::create(
        folder.join(format!("{}.diffuser.csv", name)),
        &header_cells(Some("Case"), &output.diffuser.headers),
    )?;
    for (case, row) in output.diffuser.outputs.iter().enumerate() {
        diffuser.row(std::iter::once((case + 1).to_string()).chain(row.iter().map(csv_cell)))?;
    }
    written.push(diffuser.finish()?);

    let ambient_header = header_cells(None, &output.ambient.headers);
    let plume_header = header_cells(Some("Step"), &output.plume.headers);
    let farfield_header = header_cells(None, &output.farfield.headers);

    for case in 0..output.cases {
        let tag = format!("{:0width$}", case + 1, width = digits);
        let case_path = |kind: &str| folder.join(format!("{}.{}.{}", name, tag, kind));

        // 环境表
        let mut ambient = CsvFile::create(case_path("ambient.csv"), &ambient_header)?;
        for level in output.ambient.outputs.get(case).into_iter().flatten() {
            ambient.row(level.iter().map(csv_cell))?;
        }
        written.push(ambient.finish()?);

        // 说明
        written.push(write_text(
            case_path("memos.txt"),
            &case_memos(output, case),
        )?);

        // 羽流表
        let mut plume = CsvFile::create(case_path("plume.csv"), &plume_header)?;
        for step in output.plume.outputs.get(case).into_iter().flatten() {
            plume.row(
                std::iter::once(step.step.to_string())
                    .chain(step.values.iter().map(csv_cell))
                    .chain(std::iter::once(step.status.clone())),
            )?;
        }
        written.push(plume.finish()?);

        // 远场表
        if output.farfield.was_run {
            let mut farfield = CsvFile::create(case_path("farfield.csv"), &farfield_header)?;
            for row in output.farfield.outputs.get(case).into_iter().flatten() {
                if !row.values.is_empty() {
                    farfield.row(row.values.iter().map(csv_cell))?;
                }
            }
            written.push(farfield.finish()?);
        }
    }

    // 潮汐污染累积
    if output.tpb.was_run {
        written.push(write_text(
            folder.join(format!("{}.tpb.txt", name)),
            &output.tpb.memos.join("\n"),
        )?);
    }

    Ok(written)
}

/// 单个 case 的说明文件内容
pub fn case_memos(output: &RunOutput, case: usize) -> String {
    let mut text = String::new();
    text.push_str(CASE_RULE);
    text.push('\n');
    text.push_str(&case_title(output, case));
    text.push('\n');
    text.push_str(CASE_RULE);
    text.push('\n');

    if let Some(memos) = output.timeseries.as_ref().and_then(|ts| ts.memos.get(case)) {
        for memo in memos {
            text.push_str(memo);
            text.push('\n');
        }
    }

    let blocks = [output.plume.memos.get(case), output.plume.postmemos.get(case)];
    for memos in blocks.into_iter().flatten() {
        if !memos.is_empty() {
            text.push_str(&format!("\n{}\n", memos.join("\n")));
        }
    }

    if output.farfield.was_run {
        let memos = output
            .farfield
            .memos
            .get(case)
            .map(|m| m.join("\n"))
            .unwrap_or_default();
        text.push_str(&format!("\n{}\n", memos));
    }

    text
}
