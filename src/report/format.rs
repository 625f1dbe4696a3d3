//! # 列格式
//!
//! 单列的宽度、小数位数和千位分隔设置，以及按列格式拼接整行。
//!
//! ## 格式规则
//! - 表头与文本右对齐到列宽，超宽时不截断
//! - 数值右对齐，固定小数位数，可选 `,` 千位分隔
//! - 非有限值写作 `nan` / `inf` / `-inf`
//! - 缺失值输出为等宽空白
//! - 各列之间以单个空格分隔
//!
//! ## 依赖关系
//! - 被 `report/layout.rs`, `report/text.rs` 使用
//! - 使用 `models/results.rs` 的 Scalar

use crate::models::Scalar;

/// 单列格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFormat {
    /// 最小列宽
    pub width: usize,
    /// 小数位数；`None` 表示按整数输出（如 Step 列）
    pub precision: Option<usize>,
    /// 是否使用千位分隔符
    pub grouping: bool,
}

impl ColumnFormat {
    /// 定宽定精度
    pub fn fixed(width: usize, precision: usize) -> Self {
        ColumnFormat {
            width,
            precision: Some(precision),
            grouping: false,
        }
    }

    /// 整数列
    pub fn integer(width: usize) -> Self {
        ColumnFormat {
            width,
            precision: None,
            grouping: false,
        }
    }

    /// 启用千位分隔
    pub fn grouped(mut self) -> Self {
        self.grouping = true;
        self
    }

    /// 表头单元格
    pub fn header_cell(&self, text: &str) -> String {
        format!("{:>width$}", text, width = self.width)
    }

    /// 数据单元格
    pub fn value_cell(&self, value: &Scalar) -> String {
        let text = match value {
            Scalar::Integer(i) => match self.precision {
                Some(p) => format_number(*i as f64, p, self.grouping),
                None => format_integer(*i, self.grouping),
            },
            Scalar::Number(x) => match self.precision {
                Some(p) => format_number(*x, p, self.grouping),
                None if x.fract() == 0.0 && x.is_finite() => {
                    format_integer(*x as i64, self.grouping)
                }
                None => format_number(*x, 0, self.grouping),
            },
            Scalar::Text(s) => s.clone(),
            Scalar::Missing => String::new(),
        };
        format!("{:>width$}", text, width = self.width)
    }
}

/// 一张表的全部列格式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFormat {
    pub columns: Vec<ColumnFormat>,
}

impl RowFormat {
    pub fn new(columns: Vec<ColumnFormat>) -> Self {
        RowFormat { columns }
    }

    /// 格式化表头行（标签或单位）
    pub fn header_row<S: AsRef<str>>(&self, cells: &[S]) -> String {
        self.columns
            .iter()
            .zip(cells)
            .map(|(col, cell)| col.header_cell(cell.as_ref()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 格式化数据行。值比列少时缺失部分留空
    pub fn value_row(&self, values: &[Scalar]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| col.value_cell(values.get(i).unwrap_or(&Scalar::Missing)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 定点格式化浮点数
pub fn format_number(x: f64, precision: usize, grouping: bool) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = format!("{:.*}", precision, x);
    if grouping {
        group_thousands(&text)
    } else {
        text
    }
}

fn format_integer(i: i64, grouping: bool) -> String {
    let text = i.to_string();
    if grouping {
        group_thousands(&text)
    } else {
        text
    }
}

/// 在整数部分插入千位分隔符：`-1234567.50` → `-1,234,567.50`
pub fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.5, 2, false), "1.50");
        assert_eq!(format_number(-2.89272, 4, false), "-2.8927");
        assert_eq!(format_number(10156.25, 3, true), "10,156.250");
        assert_eq!(format_number(f64::NAN, 3, false), "nan");
        assert_eq!(format_number(f64::NEG_INFINITY, 3, false), "-inf");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0.05"), "0.05");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("-1234567.50"), "-1,234,567.50");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn test_value_cell_alignment() {
        let col = ColumnFormat::fixed(9, 3);
        assert_eq!(col.value_cell(&Scalar::Number(1.116)), "    1.116");
        assert_eq!(col.value_cell(&Scalar::Integer(49)), "   49.000");
        assert_eq!(col.value_cell(&Scalar::Missing), "         ");

        // 超宽不截断
        let narrow = ColumnFormat::fixed(4, 2);
        assert_eq!(narrow.value_cell(&Scalar::Number(12345.678)), "12345.68");
    }

    #[test]
    fn test_integer_column() {
        let step = ColumnFormat::integer(5);
        assert_eq!(step.value_cell(&Scalar::Integer(467)), "  467");
        assert_eq!(step.value_cell(&Scalar::Number(12.0)), "   12");
        assert_eq!(step.header_cell("Step"), " Step");
    }

    #[test]
    fn test_row_format() {
        let row = RowFormat::new(vec![ColumnFormat::fixed(6, 1), ColumnFormat::fixed(8, 2)]);
        assert_eq!(row.header_row(&["Depth", "Amb-cur"]), " Depth  Amb-cur");
        assert_eq!(row.header_row(&["(m)", ""]), "   (m)         ");
        assert_eq!(
            row.value_row(&[Scalar::Number(49.0), Scalar::Number(0.1)]),
            "  49.0     0.10"
        );
        assert_eq!(row.value_row(&[Scalar::Number(49.0)]), "  49.0         ");
    }
}
