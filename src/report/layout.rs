//! # 各结果表的列布局
//!
//! 根据表头元数据（标签、变量名、单位类别）为每张表生成列格式。
//! 同一次运行中所有 case 共用一套布局。
//!
//! ## 表格规则
//! - 扩散器表：列宽 = 标签长度（非首列 +1）；首列与流量列 5 位小数，其余 1 位
//! - 环境表：列宽下限 7；标签以 `Far-field` 开头的列不显示；小数位按单位类别
//! - 羽流表：首列 `Step` 宽 5；其余列宽 8/9，小数位按单位类别与变量名
//! - 远场表：列宽下限 6，按变量名提高下限；全部使用千位分隔
//!
//! ## 依赖关系
//! - 被 `report/text.rs` 使用
//! - 使用 `report/format.rs`, `models/results.rs`

use crate::models::{ColumnHeader, Scalar, UnitClass};
use crate::report::format::{ColumnFormat, RowFormat};

/// 一张表的布局：显示哪些列、怎么格式化、预先渲染的表头
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// 显示列在数据行中的下标
    pub indices: Vec<usize>,
    pub format: RowFormat,
    /// 标签行
    pub header: String,
    /// 单位行
    pub units: String,
}

impl TableLayout {
    fn build(labels: Vec<String>, units: Vec<String>, columns: Vec<(usize, ColumnFormat)>) -> Self {
        let (indices, formats): (Vec<usize>, Vec<ColumnFormat>) = columns.into_iter().unzip();
        let format = RowFormat::new(formats);

        let pick = |cells: &[String]| -> Vec<String> {
            indices
                .iter()
                .map(|&i| cells.get(i).cloned().unwrap_or_default())
                .collect()
        };
        let header = format.header_row(&pick(&labels));
        let units = format.header_row(&pick(&units));

        TableLayout {
            indices,
            format,
            header,
            units,
        }
    }

    /// 渲染一行数据
    pub fn render(&self, values: &[Scalar]) -> String {
        let picked: Vec<Scalar> = self
            .indices
            .iter()
            .map(|&i| values.get(i).cloned().unwrap_or(Scalar::Missing))
            .collect();
        self.format.value_row(&picked)
    }
}

/// 标签决定的列宽：标签字符数，非首列多留一个空格，不小于 `minimum`
pub fn column_width(label: &str, index: usize, minimum: usize) -> usize {
    let width = label.chars().count() + usize::from(index > 0);
    width.max(minimum)
}

fn labels_and_units(headers: &[ColumnHeader]) -> (Vec<String>, Vec<String>) {
    headers
        .iter()
        .map(|h| (h.label.clone(), h.units_cell()))
        .unzip()
}

// ─────────────────────────────────────────────────────────────
// 扩散器表
// ─────────────────────────────────────────────────────────────

/// 扩散器表布局
pub fn diffuser_layout(headers: &[ColumnHeader]) -> TableLayout {
    let columns = headers
        .iter()
        .enumerate()
        .map(|(i, hdr)| {
            let width = column_width(&hdr.label, i, 0);
            let precision = if i == 0 || hdr.units == UnitClass::FlowRate {
                5
            } else {
                1
            };
            (i, ColumnFormat::fixed(width, precision))
        })
        .collect();

    let (labels, units) = labels_and_units(headers);
    TableLayout::build(labels, units, columns)
}

// ─────────────────────────────────────────────────────────────
// 环境表
// ─────────────────────────────────────────────────────────────

/// 环境表中各单位类别的小数位数
pub fn ambient_precision(units: UnitClass) -> usize {
    match units {
        UnitClass::Angle => 0,
        UnitClass::Length => 3,
        UnitClass::Speed | UnitClass::Density | UnitClass::DecayRate => 4,
        UnitClass::Concentration | UnitClass::Salinity | UnitClass::Temperature => 2,
        _ => 1,
    }
}

/// 环境表布局。远场列（`Far-field ...`）不在控制台显示
pub fn ambient_layout(headers: &[ColumnHeader]) -> TableLayout {
    let columns = headers
        .iter()
        .enumerate()
        .filter(|(_, hdr)| !hdr.label.starts_with("Far-field"))
        .map(|(i, hdr)| {
            let width = column_width(&hdr.label, i, 7);
            (i, ColumnFormat::fixed(width, ambient_precision(hdr.units)))
        })
        .collect();

    let (labels, units) = labels_and_units(headers);
    TableLayout::build(labels, units, columns)
}

// ─────────────────────────────────────────────────────────────
// 羽流表
// ─────────────────────────────────────────────────────────────

/// 羽流表中单列的格式。按顺序匹配，先命中者生效
pub fn plume_column(hdr: &ColumnHeader) -> ColumnFormat {
    let name = hdr.name.as_str();
    match hdr.units {
        UnitClass::Angle => ColumnFormat::fixed(8, 3),
        _ if name == "d_mass" => ColumnFormat::fixed(9, 5),
        UnitClass::Density => ColumnFormat::fixed(9, 4),
        UnitClass::Concentration | UnitClass::Speed => ColumnFormat::fixed(9, 3),
        _ if name == "dilution" => ColumnFormat::fixed(9, 3).grouped(),
        _ if name == "diameter" || hdr.units == UnitClass::DecayRate => {
            ColumnFormat::fixed(9, 4).grouped()
        }
        _ if matches!(
            name,
            "depth" | "iso_diameter" | "x_displacement" | "y_displacement"
        ) =>
        {
            ColumnFormat::fixed(9, 3).grouped()
        }
        _ => ColumnFormat::fixed(9, 2),
    }
}

/// 羽流表布局。数据行为 `[step, values...]`
pub fn plume_layout(headers: &[ColumnHeader]) -> TableLayout {
    let mut labels = vec!["Step".to_string()];
    let mut units = vec![String::new()];
    let mut columns = vec![(0, ColumnFormat::integer(5))];

    for (i, hdr) in headers.iter().enumerate() {
        labels.push(hdr.label.clone());
        units.push(hdr.units_cell());
        columns.push((i + 1, plume_column(hdr)));
    }

    TableLayout::build(labels, units, columns)
}

// ─────────────────────────────────────────────────────────────
// 远场表
// ─────────────────────────────────────────────────────────────

/// 远场表中单列的格式
pub fn farfield_column(hdr: &ColumnHeader, index: usize) -> ColumnFormat {
    let width = column_width(&hdr.label, index, 6);

    let (precision, minimum) = match hdr.name.as_str() {
        "dilution" => (1, 9),
        "adj_width" => (0, 8),
        "total_surf_dsp" => (1, 9),
        "ff_diff_coeff" => (4, 12),
        "diffusivity" => (4, 9),
        _ => match hdr.units {
            UnitClass::Speed | UnitClass::Time => (2, 8),
            UnitClass::Concentration => (4, 0),
            _ => (1, 0),
        },
    };

    ColumnFormat::fixed(width.max(minimum), precision).grouped()
}

/// 远场表布局；没有表头时返回 `None`
pub fn farfield_layout(headers: &[ColumnHeader]) -> Option<TableLayout> {
    if headers.is_empty() {
        return None;
    }

    let columns = headers
        .iter()
        .enumerate()
        .map(|(i, hdr)| (i, farfield_column(hdr, i)))
        .collect();

    let (labels, units) = labels_and_units(headers);
    Some(TableLayout::build(labels, units, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hdr(name: &str, label: &str, units: UnitClass, units_label: &str) -> ColumnHeader {
        ColumnHeader::new(name, label, units, units_label)
    }

    #[test]
    fn test_column_width() {
        assert_eq!(column_width("Depth", 0, 0), 5);
        assert_eq!(column_width("Depth", 1, 0), 6);
        assert_eq!(column_width("Depth", 1, 7), 7);
        assert_eq!(column_width("Far-field speed", 3, 7), 16);
    }

    #[test]
    fn test_diffuser_layout() {
        let headers = vec![
            hdr("diameter", "P-dia", UnitClass::Length, "m"),
            hdr("vertical_angle", "Ver angl", UnitClass::Angle, "deg"),
            hdr("effluent_flow", "Ttl-flo", UnitClass::FlowRate, "MGD"),
        ];
        let layout = diffuser_layout(&headers);

        assert_eq!(layout.header, "P-dia  Ver angl  Ttl-flo");
        assert_eq!(layout.units, "  (m)     (deg)    (MGD)");
        assert_eq!(
            layout.render(&[
                Scalar::Number(0.05),
                Scalar::Number(20.0),
                Scalar::Number(0.05)
            ]),
            "0.05000      20.0  0.05000"
        );
    }

    #[test]
    fn test_ambient_layout_precision_and_far_field_drop() {
        let headers = vec![
            hdr("depth", "Depth", UnitClass::Length, "m"),
            hdr("current_dir", "Amb-dir", UnitClass::Angle, "deg"),
            hdr("ff_velocity", "Far-field speed", UnitClass::Speed, "m/s"),
            hdr("salinity", "Amb-sal", UnitClass::Salinity, "psu"),
            hdr("decay_rate", "Decay", UnitClass::DecayRate, "s-1"),
        ];
        let layout = ambient_layout(&headers);

        assert_eq!(layout.indices, vec![0, 1, 3, 4]);
        let widths: Vec<usize> = layout.format.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![7, 8, 8, 7]);
        let precisions: Vec<Option<usize>> =
            layout.format.columns.iter().map(|c| c.precision).collect();
        assert_eq!(precisions, vec![Some(3), Some(0), Some(2), Some(4)]);

        let row = layout.render(&[
            Scalar::Number(50.0),
            Scalar::Number(90.0),
            Scalar::Number(0.3),
            Scalar::Number(33.0),
            Scalar::Number(0.0),
        ]);
        assert_eq!(row, " 50.000       90    33.00  0.0000");
        assert!(!layout.header.contains("Far-field"));
    }

    #[test]
    fn test_plume_column_rules() {
        let angle = plume_column(&hdr("vertical_angle", "V-angle", UnitClass::Angle, "deg"));
        assert_eq!(angle, ColumnFormat::fixed(8, 3));

        let d_mass = plume_column(&hdr("d_mass", "Entrained", UnitClass::Mass, "kg"));
        assert_eq!(d_mass, ColumnFormat::fixed(9, 5));

        let density = plume_column(&hdr("density", "Density", UnitClass::Density, "sigmaT"));
        assert_eq!(density, ColumnFormat::fixed(9, 4));

        let speed = plume_column(&hdr("speed", "Velocity", UnitClass::Speed, "m/s"));
        assert_eq!(speed, ColumnFormat::fixed(9, 3));

        let dilution = plume_column(&hdr("dilution", "Dilution", UnitClass::Unitless, ""));
        assert_eq!(dilution, ColumnFormat::fixed(9, 3).grouped());

        let diameter = plume_column(&hdr("diameter", "Width", UnitClass::Length, "m"));
        assert_eq!(diameter, ColumnFormat::fixed(9, 4).grouped());

        let depth = plume_column(&hdr("depth", "Depth", UnitClass::Length, "m"));
        assert_eq!(depth, ColumnFormat::fixed(9, 3).grouped());

        let temp = plume_column(&hdr("temperature", "Temp.", UnitClass::Temperature, "C"));
        assert_eq!(temp, ColumnFormat::fixed(9, 2));

        // 角度规则优先于变量名规则
        let odd = plume_column(&hdr("d_mass", "Odd", UnitClass::Angle, "deg"));
        assert_eq!(odd, ColumnFormat::fixed(8, 3));
    }

    #[test]
    fn test_plume_layout() {
        let headers = vec![
            hdr("depth", "Depth", UnitClass::Length, "m"),
            hdr("dilution", "Dilution", UnitClass::Unitless, ""),
        ];
        let layout = plume_layout(&headers);

        assert_eq!(layout.header, " Step     Depth  Dilution");
        assert_eq!(layout.units, "            (m)          ");
        assert_eq!(
            layout.render(&[
                Scalar::Integer(467),
                Scalar::Number(35.23),
                Scalar::Number(10156.3)
            ]),
            "  467    35.230 10,156.300"
        );
    }

    #[test]
    fn test_farfield_column_rules() {
        let conc = farfield_column(&hdr("concentration", "Conc", UnitClass::Concentration, "ppm"), 0);
        assert_eq!(conc, ColumnFormat::fixed(6, 4).grouped());

        let dil = farfield_column(&hdr("dilution", "Dilution", UnitClass::Unitless, ""), 1);
        assert_eq!(dil, ColumnFormat::fixed(9, 1).grouped());

        let coeff = farfield_column(&hdr("ff_diff_coeff", "Eddy", UnitClass::EddyDiffusivity, ""), 2);
        assert_eq!(coeff, ColumnFormat::fixed(12, 4).grouped());

        let width = farfield_column(&hdr("adj_width", "Width", UnitClass::Length, "m"), 3);
        assert_eq!(width, ColumnFormat::fixed(8, 0).grouped());

        let time = farfield_column(&hdr("total_time", "Time", UnitClass::Time, "hrs"), 4);
        assert_eq!(time, ColumnFormat::fixed(8, 2).grouped());

        let dist = farfield_column(
            &hdr("total_surf_dsp", "Distance from source", UnitClass::Length, "m"),
            5,
        );
        assert_eq!(dist, ColumnFormat::fixed(21, 1).grouped());
    }

    #[test]
    fn test_farfield_layout_without_headers() {
        assert!(farfield_layout(&[]).is_none());
    }
}
