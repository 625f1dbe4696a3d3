//! # 模拟结果数据模型
//!
//! 外部模拟引擎返回的嵌套结果字典。顶层键固定：
//! `success`, `error`, `cases`, `casetime`, `diffuser`, `ambient`,
//! `plume`, `farfield`, `tpb`, `timeseries`, `graphs`, `modelparams`。
//!
//! 缺失的部分一律取默认值，失败的运行（`success = false`）同样可以解析。
//!
//! ## 依赖关系
//! - 被 `parsers/results.rs`, `engine/` 构造
//! - 被 `report/` 消费
//! - 使用 `models/units.rs`

use crate::models::units::UnitClass;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// 表格单元值
///
/// JSON 中非有限数写作字符串 `"nan"` / `"inf"` / `"-inf"`，
/// 读取时也接受 `"NaN"` / `"Infinity"` / `"-Infinity"`。
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Number(f64),
    Text(String),
    Missing,
}

/// 非有限数的文本形式
fn parse_non_finite(text: &str) -> Option<f64> {
    match text {
        "nan" | "NaN" => Some(f64::NAN),
        "inf" | "Infinity" => Some(f64::INFINITY),
        "-inf" | "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

impl Scalar {
    fn from_text(text: String) -> Self {
        match parse_non_finite(&text) {
            Some(x) => Scalar::Number(x),
            None => Scalar::Text(text),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Number(x) if x.is_nan() => serializer.serialize_str("nan"),
            Scalar::Number(x) if x.is_infinite() => {
                serializer.serialize_str(if *x > 0.0 { "inf" } else { "-inf" })
            }
            Scalar::Number(x) => serializer.serialize_f64(*x),
            Scalar::Text(text) => serializer.serialize_str(text),
            Scalar::Missing => serializer.serialize_unit(),
        }
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Scalar, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Scalar::Integer(i),
            Err(_) => Scalar::Number(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Scalar, E> {
        Ok(Scalar::from_text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Scalar, E> {
        Ok(Scalar::from_text(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Missing)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Scalar, D::Error> {
        Scalar::deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn scalar_to_f64<E: de::Error>(value: Scalar) -> std::result::Result<f64, E> {
    match value {
        Scalar::Integer(i) => Ok(i as f64),
        Scalar::Number(x) => Ok(x),
        Scalar::Missing => Ok(f64::NAN),
        Scalar::Text(text) => Err(E::custom(format!("expected a number, found '{}'", text))),
    }
}

/// `Vec<f64>` 字段，非有限值的写法与 [`Scalar`] 相同
mod float_seq {
    use super::{scalar_to_f64, Scalar};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&x| Scalar::Number(x)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Scalar>::deserialize(deserializer)?
            .into_iter()
            .map(scalar_to_f64)
            .collect()
    }
}

/// `Vec<[f64; 2]>` 坐标字段
mod coord_seq {
    use super::{scalar_to_f64, Scalar};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(coords: &[[f64; 2]], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            coords
                .iter()
                .map(|&[x, y]| [Scalar::Number(x), Scalar::Number(y)]),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<[f64; 2]>, D::Error> {
        Vec::<[Scalar; 2]>::deserialize(deserializer)?
            .into_iter()
            .map(|[x, y]| Ok([scalar_to_f64::<D::Error>(x)?, scalar_to_f64::<D::Error>(y)?]))
            .collect()
    }
}

/// 结果列的元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// 变量名（如 `dilution`, `d_mass`）
    #[serde(default)]
    pub name: String,
    /// 显示标签（如 `Dilution`）
    pub label: String,
    /// 单位类别
    #[serde(default)]
    pub units: UnitClass,
    /// 单位标签，可为空（如无量纲）
    #[serde(default)]
    pub units_label: String,
}

impl ColumnHeader {
    pub fn new(name: &str, label: &str, units: UnitClass, units_label: &str) -> Self {
        ColumnHeader {
            name: name.to_string(),
            label: label.to_string(),
            units,
            units_label: units_label.to_string(),
        }
    }

    /// 单位行中的显示文本：`(m)`，无单位时为空
    pub fn units_cell(&self) -> String {
        if self.units_label.is_empty() {
            String::new()
        } else {
            format!("({})", self.units_label)
        }
    }

    /// CSV 表头文本：`Depth (m)`，无单位时仅为标签
    pub fn csv_header(&self) -> String {
        if self.units_label.is_empty() {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, self.units_label)
        }
    }
}

/// 扩散器表：每个 case 一行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffuserSection {
    pub headers: Vec<ColumnHeader>,
    pub outputs: Vec<Vec<Scalar>>,
}

/// 环境表：每个 case 若干水层行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientSection {
    pub headers: Vec<ColumnHeader>,
    pub outputs: Vec<Vec<Vec<Scalar>>>,
}

/// 羽流输出表中的一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumeStep {
    pub step: i64,
    #[serde(default)]
    pub values: Vec<Scalar>,
    /// 状态说明（如 `merging`, `trap level`），可为空
    #[serde(default)]
    pub status: String,
}

/// 羽流（近场）结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeSection {
    pub headers: Vec<ColumnHeader>,
    pub outputs: Vec<Vec<PlumeStep>>,
    pub memos: Vec<Vec<String>>,
    pub postmemos: Vec<Vec<String>>,
}

/// 远场表中的一行。空行会被跳过
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarfieldRow {
    pub values: Vec<Scalar>,
}

/// Brooks 远场结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarfieldSection {
    pub was_run: bool,
    pub headers: Vec<ColumnHeader>,
    pub outputs: Vec<Vec<FarfieldRow>>,
    pub memos: Vec<Vec<String>>,
}

/// 潮汐污染累积结果（不分 case）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TpbSection {
    pub was_run: bool,
    pub memos: Vec<String>,
}

/// 时间序列索引说明（每个 case 一组）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeseriesSection {
    pub memos: Vec<Vec<String>>,
}

/// 模型参数说明
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParamsSection {
    pub memos: Vec<String>,
}

/// 调试绘图用的坐标序列
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSeries {
    #[serde(with = "coord_seq")]
    pub coords: Vec<[f64; 2]>,
}

/// 一次引擎运行的完整结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOutput {
    pub success: bool,
    pub error: Option<String>,
    pub cases: usize,
    /// 每个 case 的起始时间（秒）
    #[serde(with = "float_seq")]
    pub casetime: Vec<f64>,
    pub diffuser: DiffuserSection,
    pub ambient: AmbientSection,
    pub plume: PlumeSection,
    pub farfield: FarfieldSection,
    pub tpb: TpbSection,
    pub timeseries: Option<TimeseriesSection>,
    pub graphs: BTreeMap<String, GraphSeries>,
    pub modelparams: Option<ModelParamsSection>,
}

impl RunOutput {
    /// 第 `case` 个 case 的起始时间（小时）
    pub fn case_hours(&self, case: usize) -> f64 {
        self.casetime.get(case).copied().unwrap_or(0.0) / 3600.0
    }

    /// 远场表是否需要输出表头
    pub fn farfield_has_table(&self) -> bool {
        self.farfield.was_run && !self.farfield.headers.is_empty()
    }

    /// 失败原因：引擎给出的错误信息，否则为通用提示
    pub fn failure_message(&self) -> String {
        match self.error.as_deref() {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => "Unknown error".to_string(),
        }
    }
}
