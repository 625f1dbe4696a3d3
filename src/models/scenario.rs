//! # 场景参数模型
//!
//! 一次模拟所需的全部参数记录：模型参数、扩散器几何与排放条件、
//! 环境水柱分层、时间序列以及输出列选择。
//!
//! 场景以 TOML 文件保存（见 `parsers/scenario.rs`），
//! 以 JSON 形式交给外部模拟引擎（见 `engine/`）。
//!
//! ## 依赖关系
//! - 被 `parsers/scenario.rs`, `engine/`, `commands/` 使用
//! - 使用 `models/units.rs`

use crate::models::units::{Unit, UnitClass};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────
// 模型参数
// ─────────────────────────────────────────────────────────────

/// 垂向反转次数上限（羽流在捕获层附近上下振荡时的停止条件）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxVerticalReversals {
    InitialTrapLevel,
    #[default]
    MaxRiseOrFall,
    SecondTrapLevel,
    SecondMaxRiseOrFall,
}

/// 细菌衰减模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacteriaModel {
    #[default]
    ColiformMancini,
    Coliform301h,
    EnterococcusMancini,
}

/// 相似剖面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityProfile {
    #[default]
    Default,
    PowerThreeHalves,
    Gaussian,
}

/// 远场扩散系数模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarfieldDiffusivity {
    #[default]
    Constant,
    #[serde(rename = "power_4_3")]
    Power43,
}

impl FarfieldDiffusivity {
    /// 远场扩散系数列的显示名称
    pub fn column_label(&self) -> &'static str {
        match self {
            FarfieldDiffusivity::Constant => "Eddy diffusivity",
            FarfieldDiffusivity::Power43 => "4/3 eddy diffusivity",
        }
    }
}

/// 模型参数（默认值与引擎默认值一致）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    // 输出与停止条件
    pub report_effective_dilution: bool,
    pub current_vector_averaging: bool,
    pub write_step_freq: u32,
    pub max_reversals: MaxVerticalReversals,
    pub stop_on_bottom_hit: bool,
    pub dont_stop_on_surface_hit: bool,
    pub allow_induced_current: bool,
    pub max_dilution: f64,

    // 方程参数
    pub contraction_coeff: f64,
    pub light_absorb_coeff: f64,
    pub aspiration_coeff: f64,
    pub bacteria_model: BacteriaModel,
    /// true 表示状态方程只考虑盐度和温度（不含压力）
    pub at_equilibrium: bool,
    pub similarity_profile: SimilarityProfile,

    // 远场模型
    pub farfield_diffusivity: FarfieldDiffusivity,
    pub brooks_far_field: bool,
    pub ff_increment: Option<f64>,
    pub output_all_ff_increments: bool,

    // 潮汐污染累积 (TPB)
    pub tidal_pollution_buildup: bool,
    /// 即使不计算 TPB 也必须给出
    pub tpb_channel_width: f64,
    pub tpb_segment_length: Option<f64>,
    pub tpb_upstream_dir: Option<f64>,
    pub tpb_coast_bin: Option<u32>,
    pub tpb_coast_concentration: Option<f64>,
    pub tpb_mixing_zone_ceil: Option<f64>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            report_effective_dilution: false,
            current_vector_averaging: false,
            write_step_freq: 100,
            max_reversals: MaxVerticalReversals::default(),
            stop_on_bottom_hit: false,
            dont_stop_on_surface_hit: false,
            allow_induced_current: false,
            max_dilution: 10000.0,
            contraction_coeff: 1.0,
            light_absorb_coeff: 0.16,
            aspiration_coeff: 0.1,
            bacteria_model: BacteriaModel::default(),
            at_equilibrium: true,
            similarity_profile: SimilarityProfile::default(),
            farfield_diffusivity: FarfieldDiffusivity::default(),
            brooks_far_field: false,
            ff_increment: None,
            output_all_ff_increments: false,
            tidal_pollution_buildup: false,
            tpb_channel_width: 10000.0,
            tpb_segment_length: None,
            tpb_upstream_dir: None,
            tpb_coast_bin: None,
            tpb_coast_concentration: None,
            tpb_mixing_zone_ceil: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 扩散器
// ─────────────────────────────────────────────────────────────

/// 带单位的数值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub units: Unit,
}

impl Quantity {
    pub fn new(value: f64, units: Unit) -> Self {
        Quantity { value, units }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.units.label().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.units.label())
        }
    }
}

/// 扩散器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffuserParameters {
    pub diameter: Quantity,
    pub offset_x: Quantity,
    pub offset_y: Quantity,
    pub vertical_angle: Quantity,
    pub horizontal_angle: Quantity,
    pub num_ports: u32,
    /// 单孔时可省略
    #[serde(default)]
    pub port_spacing: Option<Quantity>,
    pub acute_mixing_zone: Quantity,
    pub isopleth: Quantity,
    pub depth: Quantity,
    /// 由时间序列提供时可省略
    #[serde(default)]
    pub effluent_flow: Option<Quantity>,
    pub salinity: Quantity,
    pub temperature: Quantity,
    pub concentration: Quantity,
}

impl DiffuserParameters {
    /// 按字段列出所有数值及其期望的单位类别
    pub fn quantities(&self) -> Vec<(&'static str, Option<&Quantity>, UnitClass)> {
        vec![
            ("diameter", Some(&self.diameter), UnitClass::Length),
            ("offset_x", Some(&self.offset_x), UnitClass::Length),
            ("offset_y", Some(&self.offset_y), UnitClass::Length),
            ("vertical_angle", Some(&self.vertical_angle), UnitClass::Angle),
            ("horizontal_angle", Some(&self.horizontal_angle), UnitClass::Angle),
            ("port_spacing", self.port_spacing.as_ref(), UnitClass::Length),
            ("acute_mixing_zone", Some(&self.acute_mixing_zone), UnitClass::Length),
            ("isopleth", Some(&self.isopleth), UnitClass::Isopleth),
            ("depth", Some(&self.depth), UnitClass::Length),
            ("effluent_flow", self.effluent_flow.as_ref(), UnitClass::FlowRate),
            ("salinity", Some(&self.salinity), UnitClass::Salinity),
            ("temperature", Some(&self.temperature), UnitClass::Temperature),
            ("concentration", Some(&self.concentration), UnitClass::Concentration),
        ]
    }
}

// ─────────────────────────────────────────────────────────────
// 环境水柱
// ─────────────────────────────────────────────────────────────

/// 水柱表层/底层以外的外推方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Constant,
    ExtrapolateLinear,
    LinearToZero,
}

/// 环境变量的单位与插值设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientStore {
    pub z_is_depth: bool,
    pub extrapolation_sfc: Interpolation,
    pub extrapolation_btm: Interpolation,
    pub z_units: Unit,
    pub current_speed_units: Unit,
    pub current_dir_units: Unit,
    pub salinity_units: Unit,
    pub temperature_units: Unit,
    pub bg_conc_units: Unit,
    pub decay_rate_units: Unit,
    pub ff_velocity_units: Unit,
    pub ff_dir_units: Unit,
    pub ff_diff_coeff_units: Unit,
}

impl Default for AmbientStore {
    fn default() -> Self {
        AmbientStore {
            z_is_depth: true,
            extrapolation_sfc: Interpolation::Constant,
            extrapolation_btm: Interpolation::Constant,
            z_units: Unit::Meters,
            current_speed_units: Unit::MetersPerSecond,
            current_dir_units: Unit::Degrees,
            salinity_units: Unit::PracticalSalinityUnits,
            temperature_units: Unit::Celsius,
            bg_conc_units: Unit::KilogramPerKilogram,
            decay_rate_units: Unit::PerSecond,
            ff_velocity_units: Unit::MetersPerSecond,
            ff_dir_units: Unit::Degrees,
            ff_diff_coeff_units: Unit::Diffusivity,
        }
    }
}

impl AmbientStore {
    /// 单位及其期望的类别
    fn unit_checks(&self) -> [(&'static str, Unit, UnitClass); 10] {
        [
            ("z_units", self.z_units, UnitClass::Length),
            ("current_speed_units", self.current_speed_units, UnitClass::Speed),
            ("current_dir_units", self.current_dir_units, UnitClass::Angle),
            ("salinity_units", self.salinity_units, UnitClass::Salinity),
            ("temperature_units", self.temperature_units, UnitClass::Temperature),
            ("bg_conc_units", self.bg_conc_units, UnitClass::Concentration),
            ("decay_rate_units", self.decay_rate_units, UnitClass::DecayRate),
            ("ff_velocity_units", self.ff_velocity_units, UnitClass::Speed),
            ("ff_dir_units", self.ff_dir_units, UnitClass::Angle),
            (
                "ff_diff_coeff_units",
                self.ff_diff_coeff_units,
                UnitClass::EddyDiffusivity,
            ),
        ]
    }
}

/// 单个水层。`None` 表示由引擎插值或外推
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AmbientLayer {
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_dir: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salinity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_conc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ff_velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ff_dir: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ff_diff_coeff: Option<f64>,
}

impl AmbientLayer {
    pub fn at(z: f64) -> Self {
        AmbientLayer {
            z,
            ..Default::default()
        }
    }
}

/// 环境条件：单位设置 + 分层（由浅到深）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AmbientConditions {
    #[serde(default)]
    pub store: AmbientStore,
    #[serde(default)]
    pub layers: Vec<AmbientLayer>,
}

// ─────────────────────────────────────────────────────────────
// 时间序列
// ─────────────────────────────────────────────────────────────

/// 可由时间序列驱动的环境变量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientVariable {
    CurrentSpeed,
    CurrentDir,
    Salinity,
    Temperature,
    BgConc,
    DecayRate,
    FfVelocity,
    FfDir,
    FfDiffCoeff,
}

impl AmbientVariable {
    pub fn unit_class(&self) -> UnitClass {
        match self {
            AmbientVariable::CurrentSpeed | AmbientVariable::FfVelocity => UnitClass::Speed,
            AmbientVariable::CurrentDir | AmbientVariable::FfDir => UnitClass::Angle,
            AmbientVariable::Salinity => UnitClass::Salinity,
            AmbientVariable::Temperature => UnitClass::Temperature,
            AmbientVariable::BgConc => UnitClass::Concentration,
            AmbientVariable::DecayRate => UnitClass::DecayRate,
            AmbientVariable::FfDiffCoeff => UnitClass::EddyDiffusivity,
        }
    }
}

/// 可由时间序列驱动的扩散器变量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffuserVariable {
    EffluentFlow,
    Salinity,
    Temperature,
    Concentration,
}

impl DiffuserVariable {
    pub fn unit_class(&self) -> UnitClass {
        match self {
            DiffuserVariable::EffluentFlow => UnitClass::FlowRate,
            DiffuserVariable::Salinity => UnitClass::Salinity,
            DiffuserVariable::Temperature => UnitClass::Temperature,
            DiffuserVariable::Concentration => UnitClass::Concentration,
        }
    }
}

fn default_increment_hours() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_depth_units() -> Unit {
    Unit::Meters
}

fn default_time_units() -> Unit {
    Unit::Hours
}

/// 环境时间序列文件（按深度分层）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSeries {
    pub variable: AmbientVariable,
    pub file: PathBuf,
    pub units: Unit,
    /// 相邻两行的时间间隔（小时）
    #[serde(default = "default_increment_hours")]
    pub increment_hours: f64,
    #[serde(default = "default_true")]
    pub z_is_depth: bool,
    #[serde(default = "default_depth_units")]
    pub depth_units: Unit,
}

/// 扩散器时间序列文件（单列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffuserSeries {
    pub variable: DiffuserVariable,
    pub file: PathBuf,
    pub units: Unit,
    #[serde(default = "default_increment_hours")]
    pub increment_hours: f64,
}

/// 时间序列配置：模拟时间窗口 + 各变量的序列文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesConfig {
    pub start_time: f64,
    pub end_time: f64,
    pub time_increment: f64,
    #[serde(default = "default_time_units")]
    pub time_units: Unit,
    #[serde(default)]
    pub ambient: Vec<AmbientSeries>,
    #[serde(default)]
    pub diffuser: Vec<DiffuserSeries>,
}

impl TimeseriesConfig {
    /// 换算为小时的 (start, end, increment)
    pub fn window_hours(&self) -> Option<(f64, f64, f64)> {
        let factor = match self.time_units {
            Unit::Seconds => 1.0 / 3600.0,
            Unit::Minutes => 1.0 / 60.0,
            Unit::Hours => 1.0,
            Unit::Days => 24.0,
            _ => return None,
        };
        Some((
            self.start_time * factor,
            self.end_time * factor,
            self.time_increment * factor,
        ))
    }

    /// 时间窗口内的 case 数
    pub fn case_count(&self) -> Option<usize> {
        let (start, end, step) = self.window_hours()?;
        if step <= 0.0 || end < start {
            return None;
        }
        Some(((end - start) / step).floor() as usize + 1)
    }
}

// ─────────────────────────────────────────────────────────────
// 输出列
// ─────────────────────────────────────────────────────────────

/// 输出变量来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Element,
    Ambient,
    Model,
    Diffuser,
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regime::Element => write!(f, "element"),
            Regime::Ambient => write!(f, "ambient"),
            Regime::Model => write!(f, "model"),
            Regime::Diffuser => write!(f, "diffuser"),
        }
    }
}

/// 羽流输出表中的一列。添加顺序即列顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputParameter {
    pub regime: Regime,
    pub name: String,
    pub label: String,
    #[serde(rename = "class")]
    pub unit_class: UnitClass,
    pub units: Unit,
}

impl OutputParameter {
    pub fn new(regime: Regime, name: &str, label: &str, units: Unit) -> Self {
        OutputParameter {
            regime,
            name: name.to_string(),
            label: label.to_string(),
            unit_class: units.class(),
            units,
        }
    }
}

/// 输出变量名：小写字母开头，仅含小写字母、数字和下划线
fn output_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap())
}

// ─────────────────────────────────────────────────────────────
// 场景
// ─────────────────────────────────────────────────────────────

/// 完整场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub model: ModelParameters,
    pub diffuser: DiffuserParameters,
    #[serde(default)]
    pub ambient: AmbientConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<TimeseriesConfig>,
    /// 为空时由引擎使用默认输出列
    #[serde(default)]
    pub outputs: Vec<OutputParameter>,
}

impl Scenario {
    /// 检查场景，收集所有问题后一并返回
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        self.validate_model(&mut problems);
        self.validate_diffuser(&mut problems);
        self.validate_ambient(&mut problems);
        self.validate_timeseries(&mut problems);
        self.validate_outputs(&mut problems);

        problems
    }

    fn validate_model(&self, problems: &mut Vec<String>) {
        let model = &self.model;
        if model.write_step_freq == 0 {
            problems.push("model.write_step_freq must be at least 1".to_string());
        }
        if model.max_dilution <= 0.0 {
            problems.push("model.max_dilution must be positive".to_string());
        }
        if model.tpb_channel_width <= 0.0 {
            problems.push("model.tpb_channel_width must be positive".to_string());
        }
        if model.brooks_far_field && model.ff_increment.map_or(false, |inc| inc <= 0.0) {
            problems.push("model.ff_increment must be positive".to_string());
        }
        if model.tidal_pollution_buildup {
            match model.tpb_segment_length {
                Some(len) if len > 0.0 => {}
                _ => problems.push(
                    "model.tpb_segment_length is required for tidal pollution buildup".to_string(),
                ),
            }
        }
    }

    fn validate_diffuser(&self, problems: &mut Vec<String>) {
        let diff = &self.diffuser;

        for (field, quantity, expected) in diff.quantities() {
            if let Some(q) = quantity {
                if q.units.class() != expected {
                    problems.push(format!(
                        "diffuser.{} uses {} units '{}', expected {}",
                        field,
                        q.units.class(),
                        q.units.label(),
                        expected
                    ));
                }
            }
        }

        if diff.diameter.value <= 0.0 {
            problems.push("diffuser.diameter must be positive".to_string());
        }
        if diff.num_ports == 0 {
            problems.push("diffuser.num_ports must be at least 1".to_string());
        }
        if diff.num_ports > 1 && diff.port_spacing.is_none() {
            problems.push("diffuser.port_spacing is required for multiport diffusers".to_string());
        }
        if diff.depth.value < 0.0 {
            problems.push("diffuser.depth must not be negative".to_string());
        }

        let flow_from_series = self.timeseries.as_ref().map_or(false, |ts| {
            ts.diffuser
                .iter()
                .any(|s| s.variable == DiffuserVariable::EffluentFlow)
        });
        if diff.effluent_flow.is_none() && !flow_from_series {
            problems.push(
                "diffuser.effluent_flow must be given directly or by a time series".to_string(),
            );
        }
    }

    fn validate_ambient(&self, problems: &mut Vec<String>) {
        let store = &self.ambient.store;
        for (field, unit, expected) in store.unit_checks() {
            if unit.class() != expected {
                problems.push(format!(
                    "ambient.store.{} uses {} units '{}', expected {}",
                    field,
                    unit.class(),
                    unit.label(),
                    expected
                ));
            }
        }

        let layers = &self.ambient.layers;
        if layers.is_empty() {
            problems.push("ambient.layers must contain at least one layer".to_string());
            return;
        }

        // 由浅到深：深度递增，高度递减
        for pair in layers.windows(2) {
            let ordered = if store.z_is_depth {
                pair[1].z > pair[0].z
            } else {
                pair[1].z < pair[0].z
            };
            if !ordered {
                problems.push(format!(
                    "ambient layers must be ordered shallowest to deepest (z={} then z={})",
                    pair[0].z, pair[1].z
                ));
            }
        }

        for layer in layers {
            if layer.current_speed.map_or(false, |s| s < 0.0) {
                problems.push(format!(
                    "ambient layer z={} has a negative current speed",
                    layer.z
                ));
            }
        }
    }

    fn validate_timeseries(&self, problems: &mut Vec<String>) {
        let Some(ts) = &self.timeseries else {
            return;
        };

        if ts.time_units.class() != UnitClass::Time {
            problems.push(format!(
                "timeseries.time_units '{}' is not a time unit",
                ts.time_units.label()
            ));
        }
        if ts.end_time < ts.start_time {
            problems.push("timeseries.end_time must not precede start_time".to_string());
        }
        if ts.time_increment <= 0.0 {
            problems.push("timeseries.time_increment must be positive".to_string());
        }

        for series in &ts.ambient {
            if series.units.class() != series.variable.unit_class() {
                problems.push(format!(
                    "ambient time series {} uses '{}', expected {} units",
                    series.file.display(),
                    series.units.label(),
                    series.variable.unit_class()
                ));
            }
            if series.depth_units.class() != UnitClass::Length {
                problems.push(format!(
                    "ambient time series {} depth units must be a length",
                    series.file.display()
                ));
            }
            if series.increment_hours <= 0.0 {
                problems.push(format!(
                    "time series {} increment must be positive",
                    series.file.display()
                ));
            }
        }

        for series in &ts.diffuser {
            if series.units.class() != series.variable.unit_class() {
                problems.push(format!(
                    "diffuser time series {} uses '{}', expected {} units",
                    series.file.display(),
                    series.units.label(),
                    series.variable.unit_class()
                ));
            }
            if series.increment_hours <= 0.0 {
                problems.push(format!(
                    "time series {} increment must be positive",
                    series.file.display()
                ));
            }
        }
    }

    fn validate_outputs(&self, problems: &mut Vec<String>) {
        let name_pattern = output_name_re();

        for output in &self.outputs {
            if !name_pattern.is_match(&output.name) {
                problems.push(format!("output parameter name '{}' is malformed", output.name));
            }
            if output.label.trim().is_empty() {
                problems.push(format!("output parameter '{}' has an empty label", output.name));
            }
            if output.units.class() != output.unit_class {
                problems.push(format!(
                    "output parameter '{}' is {} but uses '{}' units",
                    output.name,
                    output.unit_class,
                    output.units.label()
                ));
            }
        }
    }

    /// 单孔扩散器入门场景：49 m 深处 5 cm 单孔，20° 仰角，两层均匀水柱
    pub fn tutorial() -> Self {
        let diffuser = DiffuserParameters {
            diameter: Quantity::new(0.05, Unit::Meters),
            offset_x: Quantity::new(0.0, Unit::Meters),
            offset_y: Quantity::new(0.0, Unit::Meters),
            vertical_angle: Quantity::new(20.0, Unit::Degrees),
            horizontal_angle: Quantity::new(0.0, Unit::NDegrees),
            num_ports: 1,
            port_spacing: None,
            acute_mixing_zone: Quantity::new(100.0, Unit::Meters),
            isopleth: Quantity::new(0.0, Unit::Concentration),
            depth: Quantity::new(49.0, Unit::Meters),
            effluent_flow: Some(Quantity::new(0.05, Unit::MegagallonsPerDay)),
            salinity: Quantity::new(0.0, Unit::PracticalSalinityUnits),
            temperature: Quantity::new(25.0, Unit::Celsius),
            concentration: Quantity::new(100.0, Unit::PartsPerMillion),
        };

        let surface = AmbientLayer {
            z: 0.0,
            current_speed: Some(0.1),
            current_dir: Some(90.0),
            salinity: Some(33.0),
            temperature: Some(15.0),
            bg_conc: Some(0.0),
            decay_rate: Some(0.0),
            ff_velocity: Some(0.0),
            ff_dir: Some(0.0),
            ff_diff_coeff: Some(0.0003),
        };

        let ambient = AmbientConditions {
            store: AmbientStore {
                bg_conc_units: Unit::PartsPerMillion,
                ..AmbientStore::default()
            },
            layers: vec![surface, AmbientLayer::at(50.0)],
        };

        let outputs = vec![
            OutputParameter::new(Regime::Element, "depth", "Depth", Unit::Meters),
            OutputParameter::new(Regime::Element, "diameter", "Width", Unit::Meters),
            OutputParameter::new(Regime::Element, "vertical_angle", "V-angle", Unit::Degrees),
            OutputParameter::new(
                Regime::Element,
                "salinity",
                "Salinity",
                Unit::PracticalSalinityUnits,
            ),
            OutputParameter::new(Regime::Element, "temperature", "Temp.", Unit::Celsius),
            OutputParameter::new(
                Regime::Element,
                "concentration",
                "Pollutant",
                Unit::PartsPerMillion,
            ),
            OutputParameter::new(Regime::Element, "density", "Density", Unit::SigmaT),
            OutputParameter::new(Regime::Element, "speed", "Velocity", Unit::MetersPerSecond),
            OutputParameter::new(Regime::Element, "dilution", "Dilution", Unit::Unitless),
            OutputParameter::new(Regime::Element, "x_displacement", "X-pos", Unit::Meters),
            OutputParameter::new(Regime::Element, "y_displacement", "Y-pos", Unit::Meters),
            OutputParameter::new(Regime::Element, "mass", "Mass", Unit::Kilograms),
            OutputParameter::new(Regime::Element, "d_mass", "Entrained", Unit::Kilograms),
        ];

        Scenario {
            name: "tutorial-single-port".to_string(),
            model: ModelParameters {
                max_reversals: MaxVerticalReversals::SecondMaxRiseOrFall,
                ..ModelParameters::default()
            },
            diffuser,
            ambient,
            timeseries: None,
            outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_is_valid() {
        let scenario = Scenario::tutorial();
        assert!(scenario.validate().is_empty(), "{:?}", scenario.validate());
    }

    #[test]
    fn test_model_defaults() {
        let model = ModelParameters::default();
        assert_eq!(model.write_step_freq, 100);
        assert!((model.max_dilution - 10000.0).abs() < 1e-9);
        assert!(model.at_equilibrium);
        assert!(!model.brooks_far_field);
        assert!((model.tpb_channel_width - 10000.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let mut scenario = Scenario::tutorial();
        scenario.diffuser.diameter = Quantity::new(-1.0, Unit::Meters);
        scenario.diffuser.depth = Quantity::new(49.0, Unit::Celsius);
        scenario.ambient.layers.clear();

        let problems = scenario.validate();
        assert_eq!(problems.len(), 3, "{:?}", problems);
        assert!(problems.iter().any(|p| p.contains("diameter must be positive")));
        assert!(problems.iter().any(|p| p.contains("diffuser.depth uses Temperature")));
        assert!(problems.iter().any(|p| p.contains("at least one layer")));
    }

    #[test]
    fn test_validate_layer_order() {
        let mut scenario = Scenario::tutorial();
        scenario.ambient.layers = vec![AmbientLayer::at(10.0), AmbientLayer::at(5.0)];
        let problems = scenario.validate();
        assert!(problems.iter().any(|p| p.contains("shallowest to deepest")));

        // 高度坐标下，浅层在前意味着 z 递减
        scenario.ambient.store.z_is_depth = false;
        assert!(scenario.validate().is_empty());
    }

    #[test]
    fn test_validate_multiport_needs_spacing() {
        let mut scenario = Scenario::tutorial();
        scenario.diffuser.num_ports = 200;
        let problems = scenario.validate();
        assert!(problems.iter().any(|p| p.contains("port_spacing")));

        scenario.diffuser.port_spacing = Some(Quantity::new(6.0, Unit::Feet));
        assert!(scenario.validate().is_empty());
    }

    #[test]
    fn test_effluent_flow_from_timeseries() {
        let mut scenario = Scenario::tutorial();
        scenario.diffuser.effluent_flow = None;
        assert!(scenario
            .validate()
            .iter()
            .any(|p| p.contains("effluent_flow")));

        scenario.timeseries = Some(TimeseriesConfig {
            start_time: 0.0,
            end_time: 143.0,
            time_increment: 1.0,
            time_units: Unit::Hours,
            ambient: vec![],
            diffuser: vec![DiffuserSeries {
                variable: DiffuserVariable::EffluentFlow,
                file: PathBuf::from("flowrate.csv"),
                units: Unit::MegagallonsPerDay,
                increment_hours: 1.0,
            }],
        });
        assert!(scenario.validate().is_empty());
    }

    #[test]
    fn test_validate_output_parameters() {
        let mut scenario = Scenario::tutorial();
        scenario.outputs.push(OutputParameter {
            regime: Regime::Model,
            name: "Iso Diameter".to_string(),
            label: " ".to_string(),
            unit_class: UnitClass::Length,
            units: Unit::Kilograms,
        });

        let problems = scenario.validate();
        assert_eq!(problems.len(), 3, "{:?}", problems);
    }

    #[test]
    fn test_output_name_pattern_compiled_once() {
        assert!(std::ptr::eq(output_name_re(), output_name_re()));
        assert!(output_name_re().is_match("iso_diameter"));
        assert!(!output_name_re().is_match("Iso Diameter"));
        assert!(!output_name_re().is_match("2nd"));
    }

    #[test]
    fn test_case_count() {
        let ts = TimeseriesConfig {
            start_time: 0.0,
            end_time: 143.0,
            time_increment: 1.0,
            time_units: Unit::Hours,
            ambient: vec![],
            diffuser: vec![],
        };
        assert_eq!(ts.case_count(), Some(144));

        let ts = TimeseriesConfig {
            time_units: Unit::Minutes,
            start_time: 0.0,
            end_time: 120.0,
            time_increment: 30.0,
            ..ts
        };
        assert_eq!(ts.case_count(), Some(5));
    }

    #[test]
    fn test_farfield_diffusivity_label() {
        assert_eq!(
            FarfieldDiffusivity::Power43.column_label(),
            "4/3 eddy diffusivity"
        );
        let parsed: FarfieldDiffusivity = serde_json::from_str("\"power_4_3\"").unwrap();
        assert_eq!(parsed, FarfieldDiffusivity::Power43);
    }
}
