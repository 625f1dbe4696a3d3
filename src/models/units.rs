//! # 物理单位
//!
//! 单位类别 (`UnitClass`) 与具体单位 (`Unit`)。
//!
//! 单位换算由外部模拟引擎完成，这里只负责：
//! - 场景文件中的单位声明（序列化为引擎可识别的名称）
//! - 结果表头中的单位类别（决定列宽与小数位数）
//! - 单位显示标签
//!
//! ## 依赖关系
//! - 被 `models/scenario.rs`, `models/results.rs` 使用
//! - 被 `report/layout.rs` 使用

use serde::{Deserialize, Serialize};

/// 单位类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitClass {
    Length,
    Angle,
    Speed,
    Density,
    DecayRate,
    Concentration,
    Salinity,
    Temperature,
    FlowRate,
    Time,
    Mass,
    #[default]
    Unitless,
    Isopleth,
    EddyDiffusivity,
    /// 引擎返回了本工具不认识的类别
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for UnitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitClass::Length => "Length",
            UnitClass::Angle => "Angle",
            UnitClass::Speed => "Speed",
            UnitClass::Density => "Density",
            UnitClass::DecayRate => "DecayRate",
            UnitClass::Concentration => "Concentration",
            UnitClass::Salinity => "Salinity",
            UnitClass::Temperature => "Temperature",
            UnitClass::FlowRate => "FlowRate",
            UnitClass::Time => "Time",
            UnitClass::Mass => "Mass",
            UnitClass::Unitless => "Unitless",
            UnitClass::Isopleth => "Isopleth",
            UnitClass::EddyDiffusivity => "EddyDiffusivity",
            UnitClass::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// 具体单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    // Length
    Meters,
    Centimeters,
    Feet,
    Inches,
    Fathoms,
    // Angle
    Degrees,
    /// 以正北为 0 的方位角
    NDegrees,
    Radians,
    // Speed
    MetersPerSecond,
    CentimetersPerSecond,
    FeetPerSecond,
    Knots,
    // Density
    SigmaT,
    KilogramsPerCubicMeter,
    // DecayRate
    PerSecond,
    PerDay,
    T90Hours,
    // Concentration
    KilogramPerKilogram,
    PartsPerMillion,
    PartsPerBillion,
    Percent,
    ColoniesPer100Ml,
    // Salinity
    PracticalSalinityUnits,
    // Temperature
    Celsius,
    Fahrenheit,
    // FlowRate
    CubicMetersPerSecond,
    MegagallonsPerDay,
    CubicFeetPerSecond,
    // Time
    Seconds,
    Minutes,
    Hours,
    Days,
    // Mass
    Kilograms,
    // Unitless
    Unitless,
    // Isopleth
    Concentration,
    Dilution,
    // EddyDiffusivity
    Diffusivity,
}

impl Unit {
    /// 所属单位类别
    pub fn class(&self) -> UnitClass {
        match self {
            Unit::Meters | Unit::Centimeters | Unit::Feet | Unit::Inches | Unit::Fathoms => {
                UnitClass::Length
            }
            Unit::Degrees | Unit::NDegrees | Unit::Radians => UnitClass::Angle,
            Unit::MetersPerSecond
            | Unit::CentimetersPerSecond
            | Unit::FeetPerSecond
            | Unit::Knots => UnitClass::Speed,
            Unit::SigmaT | Unit::KilogramsPerCubicMeter => UnitClass::Density,
            Unit::PerSecond | Unit::PerDay | Unit::T90Hours => UnitClass::DecayRate,
            Unit::KilogramPerKilogram
            | Unit::PartsPerMillion
            | Unit::PartsPerBillion
            | Unit::Percent
            | Unit::ColoniesPer100Ml => UnitClass::Concentration,
            Unit::PracticalSalinityUnits => UnitClass::Salinity,
            Unit::Celsius | Unit::Fahrenheit => UnitClass::Temperature,
            Unit::CubicMetersPerSecond | Unit::MegagallonsPerDay | Unit::CubicFeetPerSecond => {
                UnitClass::FlowRate
            }
            Unit::Seconds | Unit::Minutes | Unit::Hours | Unit::Days => UnitClass::Time,
            Unit::Kilograms => UnitClass::Mass,
            Unit::Unitless => UnitClass::Unitless,
            Unit::Concentration | Unit::Dilution => UnitClass::Isopleth,
            Unit::Diffusivity => UnitClass::EddyDiffusivity,
        }
    }

    /// 显示标签（用于表头的单位行）
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Centimeters => "cm",
            Unit::Feet => "ft",
            Unit::Inches => "in",
            Unit::Fathoms => "fth",
            Unit::Degrees => "deg",
            Unit::NDegrees => "N-deg",
            Unit::Radians => "rad",
            Unit::MetersPerSecond => "m/s",
            Unit::CentimetersPerSecond => "cm/s",
            Unit::FeetPerSecond => "ft/s",
            Unit::Knots => "kt",
            Unit::SigmaT => "sigmaT",
            Unit::KilogramsPerCubicMeter => "kg/m3",
            Unit::PerSecond => "s-1",
            Unit::PerDay => "d-1",
            Unit::T90Hours => "T90hr",
            Unit::KilogramPerKilogram => "kg/kg",
            Unit::PartsPerMillion => "ppm",
            Unit::PartsPerBillion => "ppb",
            Unit::Percent => "%",
            Unit::ColoniesPer100Ml => "col/dl",
            Unit::PracticalSalinityUnits => "psu",
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
            Unit::CubicMetersPerSecond => "m3/s",
            Unit::MegagallonsPerDay => "MGD",
            Unit::CubicFeetPerSecond => "ft3/s",
            Unit::Seconds => "s",
            Unit::Minutes => "min",
            Unit::Hours => "hr",
            Unit::Days => "d",
            Unit::Kilograms => "kg",
            Unit::Unitless => "",
            Unit::Concentration => "concent",
            Unit::Dilution => "dilution",
            Unit::Diffusivity => "m0.67/s2",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
