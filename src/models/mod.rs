//! # 数据模型模块
//!
//! 定义场景参数、模拟结果和物理单位的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `engine/`, `report/` 和 `commands/` 使用
//! - 子模块: units, scenario, results

pub mod results;
pub mod scenario;
pub mod units;

pub use results::{ColumnHeader, RunOutput, Scalar};
pub use scenario::Scenario;
pub use units::{Unit, UnitClass};
