//! # 结果报告模块
//!
//! 把引擎返回的结果渲染为文本报告、CSV 文件和调试图。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/` 使用
//! - 子模块: format, layout, text, export, plot

pub mod export;
pub mod format;
pub mod layout;
pub mod plot;
pub mod text;

pub use export::export_csv;
pub use plot::{generate_plot, PlotPreset};
pub use text::{print_report, render_report, write_report};
