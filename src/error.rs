//! # 统一错误处理模块
//!
//! 定义 plumekit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// plumekit 统一错误类型
#[derive(Error, Debug)]
pub enum PlumeError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid scenario '{name}':\n  - {}", .problems.join("\n  - "))]
    InvalidScenario { name: String, problems: Vec<String> },

    #[error("Invalid time series {path}: {reason}")]
    InvalidTimeseries { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 模拟引擎错误
    // ─────────────────────────────────────────────────────────────
    #[error("Simulation engine '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("Simulation engine failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("No simulation engine configured (use --engine, PLUMEKIT_ENGINE or --replay)")]
    EngineNotConfigured,

    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Graph series '{0}' not present in result")]
    MissingSeries(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PlumeError>;
