//! # 日志初始化
//!
//! 使用 `tracing-subscriber`，日志一律写到 stderr，stdout 只留给报告。
//!
//! ## 环境变量
//! - `PLUMEKIT_LOG`: 过滤规则（EnvFilter 语法），优先于 `-v`
//! - `PLUMEKIT_LOG_JSON`: 设置后输出 JSON 格式日志

use tracing_subscriber::{fmt, EnvFilter};

/// 日志过滤规则的环境变量
pub const LOG_ENV: &str = "PLUMEKIT_LOG";

/// JSON 日志开关的环境变量
pub const LOG_JSON_ENV: &str = "PLUMEKIT_LOG_JSON";

/// `-v` 次数对应的默认过滤规则
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "plumekit=warn",
        1 => "plumekit=info",
        2 => "plumekit=debug",
        _ => "plumekit=trace",
    }
}

/// 初始化全局 tracing subscriber
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    if std::env::var(LOG_JSON_ENV).is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0), "plumekit=warn");
        assert_eq!(default_filter(2), "plumekit=debug");
        assert_eq!(default_filter(9), "plumekit=trace");
    }
}
