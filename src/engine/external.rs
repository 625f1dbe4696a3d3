//! # 外部命令引擎
//!
//! 把场景序列化为 JSON 写入子进程 stdin，从 stdout 解析结果 JSON。
//! 命令行按空白拆分，第一个词为程序名。

use crate::engine::SimulationEngine;
use crate::error::{PlumeError, Result};
use crate::models::{RunOutput, Scenario};
use crate::parsers::results::parse_result_content;

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// 外部模拟引擎
#[derive(Debug, Clone)]
pub struct ExternalEngine {
    program: String,
    args: Vec<String>,
}

impl ExternalEngine {
    pub fn new(program: &str, args: &[&str]) -> Self {
        ExternalEngine {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 从命令行字符串构造，如 `python3 -m vp_bridge`
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let words: Vec<&str> = command_line.split_whitespace().collect();
        match words.split_first() {
            Some((program, args)) => Ok(ExternalEngine::new(program, args)),
            None => Err(PlumeError::InvalidArgument("empty engine command".to_string())),
        }
    }

    /// 完整命令行（用于错误信息）
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl SimulationEngine for ExternalEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, scenario: &Scenario) -> Result<RunOutput> {
        let input = serde_json::to_string(scenario)?;
        info!("Running scenario '{}' with {}", scenario.name, self.command_line());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => PlumeError::CommandNotFound {
                    command: self.program.clone(),
                },
                _ => PlumeError::CommandFailed {
                    command: self.command_line(),
                    stderr: e.to_string(),
                },
            })?;

        // 写完后关闭 stdin，引擎以 EOF 判断输入结束
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| PlumeError::CommandFailed {
                    command: self.command_line(),
                    stderr: e.to_string(),
                })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| PlumeError::CommandFailed {
                command: self.command_line(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(PlumeError::CommandFailed {
                command: self.command_line(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Engine returned {} bytes", stdout.len());

        parse_result_content(&stdout, &format!("<stdout of {}>", self.command_line()))
    }
}
