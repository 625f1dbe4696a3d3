//! # 批量执行器
//!
//! 在独立线程池中并行运行场景，汇总成功、跳过和失败数量。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{PlumeError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 单个场景的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 运行成功，附输出报告路径
    Success(String),
    /// 跳过（报告已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (场景路径, 错误信息)
}

/// 批量运行结果统计
#[derive(Debug, Default, PartialEq)]
pub struct BatchResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 失败详情（按场景路径排序）
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// `jobs = 0` 时使用 CPU 核数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理场景列表
    pub fn run<F>(&self, files: &[PathBuf], processor: F) -> Result<BatchResult>
    where
        F: Fn(&Path) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Running scenarios");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| PlumeError::Other(format!("Failed to build thread pool: {}", e)))?;

        debug!("Running {} scenarios on {} threads", files.len(), self.jobs);

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        batch_result.failures.sort();

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let mut result = BatchResult::default();
        result.merge(ProcessResult::Success("a.report.txt".into()));
        result.merge(ProcessResult::Skipped("b.report.txt".into()));
        result.merge(ProcessResult::Failed("c.toml".into(), "boom".into()));
        assert_eq!(result.total(), 3);
        assert_eq!(result.failures, vec![("c.toml".to_string(), "boom".to_string())]);
    }

    #[test]
    fn test_run_parallel() {
        let files: Vec<PathBuf> = (0..8).map(|i| PathBuf::from(format!("s{}.toml", i))).collect();

        let result = BatchRunner::new(2)
            .run(&files, |path| {
                let name = path.display().to_string();
                if name.starts_with("s3") || name.starts_with("s1") {
                    ProcessResult::Failed(name, "invalid".into())
                } else {
                    ProcessResult::Success(name)
                }
            })
            .unwrap();

        assert_eq!(result.success, 6);
        assert_eq!(result.failed, 2);
        assert_eq!(result.failures[0].0, "s1.toml");
        assert_eq!(result.failures[1].0, "s3.toml");
    }

    #[test]
    fn test_zero_jobs_uses_cpus() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
    }
}
