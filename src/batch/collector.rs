//! # 场景文件收集器
//!
//! 根据输入路径和 glob 模式收集待运行的场景文件。
//!
//! ## 功能
//! - 单文件输入直接返回
//! - 目录输入按模式匹配文件名（逗号分隔多模式）
//! - 可选递归搜索
//! - 结果按路径排序
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{PlumeError, Result};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配模式
pub const DEFAULT_PATTERN: &str = "*.toml";

/// 场景文件收集器
pub struct ScenarioCollector {
    input: PathBuf,
    patterns: Vec<glob::Pattern>,
    recursive: bool,
}

impl ScenarioCollector {
    pub fn new(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔），空串时使用 `*.toml`
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let mut patterns = Vec::new();
        for raw in pattern.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let compiled = glob::Pattern::new(raw).map_err(|e| {
                PlumeError::InvalidArgument(format!("Invalid pattern '{}': {}", raw, e))
            })?;
            patterns.push(compiled);
        }
        self.patterns = patterns;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的场景文件
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(PlumeError::FileNotFound {
                path: self.input.display().to_string(),
            });
        }

        let walker = if self.recursive {
            WalkDir::new(&self.input)
        } else {
            WalkDir::new(&self.input).max_depth(1)
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        if self.patterns.is_empty() {
            return name.ends_with(".toml");
        }
        self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_collect_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b_sejpa.toml"));
        touch(&dir.path().join("a_tutorial.toml"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("nested").join("c_trwtp.toml"));

        let files = ScenarioCollector::new(dir.path())
            .with_pattern(DEFAULT_PATTERN)
            .unwrap()
            .collect()
            .unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_tutorial.toml", "b_sejpa.toml"]);

        let files = ScenarioCollector::new(dir.path())
            .with_pattern("")
            .unwrap()
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_multiple_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("SEJPA_aug2003.toml"));
        touch(&dir.path().join("SEJPA_oct2003.toml"));
        touch(&dir.path().join("TRwtp.toml"));

        let files = ScenarioCollector::new(dir.path())
            .with_pattern("SEJPA_aug*, TR*.toml")
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_single_file_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.toml");
        touch(&file);

        let collector = ScenarioCollector::new(&file);
        assert_eq!(collector.collect().unwrap(), vec![file]);

        assert!(ScenarioCollector::new(dir.path()).with_pattern("[").is_err());
        assert!(matches!(
            ScenarioCollector::new(&dir.path().join("missing")).collect(),
            Err(PlumeError::FileNotFound { .. })
        ));
    }
}
