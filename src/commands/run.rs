//! # run 命令实现
//!
//! 单文件模式：运行一个场景，报告输出到 stdout，可选写出 CSV、结果 JSON 和调试图。
//! 目录模式：并行运行目录下的全部场景，每个场景的报告写入输出目录。
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `engine/`, `batch/`, `report/`, `parsers/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::job::PLOT_SIZE;
use crate::batch::{prepare_scenario, scenario_stem, BatchRunner, ScenarioCollector, ScenarioJob};
use crate::cli::run::RunArgs;
use crate::engine::{select_engine, SimulationEngine};
use crate::error::{PlumeError, Result};
use crate::parsers::save_result;
use crate::report::{export_csv, generate_plot, print_report};
use crate::utils::{output, progress};

use std::path::PathBuf;
use tracing::info;

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    let engine = select_engine(args.engine.as_deref(), args.replay.as_deref())?;

    if args.input.is_dir() {
        run_directory(&args, engine.as_ref())
    } else {
        run_single(&args, engine.as_ref())
    }
}

/// `--save-result` 不带路径时，结果写在场景旁边
fn result_path(args: &RunArgs) -> Option<PathBuf> {
    match &args.save_result {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(args.input.with_extension("result.json")),
        None => None,
    }
}

/// 目录模式下 `--save-result` 只能作为开关，结果写到 `{out}/{stem}.result.json`
fn save_result_flag(args: &RunArgs) -> Result<bool> {
    match &args.save_result {
        Some(Some(path)) => Err(PlumeError::InvalidArgument(format!(
            "--save-result takes no path in directory mode (got {})",
            path.display()
        ))),
        Some(None) => Ok(true),
        None => Ok(false),
    }
}

fn run_single(args: &RunArgs, engine: &dyn SimulationEngine) -> Result<()> {
    let scenario = prepare_scenario(&args.input)?;

    let spinner = progress::create_spinner(&format!(
        "Running '{}' with {}",
        scenario.name,
        engine.name()
    ));
    let result = engine.run(&scenario);
    spinner.finish_and_clear();
    let run_output = result?;

    if let Some(path) = result_path(args) {
        save_result(&run_output, &path)?;
        output::print_written(&args.input.display().to_string(), &path.display().to_string());
    }

    if !run_output.success {
        return Err(PlumeError::SimulationFailed(run_output.failure_message()));
    }

    info!("{} cases returned by {}", run_output.cases, engine.name());
    print_report(&run_output);

    if let Some(dir) = &args.csv {
        let name = args
            .name
            .clone()
            .unwrap_or_else(|| scenario_stem(&args.input));
        let files = export_csv(&run_output, dir, &name)?;
        output::print_success(&format!(
            "Wrote {} CSV/text files to {}",
            files.len(),
            dir.display()
        ));
    }

    if let Some(plot) = &args.plot {
        generate_plot(&run_output, args.preset, plot, PLOT_SIZE.0, PLOT_SIZE.1)?;
        output::print_written(args.preset.name(), &plot.display().to_string());
    }

    Ok(())
}

fn run_directory(args: &RunArgs, engine: &dyn SimulationEngine) -> Result<()> {
    if args.replay.is_some() {
        return Err(PlumeError::InvalidArgument(
            "--replay takes a single scenario, not a directory".to_string(),
        ));
    }

    let save_results = save_result_flag(args)?;

    let files = ScenarioCollector::new(&args.input)
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No scenarios matched '{}' under {}",
            args.pattern,
            args.input.display()
        ));
        return Ok(());
    }

    output::print_header(&format!("Running {} scenarios with {}", files.len(), engine.name()));

    let job = ScenarioJob {
        engine,
        input_dir: args.input.clone(),
        output_dir: args.output.clone(),
        csv_dir: args.csv.clone(),
        save_result: save_results,
        plot: args.plot.as_ref().map(|_| args.preset),
        overwrite: args.overwrite,
    };

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Writing reports to {} ({} parallel jobs)",
        args.output.display(),
        runner.jobs()
    ));

    let result = runner.run(&files, |path| job.process(path))?;

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "{} of {} scenario(s) succeeded ({} skipped, {} failed)",
        result.success,
        result.total(),
        result.skipped,
        result.failed
    ));

    if result.failed > 0 {
        return Err(PlumeError::Other(format!(
            "{} scenario(s) failed",
            result.failed
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::path::PathBuf;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["plumekit", "run"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Run(args) => args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_result_path_defaults_next_to_scenario() {
        let args = run_args(&["cases/site.toml", "--save-result"]);
        assert_eq!(result_path(&args), Some(PathBuf::from("cases/site.result.json")));

        let args = run_args(&["cases/site.toml", "--save-result", "keep.json"]);
        assert_eq!(result_path(&args), Some(PathBuf::from("keep.json")));

        let args = run_args(&["cases/site.toml"]);
        assert_eq!(result_path(&args), None);
    }

    #[test]
    fn test_save_result_flag_in_directory_mode() {
        assert!(save_result_flag(&run_args(&["cases", "--save-result"])).unwrap());
        assert!(!save_result_flag(&run_args(&["cases"])).unwrap());
        assert!(matches!(
            save_result_flag(&run_args(&["cases", "--save-result", "one.json"])),
            Err(PlumeError::InvalidArgument(_))
        ));
    }
}
