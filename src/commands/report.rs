//! # report 命令实现
//!
//! 读取保存的结果 JSON，生成文本报告。

use crate::cli::result::ReportArgs;
use crate::error::{PlumeError, Result};
use crate::parsers::load_result;
use crate::report::{print_report, write_report};
use crate::utils::output;

/// 执行 report 命令
pub fn execute(args: ReportArgs) -> Result<()> {
    let run_output = load_result(&args.result)?;

    if !run_output.success {
        return Err(PlumeError::SimulationFailed(run_output.failure_message()));
    }

    match &args.output {
        Some(path) => {
            write_report(&run_output, path)?;
            output::print_written(
                &args.result.display().to_string(),
                &path.display().to_string(),
            );
        }
        None => print_report(&run_output),
    }
    Ok(())
}
