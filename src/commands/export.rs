//! # export 命令实现
//!
//! 读取保存的结果 JSON，按 case 导出 CSV 表和说明文件。

use crate::batch::scenario_stem;
use crate::cli::result::ExportArgs;
use crate::error::{PlumeError, Result};
use crate::parsers::load_result;
use crate::report::export_csv;
use crate::utils::output;

/// 执行 export 命令
pub fn execute(args: ExportArgs) -> Result<()> {
    let run_output = load_result(&args.result)?;

    if !run_output.success {
        return Err(PlumeError::SimulationFailed(run_output.failure_message()));
    }

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| {
            let stem = scenario_stem(&args.result);
            stem.strip_suffix(".result").unwrap_or(&stem).to_string()
        });
    let files = export_csv(&run_output, &args.dir, &name)?;

    for file in &files {
        output::print_written(&args.result.display().to_string(), &file.display().to_string());
    }
    output::print_done(&format!(
        "Exported {} case(s) into {} file(s) under {}",
        run_output.cases,
        files.len(),
        args.dir.display()
    ));
    Ok(())
}
