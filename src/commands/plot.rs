//! # plot 命令实现
//!
//! 读取保存的结果 JSON，按预设绘制调试图。

use crate::cli::result::PlotArgs;
use crate::error::Result;
use crate::parsers::load_result;
use crate::report::generate_plot;
use crate::utils::output;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    let run_output = load_result(&args.result)?;
    generate_plot(&run_output, args.preset, &args.output, args.width, args.height)?;
    output::print_written(args.preset.name(), &args.output.display().to_string());
    Ok(())
}
