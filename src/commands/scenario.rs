//! # scenario 命令实现
//!
//! - `show`: 用 `tabled` 打印模型参数、扩散器、水层、时间序列和输出列
//! - `check`: 列出所有参数问题，并逐个检查时间序列文件
//! - `init`: 写出单孔入门场景
//!
//! ## 依赖关系
//! - 使用 `cli/scenario.rs` 定义的参数
//! - 使用 `parsers/scenario.rs`, `parsers/timeseries.rs`
//! - 使用 `utils/output.rs`

use crate::cli::scenario::{InitArgs, ScenarioArgs, ScenarioCommands, ScenarioFileArgs};
use crate::error::{PlumeError, Result};
use crate::models::scenario::AmbientLayer;
use crate::models::Scenario;
use crate::parsers::timeseries::{check_ambient_series, check_diffuser_series, SeriesSummary};
use crate::parsers::{load_scenario, save_scenario};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 执行 scenario 命令
pub fn execute(args: ScenarioArgs) -> Result<()> {
    match args.command {
        ScenarioCommands::Show(file) => show(file),
        ScenarioCommands::Check(file) => check(file),
        ScenarioCommands::Init(init_args) => init(init_args),
    }
}

// ─────────────────────────────────────────────────────────────
// show
// ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ParameterRow {
    #[tabled(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl ParameterRow {
    fn new(name: &str, value: impl ToString) -> Self {
        ParameterRow {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "z")]
    z: String,
    #[tabled(rename = "Speed")]
    current_speed: String,
    #[tabled(rename = "Dir")]
    current_dir: String,
    #[tabled(rename = "Salinity")]
    salinity: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Bg conc")]
    bg_conc: String,
    #[tabled(rename = "Decay")]
    decay_rate: String,
    #[tabled(rename = "FF vel")]
    ff_velocity: String,
    #[tabled(rename = "FF dir")]
    ff_dir: String,
    #[tabled(rename = "FF diff")]
    ff_diff_coeff: String,
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl From<&AmbientLayer> for LayerRow {
    fn from(layer: &AmbientLayer) -> Self {
        LayerRow {
            z: layer.z.to_string(),
            current_speed: optional(layer.current_speed),
            current_dir: optional(layer.current_dir),
            salinity: optional(layer.salinity),
            temperature: optional(layer.temperature),
            bg_conc: optional(layer.bg_conc),
            decay_rate: optional(layer.decay_rate),
            ff_velocity: optional(layer.ff_velocity),
            ff_dir: optional(layer.ff_dir),
            ff_diff_coeff: optional(layer.ff_diff_coeff),
        }
    }
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Variable")]
    variable: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Units")]
    units: String,
    #[tabled(rename = "Increment (h)")]
    increment: String,
}

#[derive(Tabled)]
struct OutputRow {
    #[tabled(rename = "Regime")]
    regime: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Units")]
    units: String,
}

fn model_rows(scenario: &Scenario) -> Vec<ParameterRow> {
    let model = &scenario.model;
    let mut rows = vec![
        ParameterRow::new("write_step_freq", model.write_step_freq),
        ParameterRow::new("max_reversals", format!("{:?}", model.max_reversals)),
        ParameterRow::new("max_dilution", model.max_dilution),
        ParameterRow::new("stop_on_bottom_hit", model.stop_on_bottom_hit),
        ParameterRow::new("dont_stop_on_surface_hit", model.dont_stop_on_surface_hit),
        ParameterRow::new("report_effective_dilution", model.report_effective_dilution),
        ParameterRow::new("current_vector_averaging", model.current_vector_averaging),
        ParameterRow::new("allow_induced_current", model.allow_induced_current),
        ParameterRow::new("contraction_coeff", model.contraction_coeff),
        ParameterRow::new("light_absorb_coeff", model.light_absorb_coeff),
        ParameterRow::new("aspiration_coeff", model.aspiration_coeff),
        ParameterRow::new("bacteria_model", format!("{:?}", model.bacteria_model)),
        ParameterRow::new("at_equilibrium", model.at_equilibrium),
        ParameterRow::new("similarity_profile", format!("{:?}", model.similarity_profile)),
        ParameterRow::new("brooks_far_field", model.brooks_far_field),
    ];

    if model.brooks_far_field {
        rows.push(ParameterRow::new(
            "farfield_diffusivity",
            model.farfield_diffusivity.column_label(),
        ));
        rows.push(ParameterRow::new("ff_increment", optional(model.ff_increment)));
        rows.push(ParameterRow::new(
            "output_all_ff_increments",
            model.output_all_ff_increments,
        ));
    }

    rows.push(ParameterRow::new(
        "tidal_pollution_buildup",
        model.tidal_pollution_buildup,
    ));
    if model.tidal_pollution_buildup {
        rows.push(ParameterRow::new("tpb_channel_width", model.tpb_channel_width));
        rows.push(ParameterRow::new(
            "tpb_segment_length",
            optional(model.tpb_segment_length),
        ));
        rows.push(ParameterRow::new("tpb_upstream_dir", optional(model.tpb_upstream_dir)));
        rows.push(ParameterRow::new(
            "tpb_coast_concentration",
            optional(model.tpb_coast_concentration),
        ));
        rows.push(ParameterRow::new(
            "tpb_mixing_zone_ceil",
            optional(model.tpb_mixing_zone_ceil),
        ));
    }
    rows
}

fn diffuser_rows(scenario: &Scenario) -> Vec<ParameterRow> {
    let diffuser = &scenario.diffuser;
    let mut rows = vec![ParameterRow::new("num_ports", diffuser.num_ports)];
    for (name, quantity, _) in diffuser.quantities() {
        let value = match quantity {
            Some(q) => q.to_string(),
            None => "-".to_string(),
        };
        rows.push(ParameterRow::new(name, value));
    }
    rows
}

fn show(args: ScenarioFileArgs) -> Result<()> {
    let scenario = load_scenario(&args.scenario)?;

    output::print_header(&format!("Scenario '{}'", scenario.name));

    println!("Model parameters");
    println!("{}\n", Table::new(model_rows(&scenario)));

    println!("Diffuser");
    println!("{}\n", Table::new(diffuser_rows(&scenario)));

    let store = &scenario.ambient.store;
    println!(
        "Ambient ({} in {}, speed {}, salinity {}, temperature {})",
        if store.z_is_depth { "depth" } else { "height" },
        store.z_units.label(),
        store.current_speed_units.label(),
        store.salinity_units.label(),
        store.temperature_units.label()
    );
    let layers: Vec<LayerRow> = scenario.ambient.layers.iter().map(LayerRow::from).collect();
    println!("{}\n", Table::new(layers));

    if let Some(ts) = &scenario.timeseries {
        let cases = ts
            .case_count()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "Time series ({} to {} every {} {}, {} cases)",
            ts.start_time,
            ts.end_time,
            ts.time_increment,
            ts.time_units.label(),
            cases
        );
        let ambient = ts.ambient.iter().map(|s| SeriesRow {
            variable: format!("ambient.{:?}", s.variable),
            file: s.file.display().to_string(),
            units: s.units.label().to_string(),
            increment: s.increment_hours.to_string(),
        });
        let diffuser = ts.diffuser.iter().map(|s| SeriesRow {
            variable: format!("diffuser.{:?}", s.variable),
            file: s.file.display().to_string(),
            units: s.units.label().to_string(),
            increment: s.increment_hours.to_string(),
        });
        let rows: Vec<SeriesRow> = ambient.chain(diffuser).collect();
        println!("{}\n", Table::new(rows));
    }

    if scenario.outputs.is_empty() {
        println!("Output columns: engine defaults");
    } else {
        println!("Output columns");
        let rows: Vec<OutputRow> = scenario
            .outputs
            .iter()
            .map(|o| OutputRow {
                regime: o.regime.to_string(),
                name: o.name.clone(),
                label: o.label.clone(),
                units: o.units.label().to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────

fn report_series(result: Result<SeriesSummary>, failures: &mut Vec<String>) {
    match result {
        Ok(summary) if summary.covers_window() => output::print_success(&format!(
            "{}: {} rows x {} level(s), {:.2} h",
            summary.path.display(),
            summary.rows,
            summary.levels,
            summary.coverage_hours
        )),
        Ok(summary) => output::print_warning(&format!(
            "{}: {} rows cover {:.2} h, time window is {:.2} h",
            summary.path.display(),
            summary.rows,
            summary.coverage_hours,
            summary.window_hours.unwrap_or_default()
        )),
        Err(e) => {
            output::print_error(&e.to_string());
            failures.push(e.to_string());
        }
    }
}

fn check(args: ScenarioFileArgs) -> Result<()> {
    let scenario = load_scenario(&args.scenario)?;
    let mut problems = scenario.validate();

    for problem in &problems {
        output::print_error(problem);
    }

    if let Some(ts) = &scenario.timeseries {
        let window = ts.window_hours().map(|(start, end, _)| end - start);
        for series in &ts.ambient {
            report_series(check_ambient_series(series, window), &mut problems);
        }
        for series in &ts.diffuser {
            report_series(check_diffuser_series(series, window), &mut problems);
        }
    }

    if !problems.is_empty() {
        return Err(PlumeError::InvalidScenario {
            name: scenario.name,
            problems,
        });
    }

    output::print_done(&format!(
        "Scenario '{}' is valid ({})",
        scenario.name,
        args.scenario.display()
    ));
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// init
// ─────────────────────────────────────────────────────────────

fn init(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.overwrite {
        return Err(PlumeError::InvalidArgument(format!(
            "{} already exists (use --overwrite to replace it)",
            args.output.display()
        )));
    }

    save_scenario(&Scenario::tutorial(), &args.output)?;
    output::print_success(&format!(
        "Wrote tutorial scenario to {}",
        args.output.display()
    ));
    Ok(())
}
