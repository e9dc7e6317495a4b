use clap::{Parser, Subcommand};
use cz_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, SeriesVariable,
    SourceRequest, StopHandle, query, run_service,
};
use cz_core::Zone;
use cz_project::ControllerConfig;
use cz_results::{CycleSnapshot, RunManifest, SourceKind, StopReason};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "coldzone.yaml";

#[derive(Parser)]
#[command(name = "coldzone")]
#[command(about = "Coldzone - multi-zone refrigerated airflow controller", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct StoreArgs {
    /// Path to the controller configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
    /// Run store directory (defaults to .coldzone/runs next to the config)
    #[arg(long)]
    runs_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the reference facility configuration
    InitConfig {
        /// Output path (.yaml, .yml or .json)
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        config: PathBuf,
    },
    /// Run the control loop until Ctrl-C or the cycle limit
    Run {
        #[command(flatten)]
        store: StoreArgs,
        /// File rewritten with the latest cycle snapshot
        #[arg(long)]
        live: Option<PathBuf>,
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
        /// Control period in seconds (overrides the configuration)
        #[arg(long)]
        period: Option<f64>,
        /// Synthetic sensor seed (overrides the configuration)
        #[arg(long, conflicts_with = "replay")]
        seed: Option<u64>,
        /// Replay the temperatures recorded by an earlier run
        #[arg(long)]
        replay: Option<String>,
        /// Run cycles back to back instead of once per control period
        #[arg(long)]
        no_pacing: bool,
    },
    /// List stored runs
    Runs {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Show details of a stored run
    ShowRun {
        /// Run ID to display
        run_id: String,
        #[command(flatten)]
        store: StoreArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export a per-cycle series from a run as CSV
    ExportSeries {
        /// Run ID
        run_id: String,
        /// Variable name (temperature, damper, setpoint, fan_power)
        variable: String,
        /// Zone for per-zone variables
        #[arg(long)]
        zone: Option<Zone>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        store: StoreArgs,
    },
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig { path, force } => cmd_init_config(&path, force),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Run {
            store,
            live,
            cycles,
            period,
            seed,
            replay,
            no_pacing,
        } => {
            let source = match replay {
                Some(run_id) => SourceRequest::Replay { run_id },
                None => SourceRequest::Synthetic { seed },
            };
            let options = RunOptions {
                max_cycles: cycles,
                pacing: !no_pacing,
                live_path: live,
            };
            cmd_run(&store, period, source, options)
        }
        Commands::Runs { store } => cmd_runs(&store),
        Commands::ShowRun {
            run_id,
            store,
            json,
        } => cmd_show_run(&store, &run_id, json),
        Commands::ExportSeries {
            run_id,
            variable,
            zone,
            output,
            store,
        } => cmd_export_series(&store, &run_id, &variable, zone, output.as_deref()),
    }
}

fn cmd_init_config(path: &Path, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let config = ControllerConfig::reference();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => cz_project::save_json(path, &config)?,
        _ => cz_project::save_yaml(path, &config)?,
    }
    println!("✓ Wrote reference configuration to {}", path.display());
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = cz_project::load(config_path)?;
    cz_project::validate_config(&config)?;
    println!("✓ Configuration is valid");
    println!("  Facility: {}", config.name);
    println!("  Control period: {} s", config.control_period_s);
    for zone in &config.zones {
        println!(
            "  {:<8} setpoint {:>6.1} °C  kp={} ki={} kd={}",
            zone.zone.name(),
            zone.setpoint_c,
            zone.gains.kp,
            zone.gains.ki,
            zone.gains.kd
        );
    }
    Ok(())
}

fn cmd_run(
    store: &StoreArgs,
    period: Option<f64>,
    source: SourceRequest,
    options: RunOptions,
) -> AppResult<()> {
    let stop = StopHandle::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        tracing::info!("stop requested");
        handler_stop.stop();
    })
    .map_err(|e| AppError::Signal(e.to_string()))?;

    let request = RunRequest {
        config_path: &store.config,
        runs_dir: store.runs_dir.as_deref(),
        period_s: period,
        source,
        options,
    };

    println!("Starting control loop (Ctrl-C to stop)");
    let response =
        run_service::run_with_progress(&request, &stop, Some(&mut render_cli_progress))?;

    println!("\n✓ Run stopped: {}", response.run_id);
    print_manifest(&response.manifest);
    Ok(())
}

fn render_cli_progress(event: RunProgressEvent) {
    match (event.stage, &event.snapshot) {
        (RunStage::Running, Some(snapshot)) => println!("{}", cycle_line(snapshot)),
        (stage, _) => {
            if let Some(msg) = &event.message {
                println!("[{:?}] {}", stage, msg);
            }
        }
    }
}

fn cycle_line(snapshot: &CycleSnapshot) -> String {
    format!(
        "Cycle {:04} | TEMP {} | DAMPERS {} | Fan {:.2} kW | Savings {}%",
        snapshot.cycle,
        snapshot.zones.map(|_, z| z.temperature),
        snapshot.zones.map(|_, z| z.damper),
        snapshot.fan_power_kw,
        snapshot.energy_savings_percent
    )
}

fn describe_source(source: &SourceKind) -> String {
    match source {
        SourceKind::Synthetic { seed: Some(seed) } => format!("synthetic (seed {})", seed),
        SourceKind::Synthetic { seed: None } => "synthetic".to_string(),
        SourceKind::Replay { from_run } => format!("replay of {}", from_run),
        SourceKind::External { description } => description.clone(),
    }
}

fn describe_stop(reason: &StopReason) -> String {
    match reason {
        StopReason::Interrupted => "interrupted".to_string(),
        StopReason::CycleLimit { max_cycles } => format!("cycle limit ({})", max_cycles),
        StopReason::SourceFailure { message } => format!("source failure: {}", message),
    }
}

fn print_manifest(manifest: &RunManifest) {
    println!("  Facility: {}", manifest.facility);
    println!("  Started:  {}", manifest.started_at);
    println!("  Finished: {}", manifest.finished_at);
    println!("  Cycles:   {}", manifest.cycles);
    println!("  Period:   {} s", manifest.control_period_s);
    println!("  Source:   {}", describe_source(&manifest.source));
    println!("  Stopped:  {}", describe_stop(&manifest.stop_reason));
}

fn open_store(store: &StoreArgs) -> AppResult<cz_results::RunStore> {
    run_service::open_store(&store.config, store.runs_dir.as_deref())
}

fn cmd_runs(store: &StoreArgs) -> AppResult<()> {
    let store = open_store(store)?;
    let runs = run_service::list_runs(&store)?;

    if runs.is_empty() {
        println!("No runs found in {}", store.root_dir().display());
    } else {
        println!("Runs in {}:", store.root_dir().display());
        for manifest in runs {
            println!(
                "  {} ({}, {} cycles, {})",
                manifest.run_id,
                manifest.started_at,
                manifest.cycles,
                describe_stop(&manifest.stop_reason)
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store: &StoreArgs, run_id: &str, json: bool) -> AppResult<()> {
    let store = open_store(store)?;
    let (manifest, history) = run_service::load_run(&store, run_id)?;

    if history.is_empty() {
        println!("Run {} completed no cycles", run_id);
        print_manifest(&manifest);
        return Ok(());
    }
    let summary = query::get_run_summary(&history)?;

    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Run: {}", run_id);
    print_manifest(&manifest);
    println!("\nRun Summary:");
    println!(
        "  Cycles: {} ({} - {})",
        summary.cycle_count, summary.cycle_range.0, summary.cycle_range.1
    );
    println!(
        "  Fan power: mean {:.2} kW, peak {:.2} kW",
        summary.mean_fan_power_kw, summary.peak_fan_power_kw
    );
    println!(
        "  Energy savings: mean {:.1}%",
        summary.mean_energy_savings_percent
    );
    println!("\nZones:");
    for (zone, stats) in summary.zones.iter() {
        println!(
            "  {:<8} min {:>7.2}  max {:>7.2}  mean {:>7.2} °C  damper {:>5.1}%",
            zone.name(),
            stats.min_temperature,
            stats.max_temperature,
            stats.mean_temperature,
            stats.mean_damper
        );
    }
    Ok(())
}

fn cmd_export_series(
    store: &StoreArgs,
    run_id: &str,
    variable: &str,
    zone: Option<Zone>,
    output: Option<&Path>,
) -> AppResult<()> {
    let variable: SeriesVariable = variable.parse()?;
    let store = open_store(store)?;
    let (_manifest, history) = run_service::load_run(&store, run_id)?;
    let series = query::extract_series(&history, variable, zone)?;

    // Build CSV
    let mut csv = String::from("cycle,value\n");
    for (cycle, val) in &series {
        csv.push_str(&format!("{},{}\n", cycle, val));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use cz_core::ZoneMap;
    use cz_results::ZoneSnapshot;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "coldzone", "run", "--config", "site.yaml", "--cycles", "10", "--seed", "4",
            "--no-pacing",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                store,
                cycles,
                seed,
                no_pacing,
                replay,
                ..
            } => {
                assert_eq!(store.config, PathBuf::from("site.yaml"));
                assert_eq!(cycles, Some(10));
                assert_eq!(seed, Some(4));
                assert!(no_pacing);
                assert!(replay.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn seed_and_replay_conflict() {
        let result =
            Cli::try_parse_from(["coldzone", "run", "--seed", "1", "--replay", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn zone_argument_is_case_insensitive() {
        let cli = Cli::try_parse_from([
            "coldzone", "export-series", "abc", "temperature", "--zone", "freezer",
        ])
        .unwrap();
        match cli.command {
            Commands::ExportSeries { zone, .. } => assert_eq!(zone, Some(Zone::Freezer)),
            _ => panic!("expected export-series command"),
        }
    }

    #[test]
    fn cycle_line_format() {
        let snapshot = CycleSnapshot {
            cycle: 1,
            zones: ZoneMap::from_fn(|z| ZoneSnapshot {
                temperature: z.index() as f64 - 0.5,
                setpoint: 0.0,
                damper: 18.2,
            }),
            fan_power_kw: 2.06,
            energy_savings_percent: 77,
        };
        assert_eq!(
            cycle_line(&snapshot),
            "Cycle 0001 | TEMP {Freezer: -0.5, Cooler: 0.5, Packing: 1.5} | \
             DAMPERS {Freezer: 18.2, Cooler: 18.2, Packing: 18.2} | Fan 2.06 kW | Savings 77%"
        );
    }
}
