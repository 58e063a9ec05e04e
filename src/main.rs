use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use transit_ephem::report::{write_curve_csv, write_curve_json, write_report, write_report_file};
use transit_ephem::utils::logger;
use transit_ephem::utils::time_utils::parse_date;
use transit_ephem::{Catalog, PlannerConfig};

#[derive(Parser)]
#[command(name = "transit-planner")]
#[command(about = "Nightly transit predictions and observability filtering for a transit catalog")]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the observable transits of a whole catalog for one night
    Report {
        /// Catalog CSV (overrides `catalog` in the config file)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Observing date YYYY-MM-DD (overrides `date` in the config file)
        #[arg(long)]
        date: Option<String>,
        /// Output CSV; standard output when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Altitude curve of one target across the night with its transit markers
    Chart {
        /// Target name as written in the catalog
        target: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ChartFormat::Csv)]
        format: ChartFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartFormat {
    Csv,
    Json,
}

fn resolve_inputs(
    config: &PlannerConfig,
    catalog: Option<PathBuf>,
    date: Option<String>,
) -> Result<(Catalog, chrono::NaiveDate)> {
    let catalog_path = catalog
        .or_else(|| config.catalog.clone())
        .ok_or_else(|| anyhow!("no catalog given (use --catalog or set `catalog` in the config)"))?;
    let date = date
        .or_else(|| config.date.clone())
        .ok_or_else(|| anyhow!("no observing date given (use --date or set `date` in the config)"))?;

    let catalog = Catalog::from_path(&catalog_path)
        .with_context(|| format!("failed to load catalog '{}'", catalog_path.display()))?;
    let date = parse_date(&date)?;
    tracing::info!(
        catalog = %catalog_path.display(),
        rows = catalog.len(),
        %date,
        "inputs loaded"
    );
    Ok((catalog, date))
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => PlannerConfig::default(),
    };
    tracing::debug!(?config, "planner configuration");
    let planner = config.planner()?;

    match cli.command {
        Commands::Report {
            catalog,
            date,
            output,
        } => {
            let (catalog, date) = resolve_inputs(&config, catalog, date)?;
            let report = planner.plan_night(&catalog, &config.window, date)?;
            match output {
                Some(path) => {
                    write_report_file(&report, &path)
                        .with_context(|| format!("failed to write report '{}'", path.display()))?;
                    tracing::info!(path = %path.display(), records = report.summary.accepted, "report written");
                }
                None => write_report(&report, std::io::stdout().lock())?,
            }
            eprintln!(
                "{} of {} rows observable ({} skipped)",
                report.summary.accepted, report.summary.total_rows, report.summary.skipped
            );
        }
        Commands::Chart {
            target,
            catalog,
            date,
            output,
            format,
        } => {
            let (catalog, date) = resolve_inputs(&config, catalog, date)?;
            let curve = planner.plan_target(&catalog, &target, date, &config.chart)?;
            let offset = planner.offset();

            let write = |w: &mut dyn std::io::Write| -> transit_ephem::Result<()> {
                match format {
                    ChartFormat::Csv => write_curve_csv(&curve, offset, w),
                    ChartFormat::Json => write_curve_json(&curve, offset, w),
                }
            };
            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create '{}'", path.display()))?;
                    write(&mut file)?;
                }
                None => write(&mut std::io::stdout().lock())?,
            }

            let [start, peak, end] = curve.labels(offset);
            eprintln!(
                "{} | {} | Start: {} | Peak: {} | End: {} ({})",
                curve.target,
                date,
                start,
                peak,
                end,
                if curve.observable() { "observable" } else { "not observable" }
            );
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
