//! Binary entry point: solve the configured horizon or generate
//! synthetic input tables.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crew_rostering::generate::crew::generate_default_fleet;
use crew_rostering::generate::history::HistoricalFlightGenerator;
use crew_rostering::io::tables::CrewRow;
use crew_rostering::io::{loader, parse_date, writer};
use crew_rostering::roster::scheduler::CrewScheduler;
use crew_rostering::solver::backtrack::BacktrackModel;
use crew_rostering::solver::SolveOptions;
use crew_rostering::{init_logger, Config};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[derive(Parser)]
#[command(about, version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build a roster from the configured input tables
    Solve,

    /// Write synthetic crew and historical-flight tables
    Generate {
        /// Seed for reproducible data
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First day of the horizon the history leads up to
        #[arg(long, default_value = "2025-10-01")]
        schedule_start: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::try_from_env().context("could not read configuration")?;
    init_logger(&config);

    match cli.command.unwrap_or(Command::Solve) {
        Command::Solve => solve(&config),
        Command::Generate {
            seed,
            schedule_start,
        } => generate(&config, seed, &schedule_start),
    }
}

fn solve(config: &Config) -> Result<()> {
    let tables = loader::load_tables(config).map_err(|e| anyhow!(e.to_string()))?;

    let mut scheduler = CrewScheduler::new(
        tables.flights,
        tables.crew,
        tables.time_off,
        tables.history,
        tables.regulations,
    )
    .map_err(|e| anyhow!(e.to_string()))?;

    let options = SolveOptions {
        time_limit: Duration::from_secs(config.solver_time_limit_seconds),
        num_workers: config.solver_num_workers as usize,
    };

    let mut model = BacktrackModel::new();
    let outcome = scheduler
        .solve_round(&mut model, &options)
        .map_err(|e| anyhow!(e.to_string()))?;

    writer::write_pairings(&config.pairings_output_csv, scheduler.duties())
        .map_err(|e| anyhow!(e.to_string()))?;

    if outcome.status.has_solution() {
        writer::write_schedule(&config.schedule_output_csv, &outcome.assignments)
            .map_err(|e| anyhow!(e.to_string()))?;
        log::info!(
            "Wrote {} assignments to {} ({}).",
            outcome.assignments.len(),
            config.schedule_output_csv,
            outcome.status
        );
    } else {
        log::warn!("No roster written: solver returned {}.", outcome.status);
    }

    Ok(())
}

fn generate(config: &Config, seed: u64, schedule_start: &str) -> Result<()> {
    let schedule_start = parse_date(schedule_start)
        .ok_or_else(|| anyhow!("unparseable schedule start '{}'", schedule_start))?;

    let mut rng = StdRng::seed_from_u64(seed);

    let crew: Vec<CrewRow> = generate_default_fleet(&mut rng);
    write_rows(&config.crew_csv, &crew)?;
    log::info!("Wrote {} crew records to {}.", crew.len(), config.crew_csv);

    let history = HistoricalFlightGenerator::new(schedule_start).generate(&mut rng, &crew);
    write_rows(&config.historical_csv, &history)?;
    log::info!(
        "Wrote {} historical flights to {}.",
        history.len(),
        config.historical_csv
    );

    Ok(())
}

fn write_rows<R: serde::Serialize>(path: &str, rows: &[R]) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("could not open '{}'", path))?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush().context("could not flush output")?;
    Ok(())
}
