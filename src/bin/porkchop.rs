use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use orrery::cli::{init_tracing, load_setup, parse_date};
use orrery::export::porkchop::{Record, write_header, writer_for_path};
use orrery::sim::SimulationEngine;
use orrery::transfer::{TimeWindow, save_grid};
use tracing::info;

/// Sweep departure and arrival dates and write the launch-window grid as CSV.
#[derive(Parser, Debug)]
#[command(author, version, about = "Porkchop CSV generator (Hohmann estimates)")]
struct Cli {
    /// Departure body name (case-insensitive)
    #[arg(long)]
    from: String,

    /// Arrival body name (case-insensitive)
    #[arg(long)]
    to: String,

    /// Departure window start (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    depart_start: String,

    /// Departure window end
    #[arg(long)]
    depart_end: String,

    /// Arrival window start
    #[arg(long)]
    arrive_start: String,

    /// Arrival window end
    #[arg(long)]
    arrive_end: String,

    /// Samples per axis (defaults to the engine config)
    #[arg(long)]
    resolution: Option<usize>,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Body overrides (YAML list, TOML file, or directory of TOML files)
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/pork.csv")]
    output: PathBuf,

    /// Also save the grid as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let (mut config, catalog) = load_setup(cli.config.as_deref(), cli.bodies.as_deref())?;
    if let Some(resolution) = cli.resolution {
        config.porkchop_resolution = resolution;
    }
    let engine = SimulationEngine::new(config, catalog)?;

    let departure_window = TimeWindow::new(
        parse_date(&cli.depart_start)?,
        parse_date(&cli.depart_end)?,
    );
    let arrival_window = TimeWindow::new(
        parse_date(&cli.arrive_start)?,
        parse_date(&cli.arrive_end)?,
    );
    let grid = engine.get_porkchop_data(&cli.from, &cli.to, departure_window, arrival_window)?;

    let mut writer = writer_for_path(&cli.output)?;
    write_header(&mut *writer)?;
    for cell in grid.cells() {
        let depart_utc = cell.departure_date.to_rfc3339();
        let arrive_utc = cell.arrival_date.to_rfc3339();
        Record {
            depart_unix: cell.departure_date.timestamp(),
            arrive_unix: cell.arrival_date.timestamp(),
            depart_utc: &depart_utc,
            arrive_utc: &arrive_utc,
            tof_days: cell.time_of_flight_days,
            c3: cell.c3,
            dv_total: cell.delta_v,
            origin_body: &grid.departure,
            dest_body: &grid.arrival,
        }
        .write_to(&mut *writer)?;
    }
    writer.flush()?;

    if let Some(path) = &cli.json {
        save_grid(path, &grid)?;
        info!(path = %path.display(), "saved grid JSON");
    }

    match grid.best_cell() {
        Some(best) => info!(
            departure = %best.departure_date.format("%Y-%m-%d"),
            arrival = %best.arrival_date.format("%Y-%m-%d"),
            tof_days = best.time_of_flight_days,
            dv_total_m_s = best.delta_v,
            "best window"
        ),
        None => info!("no feasible windows in the requested ranges"),
    }
    Ok(())
}
