use std::path::PathBuf;

use clap::Parser;
use orrery::base::{time::seconds_to_days, units::ms_to_kms, vector};
use orrery::cli::{init_tracing, load_setup, parse_date};
use orrery::export::trajectory::{Metadata, Sample, write_sidecars};
use orrery::sim::SimulationEngine;
use tracing::info;

/// Hohmann estimate and display trajectory for a single departure/arrival pair.
#[derive(Parser, Debug)]
#[command(author, version, about = "Transfer calculator (Hohmann estimate)")]
struct Cli {
    /// Departure body name (case-insensitive)
    #[arg(long)]
    from: String,

    /// Arrival body name (case-insensitive)
    #[arg(long)]
    to: String,

    /// Departure date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    depart: String,

    /// Arrival date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    arrive: String,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Body overrides (YAML list, TOML file, or directory of TOML files)
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Write trajectory JSON sidecars next to this path
    #[arg(long)]
    trajectory_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let (config, catalog) = load_setup(cli.config.as_deref(), cli.bodies.as_deref())?;
    let engine = SimulationEngine::new(config, catalog)?;

    let transfer = engine.calculate_transfer(
        &cli.from,
        &cli.to,
        parse_date(&cli.depart)?,
        parse_date(&cli.arrive)?,
    )?;
    let hohmann = &transfer.hohmann;

    println!("=== Transfer {} -> {} ===", transfer.departure, transfer.arrival);
    println!(
        "Window: {} -> {} ({:.1} days)",
        transfer.departure_date.format("%Y-%m-%d"),
        transfer.arrival_date.format("%Y-%m-%d"),
        seconds_to_days(transfer.duration)
    );
    println!(
        "Hohmann: TOF = {}, phase angle = {}",
        fmt_or_dash(hohmann.transfer_time.map(seconds_to_days), " days"),
        fmt_or_dash(hohmann.phase_angle.map(f64::to_degrees), " deg"),
    );
    println!(
        "Δv: departure = {}, arrival = {}, total = {}",
        fmt_or_dash(hohmann.delta_v_departure.map(ms_to_kms), " km/s"),
        fmt_or_dash(hohmann.delta_v_arrival.map(ms_to_kms), " km/s"),
        fmt_or_dash(transfer.delta_v.map(ms_to_kms), " km/s"),
    );
    println!(
        "C3 = {}",
        fmt_or_dash(transfer.c3.map(|c3| c3 / 1.0e6), " km^2/s^2")
    );

    if let Some(output) = &cli.trajectory_out {
        let start = transfer.trajectory.first().map_or(0.0, |p| p.time);
        let samples: Vec<Sample> = transfer
            .trajectory
            .iter()
            .map(|p| Sample {
                time_s: p.time - start,
                progress: p.progress,
                position_m: p.position,
                distance_from_sun_m: vector::norm(&p.position),
            })
            .collect();
        let depart_utc = transfer.departure_date.to_rfc3339();
        let arrive_utc = transfer.arrival_date.to_rfc3339();
        let metadata = Metadata {
            origin: &transfer.departure,
            destination: &transfer.arrival,
            depart_utc: &depart_utc,
            arrive_utc: &arrive_utc,
            duration_s: transfer.duration,
            delta_v_m_s: transfer.delta_v,
            c3_m2_s2: transfer.c3,
        };
        for path in write_sidecars(output, &metadata, &samples)? {
            info!(path = %path.display(), "wrote trajectory sidecar");
        }
    }

    Ok(())
}

fn fmt_or_dash(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.3}{unit}"),
        None => "-".to_string(),
    }
}
