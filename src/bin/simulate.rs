use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use orrery::base::time::seconds_to_days;
use orrery::cli::{init_tracing, load_setup, parse_date};
use orrery::sim::{EngineRunner, SimulationEngine, SimulationState};
use tracing::info;

/// Run the real-time engine for a while and report where everything ended up.
#[derive(Parser, Debug)]
#[command(author, version, about = "Real-time solar system simulation")]
struct Cli {
    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Body overrides (YAML list, TOML file, or directory of TOML files)
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Wall-clock seconds to run
    #[arg(long, default_value_t = 2.0)]
    run_secs: f64,

    /// Simulation seconds per wall-clock second
    #[arg(long)]
    time_scale: Option<f64>,

    /// Launch a mission, written FROM:TO (requires --depart and --arrive)
    #[arg(long, requires_all = ["depart", "arrive"])]
    launch: Option<String>,

    /// Mission departure date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    depart: Option<String>,

    /// Mission arrival date
    #[arg(long)]
    arrive: Option<String>,

    /// Write the final state as JSON
    #[arg(long)]
    state_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    if !(cli.run_secs.is_finite() && cli.run_secs >= 0.0) {
        anyhow::bail!("--run-secs must be a non-negative number");
    }
    let (config, catalog) = load_setup(cli.config.as_deref(), cli.bodies.as_deref())?;
    let engine = SimulationEngine::new(config, catalog)?;
    let (runner, handle) = EngineRunner::new(engine);
    let task = tokio::spawn(runner.run());

    if let Some(scale) = cli.time_scale {
        let stored = handle.set_time_scale(scale);
        info!(requested = scale, stored, "time scale set");
    }
    if let Some(pair) = &cli.launch {
        let (from, to) = pair
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("--launch expects FROM:TO (got '{pair}')"))?;
        let depart = parse_date(cli.depart.as_deref().unwrap_or_default())?;
        let arrive = parse_date(cli.arrive.as_deref().unwrap_or_default())?;
        let transfer = handle.calculate_transfer(from, to, depart, arrive)?;
        let mission = handle.launch_mission(&transfer)?;
        info!(mission = %mission.id, "queued mission");
    }

    handle.play();
    tokio::time::sleep(Duration::from_secs_f64(cli.run_secs)).await;
    handle.stop();
    task.await.context("engine task panicked")??;

    let state = handle.state();
    print_summary(&state);
    if let Some(path) = &cli.state_out {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &state)?;
        info!(path = %path.display(), "wrote final state");
    }
    Ok(())
}

fn print_summary(state: &SimulationState) {
    println!(
        "=== t = {:.3} days (scale {}) ===",
        seconds_to_days(state.timestamp),
        state.time_scale
    );
    for snapshot in state.bodies.values() {
        let [x, y, z] = snapshot.position;
        println!("{:<8} [{x:>9.5}, {y:>9.5}, {z:>9.5}] AU", snapshot.name);
    }
    for mission in &state.missions {
        println!(
            "{} {} -> {}: {:.1}% ({:?})",
            mission.id,
            mission.departure,
            mission.arrival,
            mission.progress * 100.0,
            mission.status
        );
    }
}
