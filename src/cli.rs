//! Helpers shared by the command-line front-ends.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use orrery_config::{EngineConfig, load_bodies, load_engine_config};
use orrery_orbits::BodyCatalog;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr, filtered by `RUST_LOG` (default `info`), so stdout stays
/// free for CSV and JSON output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(input: &str) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{input}' (expected YYYY-MM-DD or RFC 3339)"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid date '{input}'"))
}

/// Engine configuration and body catalog, each from a file when given.
pub fn load_setup(
    config: Option<&Path>,
    bodies: Option<&Path>,
) -> anyhow::Result<(EngineConfig, BodyCatalog)> {
    let config = match config {
        Some(path) => load_engine_config(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let catalog = match bodies {
        Some(path) => {
            let overrides = load_bodies(path)
                .with_context(|| format!("loading bodies {}", path.display()))?;
            info!(count = overrides.len(), path = %path.display(), "loaded body overrides");
            BodyCatalog::with_overrides(&overrides)?
        }
        None => BodyCatalog::solar_system(),
    };
    Ok((config, catalog))
}
