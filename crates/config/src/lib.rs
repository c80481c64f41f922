//! Configuration models and loaders for the Orrery simulation engine.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Runtime parameters of the simulation engine.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock interval between ticks in seconds.
    pub tick_interval_s: f64,
    /// Simulation epoch; simulation time is measured in seconds from here.
    pub epoch: DateTime<Utc>,
    pub initial_time_scale: f64,
    pub min_time_scale: f64,
    pub max_time_scale: f64,
    /// Samples generated per mission trajectory.
    pub trajectory_points: usize,
    /// Grid resolution used when the engine builds porkchop data.
    pub porkchop_resolution: usize,
    pub kepler: KeplerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_s: 0.05,
            epoch: default_epoch(),
            initial_time_scale: 1.0,
            min_time_scale: 0.1,
            max_time_scale: 1_000_000.0,
            trajectory_points: 200,
            porkchop_resolution: 30,
            kepler: KeplerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check the numeric invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_interval_s.is_finite() && self.tick_interval_s > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_s must be positive (got {})",
                self.tick_interval_s
            )));
        }
        if !(self.min_time_scale.is_finite() && self.min_time_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_time_scale must be positive (got {})",
                self.min_time_scale
            )));
        }
        if !(self.max_time_scale.is_finite() && self.max_time_scale >= self.min_time_scale) {
            return Err(ConfigError::Invalid(format!(
                "max_time_scale must be at least min_time_scale (got {} < {})",
                self.max_time_scale, self.min_time_scale
            )));
        }
        if self.trajectory_points < 2 {
            return Err(ConfigError::Invalid(
                "trajectory_points must be at least 2".to_string(),
            ));
        }
        if self.porkchop_resolution == 0 {
            return Err(ConfigError::Invalid(
                "porkchop_resolution must be at least 1".to_string(),
            ));
        }
        if self.kepler.iterations == 0 {
            return Err(ConfigError::Invalid(
                "kepler.iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Newton-Raphson settings for Kepler's equation.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct KeplerConfig {
    pub iterations: u32,
    /// Optional early exit once |ΔE| drops below this value (radians).
    pub tolerance: Option<f64>,
}

impl Default for KeplerConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            tolerance: None,
        }
    }
}

/// Override record for one body of the built-in catalog.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mass_kg: f64,
    pub radius_km: f64,
    pub semi_major_axis_au: f64,
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub mean_anomaly_deg: f64,
    /// Ignored for the central star.
    #[serde(default)]
    pub orbital_period_days: f64,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate the engine configuration from a TOML file.
pub fn load_engine_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&contents)?;
    config.validate()?;
    debug!(path = %path.display(), "loaded engine configuration");
    Ok(config)
}

/// Load body overrides from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let bodies: Vec<BodyConfig> = load_records(path.as_ref())?;
    debug!(count = bodies.len(), "loaded body overrides");
    Ok(bodies)
}

fn load_records<T>(path: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}
