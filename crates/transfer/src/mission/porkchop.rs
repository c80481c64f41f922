//! Porkchop grid generation shared between the engine and the CLI.
//!
//! Every feasible cell currently carries the single Hohmann estimate for the
//! body pair; transfer geometry does not yet vary with the actual phasing at
//! each departure/arrival epoch. Only time of flight varies across the grid.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use orrery_core::constants::SECONDS_PER_DAY;
use orrery_core::finite;
use orrery_impulsive::HohmannTransfer;
use orrery_orbits::CelestialBody;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TransferError, delta_seconds};

/// Closed date range swept by one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Offsets in seconds from `start` for `n` evenly spaced samples, endpoints included.
    fn offsets(&self, n: usize) -> Vec<f64> {
        let span = delta_seconds(self.end - self.start);
        (0..n)
            .map(|i| {
                if n > 1 {
                    span * i as f64 / (n - 1) as f64
                } else {
                    0.0
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PorkchopRequest<'a> {
    pub departure_body: &'a CelestialBody,
    pub arrival_body: &'a CelestialBody,
    pub departure_window: TimeWindow,
    pub arrival_window: TimeWindow,
    pub resolution: usize,
}

/// N×N launch-window grids indexed `[departure][arrival]`.
///
/// `None` marks a cell with no value: either the arrival precedes the
/// departure, or the arithmetic produced no finite figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PorkchopGrid {
    pub departure: String,
    pub arrival: String,
    pub departure_dates: Vec<DateTime<Utc>>,
    pub arrival_dates: Vec<DateTime<Utc>>,
    /// m²/s²
    pub c3: Vec<Vec<Option<f64>>>,
    /// m/s
    pub delta_v: Vec<Vec<Option<f64>>>,
    /// days
    pub time_of_flight: Vec<Vec<Option<f64>>>,
}

/// A single grid cell with its axis dates resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PorkchopCell {
    pub departure_index: usize,
    pub arrival_index: usize,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: DateTime<Utc>,
    pub c3: Option<f64>,
    pub delta_v: Option<f64>,
    pub time_of_flight_days: Option<f64>,
}

impl PorkchopCell {
    pub fn is_feasible(&self) -> bool {
        self.time_of_flight_days.is_some()
    }
}

impl PorkchopGrid {
    pub fn resolution(&self) -> usize {
        self.departure_dates.len()
    }

    pub fn cell(&self, departure_index: usize, arrival_index: usize) -> Option<PorkchopCell> {
        let departure_date = *self.departure_dates.get(departure_index)?;
        let arrival_date = *self.arrival_dates.get(arrival_index)?;
        let pick = |grid: &Vec<Vec<Option<f64>>>| {
            grid.get(departure_index)
                .and_then(|row| row.get(arrival_index))
                .copied()
                .flatten()
        };
        Some(PorkchopCell {
            departure_index,
            arrival_index,
            departure_date,
            arrival_date,
            c3: pick(&self.c3),
            delta_v: pick(&self.delta_v),
            time_of_flight_days: pick(&self.time_of_flight),
        })
    }

    /// All cells in row-major (departure, arrival) order.
    pub fn cells(&self) -> impl Iterator<Item = PorkchopCell> + '_ {
        (0..self.departure_dates.len()).flat_map(move |i| {
            (0..self.arrival_dates.len()).filter_map(move |j| self.cell(i, j))
        })
    }

    /// Feasible cell with the lowest delta-v; ties go to the shorter flight.
    pub fn best_cell(&self) -> Option<PorkchopCell> {
        self.cells()
            .filter(|cell| cell.is_feasible() && cell.delta_v.is_some())
            .min_by(|a, b| {
                a.delta_v
                    .partial_cmp(&b.delta_v)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| {
                        a.time_of_flight_days
                            .partial_cmp(&b.time_of_flight_days)
                            .unwrap_or(Ordering::Equal)
                    })
            })
    }
}

/// Sweep both windows and fill the three grids. O(N²) with O(1) work per cell.
pub fn generate(request: &PorkchopRequest<'_>) -> Result<PorkchopGrid, TransferError> {
    let n = request.resolution;
    if n == 0 {
        return Err(TransferError::InvalidResolution);
    }

    let dep_offsets = request.departure_window.offsets(n);
    let arr_offsets = request.arrival_window.offsets(n);
    // arrival-window start relative to departure-window start
    let window_gap = delta_seconds(request.arrival_window.start - request.departure_window.start);

    let transfer = HohmannTransfer::between(request.departure_body, request.arrival_body);

    let mut c3 = vec![vec![None; n]; n];
    let mut delta_v = vec![vec![None; n]; n];
    let mut time_of_flight = vec![vec![None; n]; n];
    let mut feasible = 0usize;

    for (i, dep_offset) in dep_offsets.iter().enumerate() {
        for (j, arr_offset) in arr_offsets.iter().enumerate() {
            let tof = window_gap + arr_offset - dep_offset;
            if tof.is_nan() || tof <= 0.0 {
                continue;
            }
            c3[i][j] = transfer.c3;
            delta_v[i][j] = transfer.delta_v_total;
            time_of_flight[i][j] = finite(tof / SECONDS_PER_DAY);
            feasible += 1;
        }
    }

    debug!(
        departure = %request.departure_body.id,
        arrival = %request.arrival_body.id,
        resolution = n,
        feasible,
        "generated porkchop grid"
    );

    Ok(PorkchopGrid {
        departure: request.departure_body.name.clone(),
        arrival: request.arrival_body.name.clone(),
        departure_dates: axis_dates(&request.departure_window, &dep_offsets),
        arrival_dates: axis_dates(&request.arrival_window, &arr_offsets),
        c3,
        delta_v,
        time_of_flight,
    })
}

fn axis_dates(window: &TimeWindow, offsets: &[f64]) -> Vec<DateTime<Utc>> {
    offsets
        .iter()
        .map(|s| window.start + TimeDelta::milliseconds((s * 1_000.0).round() as i64))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum GridIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn save_grid(path: &Path, grid: &PorkchopGrid) -> Result<(), GridIoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, grid)?;
    Ok(())
}

pub fn load_grid(path: &Path) -> Result<PorkchopGrid, GridIoError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let grid = serde_json::from_reader(reader)?;
    Ok(grid)
}
