//! Transfer planning: Hohmann figures, display trajectories and launch-window grids.
//!
//! Everything here is a pure function of the immutable body catalog; nothing
//! touches engine state, so calls may run concurrently with a running engine.

pub mod porkchop;
pub mod trajectory;

use chrono::{DateTime, TimeDelta, Utc};
use orrery_impulsive::HohmannTransfer;
use orrery_orbits::{BodyCatalog, KeplerSolver, UnknownBody};
use serde::{Deserialize, Serialize};
use tracing::debug;

use self::porkchop::{PorkchopGrid, PorkchopRequest, TimeWindow};
use self::trajectory::TrajectoryPoint;

/// Errors surfaced to the immediate caller of a transfer calculation.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid body name: {0}")]
    InvalidBodyName(#[from] UnknownBody),
    #[error("arrival {arrival} must be after departure {departure}")]
    InvalidWindow {
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    },
    #[error("grid resolution must be at least 1")]
    InvalidResolution,
}

/// A computed transfer, ready to be handed back to the engine as a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    pub departure: String,
    pub arrival: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: DateTime<Utc>,
    /// Seconds between departure and arrival.
    pub duration: f64,
    /// Total Hohmann delta-v (m/s).
    pub delta_v: Option<f64>,
    /// Departure C3 (m²/s²).
    pub c3: Option<f64>,
    #[serde(default)]
    pub hohmann: HohmannTransfer,
    #[serde(default)]
    pub trajectory: Vec<TrajectoryPoint>,
}

/// Bundles the read-only inputs every transfer calculation needs.
#[derive(Debug, Clone, Copy)]
pub struct TransferPlanner<'a> {
    pub catalog: &'a BodyCatalog,
    pub solver: KeplerSolver,
    pub epoch: DateTime<Utc>,
    pub trajectory_points: usize,
}

impl TransferPlanner<'_> {
    /// Hohmann figures plus a display trajectory between two named bodies.
    pub fn calculate_transfer(
        &self,
        departure: &str,
        arrival: &str,
        departure_date: DateTime<Utc>,
        arrival_date: DateTime<Utc>,
    ) -> Result<TransferResult, TransferError> {
        let dep_body = self.catalog.lookup(departure)?;
        let arr_body = self.catalog.lookup(arrival)?;
        if arrival_date <= departure_date {
            return Err(TransferError::InvalidWindow {
                departure: departure_date,
                arrival: arrival_date,
            });
        }

        let dep_time = epoch_seconds(self.epoch, departure_date);
        let arr_time = epoch_seconds(self.epoch, arrival_date);

        let hohmann = HohmannTransfer::between(dep_body, arr_body);
        let trajectory = trajectory::generate_trajectory(
            &self.solver,
            dep_body,
            arr_body,
            dep_time,
            arr_time,
            self.trajectory_points,
        );
        debug!(
            departure = %dep_body.id,
            arrival = %arr_body.id,
            points = trajectory.len(),
            "calculated transfer"
        );

        Ok(TransferResult {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            departure_date,
            arrival_date,
            duration: arr_time - dep_time,
            delta_v: hohmann.delta_v_total,
            c3: hohmann.c3,
            hohmann,
            trajectory,
        })
    }

    /// Launch-window grid for a body pair over independent departure and arrival windows.
    pub fn porkchop(
        &self,
        departure: &str,
        arrival: &str,
        departure_window: TimeWindow,
        arrival_window: TimeWindow,
        resolution: usize,
    ) -> Result<PorkchopGrid, TransferError> {
        let request = PorkchopRequest {
            departure_body: self.catalog.lookup(departure)?,
            arrival_body: self.catalog.lookup(arrival)?,
            departure_window,
            arrival_window,
            resolution,
        };
        porkchop::generate(&request)
    }
}

/// Seconds from `epoch` to `date` (negative before the epoch).
pub fn epoch_seconds(epoch: DateTime<Utc>, date: DateTime<Utc>) -> f64 {
    delta_seconds(date - epoch)
}

/// Calendar date `seconds` after `epoch`, at millisecond precision.
pub fn date_at(epoch: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    epoch + TimeDelta::milliseconds((seconds * 1_000.0).round() as i64)
}

pub(crate) fn delta_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1_000.0
}
