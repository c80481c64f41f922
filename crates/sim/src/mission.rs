//! Mission records created from transfer results and advanced once per tick.

use std::fmt;

use chrono::{DateTime, Utc};
use orrery_core::vector::{self, Vector3};
use orrery_transfer::{TrajectoryPoint, TransferResult, epoch_seconds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sequentially assigned mission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub u64);

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mission_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    Completed,
}

/// Reasons a transfer payload cannot become a mission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissionPayloadError {
    #[error("transfer payload has no trajectory")]
    MissingTrajectory,
    #[error("arrival date {arrival} is not after departure date {departure}")]
    InvalidDates {
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    },
    #[error("mission duration must be positive and finite (got {0})")]
    InvalidDuration(f64),
    #[error("mission duration {duration} s does not match its dates ({expected} s)")]
    DurationMismatch { duration: f64, expected: f64 },
    #[error("trajectory sample {0} is not finite")]
    NonFiniteTrajectory(usize),
}

/// Allowed gap between a payload's `duration` and its date span (seconds).
const DURATION_TOLERANCE_S: f64 = 1e-3;

/// Check a transfer payload without building anything.
pub fn validate_payload(transfer: &TransferResult) -> Result<(), MissionPayloadError> {
    if transfer.trajectory.is_empty() {
        return Err(MissionPayloadError::MissingTrajectory);
    }
    if transfer.arrival_date <= transfer.departure_date {
        return Err(MissionPayloadError::InvalidDates {
            departure: transfer.departure_date,
            arrival: transfer.arrival_date,
        });
    }
    if !(transfer.duration.is_finite() && transfer.duration > 0.0) {
        return Err(MissionPayloadError::InvalidDuration(transfer.duration));
    }
    let expected = epoch_seconds(transfer.departure_date, transfer.arrival_date);
    if (transfer.duration - expected).abs() > DURATION_TOLERANCE_S {
        return Err(MissionPayloadError::DurationMismatch {
            duration: transfer.duration,
            expected,
        });
    }
    if let Some(idx) = transfer
        .trajectory
        .iter()
        .position(|p| !(vector::is_finite(&p.position) && p.time.is_finite()))
    {
        return Err(MissionPayloadError::NonFiniteTrajectory(idx));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub departure: String,
    pub arrival: String,
    /// Simulation seconds from epoch.
    pub launch_time: f64,
    pub arrival_time: f64,
    /// Seconds.
    pub duration: f64,
    pub trajectory: Vec<TrajectoryPoint>,
    /// Metres, heliocentric.
    pub current_position: Vector3,
    pub progress: f64,
    pub status: MissionStatus,
    pub delta_v: Option<f64>,
    pub c3: Option<f64>,
}

impl Mission {
    /// Build an active mission at zero progress from a validated transfer.
    pub fn from_transfer(
        id: MissionId,
        transfer: &TransferResult,
        epoch: DateTime<Utc>,
    ) -> Result<Self, MissionPayloadError> {
        validate_payload(transfer)?;
        let first = transfer.trajectory[0].position;
        Ok(Self {
            id,
            departure: transfer.departure.clone(),
            arrival: transfer.arrival.clone(),
            launch_time: epoch_seconds(epoch, transfer.departure_date),
            arrival_time: epoch_seconds(epoch, transfer.arrival_date),
            duration: transfer.duration,
            trajectory: transfer.trajectory.clone(),
            current_position: first,
            progress: 0.0,
            status: MissionStatus::Active,
            delta_v: transfer.delta_v,
            c3: transfer.c3,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == MissionStatus::Active
    }

    /// Move the mission to simulation time `timestamp`. Returns `true` on the
    /// single tick where the mission completes.
    pub(crate) fn advance(&mut self, timestamp: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        let elapsed = timestamp - self.launch_time;
        if elapsed > self.duration {
            self.status = MissionStatus::Completed;
            self.progress = 1.0;
            if let Some(last) = self.trajectory.last() {
                self.current_position = last.position;
            }
            return true;
        }
        if elapsed >= 0.0 {
            let progress = (elapsed / self.duration).clamp(0.0, 1.0);
            let last = self.trajectory.len().saturating_sub(1);
            let index = ((progress * last as f64).floor() as usize).min(last);
            if let Some(point) = self.trajectory.get(index) {
                self.current_position = point.position;
            }
            self.progress = self.progress.max(progress);
        }
        false
    }
}
