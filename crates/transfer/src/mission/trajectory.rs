//! Display trajectory between a departure body and an arrival body.
//!
//! Samples are a straight line in Cartesian space from the departure body's
//! position at launch to the arrival body's position at arrival. This is a
//! visual path only; the transfer ellipse itself is not propagated.

use orrery_core::vector::{Vector3, lerp};
use orrery_orbits::{CelestialBody, KeplerSolver};
use serde::{Deserialize, Serialize};

/// One sample along a mission path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Simulation seconds from epoch.
    pub time: f64,
    /// Heliocentric position (m).
    pub position: Vector3,
    /// Fraction of the flight completed, linear in time.
    pub progress: f64,
}

/// Sample `num_points` evenly spaced points between departure and arrival.
///
/// A single requested point yields only the departure sample; zero yields an
/// empty path.
pub fn generate_trajectory(
    solver: &KeplerSolver,
    departure: &CelestialBody,
    arrival: &CelestialBody,
    departure_time: f64,
    arrival_time: f64,
    num_points: usize,
) -> Vec<TrajectoryPoint> {
    let start = solver.propagate(departure, departure_time).position;
    let end = solver.propagate(arrival, arrival_time).position;
    let span = arrival_time - departure_time;

    (0..num_points)
        .map(|i| {
            let alpha = if num_points > 1 {
                i as f64 / (num_points - 1) as f64
            } else {
                0.0
            };
            TrajectoryPoint {
                time: departure_time + alpha * span,
                position: lerp(&start, &end, alpha),
                progress: alpha,
            }
        })
        .collect()
}
