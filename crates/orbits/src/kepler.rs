//! Keplerian elements to Cartesian state via Kepler's equation.
//!
//! The world frame puts the orbital plane in x-z; inclination tilts the
//! in-plane y axis toward world y. All bodies use the Sun's μ.

use orrery_config::KeplerConfig;
use orrery_core::constants::MU_SUN;
use orrery_core::vector::{Vector3, ZERO};
use serde::{Deserialize, Serialize};

use crate::elements::{CelestialBody, OrbitalElements};

/// Heliocentric position (m) and velocity (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub position: Vector3,
    pub velocity: Vector3,
}

impl StateVector {
    pub const ZERO: Self = Self {
        position: ZERO,
        velocity: ZERO,
    };
}

/// Newton-Raphson solver for `E - e sin E = M`.
///
/// The default runs exactly 10 iterations seeded at `E = M` with no
/// convergence check. That is accurate for e below roughly 0.25; raise
/// `iterations` or set `tolerance` for more eccentric orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    pub iterations: u32,
    pub tolerance: Option<f64>,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            iterations: 10,
            tolerance: None,
        }
    }
}

impl From<KeplerConfig> for KeplerSolver {
    fn from(config: KeplerConfig) -> Self {
        Self {
            iterations: config.iterations,
            tolerance: config.tolerance,
        }
    }
}

impl KeplerSolver {
    /// Eccentric anomaly for mean anomaly `m` and eccentricity `e`.
    pub fn solve_eccentric_anomaly(&self, m: f64, e: f64) -> f64 {
        let mut ecc = m;
        for _ in 0..self.iterations {
            let step = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
            ecc -= step;
            if let Some(tol) = self.tolerance {
                if step.abs() < tol {
                    break;
                }
            }
        }
        ecc
    }

    /// State of `body` at `t` seconds from epoch. `t` may be negative or span
    /// many periods.
    pub fn propagate(&self, body: &CelestialBody, t: f64) -> StateVector {
        self.propagate_elements(&body.elements, t)
    }

    pub fn propagate_elements(&self, el: &OrbitalElements, t: f64) -> StateVector {
        if el.is_central() {
            return StateVector::ZERO;
        }

        let e = el.eccentricity;
        let mean_motion = std::f64::consts::TAU / el.orbital_period;
        let m = el.mean_anomaly_epoch + mean_motion * t;
        let ecc = self.solve_eccentric_anomaly(m, e);

        let nu = 2.0
            * f64::atan2(
                (1.0 + e).sqrt() * (ecc / 2.0).sin(),
                (1.0 - e).sqrt() * (ecc / 2.0).cos(),
            );
        let r = el.semi_major_axis * (1.0 - e * ecc.cos());

        let x_orb = r * nu.cos();
        let y_orb = r * nu.sin();

        // specific angular momentum
        let h = (MU_SUN * el.semi_major_axis * (1.0 - e * e)).sqrt();
        let vx_orb = -MU_SUN / h * nu.sin();
        let vy_orb = MU_SUN / h * (e + nu.cos());

        let (sin_i, cos_i) = el.inclination.sin_cos();

        StateVector {
            position: [x_orb, y_orb * sin_i, y_orb * cos_i],
            velocity: [vx_orb, vy_orb * sin_i, vy_orb * cos_i],
        }
    }
}

/// Propagate with the default fixed 10-iteration solver.
pub fn kepler_to_cartesian(body: &CelestialBody, t: f64) -> StateVector {
    KeplerSolver::default().propagate(body, t)
}
