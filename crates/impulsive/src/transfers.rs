//! Analytic estimators for impulsive transfers in the coplanar, circular limit.
//!
//! Every figure is wrapped with [`orrery_core::finite`] where it is computed:
//! degenerate radii (zero, negative) surface as `None`, never as NaN or ∞.

use orrery_core::constants::MU_SUN;
use orrery_core::finite;
use orrery_orbits::CelestialBody;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result for a Hohmann transfer between circular, coplanar orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HohmannTransfer {
    /// Half the transfer-ellipse period (s).
    pub transfer_time: Option<f64>,
    /// |dv_departure| + |dv_arrival| (m/s).
    pub delta_v_total: Option<f64>,
    pub delta_v_departure: Option<f64>,
    pub delta_v_arrival: Option<f64>,
    /// Lead angle of the target at departure (rad).
    pub phase_angle: Option<f64>,
    /// Departure-side characteristic energy (m²/s²).
    pub c3: Option<f64>,
    /// Transfer-ellipse semi-major axis (m).
    pub semi_major_axis: Option<f64>,
}

/// Compute the classical Hohmann transfer between two circular coplanar orbits.
///
/// Inputs:
/// - `r1`: initial circular orbit radius (m)
/// - `r2`: target circular orbit radius (m)
/// - `mu`: gravitational parameter of the central body (m³/s²)
pub fn hohmann(r1: f64, r2: f64, mu: f64) -> HohmannTransfer {
    let a_t = 0.5 * (r1 + r2);
    let tof = std::f64::consts::PI * (a_t.powi(3) / mu).sqrt();

    let v1 = (mu / r1).sqrt();
    let v2 = (mu / r2).sqrt();

    // Transfer periapsis speed (at r1) and apoapsis speed (at r2)
    let v_t1 = (mu * (2.0 / r1 - 1.0 / a_t)).sqrt();
    let v_t2 = (mu * (2.0 / r2 - 1.0 / a_t)).sqrt();

    let dv1 = (v_t1 - v1).abs();
    let dv2 = (v2 - v_t2).abs();

    let phase = std::f64::consts::PI * (1.0 - (a_t / r2).powf(1.5));
    let c3 = (v_t1 - v1).powi(2);

    HohmannTransfer {
        transfer_time: finite(tof),
        delta_v_total: finite(dv1 + dv2),
        delta_v_departure: finite(dv1),
        delta_v_arrival: finite(dv2),
        phase_angle: finite(phase),
        c3: finite(c3),
        semi_major_axis: finite(a_t),
    }
}

impl HohmannTransfer {
    /// Transfer between the orbits of two catalog bodies, using their
    /// semi-major axes as circular radii and the Sun's μ.
    pub fn between(departure: &CelestialBody, arrival: &CelestialBody) -> Self {
        let transfer = hohmann(
            departure.elements.semi_major_axis,
            arrival.elements.semi_major_axis,
            MU_SUN,
        );
        debug!(
            departure = %departure.id,
            arrival = %arrival.id,
            delta_v = ?transfer.delta_v_total,
            transfer_time = ?transfer.transfer_time,
            "computed Hohmann transfer"
        );
        transfer
    }
}
