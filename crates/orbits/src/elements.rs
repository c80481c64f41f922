//! Static description of a body: physical properties plus Keplerian elements.

use orrery_core::time::seconds_to_days;
use orrery_core::units::m_to_au;
use serde::{Deserialize, Serialize};

use crate::catalog::BodyId;
use crate::kepler::StateVector;

/// Keplerian elements in SI units. Angles are radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Metres; zero is reserved for the central star.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub mean_anomaly_epoch: f64,
    /// Seconds; zero for the central star.
    pub orbital_period: f64,
}

impl OrbitalElements {
    /// Elements of the body every other body orbits.
    pub const CENTRAL: Self = Self {
        semi_major_axis: 0.0,
        eccentricity: 0.0,
        inclination: 0.0,
        mean_anomaly_epoch: 0.0,
        orbital_period: 0.0,
    };

    pub fn is_central(&self) -> bool {
        self.semi_major_axis == 0.0
    }

    /// Describe the first violated element constraint, if any.
    pub fn violation(&self) -> Option<String> {
        if !(self.semi_major_axis.is_finite() && self.semi_major_axis >= 0.0) {
            return Some(format!(
                "semi-major axis must be non-negative (got {})",
                self.semi_major_axis
            ));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Some(format!(
                "eccentricity must lie in [0, 1) (got {})",
                self.eccentricity
            ));
        }
        if !(self.inclination.is_finite() && self.mean_anomaly_epoch.is_finite()) {
            return Some("angles must be finite".to_string());
        }
        if !self.is_central() && !(self.orbital_period.is_finite() && self.orbital_period > 0.0) {
            return Some(format!(
                "orbital period must be positive (got {})",
                self.orbital_period
            ));
        }
        None
    }
}

/// Mass, size and display colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    /// Kilograms.
    pub mass: f64,
    /// Metres.
    pub radius: f64,
    pub color: String,
}

/// Display category of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    Planet,
}

/// A catalog entry. Position and velocity are never stored here; they are
/// derived on demand by the propagator.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    pub physical: PhysicalProperties,
    pub elements: OrbitalElements,
}

impl CelestialBody {
    pub fn is_central(&self) -> bool {
        self.elements.is_central()
    }

    pub fn kind(&self) -> BodyKind {
        if self.is_central() {
            BodyKind::Star
        } else {
            BodyKind::Planet
        }
    }

    /// Build the focus view for this body at the supplied state.
    pub fn details(&self, state: &StateVector) -> BodyDetails {
        BodyDetails {
            name: self.name.clone(),
            mass: self.physical.mass,
            radius: self.physical.radius,
            semi_major_axis: self.elements.semi_major_axis,
            eccentricity: self.elements.eccentricity,
            orbital_period_days: seconds_to_days(self.elements.orbital_period),
            position: state.position.map(m_to_au),
            velocity: state.velocity,
        }
    }
}

/// Detailed information about a single body, as shown when focusing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDetails {
    pub name: String,
    pub mass: f64,
    /// Metres.
    pub radius: f64,
    /// Metres.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub orbital_period_days: f64,
    /// Astronomical units.
    pub position: [f64; 3],
    /// Metres per second.
    pub velocity: [f64; 3],
}
