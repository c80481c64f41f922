//! The fixed set of simulated bodies and name lookup.

use std::fmt;
use std::str::FromStr;

use orrery_config::BodyConfig;
use orrery_core::time::{days_to_seconds, years_to_seconds};
use orrery_core::units::{au_to_m, km_to_m};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::elements::{CelestialBody, OrbitalElements, PhysicalProperties};

/// Identity of every body the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl BodyId {
    pub const ALL: [BodyId; 9] = [
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
    ];

    /// Lower-case key used in state maps and on the wire.
    pub fn key(self) -> &'static str {
        match self {
            BodyId::Sun => "sun",
            BodyId::Mercury => "mercury",
            BodyId::Venus => "venus",
            BodyId::Earth => "earth",
            BodyId::Mars => "mars",
            BodyId::Jupiter => "jupiter",
            BodyId::Saturn => "saturn",
            BodyId::Uranus => "uranus",
            BodyId::Neptune => "neptune",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Result<BodyId, UnknownBody> {
        let lower = name.trim().to_ascii_lowercase();
        BodyId::ALL
            .into_iter()
            .find(|id| id.key() == lower)
            .ok_or_else(|| UnknownBody(name.to_string()))
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BodyId {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyId::from_name(s)
    }
}

/// A departure, arrival or focus name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown body `{0}`")]
pub struct UnknownBody(pub String);

/// Errors raised while applying catalog overrides.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    UnknownBody(#[from] UnknownBody),
    #[error("invalid elements for `{body}`: {reason}")]
    InvalidElements { body: String, reason: String },
}

/// Immutable catalog holding one record per [`BodyId`].
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCatalog {
    bodies: Vec<CelestialBody>,
}

impl Default for BodyCatalog {
    fn default() -> Self {
        Self::solar_system()
    }
}

impl BodyCatalog {
    /// The built-in Sun and eight planets.
    pub fn solar_system() -> Self {
        let bodies = BodyId::ALL.into_iter().map(builtin).collect();
        Self { bodies }
    }

    /// Start from the built-in catalog and replace the records named in `overrides`.
    pub fn with_overrides(overrides: &[BodyConfig]) -> Result<Self, CatalogError> {
        let mut catalog = Self::solar_system();
        for config in overrides {
            let id = BodyId::from_name(&config.name)?;
            let body = body_from_config(id, config)?;
            debug!(body = %id, "applied catalog override");
            catalog.bodies[id as usize] = body;
        }
        Ok(catalog)
    }

    pub fn get(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id as usize]
    }

    /// Case-insensitive lookup returning the typed record.
    pub fn lookup(&self, name: &str) -> Result<&CelestialBody, UnknownBody> {
        BodyId::from_name(name).map(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn body_from_config(id: BodyId, config: &BodyConfig) -> Result<CelestialBody, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidElements {
        body: config.name.clone(),
        reason,
    };
    if !(config.mass_kg.is_finite() && config.mass_kg > 0.0) {
        return Err(invalid(format!("mass must be positive (got {})", config.mass_kg)));
    }
    if !(config.radius_km.is_finite() && config.radius_km > 0.0) {
        return Err(invalid(format!(
            "radius must be positive (got {})",
            config.radius_km
        )));
    }
    let elements = OrbitalElements {
        semi_major_axis: au_to_m(config.semi_major_axis_au),
        eccentricity: config.eccentricity,
        inclination: config.inclination_deg.to_radians(),
        mean_anomaly_epoch: config.mean_anomaly_deg.to_radians(),
        orbital_period: days_to_seconds(config.orbital_period_days),
    };
    if let Some(reason) = elements.violation() {
        return Err(invalid(reason));
    }
    match (id == BodyId::Sun, elements.is_central()) {
        (true, false) => {
            return Err(invalid(format!(
                "the central body must have a zero semi-major axis (got {} AU)",
                config.semi_major_axis_au
            )));
        }
        (false, true) => {
            return Err(invalid(
                "a zero semi-major axis is reserved for the central body".to_string(),
            ));
        }
        _ => {}
    }
    let elements = if elements.is_central() {
        OrbitalElements::CENTRAL
    } else {
        elements
    };
    Ok(CelestialBody {
        id,
        name: config.name.clone(),
        physical: PhysicalProperties {
            mass: config.mass_kg,
            radius: km_to_m(config.radius_km),
            color: config.color.clone(),
        },
        elements,
    })
}

fn builtin(id: BodyId) -> CelestialBody {
    // (name, mass kg, radius m, a AU, e, i deg, period s, colour)
    let (name, mass, radius, a_au, e, i_deg, period, color) = match id {
        BodyId::Sun => ("Sun", 1.989e30, 6.96e8, 0.0, 0.0, 0.0, 0.0, "#FDB813"),
        BodyId::Mercury => (
            "Mercury",
            3.301e23,
            2.44e6,
            0.387,
            0.206,
            7.0,
            days_to_seconds(87.97),
            "#8C7853",
        ),
        BodyId::Venus => (
            "Venus",
            4.867e24,
            6.05e6,
            0.723,
            0.007,
            3.4,
            days_to_seconds(224.7),
            "#FFC649",
        ),
        BodyId::Earth => (
            "Earth",
            5.972e24,
            6.37e6,
            1.0,
            0.017,
            0.0,
            days_to_seconds(365.25),
            "#4B7BEC",
        ),
        BodyId::Mars => (
            "Mars",
            6.417e23,
            3.39e6,
            1.524,
            0.093,
            1.85,
            days_to_seconds(687.0),
            "#CD5C5C",
        ),
        BodyId::Jupiter => (
            "Jupiter",
            1.898e27,
            6.99e7,
            5.203,
            0.048,
            1.3,
            years_to_seconds(11.86),
            "#DAA520",
        ),
        BodyId::Saturn => (
            "Saturn",
            5.683e26,
            5.82e7,
            9.537,
            0.054,
            2.5,
            years_to_seconds(29.46),
            "#F4E99B",
        ),
        BodyId::Uranus => (
            "Uranus",
            8.681e25,
            2.54e7,
            19.191,
            0.047,
            0.77,
            years_to_seconds(84.01),
            "#4FD0E0",
        ),
        BodyId::Neptune => (
            "Neptune",
            1.024e26,
            2.46e7,
            30.07,
            0.009,
            1.77,
            years_to_seconds(164.79),
            "#4169E1",
        ),
    };

    CelestialBody {
        id,
        name: name.to_string(),
        physical: PhysicalProperties {
            mass,
            radius,
            color: color.to_string(),
        },
        elements: OrbitalElements {
            semi_major_axis: au_to_m(a_au),
            eccentricity: e,
            inclination: f64::to_radians(i_deg),
            mean_anomaly_epoch: 0.0,
            orbital_period: period,
        },
    }
}
