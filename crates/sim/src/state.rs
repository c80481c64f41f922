//! The mutable timeline state published once per tick.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use orrery_core::units::m_to_au;
use orrery_orbits::{BodyKind, CelestialBody, StateVector};
use serde::{Deserialize, Serialize};

use crate::mission::{Mission, MissionId};

/// Display view of a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub name: String,
    /// Astronomical units.
    pub position: [f64; 3],
    /// Metres per second.
    pub velocity: [f64; 3],
    /// Astronomical units.
    pub radius: f64,
    pub mass: f64,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: BodyKind,
}

impl BodySnapshot {
    pub fn new(body: &CelestialBody, state: &StateVector) -> Self {
        Self {
            name: body.name.clone(),
            position: state.position.map(m_to_au),
            velocity: state.velocity,
            radius: m_to_au(body.physical.radius),
            mass: body.physical.mass,
            color: body.physical.color.clone(),
            kind: body.kind(),
        }
    }

    pub(crate) fn update(&mut self, state: &StateVector) {
        self.position = state.position.map(m_to_au);
        self.velocity = state.velocity;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Simulation seconds since the epoch.
    pub timestamp: f64,
    /// Wall-clock time of the last tick.
    pub real_timestamp: DateTime<Utc>,
    pub time_scale: f64,
    pub is_playing: bool,
    /// Keyed by lower-case body name.
    pub bodies: BTreeMap<String, BodySnapshot>,
    /// Every launched mission, completed ones included.
    pub missions: Vec<Mission>,
}

impl SimulationState {
    pub fn body(&self, name: &str) -> Option<&BodySnapshot> {
        self.bodies.get(&name.to_ascii_lowercase())
    }

    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn active_missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter().filter(|m| m.is_active())
    }
}
