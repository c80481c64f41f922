//! The steppable simulation engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use orrery_config::{ConfigError, EngineConfig};
use orrery_core::vector;
use orrery_orbits::{BodyCatalog, BodyDetails, KeplerSolver, UnknownBody};
use orrery_transfer::{PorkchopGrid, TimeWindow, TransferError, TransferPlanner, TransferResult};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::controls::EngineControls;
use crate::mission::{self, Mission, MissionPayloadError};
use crate::state::{BodySnapshot, SimulationState};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("time step must be finite and non-negative (got {0})")]
    InvalidTimeStep(f64),
    #[error("invalid mission payload: {0}")]
    InvalidMissionPayload(#[from] MissionPayloadError),
    #[error("engine is stopped")]
    Stopped,
    #[error("simulation fault: {reason}")]
    Fault { reason: String },
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Paused,
    Playing,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Running,
    Stopped,
}

/// Owns the simulation timeline. Transfer planning goes through the same
/// immutable catalog and never touches the timeline.
#[derive(Debug)]
pub struct SimulationEngine {
    config: EngineConfig,
    catalog: Arc<BodyCatalog>,
    solver: KeplerSolver,
    controls: Arc<EngineControls>,
    lifecycle: Lifecycle,
    state: SimulationState,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), BodyCatalog::default())
    }
}

impl SimulationEngine {
    pub fn new(config: EngineConfig, catalog: BodyCatalog) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config, catalog))
    }

    fn build(config: EngineConfig, catalog: BodyCatalog) -> Self {
        let controls = EngineControls::new(
            config.initial_time_scale,
            config.min_time_scale,
            config.max_time_scale,
        );
        let state = SimulationState {
            time_scale: controls.time_scale(),
            ..SimulationState::default()
        };
        Self {
            solver: KeplerSolver::from(config.kepler),
            catalog: Arc::new(catalog),
            controls: Arc::new(controls),
            lifecycle: Lifecycle::Uninitialized,
            state,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<BodyCatalog> {
        &self.catalog
    }

    pub fn solver(&self) -> KeplerSolver {
        self.solver
    }

    /// Shared command surface, for callers that drive the engine from elsewhere.
    pub fn controls(&self) -> &Arc<EngineControls> {
        &self.controls
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn status(&self) -> EngineStatus {
        match self.lifecycle {
            Lifecycle::Uninitialized => EngineStatus::Uninitialized,
            Lifecycle::Stopped => EngineStatus::Stopped,
            Lifecycle::Running if self.controls.is_playing() => EngineStatus::Playing,
            Lifecycle::Running => EngineStatus::Paused,
        }
    }

    /// Reset to t = 0, paused, with every body at its epoch position and no missions.
    pub fn initialize(&mut self) {
        self.controls.reset_run();
        let bodies: BTreeMap<String, BodySnapshot> = self
            .catalog
            .iter()
            .map(|body| {
                let sv = self.solver.propagate(body, 0.0);
                (body.id.key().to_string(), BodySnapshot::new(body, &sv))
            })
            .collect();
        self.state = SimulationState {
            timestamp: 0.0,
            real_timestamp: Utc::now(),
            time_scale: self.controls.time_scale(),
            is_playing: false,
            bodies,
            missions: Vec::new(),
        };
        self.lifecycle = Lifecycle::Running;
        info!(bodies = self.state.bodies.len(), "simulation initialized");
    }

    pub fn play(&mut self) {
        self.controls.play();
        self.state.is_playing = true;
        debug!("simulation playing");
    }

    pub fn pause(&mut self) {
        self.controls.pause();
        self.state.is_playing = false;
        debug!("simulation paused");
    }

    /// Clamp and store the time scale, returning the stored value.
    pub fn set_time_scale(&mut self, scale: f64) -> f64 {
        let stored = self.controls.set_time_scale(scale);
        self.state.time_scale = stored;
        stored
    }

    /// Halt permanently. Further steps return [`EngineError::Stopped`].
    pub fn stop(&mut self) {
        self.controls.request_stop();
        self.state.is_playing = false;
        if self.lifecycle != Lifecycle::Stopped {
            self.lifecycle = Lifecycle::Stopped;
            info!(timestamp = self.state.timestamp, "simulation stopped");
        }
    }

    /// Advance one tick. `dt` overrides the configured `tick_interval_s * time_scale`
    /// advance in simulation seconds. A paused engine only refreshes its bookkeeping.
    pub fn step(&mut self, dt: Option<f64>) -> Result<&SimulationState, EngineError> {
        if let Some(dt) = dt {
            if !(dt.is_finite() && dt >= 0.0) {
                return Err(EngineError::InvalidTimeStep(dt));
            }
        }
        if self.controls.stop_requested() {
            self.stop();
        }
        match self.lifecycle {
            Lifecycle::Stopped => return Err(EngineError::Stopped),
            Lifecycle::Uninitialized => self.initialize(),
            Lifecycle::Running => {}
        }

        let playing = self.controls.is_playing();
        let time_scale = self.controls.time_scale();
        if playing {
            let dt = dt.unwrap_or(self.config.tick_interval_s * time_scale);
            if let Some(reason) = self.advance(dt) {
                return Err(self.fault(reason));
            }
        }
        self.state.real_timestamp = Utc::now();
        self.state.time_scale = time_scale;
        self.state.is_playing = playing;
        Ok(&self.state)
    }

    fn advance(&mut self, dt: f64) -> Option<String> {
        let timestamp = self.state.timestamp + dt;
        if !timestamp.is_finite() {
            return Some(format!("timestamp overflowed advancing by {dt}"));
        }
        self.state.timestamp = timestamp;

        for body in self.catalog.iter().filter(|b| !b.is_central()) {
            let sv = self.solver.propagate(body, timestamp);
            if !(vector::is_finite(&sv.position) && vector::is_finite(&sv.velocity)) {
                return Some(format!("non-finite state for {} at t={timestamp}", body.id));
            }
            if let Some(snapshot) = self.state.bodies.get_mut(body.id.key()) {
                snapshot.update(&sv);
            }
        }

        trace!(timestamp, dt, "advanced bodies");
        for mission in &mut self.state.missions {
            if mission.advance(timestamp) {
                info!(
                    mission = %mission.id,
                    departure = %mission.departure,
                    arrival = %mission.arrival,
                    timestamp,
                    "mission completed"
                );
            }
        }
        None
    }

    fn fault(&mut self, reason: String) -> EngineError {
        error!(%reason, "simulation fault, stopping");
        self.stop();
        EngineError::Fault { reason }
    }

    /// Validate a transfer and start tracking it as a new active mission.
    pub fn launch_mission(&mut self, transfer: &TransferResult) -> Result<Mission, EngineError> {
        if self.lifecycle == Lifecycle::Stopped || self.controls.stop_requested() {
            return Err(EngineError::Stopped);
        }
        if let Err(err) = mission::validate_payload(transfer) {
            warn!(%err, "rejected mission launch");
            return Err(err.into());
        }
        if self.lifecycle == Lifecycle::Uninitialized {
            self.initialize();
        }
        let id = self.controls.next_mission_id();
        let mission = Mission::from_transfer(id, transfer, self.config.epoch)?;
        self.admit_mission(mission.clone());
        Ok(mission)
    }

    /// Track an already-built mission.
    pub(crate) fn admit_mission(&mut self, mission: Mission) {
        info!(
            mission = %mission.id,
            departure = %mission.departure,
            arrival = %mission.arrival,
            launch_time = mission.launch_time,
            duration = mission.duration,
            "mission launched"
        );
        self.state.missions.push(mission);
    }

    /// Details of a body at the current simulation time.
    pub fn focus_on_body(&self, name: &str) -> Result<BodyDetails, UnknownBody> {
        let body = self.catalog.lookup(name)?;
        let sv = self.solver.propagate(body, self.state.timestamp);
        Ok(body.details(&sv))
    }

    pub fn planner(&self) -> TransferPlanner<'_> {
        TransferPlanner {
            catalog: self.catalog.as_ref(),
            solver: self.solver,
            epoch: self.config.epoch,
            trajectory_points: self.config.trajectory_points,
        }
    }

    pub fn calculate_transfer(
        &self,
        departure: &str,
        arrival: &str,
        departure_date: DateTime<Utc>,
        arrival_date: DateTime<Utc>,
    ) -> Result<TransferResult, TransferError> {
        self.planner()
            .calculate_transfer(departure, arrival, departure_date, arrival_date)
    }

    /// Porkchop grid at the configured resolution.
    pub fn get_porkchop_data(
        &self,
        departure: &str,
        arrival: &str,
        departure_window: TimeWindow,
        arrival_window: TimeWindow,
    ) -> Result<PorkchopGrid, TransferError> {
        self.planner().porkchop(
            departure,
            arrival,
            departure_window,
            arrival_window,
            self.config.porkchop_resolution,
        )
    }
}
