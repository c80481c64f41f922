//! Tokio tick loop around [`SimulationEngine`].
//!
//! The runner owns the engine and is the only writer of its state. Handles
//! issue commands through the shared [`EngineControls`], queue missions over a
//! channel drained at the start of each tick, and read complete state
//! snapshots from a watch channel. A stop request lets the in-flight tick
//! finish before the loop exits.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use orrery_config::EngineConfig;
use orrery_orbits::{BodyCatalog, BodyDetails, KeplerSolver, UnknownBody};
use orrery_transfer::{PorkchopGrid, TimeWindow, TransferError, TransferPlanner, TransferResult};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::controls::EngineControls;
use crate::engine::{EngineError, EngineStatus, SimulationEngine};
use crate::mission::{self, Mission};
use crate::state::SimulationState;

pub struct EngineRunner {
    engine: SimulationEngine,
    launches: mpsc::UnboundedReceiver<Mission>,
    state_tx: watch::Sender<SimulationState>,
}

#[derive(Clone)]
pub struct EngineHandle {
    controls: Arc<EngineControls>,
    catalog: Arc<BodyCatalog>,
    config: Arc<EngineConfig>,
    solver: KeplerSolver,
    launches: mpsc::UnboundedSender<Mission>,
    state_rx: watch::Receiver<SimulationState>,
}

impl EngineRunner {
    /// Split an engine into its tick loop and a handle for issuing commands.
    /// An uninitialized engine is initialized here, so commands issued through
    /// the handle before the loop starts are kept.
    pub fn new(mut engine: SimulationEngine) -> (Self, EngineHandle) {
        if engine.status() == EngineStatus::Uninitialized {
            engine.initialize();
        }
        let (launch_tx, launch_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(engine.state().clone());
        let handle = EngineHandle {
            controls: Arc::clone(engine.controls()),
            catalog: Arc::clone(engine.catalog()),
            config: Arc::new(engine.config().clone()),
            solver: engine.solver(),
            launches: launch_tx,
            state_rx,
        };
        let runner = Self {
            engine,
            launches: launch_rx,
            state_tx,
        };
        (runner, handle)
    }

    /// Tick every `tick_interval_s` until stopped or faulted.
    pub async fn run(mut self) -> Result<(), EngineError> {
        let period = Duration::from_secs_f64(self.engine.config().tick_interval_s);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tick_ms = period.as_millis() as u64, "engine loop started");

        loop {
            interval.tick().await;
            self.drain_launches();
            match self.engine.step(None) {
                Ok(state) => {
                    self.state_tx.send_replace(state.clone());
                }
                Err(EngineError::Stopped) => {
                    self.shut_down();
                    info!("engine loop exited");
                    return Ok(());
                }
                Err(err) => {
                    self.shut_down();
                    error!(%err, "engine loop aborted");
                    return Err(err);
                }
            }
        }
    }

    fn drain_launches(&mut self) {
        while let Ok(mission) = self.launches.try_recv() {
            self.engine.admit_mission(mission);
        }
    }

    /// Refuse further launches, keep any that were already accepted, and
    /// publish the final state.
    fn shut_down(&mut self) {
        self.launches.close();
        self.drain_launches();
        self.state_tx.send_replace(self.engine.state().clone());
    }
}

impl EngineHandle {
    pub fn play(&self) {
        self.controls.play();
    }

    pub fn pause(&self) {
        self.controls.pause();
    }

    pub fn set_time_scale(&self, scale: f64) -> f64 {
        self.controls.set_time_scale(scale)
    }

    /// Request a stop. The loop exits after its current tick.
    pub fn stop(&self) {
        self.controls.request_stop();
    }

    pub fn is_playing(&self) -> bool {
        self.controls.is_playing()
    }

    pub fn time_scale(&self) -> f64 {
        self.controls.time_scale()
    }

    /// Latest published snapshot.
    pub fn state(&self) -> SimulationState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SimulationState> {
        self.state_rx.clone()
    }

    pub fn focus_on_body(&self, name: &str) -> Result<BodyDetails, UnknownBody> {
        let body = self.catalog.lookup(name)?;
        let timestamp = self.state_rx.borrow().timestamp;
        Ok(body.details(&self.solver.propagate(body, timestamp)))
    }

    fn planner(&self) -> TransferPlanner<'_> {
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

    /// Validate and queue a mission. It starts advancing on the next tick.
    ///
    /// Once the loop has exited this returns [`EngineError::Stopped`]. A
    /// mission that was accepted while a stop was in flight still appears in
    /// the final published state, though it never advances.
    pub fn launch_mission(&self, transfer: &TransferResult) -> Result<Mission, EngineError> {
        if self.controls.stop_requested() {
            return Err(EngineError::Stopped);
        }
        if let Err(err) = mission::validate_payload(transfer) {
            warn!(%err, "rejected mission launch");
            return Err(err.into());
        }
        let id = self.controls.next_mission_id();
        let mission = Mission::from_transfer(id, transfer, self.config.epoch)?;
        self.launches
            .send(mission.clone())
            .map_err(|_| EngineError::Stopped)?;
        Ok(mission)
    }
}
