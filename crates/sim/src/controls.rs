//! Command surface shared between the tick loop and external callers.
//!
//! Each field is independent and stored in its own atomic, so commands never
//! wait on a tick and a tick never waits on a command.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::mission::MissionId;

#[derive(Debug)]
pub struct EngineControls {
    playing: AtomicBool,
    time_scale_bits: AtomicU64,
    stop_requested: AtomicBool,
    next_mission_id: AtomicU64,
    min_time_scale: f64,
    max_time_scale: f64,
}

impl EngineControls {
    /// Paused controls with `initial_time_scale` clamped into `[min, max]`.
    pub fn new(initial_time_scale: f64, min_time_scale: f64, max_time_scale: f64) -> Self {
        let controls = Self {
            playing: AtomicBool::new(false),
            time_scale_bits: AtomicU64::new(1.0f64.to_bits()),
            stop_requested: AtomicBool::new(false),
            next_mission_id: AtomicU64::new(1),
            min_time_scale,
            max_time_scale,
        };
        controls.set_time_scale(initial_time_scale);
        controls
    }

    pub fn play(&self) {
        self.playing.store(true, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Store `scale` clamped to the configured bounds and return the stored value.
    /// NaN is ignored and leaves the current scale in place.
    pub fn set_time_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            warn!("ignoring NaN time scale");
            return self.time_scale();
        }
        let clamped = scale.clamp(self.min_time_scale, self.max_time_scale);
        self.time_scale_bits
            .store(clamped.to_bits(), Ordering::SeqCst);
        debug!(requested = scale, stored = clamped, "time scale updated");
        clamped
    }

    pub fn time_scale(&self) -> f64 {
        f64::from_bits(self.time_scale_bits.load(Ordering::SeqCst))
    }

    /// Ask the tick loop to halt after its current tick. Also pauses.
    pub fn request_stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Hand out the next sequential mission id.
    pub fn next_mission_id(&self) -> MissionId {
        MissionId(self.next_mission_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Prepare for a fresh run: paused and not stopping. Mission ids keep
    /// counting so ids stay unique for the lifetime of the controls.
    pub(crate) fn reset_run(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.stop_requested.store(false, Ordering::SeqCst);
    }
}
