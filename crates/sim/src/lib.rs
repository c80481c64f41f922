//! Real-time solar-system simulation engine.
//!
//! [`SimulationEngine`] owns the timeline and is advanced with `step`. For a
//! long-lived tick loop, split it into an [`EngineRunner`] and cloneable
//! [`EngineHandle`]s with [`EngineRunner::new`].

pub mod controls;
pub mod engine;
pub mod mission;
pub mod runtime;
pub mod state;

pub use controls::EngineControls;
pub use engine::{EngineError, EngineStatus, SimulationEngine};
pub use mission::{Mission, MissionId, MissionPayloadError, MissionStatus};
pub use runtime::{EngineHandle, EngineRunner};
pub use state::{BodySnapshot, SimulationState};
