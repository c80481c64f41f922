//! Orrery: an analytic solar-system simulator with transfer planning.
//!
//! The physics lives in the workspace crates; this facade re-exports them so
//! front-ends (the bundled CLIs, a GUI, a web bridge) depend on one crate.

pub mod cli;

pub use orrery_config as config;
pub use orrery_core as base;
pub use orrery_export as export;
pub use orrery_impulsive as impulsive;
pub use orrery_orbits as orbits;
pub use orrery_sim as sim;
pub use orrery_transfer as transfer;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
