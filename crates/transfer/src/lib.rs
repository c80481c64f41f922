//! Transfer façade crate consolidating mission planning and exposing supporting crates.

pub mod mission;

pub use facade::*;
pub use orrery_impulsive as impulsive;

mod facade;
