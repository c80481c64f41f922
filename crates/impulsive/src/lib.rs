//! Impulsive transfer utilities: classical two-impulse transfer estimates.

pub mod transfers;

pub use transfers::{HohmannTransfer, hohmann};
