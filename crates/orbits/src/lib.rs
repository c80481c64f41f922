//! Orbital elements, the fixed solar-system catalog, and the Kepler propagator.
//!
//! Bodies move on fixed two-body ellipses around the Sun; nothing here
//! integrates mutual perturbations.

pub mod catalog;
pub mod elements;
pub mod kepler;

pub use catalog::{BodyCatalog, BodyId, CatalogError, UnknownBody};
pub use elements::{BodyDetails, BodyKind, CelestialBody, OrbitalElements, PhysicalProperties};
pub use kepler::{KeplerSolver, StateVector, kepler_to_cartesian};
