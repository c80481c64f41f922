//! Re-exported APIs for consumers of the transfer crate.

pub use crate::mission::porkchop::{
    GridIoError, PorkchopCell, PorkchopGrid, PorkchopRequest, TimeWindow, load_grid, save_grid,
};
pub use crate::mission::trajectory::{TrajectoryPoint, generate_trajectory};
pub use crate::mission::{TransferError, TransferPlanner, TransferResult, date_at, epoch_seconds};
pub use orrery_impulsive::HohmannTransfer;
