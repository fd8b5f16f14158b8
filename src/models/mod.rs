//! Domain model types for fleet rebalancing.
//!
//! Provides zone identifiers and imbalances, relocatable vehicles grouped
//! into per-zone rosters, and the relocation records a rebalancing cycle
//! produces.

mod relocation;
mod vehicle;
mod zone;

pub use relocation::{Relocation, RelocationPlan};
pub use vehicle::{Vehicle, VehicleId};
pub use zone::{VehicleRosters, ZonalImbalance, ZoneDeficit, ZoneId, ZoneSurplus};
