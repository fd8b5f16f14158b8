//! Synthetic rebalancing instances.
//!
//! - [`ScenarioGenerator`] — Seeded generator of imbalances, rosters, and
//!   cost matrices

mod generator;

pub use generator::{Scenario, ScenarioGenerator};
