//! # u-rebalancing
//!
//! Fleet rebalancing library: moves idle vehicles from surplus zones toward
//! deficit zones at minimum total relocation cost.
//!
//! Each surplus zone is expanded into its individual vehicles, so the
//! min-cost flow solve directly yields per-vehicle relocations instead of an
//! aggregated zone-to-zone plan.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (ZoneId, Vehicle, ZonalImbalance, Relocation, RelocationPlan)
//! - [`cost`] — Cost oracle trait and dense cost matrix
//! - [`network`] — Vehicle-level flow network builder
//! - [`solver`] — Successive shortest path min-cost flow solver
//! - [`extraction`] — Projection of a solved flow onto relocations
//! - [`calculator`] — End-to-end relocation calculator
//! - [`scenario`] — Seeded random rebalancing instances
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use u_rebalancing::calculator::MinCostRelocationCalculator;
//! use u_rebalancing::cost::{oracle_fn, MoveCost};
//! use u_rebalancing::models::{Vehicle, VehicleId, ZonalImbalance, ZoneId};
//!
//! let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1)]);
//! let mut rosters = BTreeMap::new();
//! rosters.insert(ZoneId(0), vec![Vehicle::new(VehicleId(7), 0)]);
//!
//! let oracle = oracle_fn(|_, _| Ok(MoveCost::Finite(4.0)));
//! let plan = MinCostRelocationCalculator::new(oracle)
//!     .calc_relocations(&imbalance, &rosters)
//!     .unwrap();
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan.relocations()[0].target_zone, ZoneId(1));
//! ```

pub mod calculator;
pub mod config;
pub mod cost;
pub mod error;
pub mod extraction;
pub mod models;
pub mod network;
pub mod scenario;
pub mod solver;

pub use error::{RebalanceError, Result, ValidationError};
