//! Flow network construction.
//!
//! - [`ResidualGraph`] — Adjacency-list graph with paired residual arcs
//! - [`build_network`] — Expands zone imbalances and vehicle rosters into a
//!   vehicle-level flow network

mod builder;
mod graph;

pub use builder::{build_network, validate, FlowNetwork, NodeKind, VehicleArc, VehicleNode};
pub use graph::{Arc, ArcIndex, NodeIndex, ResidualGraph};
