//! Min-cost flow solving.
//!
//! - [`SuccessiveShortestPath`] — Successive shortest augmenting paths with
//!   node potentials

mod ssp;

pub use ssp::{FlowOutcome, SuccessiveShortestPath};
