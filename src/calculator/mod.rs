//! End-to-end relocation calculation.
//!
//! - [`MinCostRelocationCalculator`] — Builds the vehicle-level flow network,
//!   solves it, and extracts the relocation plan
//! - [`calc_relocations`] — One-shot helper with default configuration

mod min_cost;
#[cfg(test)]
mod properties;

pub use min_cost::{calc_relocations, MinCostRelocationCalculator};
