//! Movement costs.
//!
//! The [`CostOracle`] trait is how callers inject travel-time or distance
//! data; [`CostMatrix`] is a dense table implementation of it.

mod matrix;
mod oracle;

pub use matrix::{CostMatrix, MatrixParseError};
pub use oracle::{oracle_fn, CostOracle, FnOracle, MoveCost, OracleFailure};
