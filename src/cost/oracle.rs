//! Cost oracle abstraction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Vehicle, ZoneId};

/// Cost of moving one vehicle into one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveCost {
    /// A non-negative, finite movement cost.
    Finite(f64),
    /// The zone cannot be reached from the vehicle's location.
    Unreachable,
}

impl MoveCost {
    /// Maps an infinite value to [`MoveCost::Unreachable`].
    pub fn from_value(value: f64) -> Self {
        if value == f64::INFINITY {
            Self::Unreachable
        } else {
            Self::Finite(value)
        }
    }

    /// Returns the finite cost, or `None` when unreachable.
    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(c) => Some(c),
            Self::Unreachable => None,
        }
    }
}

/// Internal failure of a cost oracle (as opposed to an unreachable zone).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct OracleFailure {
    message: String,
}

impl OracleFailure {
    /// Creates a failure with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Supplies vehicle-to-zone movement costs.
///
/// Implementations must be deterministic and free of side effects: the
/// network builder queries every (vehicle, deficit zone) pair once per
/// calculation, and identical answers are required for reproducible plans.
pub trait CostOracle {
    /// Returns the cost of moving `vehicle` into `zone`.
    fn cost(&self, vehicle: &Vehicle, zone: ZoneId) -> Result<MoveCost, OracleFailure>;
}

impl<T: CostOracle + ?Sized> CostOracle for &T {
    fn cost(&self, vehicle: &Vehicle, zone: ZoneId) -> Result<MoveCost, OracleFailure> {
        (**self).cost(vehicle, zone)
    }
}

/// Cost oracle backed by a closure. Built with [`oracle_fn`].
#[derive(Clone)]
pub struct FnOracle<F> {
    f: F,
}

impl<F> CostOracle for FnOracle<F>
where
    F: Fn(&Vehicle, ZoneId) -> Result<MoveCost, OracleFailure>,
{
    fn cost(&self, vehicle: &Vehicle, zone: ZoneId) -> Result<MoveCost, OracleFailure> {
        (self.f)(vehicle, zone)
    }
}

/// Wraps a closure as a [`CostOracle`].
///
/// # Examples
///
/// ```
/// use u_rebalancing::cost::{oracle_fn, CostOracle, MoveCost};
/// use u_rebalancing::models::{Vehicle, VehicleId, ZoneId};
///
/// let oracle = oracle_fn(|v, z| Ok(MoveCost::Finite((v.location() + z.0) as f64)));
/// let cost = oracle.cost(&Vehicle::new(VehicleId(0), 2), ZoneId(3)).unwrap();
/// assert_eq!(cost, MoveCost::Finite(5.0));
/// ```
pub fn oracle_fn<F>(f: F) -> FnOracle<F>
where
    F: Fn(&Vehicle, ZoneId) -> Result<MoveCost, OracleFailure>,
{
    FnOracle { f }
}
