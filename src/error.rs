//! Error types for relocation calculation.

use thiserror::Error;

use crate::models::{VehicleId, ZoneId};

/// Malformed rebalancing input, detected before any graph is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A surplus entry carries a negative count.
    #[error("{zone} declares a negative surplus of {surplus}")]
    NegativeSurplus {
        /// Offending zone.
        zone: ZoneId,
        /// Declared surplus.
        surplus: i32,
    },

    /// A deficit entry carries a negative count.
    #[error("{zone} declares a negative deficit of {deficit}")]
    NegativeDeficit {
        /// Offending zone.
        zone: ZoneId,
        /// Declared deficit.
        deficit: i32,
    },

    /// A zone appears twice across the surplus and deficit lists.
    #[error("{zone} is declared more than once")]
    DuplicateZone {
        /// Zone declared twice.
        zone: ZoneId,
    },

    /// A vehicle is rostered more than once. `first == second` when it is
    /// repeated within a single roster.
    #[error("{vehicle} is listed in the rosters of both {first} and {second}")]
    VehicleInMultipleRosters {
        /// Vehicle listed twice.
        vehicle: VehicleId,
        /// Roster where the vehicle was first seen.
        first: ZoneId,
        /// Roster holding the repeated entry.
        second: ZoneId,
    },

    /// A roster is keyed by a zone that is not in the surplus list.
    #[error("roster of {zone} references a zone not declared as surplus")]
    RosterZoneNotSurplus {
        /// Roster key.
        zone: ZoneId,
    },
}

/// Any failure of a relocation calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RebalanceError {
    /// The input failed validation; nothing was computed.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The cost oracle failed or returned an invalid cost.
    #[error("cost oracle failed for {vehicle} -> {zone}: {message}")]
    CostOracle {
        /// Vehicle being priced.
        vehicle: VehicleId,
        /// Target zone being priced.
        zone: ZoneId,
        /// Oracle's failure description.
        message: String,
    },

    /// An internal solver invariant was broken.
    #[error("solver invariant violated: {message}")]
    SolverInternal {
        /// What went wrong.
        message: String,
    },
}

impl RebalanceError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::SolverInternal {
            message: message.into(),
        }
    }
}

/// Result type for relocation calculations.
pub type Result<T> = std::result::Result<T, RebalanceError>;
