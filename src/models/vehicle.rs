//! Relocatable vehicle type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque vehicle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

/// An idle vehicle that may be relocated during a rebalancing cycle.
///
/// The location is an index understood by the cost oracle (for a
/// [`CostMatrix`](crate::cost::CostMatrix), the row of the vehicle's current
/// position).
///
/// # Examples
///
/// ```
/// use u_rebalancing::models::{Vehicle, VehicleId};
///
/// let v = Vehicle::new(VehicleId(3), 12);
/// assert_eq!(v.id(), VehicleId(3));
/// assert_eq!(v.location(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    location: usize,
}

impl Vehicle {
    /// Creates a vehicle with the given ID, standing at `location`.
    pub fn new(id: VehicleId, location: usize) -> Self {
        Self { id, location }
    }

    /// Moves the vehicle to another location.
    pub fn with_location(mut self, location: usize) -> Self {
        self.location = location;
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Current location index.
    pub fn location(&self) -> usize {
        self.location
    }
}
