//! Zone identifiers and zonal supply/demand imbalances.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Vehicle;

/// Opaque zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// Relocatable vehicles per surplus zone, each roster in enumeration order.
pub type VehicleRosters = BTreeMap<ZoneId, Vec<Vehicle>>;

/// A zone with more idle vehicles than it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSurplus {
    /// The surplus zone.
    pub zone: ZoneId,
    /// Number of vehicles the zone may export.
    pub surplus: i32,
}

impl ZoneSurplus {
    /// Creates a surplus record.
    pub fn new(zone: ZoneId, surplus: i32) -> Self {
        Self { zone, surplus }
    }
}

/// A zone that needs more idle vehicles than it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDeficit {
    /// The deficit zone.
    pub zone: ZoneId,
    /// Number of vehicles the zone should receive (magnitude).
    pub deficit: i32,
}

impl ZoneDeficit {
    /// Creates a deficit record.
    pub fn new(zone: ZoneId, deficit: i32) -> Self {
        Self { zone, deficit }
    }
}

/// Zone-level imbalance snapshot for one rebalancing cycle.
///
/// Keeps surplus and deficit zones in the order they were supplied; that
/// order drives node enumeration and therefore tie-breaking.
///
/// # Examples
///
/// ```
/// use u_rebalancing::models::{ZonalImbalance, ZoneId};
///
/// let imbalance = ZonalImbalance::from_signed([
///     (ZoneId(0), 3),
///     (ZoneId(1), 0),
///     (ZoneId(2), -2),
/// ]);
/// assert_eq!(imbalance.surpluses().len(), 1);
/// assert_eq!(imbalance.deficits()[0].deficit, 2);
/// assert_eq!(imbalance.target_flow(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonalImbalance {
    surpluses: Vec<ZoneSurplus>,
    deficits: Vec<ZoneDeficit>,
}

impl ZonalImbalance {
    /// Creates an imbalance from explicit surplus and deficit lists.
    pub fn new(surpluses: Vec<ZoneSurplus>, deficits: Vec<ZoneDeficit>) -> Self {
        Self {
            surpluses,
            deficits,
        }
    }

    /// Splits signed per-zone imbalances into surplus and deficit zones.
    ///
    /// Positive values become surpluses, negative values become deficits of
    /// the same magnitude, balanced zones are dropped.
    pub fn from_signed<I>(imbalances: I) -> Self
    where
        I: IntoIterator<Item = (ZoneId, i32)>,
    {
        let mut result = Self::default();
        for (zone, imbalance) in imbalances {
            if imbalance > 0 {
                result.add_surplus(zone, imbalance);
            } else if imbalance < 0 {
                result.add_deficit(zone, imbalance.saturating_neg());
            }
        }
        result
    }

    /// Appends a surplus zone.
    pub fn add_surplus(&mut self, zone: ZoneId, surplus: i32) {
        self.surpluses.push(ZoneSurplus::new(zone, surplus));
    }

    /// Appends a deficit zone.
    pub fn add_deficit(&mut self, zone: ZoneId, deficit: i32) {
        self.deficits.push(ZoneDeficit::new(zone, deficit));
    }

    /// Surplus zones in input order.
    pub fn surpluses(&self) -> &[ZoneSurplus] {
        &self.surpluses
    }

    /// Deficit zones in input order.
    pub fn deficits(&self) -> &[ZoneDeficit] {
        &self.deficits
    }

    /// Sum of the non-negative surpluses.
    pub fn total_surplus(&self) -> i64 {
        self.surpluses
            .iter()
            .map(|s| i64::from(s.surplus.max(0)))
            .sum()
    }

    /// Sum of the non-negative deficit magnitudes.
    pub fn total_deficit(&self) -> i64 {
        self.deficits
            .iter()
            .map(|d| i64::from(d.deficit.max(0)))
            .sum()
    }

    /// Flow value a full rebalancing would route: `min(total surplus, total deficit)`.
    pub fn target_flow(&self) -> i64 {
        self.total_surplus().min(self.total_deficit())
    }

    /// Returns `true` if there is nothing to move.
    pub fn is_balanced(&self) -> bool {
        self.target_flow() == 0
    }
}
