//! Relocation output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{VehicleId, ZoneId};

/// One vehicle sent from its surplus zone to a deficit zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relocation {
    /// The relocated vehicle.
    pub vehicle: VehicleId,
    /// Surplus zone whose roster the vehicle came from.
    pub source_zone: ZoneId,
    /// Deficit zone the vehicle should move to.
    pub target_zone: ZoneId,
    /// Movement cost reported by the cost oracle.
    pub cost: f64,
}

/// Result of one rebalancing cycle.
///
/// # Examples
///
/// ```
/// use u_rebalancing::models::{Relocation, RelocationPlan, VehicleId, ZoneId};
///
/// let mut plan = RelocationPlan::new(2);
/// plan.push(Relocation {
///     vehicle: VehicleId(1),
///     source_zone: ZoneId(0),
///     target_zone: ZoneId(4),
///     cost: 3.5,
/// });
/// plan.add_unassigned(VehicleId(2));
/// assert_eq!(plan.len(), 1);
/// assert!((plan.total_cost() - 3.5).abs() < 1e-10);
/// assert_eq!(plan.unmet_flow(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelocationPlan {
    relocations: Vec<Relocation>,
    unassigned: Vec<VehicleId>,
    target_flow: i64,
}

impl RelocationPlan {
    /// Creates an empty plan that aimed to route `target_flow` vehicles.
    pub fn new(target_flow: i64) -> Self {
        Self {
            relocations: Vec::new(),
            unassigned: Vec::new(),
            target_flow,
        }
    }

    /// Appends a relocation.
    pub fn push(&mut self, relocation: Relocation) {
        self.relocations.push(relocation);
    }

    /// Records a vehicle that was not relocated.
    pub fn add_unassigned(&mut self, vehicle: VehicleId) {
        self.unassigned.push(vehicle);
    }

    /// Relocations in extraction order.
    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    /// Consumes the plan, returning only the relocations.
    pub fn into_relocations(self) -> Vec<Relocation> {
        self.relocations
    }

    /// Vehicles left in place, in enumeration order.
    pub fn unassigned(&self) -> &[VehicleId] {
        &self.unassigned
    }

    /// Number of relocations.
    pub fn len(&self) -> usize {
        self.relocations.len()
    }

    /// Returns `true` if no vehicle is relocated.
    pub fn is_empty(&self) -> bool {
        self.relocations.is_empty()
    }

    /// Flow value the solve aimed for.
    pub fn target_flow(&self) -> i64 {
        self.target_flow
    }

    /// How far the plan falls short of the target flow.
    pub fn unmet_flow(&self) -> i64 {
        (self.target_flow - self.relocations.len() as i64).max(0)
    }

    /// Sum of relocation costs.
    pub fn total_cost(&self) -> f64 {
        self.relocations.iter().map(|r| r.cost).sum()
    }

    /// Number of incoming vehicles per target zone.
    pub fn inflow_by_zone(&self) -> BTreeMap<ZoneId, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.relocations {
            *counts.entry(r.target_zone).or_insert(0) += 1;
        }
        counts
    }

    /// Number of outgoing vehicles per source zone.
    pub fn outflow_by_zone(&self) -> BTreeMap<ZoneId, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.relocations {
            *counts.entry(r.source_zone).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relocation(vehicle: usize, from: usize, to: usize, cost: f64) -> Relocation {
        Relocation {
            vehicle: VehicleId(vehicle),
            source_zone: ZoneId(from),
            target_zone: ZoneId(to),
            cost,
        }
    }

    #[test]
    fn test_plan_empty() {
        let plan = RelocationPlan::new(0);
        assert!(plan.is_empty());
        assert_eq!(plan.total_cost(), 0.0);
        assert_eq!(plan.unmet_flow(), 0);
        assert!(plan.inflow_by_zone().is_empty());
    }

    #[test]
    fn test_plan_flows_by_zone() {
        let mut plan = RelocationPlan::new(3);
        plan.push(relocation(1, 0, 5, 1.0));
        plan.push(relocation(2, 0, 6, 2.0));
        plan.push(relocation(3, 1, 5, 4.0));

        let inflow = plan.inflow_by_zone();
        assert_eq!(inflow[&ZoneId(5)], 2);
        assert_eq!(inflow[&ZoneId(6)], 1);

        let outflow = plan.outflow_by_zone();
        assert_eq!(outflow[&ZoneId(0)], 2);
        assert_eq!(outflow[&ZoneId(1)], 1);

        assert!((plan.total_cost() - 7.0).abs() < 1e-10);
        assert_eq!(plan.unmet_flow(), 0);
    }

    #[test]
    fn test_into_relocations_keeps_order() {
        let mut plan = RelocationPlan::new(2);
        plan.push(relocation(9, 0, 1, 0.0));
        plan.push(relocation(4, 0, 1, 0.0));
        let ids: Vec<_> = plan.into_relocations().iter().map(|r| r.vehicle).collect();
        assert_eq!(ids, vec![VehicleId(9), VehicleId(4)]);
    }
}
