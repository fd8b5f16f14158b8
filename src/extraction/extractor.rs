//! Projection of a solved flow network onto relocations.

use tracing::debug;

use crate::error::{RebalanceError, Result};
use crate::models::{Relocation, RelocationPlan};
use crate::network::FlowNetwork;
use crate::solver::FlowOutcome;

/// Reads vehicle → deficit zone arcs carrying flow and emits one relocation
/// per saturated arc.
///
/// Vehicles are visited in network enumeration order; vehicles without flow
/// are recorded as unassigned. Zone capacities and vehicle uniqueness follow
/// from the network's arc capacities, so no further filtering happens here.
///
/// # Errors
///
/// [`RebalanceError::SolverInternal`] if a vehicle carries more than one
/// unit of flow or the number of relocations differs from the solved flow
/// value.
pub fn extract_relocations(network: &FlowNetwork, outcome: &FlowOutcome) -> Result<RelocationPlan> {
    let graph = network.graph();
    let mut plan = RelocationPlan::new(outcome.target);

    for vehicle in network.vehicles() {
        let mut used = vehicle
            .arcs
            .iter()
            .filter(|va| graph.arc(va.arc).flow > 0);

        match (used.next(), used.next()) {
            (None, _) => plan.add_unassigned(vehicle.vehicle),
            (Some(va), None) if graph.arc(va.arc).flow == 1 => plan.push(Relocation {
                vehicle: vehicle.vehicle,
                source_zone: vehicle.source_zone,
                target_zone: va.zone,
                cost: va.cost,
            }),
            _ => {
                return Err(RebalanceError::internal(format!(
                    "{} carries more than one unit of flow",
                    vehicle.vehicle
                )))
            }
        }
    }

    if plan.len() as i64 != outcome.value {
        return Err(RebalanceError::internal(format!(
            "extracted {} relocations from a flow of {}",
            plan.len(),
            outcome.value
        )));
    }

    debug!(
        relocations = plan.len(),
        unassigned = plan.unassigned().len(),
        "relocations extracted"
    );
    Ok(plan)
}
