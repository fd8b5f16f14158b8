//! Min-cost relocation calculator.

use tracing::{debug, debug_span};

use crate::config::RebalancingConfig;
use crate::cost::CostOracle;
use crate::error::Result;
use crate::extraction::extract_relocations;
use crate::models::{Relocation, RelocationPlan, VehicleRosters, ZonalImbalance, ZoneDeficit, ZoneSurplus};
use crate::network::build_network;
use crate::solver::SuccessiveShortestPath;

/// Computes vehicle relocations from surplus to deficit zones at minimum
/// total cost.
///
/// Runs the pipeline build network → solve min-cost flow → extract
/// relocations. Holds no state between calls; concurrent calls on separate
/// threads are safe when the oracle is `Sync`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_rebalancing::calculator::MinCostRelocationCalculator;
/// use u_rebalancing::config::RebalancingConfig;
/// use u_rebalancing::cost::CostMatrix;
/// use u_rebalancing::models::{Vehicle, VehicleId, ZonalImbalance, ZoneId};
///
/// // vehicle 0 costs 3 to zone 1 and 1 to zone 2
/// let costs: CostMatrix = "0 3 1".parse().unwrap();
/// let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1), (ZoneId(2), -1)]);
/// let mut rosters = BTreeMap::new();
/// rosters.insert(ZoneId(0), vec![Vehicle::new(VehicleId(0), 0)]);
///
/// let calculator = MinCostRelocationCalculator::new(costs)
///     .with_config(RebalancingConfig::default().with_max_relocations(5));
/// let plan = calculator.calc_relocations(&imbalance, &rosters).unwrap();
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan.relocations()[0].target_zone, ZoneId(2));
/// ```
#[derive(Debug, Clone)]
pub struct MinCostRelocationCalculator<O> {
    oracle: O,
    config: RebalancingConfig,
}

impl<O: CostOracle> MinCostRelocationCalculator<O> {
    /// Creates a calculator with the default configuration.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            config: RebalancingConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: RebalancingConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RebalancingConfig {
        &self.config
    }

    /// The injected cost oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Computes the relocation plan for one rebalancing cycle.
    ///
    /// # Errors
    ///
    /// - [`RebalanceError::Validation`](crate::RebalanceError::Validation) for malformed input
    /// - [`RebalanceError::CostOracle`](crate::RebalanceError::CostOracle) if the oracle fails
    /// - [`RebalanceError::SolverInternal`](crate::RebalanceError::SolverInternal) on a broken solver invariant
    pub fn calc_relocations(
        &self,
        imbalance: &ZonalImbalance,
        rosters: &VehicleRosters,
    ) -> Result<RelocationPlan> {
        let span = debug_span!(
            "calc_relocations",
            surplus_zones = imbalance.surpluses().len(),
            deficit_zones = imbalance.deficits().len()
        );
        let _enter = span.enter();

        let mut network = build_network(imbalance, rosters, &self.oracle)?;
        let (source, sink) = (network.source(), network.sink());
        let target = self.config.effective_target(network.target_flow());

        let outcome = SuccessiveShortestPath::new(self.config.cost_tolerance()).solve(
            network.graph_mut(),
            source,
            sink,
            target,
        )?;
        let plan = extract_relocations(&network, &outcome)?;

        debug!(
            relocations = plan.len(),
            target,
            total_cost = plan.total_cost(),
            "relocation plan ready"
        );
        Ok(plan)
    }
}

/// Computes relocations with the default configuration.
///
/// Convenience wrapper around [`MinCostRelocationCalculator`] that returns
/// only the ordered relocation list.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_rebalancing::calculator::calc_relocations;
/// use u_rebalancing::cost::{oracle_fn, MoveCost};
/// use u_rebalancing::models::{Vehicle, VehicleId, ZoneDeficit, ZoneId, ZoneSurplus};
///
/// let mut rosters = BTreeMap::new();
/// rosters.insert(
///     ZoneId(0),
///     vec![Vehicle::new(VehicleId(1), 0), Vehicle::new(VehicleId(2), 1)],
/// );
/// let oracle = oracle_fn(|v, _| Ok(MoveCost::Finite(if v.location() == 0 { 5.0 } else { 10.0 })));
///
/// let relocations = calc_relocations(
///     &[ZoneSurplus::new(ZoneId(0), 2)],
///     &[ZoneDeficit::new(ZoneId(1), 1)],
///     &rosters,
///     &oracle,
/// )
/// .unwrap();
/// assert_eq!(relocations.len(), 1);
/// assert_eq!(relocations[0].vehicle, VehicleId(1));
/// ```
pub fn calc_relocations<O: CostOracle>(
    surpluses: &[ZoneSurplus],
    deficits: &[ZoneDeficit],
    rosters: &VehicleRosters,
    oracle: &O,
) -> Result<Vec<Relocation>> {
    let imbalance = ZonalImbalance::new(surpluses.to_vec(), deficits.to_vec());
    MinCostRelocationCalculator::new(oracle)
        .calc_relocations(&imbalance, rosters)
        .map(RelocationPlan::into_relocations)
}
