//! Vehicle-level flow network construction.
//!
//! # Layout
//!
//! ```text
//! source ─(surplus, 0)─▶ surplus zone ─(1, 0)─▶ vehicle ─(1, cost)─▶ deficit zone ─(deficit, 0)─▶ sink
//! ```
//!
//! Each surplus zone is expanded into a sub-tree of unit-capacity arcs, one
//! per rebalancable vehicle in its roster, and vehicles connect to every
//! deficit zone they can reach. A min-cost flow on this graph therefore
//! assigns individual vehicles, not aggregated zone-to-zone quantities.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::graph::{ArcIndex, NodeIndex, ResidualGraph};
use crate::cost::{CostOracle, MoveCost};
use crate::error::{RebalanceError, Result, ValidationError};
use crate::models::{Vehicle, VehicleId, VehicleRosters, ZonalImbalance, ZoneId};

/// What a node of the flow network stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Global source.
    Source,
    /// A surplus zone.
    SurplusZone(ZoneId),
    /// A rebalancable vehicle.
    Vehicle(VehicleId),
    /// A deficit zone.
    DeficitZone(ZoneId),
    /// Global sink.
    Sink,
}

/// A vehicle → deficit zone arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleArc {
    /// Forward arc index in the graph.
    pub arc: ArcIndex,
    /// Deficit zone at the head of the arc.
    pub zone: ZoneId,
    /// Movement cost from the oracle.
    pub cost: f64,
}

/// A vehicle node together with its outgoing relocation arcs.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleNode {
    /// The vehicle.
    pub vehicle: VehicleId,
    /// Surplus zone whose roster lists the vehicle.
    pub source_zone: ZoneId,
    /// Node index in the graph.
    pub node: NodeIndex,
    /// Arcs to reachable deficit zones, in deficit-list order.
    pub arcs: Vec<VehicleArc>,
}

/// Flow network for one rebalancing cycle.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    graph: ResidualGraph,
    kinds: Vec<NodeKind>,
    vehicles: Vec<VehicleNode>,
    source: NodeIndex,
    sink: NodeIndex,
    target_flow: i64,
}

impl FlowNetwork {
    /// The underlying residual graph.
    pub fn graph(&self) -> &ResidualGraph {
        &self.graph
    }

    /// Mutable access for the solver.
    pub fn graph_mut(&mut self) -> &mut ResidualGraph {
        &mut self.graph
    }

    /// Global source node.
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// Global sink node.
    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    /// `min(total surplus, total deficit)`.
    pub fn target_flow(&self) -> i64 {
        self.target_flow
    }

    /// Vehicle nodes in enumeration order.
    pub fn vehicles(&self) -> &[VehicleNode] {
        &self.vehicles
    }

    /// Node kinds indexed by node.
    pub fn node_kinds(&self) -> &[NodeKind] {
        &self.kinds
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeIndex {
        self.kinds.push(kind);
        self.graph.add_node()
    }
}

/// Checks rebalancing input before any graph is built.
///
/// Rejects negative magnitudes, zones declared twice (including a zone that
/// is both surplus and deficit), roster zones not declared as surplus, and
/// vehicles listed more than once.
pub fn validate(imbalance: &ZonalImbalance, rosters: &VehicleRosters) -> std::result::Result<(), ValidationError> {
    let mut declared = HashSet::new();
    let mut surplus_zones = HashSet::new();

    for s in imbalance.surpluses() {
        if s.surplus < 0 {
            return Err(ValidationError::NegativeSurplus {
                zone: s.zone,
                surplus: s.surplus,
            });
        }
        if !declared.insert(s.zone) {
            return Err(ValidationError::DuplicateZone { zone: s.zone });
        }
        surplus_zones.insert(s.zone);
    }

    for d in imbalance.deficits() {
        if d.deficit < 0 {
            return Err(ValidationError::NegativeDeficit {
                zone: d.zone,
                deficit: d.deficit,
            });
        }
        if !declared.insert(d.zone) {
            return Err(ValidationError::DuplicateZone { zone: d.zone });
        }
    }

    let mut owner: HashMap<VehicleId, ZoneId> = HashMap::new();
    for (&zone, roster) in rosters {
        if !surplus_zones.contains(&zone) {
            return Err(ValidationError::RosterZoneNotSurplus { zone });
        }
        for vehicle in roster {
            if let Some(&first) = owner.get(&vehicle.id()) {
                return Err(ValidationError::VehicleInMultipleRosters {
                    vehicle: vehicle.id(),
                    first,
                    second: zone,
                });
            }
            owner.insert(vehicle.id(), zone);
        }
    }

    Ok(())
}

/// Builds the vehicle-level flow network.
///
/// Nodes are enumerated as source, surplus zones (input order), each
/// zone's vehicles (roster order), deficit zones (input order), sink.
/// Unreachable vehicle/zone pairs get no arc.
///
/// # Errors
///
/// - [`RebalanceError::Validation`] for malformed input (see [`validate`])
/// - [`RebalanceError::CostOracle`] if the oracle fails or returns a
///   negative or non-finite cost
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_rebalancing::cost::{oracle_fn, MoveCost};
/// use u_rebalancing::models::{Vehicle, VehicleId, ZonalImbalance, ZoneId};
/// use u_rebalancing::network::build_network;
///
/// let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 2), (ZoneId(1), -1)]);
/// let mut rosters = BTreeMap::new();
/// rosters.insert(
///     ZoneId(0),
///     vec![Vehicle::new(VehicleId(0), 0), Vehicle::new(VehicleId(1), 1)],
/// );
/// let oracle = oracle_fn(|_, _| Ok(MoveCost::Finite(1.0)));
///
/// let network = build_network(&imbalance, &rosters, &oracle).unwrap();
/// // source, zone 0, two vehicles, zone 1, sink
/// assert_eq!(network.graph().num_nodes(), 6);
/// assert_eq!(network.graph().num_edges(), 6);
/// assert_eq!(network.target_flow(), 1);
/// ```
pub fn build_network<O: CostOracle>(
    imbalance: &ZonalImbalance,
    rosters: &VehicleRosters,
    oracle: &O,
) -> Result<FlowNetwork> {
    validate(imbalance, rosters)?;

    let mut network = FlowNetwork {
        graph: ResidualGraph::new(),
        kinds: Vec::new(),
        vehicles: Vec::new(),
        source: 0,
        sink: 0,
        target_flow: imbalance.target_flow(),
    };
    network.source = network.add_node(NodeKind::Source);

    let mut pending: Vec<(ZoneId, &Vehicle, NodeIndex)> = Vec::new();
    for s in imbalance.surpluses() {
        let zone_node = network.add_node(NodeKind::SurplusZone(s.zone));
        let source = network.source;
        network
            .graph
            .add_edge(source, zone_node, i64::from(s.surplus), 0.0);

        for vehicle in rosters.get(&s.zone).into_iter().flatten() {
            let vehicle_node = network.add_node(NodeKind::Vehicle(vehicle.id()));
            network.graph.add_edge(zone_node, vehicle_node, 1, 0.0);
            pending.push((s.zone, vehicle, vehicle_node));
        }
    }

    let mut deficit_nodes = Vec::with_capacity(imbalance.deficits().len());
    for d in imbalance.deficits() {
        deficit_nodes.push((d.zone, network.add_node(NodeKind::DeficitZone(d.zone))));
    }
    network.sink = network.add_node(NodeKind::Sink);

    for (source_zone, vehicle, vehicle_node) in pending {
        let mut arcs = Vec::with_capacity(deficit_nodes.len());
        for &(zone, zone_node) in &deficit_nodes {
            let Some(cost) = query_cost(oracle, vehicle, zone)? else {
                trace!(vehicle = %vehicle.id(), zone = %zone, "unreachable, no arc");
                continue;
            };
            let arc = network.graph.add_edge(vehicle_node, zone_node, 1, cost);
            arcs.push(VehicleArc { arc, zone, cost });
        }
        network.vehicles.push(VehicleNode {
            vehicle: vehicle.id(),
            source_zone,
            node: vehicle_node,
            arcs,
        });
    }

    let sink = network.sink;
    for (d, &(_, zone_node)) in imbalance.deficits().iter().zip(&deficit_nodes) {
        network
            .graph
            .add_edge(zone_node, sink, i64::from(d.deficit), 0.0);
    }

    debug!(
        nodes = network.graph.num_nodes(),
        edges = network.graph.num_edges(),
        vehicles = network.vehicles.len(),
        target_flow = network.target_flow,
        "flow network built"
    );

    Ok(network)
}

/// Queries the oracle, returning `None` for unreachable pairs.
fn query_cost<O: CostOracle>(oracle: &O, vehicle: &Vehicle, zone: ZoneId) -> Result<Option<f64>> {
    let cost = oracle
        .cost(vehicle, zone)
        .map_err(|failure| RebalanceError::CostOracle {
            vehicle: vehicle.id(),
            zone,
            message: failure.to_string(),
        })?;

    match cost {
        MoveCost::Unreachable => Ok(None),
        MoveCost::Finite(c) if c.is_finite() && c >= 0.0 => Ok(Some(c)),
        MoveCost::Finite(c) => Err(RebalanceError::CostOracle {
            vehicle: vehicle.id(),
            zone,
            message: format!("invalid cost {c}, expected a finite non-negative value"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::cost::{oracle_fn, CostMatrix, OracleFailure};
    use crate::models::{ZoneDeficit, ZoneSurplus};

    fn vehicles(ids: &[usize]) -> Vec<Vehicle> {
        ids.iter().map(|&id| Vehicle::new(VehicleId(id), id)).collect()
    }

    fn unit_costs() -> CostMatrix {
        let mut cm = CostMatrix::new(10, 10);
        for r in 0..10 {
            for c in 0..10 {
                cm.set(r, c, 1.0);
            }
        }
        cm
    }

    #[test]
    fn test_enumeration_order_follows_input() {
        let imbalance = ZonalImbalance::from_signed([
            (ZoneId(3), 1),
            (ZoneId(5), -1),
            (ZoneId(1), 2),
            (ZoneId(4), -2),
        ]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(1), vehicles(&[7, 2]));
        rosters.insert(ZoneId(3), vehicles(&[9]));

        let network = build_network(&imbalance, &rosters, &unit_costs()).expect("valid");
        assert_eq!(
            network.node_kinds(),
            &[
                NodeKind::Source,
                NodeKind::SurplusZone(ZoneId(3)),
                NodeKind::Vehicle(VehicleId(9)),
                NodeKind::SurplusZone(ZoneId(1)),
                NodeKind::Vehicle(VehicleId(7)),
                NodeKind::Vehicle(VehicleId(2)),
                NodeKind::DeficitZone(ZoneId(5)),
                NodeKind::DeficitZone(ZoneId(4)),
                NodeKind::Sink,
            ]
        );
        let ids: Vec<_> = network.vehicles().iter().map(|v| v.vehicle).collect();
        assert_eq!(ids, vec![VehicleId(9), VehicleId(7), VehicleId(2)]);
        let zones: Vec<_> = network.vehicles()[0].arcs.iter().map(|a| a.zone).collect();
        assert_eq!(zones, vec![ZoneId(5), ZoneId(4)]);
    }

    #[test]
    fn test_capacities_and_costs() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 3), (ZoneId(1), -2)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[0]));
        let oracle = oracle_fn(|_, _| Ok(MoveCost::Finite(4.5)));

        let network = build_network(&imbalance, &rosters, &oracle).expect("valid");
        let g = network.graph();
        let source_arc = g.outgoing(network.source())[0];
        assert_eq!(g.arc(source_arc).capacity, 3);

        let vehicle = &network.vehicles()[0];
        assert_eq!(vehicle.source_zone, ZoneId(0));
        assert_eq!(vehicle.arcs.len(), 1);
        assert_eq!(g.arc(vehicle.arcs[0].arc).capacity, 1);
        assert_eq!(g.arc(vehicle.arcs[0].arc).cost, 4.5);

        let sink_arc = g.outgoing(network.sink())[0] ^ 1;
        assert_eq!(g.arc(sink_arc).capacity, 2);
        assert_eq!(network.target_flow(), 2);
    }

    #[test]
    fn test_unreachable_pair_has_no_arc() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1), (ZoneId(2), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[0]));
        let oracle = oracle_fn(|_, z| {
            if z == ZoneId(1) {
                Ok(MoveCost::Unreachable)
            } else {
                Ok(MoveCost::Finite(2.0))
            }
        });

        let network = build_network(&imbalance, &rosters, &oracle).expect("valid");
        let arcs = &network.vehicles()[0].arcs;
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].zone, ZoneId(2));
    }

    #[test]
    fn test_surplus_zone_without_roster() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 2), (ZoneId(1), -1)]);
        let network = build_network(&imbalance, &BTreeMap::new(), &unit_costs()).expect("valid");
        assert!(network.vehicles().is_empty());
        assert_eq!(network.graph().num_nodes(), 4);
    }

    #[test]
    fn test_rejects_negative_surplus() {
        let imbalance = ZonalImbalance::new(vec![ZoneSurplus::new(ZoneId(0), -1)], vec![]);
        let err = validate(&imbalance, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeSurplus {
                zone: ZoneId(0),
                surplus: -1
            }
        );
    }

    #[test]
    fn test_rejects_negative_deficit() {
        let imbalance = ZonalImbalance::new(vec![], vec![ZoneDeficit::new(ZoneId(2), -4)]);
        let err = validate(&imbalance, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeDeficit {
                zone: ZoneId(2),
                deficit: -4
            }
        );
    }

    #[test]
    fn test_rejects_zone_declared_as_surplus_and_deficit() {
        let imbalance = ZonalImbalance::new(
            vec![ZoneSurplus::new(ZoneId(1), 1)],
            vec![ZoneDeficit::new(ZoneId(1), 1)],
        );
        let err = validate(&imbalance, &BTreeMap::new()).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateZone { zone: ZoneId(1) });
    }

    #[test]
    fn test_rejects_vehicle_in_two_rosters() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), 1), (ZoneId(2), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[4]));
        rosters.insert(ZoneId(1), vehicles(&[5, 4]));
        let err = validate(&imbalance, &rosters).unwrap_err();
        assert_eq!(
            err,
            ValidationError::VehicleInMultipleRosters {
                vehicle: VehicleId(4),
                first: ZoneId(0),
                second: ZoneId(1),
            }
        );
    }

    #[test]
    fn test_rejects_vehicle_twice_in_one_roster() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 2), (ZoneId(1), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[3, 3]));
        let err = validate(&imbalance, &rosters).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::VehicleInMultipleRosters {
                vehicle: VehicleId(3),
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_roster_of_deficit_zone() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(1), vehicles(&[0]));
        let err = validate(&imbalance, &rosters).unwrap_err();
        assert_eq!(err, ValidationError::RosterZoneNotSurplus { zone: ZoneId(1) });
    }

    #[test]
    fn test_rejects_roster_of_undeclared_zone() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(8), vehicles(&[0]));
        let err = build_network(&imbalance, &rosters, &unit_costs()).unwrap_err();
        assert_eq!(
            err,
            RebalanceError::Validation(ValidationError::RosterZoneNotSurplus { zone: ZoneId(8) })
        );
    }

    #[test]
    fn test_validation_runs_before_oracle() {
        let imbalance = ZonalImbalance::new(
            vec![ZoneSurplus::new(ZoneId(0), 1)],
            vec![ZoneDeficit::new(ZoneId(1), -1)],
        );
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[0]));
        let oracle = oracle_fn(|_, _| -> std::result::Result<MoveCost, OracleFailure> {
            panic!("oracle must not be queried for invalid input")
        });
        let err = build_network(&imbalance, &rosters, &oracle).unwrap_err();
        assert!(matches!(err, RebalanceError::Validation(_)));
    }

    #[test]
    fn test_oracle_failure_names_pair() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[6]));
        let oracle = oracle_fn(|_, _| Err(OracleFailure::new("matrix service down")));
        let err = build_network(&imbalance, &rosters, &oracle).unwrap_err();
        assert_eq!(
            err,
            RebalanceError::CostOracle {
                vehicle: VehicleId(6),
                zone: ZoneId(1),
                message: "matrix service down".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_cost_is_oracle_error() {
        let imbalance = ZonalImbalance::from_signed([(ZoneId(0), 1), (ZoneId(1), -1)]);
        let mut rosters = BTreeMap::new();
        rosters.insert(ZoneId(0), vehicles(&[0]));
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let oracle = oracle_fn(move |_, _| Ok(MoveCost::Finite(bad)));
            let err = build_network(&imbalance, &rosters, &oracle).unwrap_err();
            assert!(matches!(err, RebalanceError::CostOracle { .. }));
        }
    }
}
