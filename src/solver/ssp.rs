//! Successive shortest path min-cost flow.
//!
//! # Algorithm
//!
//! Repeatedly finds a cheapest source→sink path in the residual graph and
//! augments along it. Node potentials (Johnson reweighting) keep every
//! residual arc's reduced cost non-negative, so each path search is a plain
//! Dijkstra. Stops when the target flow value is reached or the sink becomes
//! unreachable, which yields the maximum feasible flow of minimum cost.
//!
//! # Determinism
//!
//! The priority queue settles equal-distance nodes by ascending node index,
//! arcs are scanned in insertion order, and labels are only replaced on a
//! strict improvement. Among tied shortest paths, the first one discovered
//! under the graph's enumeration order wins.
//!
//! # Complexity
//!
//! O(F × E log V) where F = flow value.
//!
//! # Reference
//!
//! Ahuja, R. K., Magnanti, T. L., & Orlin, J. B. (1993). "Network Flows:
//! Theory, Algorithms, and Applications", ch. 9.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::error::{RebalanceError, Result};
use crate::network::{ArcIndex, NodeIndex, ResidualGraph};

/// Summary of a min-cost flow solve.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowOutcome {
    /// Flow value the solve aimed for.
    pub target: i64,
    /// Flow value actually routed.
    pub value: i64,
    /// Total cost of the routed flow.
    pub cost: f64,
    /// Number of augmenting paths used.
    pub augmentations: usize,
}

impl FlowOutcome {
    /// Returns `true` if the full target was routed.
    pub fn is_complete(&self) -> bool {
        self.value >= self.target
    }
}

/// Successive shortest path solver with node potentials.
///
/// # Examples
///
/// ```
/// use u_rebalancing::network::ResidualGraph;
/// use u_rebalancing::solver::SuccessiveShortestPath;
///
/// let mut g = ResidualGraph::new();
/// let s = g.add_node();
/// let a = g.add_node();
/// let b = g.add_node();
/// let t = g.add_node();
/// g.add_edge(s, a, 1, 1.0);
/// g.add_edge(s, b, 1, 4.0);
/// g.add_edge(a, t, 1, 1.0);
/// g.add_edge(b, t, 1, 1.0);
///
/// let outcome = SuccessiveShortestPath::default().solve(&mut g, s, t, 2).unwrap();
/// assert_eq!(outcome.value, 2);
/// assert!((outcome.cost - 7.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct SuccessiveShortestPath {
    tolerance: f64,
}

impl Default for SuccessiveShortestPath {
    fn default() -> Self {
        Self::new(1e-9)
    }
}

#[derive(Debug, Clone, Copy)]
struct Label {
    dist: f64,
    node: NodeIndex,
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    // Reversed for BinaryHeap: smallest distance, then smallest node, first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Shortest path tree of one Dijkstra pass.
struct PathTree {
    dist: Vec<f64>,
    pred: Vec<Option<ArcIndex>>,
}

impl SuccessiveShortestPath {
    /// Creates a solver that absorbs rounding error up to `tolerance`.
    ///
    /// Reduced costs slightly below zero (relative to the arc cost and node
    /// potential) are clamped to zero; anything further below is reported
    /// as an invariant violation. Path labels are compared exactly.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
        }
    }

    /// Routes up to `target` units from `source` to `sink` at minimum cost.
    ///
    /// All arc costs must be non-negative. Flow already present in the graph
    /// is kept and extended.
    ///
    /// # Errors
    ///
    /// [`RebalanceError::SolverInternal`] if a reduced cost turns negative
    /// beyond the tolerance or a path cannot be traced back to the source.
    pub fn solve(
        &self,
        graph: &mut ResidualGraph,
        source: NodeIndex,
        sink: NodeIndex,
        target: i64,
    ) -> Result<FlowOutcome> {
        let mut outcome = FlowOutcome {
            target,
            value: 0,
            cost: 0.0,
            augmentations: 0,
        };
        if target <= 0 || source == sink {
            return Ok(outcome);
        }

        let mut potential = vec![0.0; graph.num_nodes()];

        while outcome.value < target {
            let tree = self.shortest_paths(graph, source, &potential)?;
            if !tree.dist[sink].is_finite() {
                debug!(value = outcome.value, target, "sink unreachable, stopping");
                break;
            }

            let path = trace_path(graph, &tree, source, sink)?;
            let bottleneck = path
                .iter()
                .map(|&a| graph.arc(a).residual())
                .min()
                .unwrap_or(0)
                .min(target - outcome.value);
            if bottleneck <= 0 {
                return Err(RebalanceError::internal(
                    "augmenting path without residual capacity",
                ));
            }

            let path_cost: f64 = path.iter().map(|&a| graph.arc(a).cost).sum();
            for &a in &path {
                graph.push_flow(a, bottleneck);
            }
            outcome.value += bottleneck;
            outcome.cost += path_cost * bottleneck as f64;
            outcome.augmentations += 1;
            trace!(
                augmentation = outcome.augmentations,
                amount = bottleneck,
                path_cost,
                "augmented"
            );

            for (p, d) in potential.iter_mut().zip(&tree.dist) {
                if d.is_finite() {
                    *p += d;
                }
            }
        }

        debug!(
            value = outcome.value,
            target,
            cost = outcome.cost,
            augmentations = outcome.augmentations,
            "min-cost flow solved"
        );
        Ok(outcome)
    }

    /// Dijkstra over reduced costs from `source`.
    fn shortest_paths(&self, graph: &ResidualGraph, source: NodeIndex, potential: &[f64]) -> Result<PathTree> {
        let n = graph.num_nodes();
        let mut tree = PathTree {
            dist: vec![f64::INFINITY; n],
            pred: vec![None; n],
        };
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        tree.dist[source] = 0.0;
        heap.push(Label {
            dist: 0.0,
            node: source,
        });

        while let Some(Label { dist, node: u }) = heap.pop() {
            if settled[u] {
                continue;
            }
            settled[u] = true;

            for &a in graph.outgoing(u) {
                let arc = graph.arc(a);
                if arc.residual() <= 0 || settled[arc.to] {
                    continue;
                }
                let reduced = arc.cost + potential[u] - potential[arc.to];
                let scale = 1.0 + arc.cost.abs() + potential[u].abs();
                if reduced < -self.tolerance * scale {
                    return Err(RebalanceError::internal(format!(
                        "negative reduced cost {reduced} on arc {a}"
                    )));
                }
                let candidate = dist + reduced.max(0.0);
                if candidate < tree.dist[arc.to] {
                    tree.dist[arc.to] = candidate;
                    tree.pred[arc.to] = Some(a);
                    heap.push(Label {
                        dist: candidate,
                        node: arc.to,
                    });
                }
            }
        }

        Ok(tree)
    }
}

/// Walks predecessor arcs from `sink` back to `source`, returning the path
/// in source→sink order.
fn trace_path(graph: &ResidualGraph, tree: &PathTree, source: NodeIndex, sink: NodeIndex) -> Result<Vec<ArcIndex>> {
    let mut path = Vec::new();
    let mut node = sink;
    while node != source {
        if path.len() > graph.num_nodes() {
            return Err(RebalanceError::internal("cycle in shortest path tree"));
        }
        let arc = tree.pred[node]
            .ok_or_else(|| RebalanceError::internal(format!("node {node} has no predecessor")))?;
        path.push(arc);
        node = graph.tail(arc);
    }
    path.reverse();
    Ok(path)
}
