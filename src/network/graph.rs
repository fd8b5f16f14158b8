//! Residual graph with paired forward/backward arcs.

/// Index of a node in a [`ResidualGraph`].
pub type NodeIndex = usize;

/// Index of an arc in a [`ResidualGraph`].
pub type ArcIndex = usize;

/// A directed arc with capacity, unit cost, and current flow.
///
/// Every edge added to the graph becomes two arcs: the forward arc at an
/// even index and its backward twin at the following odd index, so
/// `a ^ 1` is always the twin of `a`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Head node.
    pub to: NodeIndex,
    /// Upper bound on flow (0 for backward arcs).
    pub capacity: i64,
    /// Cost per unit of flow (negated on backward arcs).
    pub cost: f64,
    /// Current flow (non-positive on backward arcs).
    pub flow: i64,
}

impl Arc {
    /// Remaining capacity in the residual graph.
    pub fn residual(&self) -> i64 {
        self.capacity - self.flow
    }
}

/// Adjacency-list flow graph.
///
/// Nodes and arcs are enumerated in insertion order and adjacency lists keep
/// that order, so every traversal of the graph is deterministic.
///
/// # Examples
///
/// ```
/// use u_rebalancing::network::ResidualGraph;
///
/// let mut g = ResidualGraph::new();
/// let s = g.add_node();
/// let t = g.add_node();
/// let e = g.add_edge(s, t, 2, 1.5);
/// g.push_flow(e, 1);
/// assert_eq!(g.arc(e).residual(), 1);
/// assert_eq!(g.arc(e ^ 1).residual(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResidualGraph {
    arcs: Vec<Arc>,
    adjacency: Vec<Vec<ArcIndex>>,
}

impl ResidualGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self) -> NodeIndex {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Adds an edge `from → to` and returns the index of its forward arc.
    ///
    /// # Panics
    ///
    /// Panics if either node does not exist.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, capacity: i64, cost: f64) -> ArcIndex {
        let forward = self.arcs.len();
        self.arcs.push(Arc {
            to,
            capacity,
            cost,
            flow: 0,
        });
        self.arcs.push(Arc {
            to: from,
            capacity: 0,
            cost: -cost,
            flow: 0,
        });
        self.adjacency[from].push(forward);
        self.adjacency[to].push(forward + 1);
        forward
    }

    /// Sends `amount` units along arc `a`, updating its twin.
    pub fn push_flow(&mut self, a: ArcIndex, amount: i64) {
        self.arcs[a].flow += amount;
        self.arcs[a ^ 1].flow -= amount;
    }

    /// Returns the arc at index `a`.
    pub fn arc(&self, a: ArcIndex) -> &Arc {
        &self.arcs[a]
    }

    /// Tail node of arc `a`.
    pub fn tail(&self, a: ArcIndex) -> NodeIndex {
        self.arcs[a ^ 1].to
    }

    /// Outgoing arcs of `node` (forward and backward) in insertion order.
    pub fn outgoing(&self, node: NodeIndex) -> &[ArcIndex] {
        &self.adjacency[node]
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges (forward arcs).
    pub fn num_edges(&self) -> usize {
        self.arcs.len() / 2
    }

    /// Total flow leaving `node` on forward arcs.
    pub fn outflow(&self, node: NodeIndex) -> i64 {
        self.adjacency[node]
            .iter()
            .filter(|&&a| a % 2 == 0)
            .map(|&a| self.arcs[a].flow)
            .sum()
    }

    /// Total cost of the current flow.
    pub fn flow_cost(&self) -> f64 {
        self.arcs
            .iter()
            .step_by(2)
            .map(|arc| arc.flow as f64 * arc.cost)
            .sum()
    }
}
