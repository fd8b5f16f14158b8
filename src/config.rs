//! Relocation calculator configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a relocation calculation.
///
/// Deserializes with defaults for missing fields, so hosts can embed it in
/// their own configuration files.
///
/// # Examples
///
/// ```
/// use u_rebalancing::config::RebalancingConfig;
///
/// let config = RebalancingConfig::default().with_max_relocations(10);
/// assert_eq!(config.max_relocations(), Some(10));
/// assert_eq!(config.effective_target(25), 10);
/// assert_eq!(config.effective_target(4), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalancingConfig {
    cost_tolerance: f64,
    max_relocations: Option<usize>,
}

impl RebalancingConfig {
    /// Default rounding tolerance for reduced costs.
    pub const DEFAULT_COST_TOLERANCE: f64 = 1e-9;

    /// Sets the rounding tolerance for reduced costs in the solver.
    ///
    /// Reduced costs that fall below zero by no more than this (relative)
    /// amount are treated as zero.
    pub fn with_cost_tolerance(mut self, tolerance: f64) -> Self {
        self.cost_tolerance = tolerance.max(0.0);
        self
    }

    /// Caps the number of relocations per calculation.
    pub fn with_max_relocations(mut self, max: usize) -> Self {
        self.max_relocations = Some(max);
        self
    }

    /// Reduced-cost rounding tolerance.
    pub fn cost_tolerance(&self) -> f64 {
        self.cost_tolerance
    }

    /// Relocation cap, if any.
    pub fn max_relocations(&self) -> Option<usize> {
        self.max_relocations
    }

    /// Applies the relocation cap to a target flow value.
    pub fn effective_target(&self, target_flow: i64) -> i64 {
        match self.max_relocations {
            Some(max) => target_flow.min(i64::try_from(max).unwrap_or(i64::MAX)),
            None => target_flow,
        }
    }
}

impl Default for RebalancingConfig {
    fn default() -> Self {
        Self {
            cost_tolerance: Self::DEFAULT_COST_TOLERANCE,
            max_relocations: None,
        }
    }
}
