//! Seeded random rebalancing scenarios.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cost::CostMatrix;
use crate::models::{Vehicle, VehicleId, VehicleRosters, ZonalImbalance, ZoneId};

/// A self-contained rebalancing instance.
///
/// Vehicle `i` stands at location `i`, which is row `i` of the cost matrix;
/// zone `z` is column `z`.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Zone imbalances.
    pub imbalance: ZonalImbalance,
    /// Relocatable vehicles per surplus zone.
    pub rosters: VehicleRosters,
    /// Vehicle × zone movement costs.
    pub costs: CostMatrix,
}

impl Scenario {
    /// Total number of rostered vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.rosters.values().map(Vec::len).sum()
    }
}

/// Generates random scenarios for testing and benchmarking.
///
/// Each zone draws a signed imbalance uniformly from
/// `-max_imbalance..=max_imbalance`; each surplus zone gets between zero and
/// `max_vehicles_per_zone` vehicles. Costs are integral values drawn from
/// the cost range, or unreachable with the configured probability. With
/// [`with_fractional_costs`](Self::with_fractional_costs) they are real
/// values in the same range, snapped close to a whole number so that
/// alternative paths tie to within rounding error.
///
/// # Examples
///
/// ```
/// use u_rebalancing::scenario::ScenarioGenerator;
///
/// let generator = ScenarioGenerator::new(5).with_max_vehicles_per_zone(4);
/// let a = generator.generate(7);
/// let b = generator.generate(7);
/// assert_eq!(a.imbalance, b.imbalance);
/// assert_eq!(a.rosters, b.rosters);
/// assert_eq!(a.costs, b.costs);
/// assert_eq!(a.costs.cols(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    num_zones: usize,
    max_vehicles_per_zone: usize,
    max_imbalance: i32,
    min_cost: u32,
    max_cost: u32,
    unreachable_probability: f64,
    fractional_costs: bool,
}

impl ScenarioGenerator {
    /// Creates a generator for `num_zones` zones.
    ///
    /// Defaults: up to 3 vehicles per surplus zone, imbalances within ±3,
    /// costs in `1..=20`, every pair reachable.
    pub fn new(num_zones: usize) -> Self {
        Self {
            num_zones,
            max_vehicles_per_zone: 3,
            max_imbalance: 3,
            min_cost: 1,
            max_cost: 20,
            unreachable_probability: 0.0,
            fractional_costs: false,
        }
    }

    /// Sets the maximum roster size of a surplus zone.
    pub fn with_max_vehicles_per_zone(mut self, max: usize) -> Self {
        self.max_vehicles_per_zone = max;
        self
    }

    /// Sets the maximum imbalance magnitude.
    pub fn with_max_imbalance(mut self, max: i32) -> Self {
        self.max_imbalance = max.max(0);
        self
    }

    /// Sets the inclusive cost range.
    pub fn with_cost_range(mut self, min: u32, max: u32) -> Self {
        self.min_cost = min.min(max);
        self.max_cost = max.max(min);
        self
    }

    /// Sets the probability that a vehicle/zone pair is unreachable.
    pub fn with_unreachable_probability(mut self, p: f64) -> Self {
        self.unreachable_probability = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self
    }

    /// Draws real-valued, near-tied costs instead of integers.
    ///
    /// Each cost is a whole number from the cost range plus a jitter below
    /// `1e-8`, or a uniform real value in the range, with equal odds.
    pub fn with_fractional_costs(mut self, enabled: bool) -> Self {
        self.fractional_costs = enabled;
        self
    }

    fn draw_cost(&self, rng: &mut StdRng) -> f64 {
        let (min, max) = (f64::from(self.min_cost), f64::from(self.max_cost));
        if !self.fractional_costs {
            return f64::from(rng.random_range(self.min_cost..=self.max_cost));
        }
        if rng.random_bool(0.5) {
            let base = f64::from(rng.random_range(self.min_cost..=self.max_cost));
            (base + rng.random_range(0.0..1e-8)).min(max)
        } else {
            rng.random_range(min..=max)
        }
    }

    /// Generates the scenario for `seed`.
    pub fn generate(&self, seed: u64) -> Scenario {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut imbalance = ZonalImbalance::default();
        let mut rosters = VehicleRosters::new();
        let mut next_vehicle = 0;

        for z in 0..self.num_zones {
            let zone = ZoneId(z);
            let value = rng.random_range(-self.max_imbalance..=self.max_imbalance);
            if value > 0 {
                imbalance.add_surplus(zone, value);
                let count = rng.random_range(0..=self.max_vehicles_per_zone);
                let roster = (next_vehicle..next_vehicle + count)
                    .map(|i| Vehicle::new(VehicleId(i), i))
                    .collect();
                next_vehicle += count;
                rosters.insert(zone, roster);
            } else if value < 0 {
                imbalance.add_deficit(zone, -value);
            }
        }

        let mut costs = CostMatrix::new(next_vehicle, self.num_zones);
        for r in 0..next_vehicle {
            for c in 0..self.num_zones {
                if rng.random_bool(self.unreachable_probability) {
                    costs.set_unreachable(r, c);
                } else {
                    costs.set(r, c, self.draw_cost(&mut rng));
                }
            }
        }

        Scenario {
            imbalance,
            rosters,
            costs,
        }
    }
}
