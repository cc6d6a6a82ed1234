//! Solution record returned by the solvers.

use crate::instance::Point;
use crate::route::Route;
use serde::{Deserialize, Serialize};

/// Best route found by a run, with its bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour
    pub route: Route,
    /// Total cyclic distance of `route`
    pub distance: f64,
    /// Distance of the random route the run started from
    pub initial_distance: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Iterations or generations run
    pub iterations: Option<usize>,
    /// `(step, distance)` each time the best distance dropped, starting
    /// with `(0, initial_distance)`. Steps are strictly increasing and
    /// distances strictly decreasing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<(usize, f64)>,
}

impl Solution {
    /// Create a solution from a route
    pub fn from_route(route: Route, algorithm: &str) -> Self {
        let distance = route.total_distance();

        Solution {
            route,
            distance,
            initial_distance: distance,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
            history: Vec::new(),
        }
    }

    /// Best distance reached at `step`, read back from the history
    pub fn best_distance_at(&self, step: usize) -> Option<f64> {
        self.history
            .iter()
            .take_while(|&&(s, _)| s <= step)
            .last()
            .map(|&(_, d)| d)
    }

    /// Check if every location is visited exactly once
    pub fn is_complete(&self, locations: &[Point]) -> bool {
        self.route.is_permutation_of(locations)
    }

    /// Relative improvement over the starting route, in percent
    pub fn improvement(&self) -> f64 {
        if self.initial_distance <= 0.0 {
            return 0.0;
        }
        (self.initial_distance - self.distance) / self.initial_distance * 100.0
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Distance: {:.4}", self.distance)?;
        writeln!(f, "  Initial distance: {:.4} ({:.1}% shorter)", self.initial_distance, self.improvement())?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Route: {}", self.route)
    }
}
