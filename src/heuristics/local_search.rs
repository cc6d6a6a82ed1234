//! Local search for the TSP.
//!
//! Hill climbing over single-swap moves: start from a random tour, try a
//! random swap of two positions, keep it only when the tour gets strictly
//! shorter.

use crate::error::Result;
use crate::heuristics::{make_rng, TourSolver};
use crate::instance::{validate_locations, Instance, Point};
use crate::route::Route;
use crate::solution::Solution;
use rand::seq::index;
use rand::Rng;

/// Stochastic hill climbing with swap moves
#[derive(Debug, Clone)]
pub struct HillClimbing {
    /// Number of candidate swaps to try
    pub max_iterations: usize,
    /// Random seed
    pub seed: Option<u64>,
}

impl HillClimbing {
    pub fn new() -> Self {
        HillClimbing {
            max_iterations: 1000,
            seed: None,
        }
    }

    pub fn with_params(max_iterations: usize, seed: Option<u64>) -> Self {
        HillClimbing { max_iterations, seed }
    }

    /// Run from a random start over `locations`, drawing every random
    /// choice from `rng`.
    pub fn optimize<R: Rng + ?Sized>(&self, locations: &[Point], rng: &mut R) -> Result<Solution> {
        validate_locations(locations)?;
        let start = std::time::Instant::now();

        let mut current_route = Route::random(locations, rng);
        let mut current_distance = current_route.total_distance();
        let initial_distance = current_distance;

        let mut history = vec![(0, current_distance)];
        let mut accepted = 0usize;

        for iteration in 1..=self.max_iterations {
            let positions = index::sample(rng, locations.len(), 2);
            let candidate = current_route.with_swap(positions.index(0), positions.index(1));
            let candidate_distance = candidate.total_distance();

            if candidate_distance < current_distance {
                current_route = candidate;
                current_distance = candidate_distance;
                accepted += 1;
                history.push((iteration, current_distance));
            }
        }

        log::debug!(
            "[HC] {} iterations, {} accepted swaps, {:.3} -> {:.3}",
            self.max_iterations,
            accepted,
            initial_distance,
            current_distance
        );

        let mut solution = Solution::from_route(current_route, self.name());
        solution.initial_distance = initial_distance;
        solution.iterations = Some(self.max_iterations);
        solution.history = history;
        solution.computation_time = start.elapsed().as_secs_f64();

        Ok(solution)
    }
}

impl Default for HillClimbing {
    fn default() -> Self {
        Self::new()
    }
}

impl TourSolver for HillClimbing {
    fn solve(&self, instance: &Instance) -> Result<Solution> {
        let mut rng = make_rng(self.seed);
        log::info!("[HC] Solving {} ({} locations)", instance.name, instance.dimension());
        self.optimize(&instance.points, &mut rng)
    }

    fn name(&self) -> &str {
        "HillClimbing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, InvalidInputError};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]
    }

    #[test]
    fn test_unit_square_converges() {
        let hc = HillClimbing::with_params(500, None);

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let solution = hc.optimize(&square(), &mut rng).unwrap();
            assert!((solution.distance - 4.0).abs() < 1e-9, "seed {} gave {}", seed, solution.distance);
        }
    }

    #[test]
    fn test_never_worse_than_start() {
        let locations = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 3.0),
            Point::new(5.0, 4.0),
            Point::new(7.0, 1.0),
            Point::new(6.0, 7.0),
            Point::new(8.0, 3.0),
        ];
        let hc = HillClimbing::new();

        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let solution = hc.optimize(&locations, &mut rng).unwrap();

            assert!(solution.distance <= solution.initial_distance);
            assert!(solution.is_complete(&locations));
            assert_eq!(solution.history[0], (0, solution.initial_distance));
            assert!(solution.history.windows(2).all(|w| w[0].0 < w[1].0 && w[1].1 < w[0].1));
            assert!(solution.history.iter().all(|&(step, _)| step <= 1000));
            assert_eq!(solution.history.last().map(|h| h.1), Some(solution.distance));
        }
    }

    #[test]
    fn test_same_seed_same_route() {
        let hc = HillClimbing::with_params(200, Some(7));
        let instance = Instance::new("square", square()).unwrap();

        let a = hc.solve(&instance).unwrap();
        let b = hc.solve(&instance).unwrap();
        assert_eq!(a.route, b.route);
        assert_eq!(a.distance, b.distance);
    }

    #[test]
    fn test_two_points() {
        let locations = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let solution = HillClimbing::new().optimize(&locations, &mut rng).unwrap();

        assert!((solution.distance - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_iterations_returns_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let solution = HillClimbing::with_params(0, None).optimize(&square(), &mut rng).unwrap();

        assert_eq!(solution.distance, solution.initial_distance);
        assert_eq!(solution.history, vec![(0, solution.initial_distance)]);
    }

    #[test]
    fn test_large_budget_keeps_history_small() {
        // Every swap of two points gives the same tour, so nothing is accepted
        let locations = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let solution = HillClimbing::with_params(2_000_000, None).optimize(&locations, &mut rng).unwrap();

        assert_eq!(solution.iterations, Some(2_000_000));
        assert_eq!(solution.history.len(), 1);
        assert!(solution.history.capacity() < 16);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let hc = HillClimbing::new();

        assert!(matches!(
            hc.optimize(&[], &mut rng),
            Err(Error::InvalidInput(InvalidInputError::TooFewLocations { distinct: 0 }))
        ));
        assert!(matches!(
            hc.optimize(&[Point::new(1.0, 1.0)], &mut rng),
            Err(Error::InvalidInput(InvalidInputError::TooFewLocations { distinct: 1 }))
        ));
    }
}
