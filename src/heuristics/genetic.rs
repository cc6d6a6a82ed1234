//! Genetic Algorithm for the TSP.
//!
//! Generational GA over permutations of the input locations:
//! - Truncation selection: the shorter half of the population survives
//! - Order Crossover (OX) between two surviving parents
//! - Swap mutation with a fixed probability
//!
//! Surviving parents are carried over unchanged, so the best distance in the
//! population never increases from one generation to the next.

use crate::error::{Error, Result};
use crate::heuristics::{make_rng, TourSolver};
use crate::instance::{validate_locations, Instance, Point, PointKey};
use crate::route::Route;
use crate::solution::Solution;
use ordered_float::OrderedFloat;
use rand::seq::index;
use rand::Rng;
use std::collections::HashMap;

/// Individual in the genetic algorithm population
#[derive(Debug, Clone)]
pub struct Individual {
    /// The tour
    pub route: Route,
    /// Cached total distance of `route`
    pub distance: f64,
}

impl Individual {
    pub fn new(route: Route) -> Self {
        let distance = route.total_distance();
        Individual { route, distance }
    }
}

/// Genetic Algorithm configuration
#[derive(Debug, Clone)]
pub struct GAConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations
    pub generations: usize,
    /// Probability of applying swap mutation to an offspring
    pub mutation_rate: f64,
    /// Random seed
    pub seed: Option<u64>,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.2,
            seed: None,
        }
    }
}

impl GAConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::InvalidParameter {
                name: "population_size",
                reason: format!("must be at least 2, got {}", self.population_size),
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidParameter {
                name: "mutation_rate",
                reason: format!("must be within [0, 1], got {}", self.mutation_rate),
            });
        }
        Ok(())
    }
}

/// Create `population_size` random routes over `locations`
pub fn generate_population<R: Rng + ?Sized>(
    locations: &[Point],
    population_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..population_size)
        .map(|_| Individual::new(Route::random(locations, rng)))
        .collect()
}

/// Keep the `num_parents` shortest routes, shortest first
pub fn select_parents(mut population: Vec<Individual>, num_parents: usize) -> Vec<Individual> {
    population.sort_by_key(|ind| OrderedFloat(ind.distance));
    population.truncate(num_parents);
    population
}

/// Order Crossover (OX) on a random segment.
///
/// Two distinct positions are drawn from `0..n` and sorted into
/// `[start, end)`. Parents must have the same length, at least 2.
pub fn order_crossover<R: Rng + ?Sized>(parent1: &Route, parent2: &Route, rng: &mut R) -> Route {
    let positions = index::sample(rng, parent1.len(), 2);
    let (a, b) = (positions.index(0), positions.index(1));
    order_crossover_segment(parent1, parent2, a.min(b), a.max(b))
}

/// Order Crossover (OX) on the segment `[start, end)`.
///
/// The child takes `parent1[start..end]` at the same positions, then the
/// free positions are filled left to right with the cities of `parent2` in
/// their order, skipping cities already placed. Skipping counts occurrences,
/// so a location listed twice in the input stays listed twice.
///
/// # Panics
/// Panics if the parents differ in length or `start > end` or `end > n`.
pub fn order_crossover_segment(parent1: &Route, parent2: &Route, start: usize, end: usize) -> Route {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(start <= end && end <= n, "invalid segment [{}, {}) for {} cities", start, end, n);

    let p1 = parent1.points();

    let mut placed: HashMap<PointKey, usize> = HashMap::with_capacity(end - start);
    for p in &p1[start..end] {
        *placed.entry(p.key()).or_insert(0) += 1;
    }

    let mut remaining = parent2.points().iter().filter(|p| match placed.get_mut(&p.key()) {
        Some(count) if *count > 0 => {
            *count -= 1;
            false
        }
        _ => true,
    });

    let mut child = Vec::with_capacity(n);
    for (i, &p) in p1.iter().enumerate() {
        if (start..end).contains(&i) {
            child.push(p);
        } else if let Some(&fill) = remaining.next() {
            child.push(fill);
        }
    }

    Route::new(child)
}

/// Swap two random positions with probability `mutation_rate`
pub fn mutate<R: Rng + ?Sized>(route: Route, mutation_rate: f64, rng: &mut R) -> Route {
    if route.len() < 2 || rng.gen::<f64>() >= mutation_rate {
        return route;
    }

    let positions = index::sample(rng, route.len(), 2);
    route.with_swap(positions.index(0), positions.index(1))
}

fn best_of(population: &[Individual]) -> Option<&Individual> {
    population.iter().min_by_key(|ind| OrderedFloat(ind.distance))
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm {
    config: GAConfig,
}

impl GeneticAlgorithm {
    pub fn new(config: GAConfig) -> Self {
        GeneticAlgorithm { config }
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }

    /// Build the next generation: surviving parents followed by offspring
    fn evolve<R: Rng + ?Sized>(&self, population: Vec<Individual>, rng: &mut R) -> Vec<Individual> {
        let population_size = self.config.population_size;
        let parents = select_parents(population, population_size / 2);

        let offspring: Vec<Individual> = (0..population_size - parents.len())
            .map(|_| {
                let parent1 = &parents[rng.gen_range(0..parents.len())];
                let parent2 = &parents[rng.gen_range(0..parents.len())];
                let child = order_crossover(&parent1.route, &parent2.route, rng);
                Individual::new(mutate(child, self.config.mutation_rate, rng))
            })
            .collect();

        let mut next = parents;
        next.extend(offspring);
        next
    }

    /// Run the genetic algorithm over `locations`, drawing every random
    /// choice from `rng`.
    pub fn optimize<R: Rng + ?Sized>(&self, locations: &[Point], rng: &mut R) -> Result<Solution> {
        validate_locations(locations)?;
        self.config.validate()?;
        let start = std::time::Instant::now();

        let mut population = generate_population(locations, self.config.population_size, rng);

        let initial_distance = best_of(&population).map(|ind| ind.distance).unwrap_or(f64::INFINITY);
        let mut history = vec![(0, initial_distance)];
        let mut last_best = initial_distance;

        for generation in 1..=self.config.generations {
            population = self.evolve(population, rng);

            let best_distance = best_of(&population).map(|ind| ind.distance).unwrap_or(f64::INFINITY);
            if best_distance < last_best {
                history.push((generation, best_distance));
                last_best = best_distance;
            }

            log::debug!(
                "[GA] Gen {}  Best distance {:.3}  Elapsed {:.2}s",
                generation,
                best_distance,
                start.elapsed().as_secs_f64()
            );
        }

        let best = select_parents(population, 1)
            .pop()
            .ok_or_else(|| Error::InvalidParameter {
                name: "population_size",
                reason: "population is empty".to_string(),
            })?;

        let mut solution = Solution::from_route(best.route, self.name());
        solution.initial_distance = initial_distance;
        solution.iterations = Some(self.config.generations);
        solution.history = history;
        solution.computation_time = start.elapsed().as_secs_f64();

        Ok(solution)
    }
}

impl TourSolver for GeneticAlgorithm {
    fn solve(&self, instance: &Instance) -> Result<Solution> {
        let mut rng = make_rng(self.config.seed);
        log::info!(
            "[GA] Solving {} ({} locations, population {}, {} generations)",
            instance.name,
            instance.dimension(),
            self.config.population_size,
            self.config.generations
        );
        self.optimize(&instance.points, &mut rng)
    }

    fn name(&self) -> &str {
        "GeneticAlgorithm"
    }
}
