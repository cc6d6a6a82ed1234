//! Route Optimizer Library
//!
//! Metaheuristic solvers for the Euclidean Traveling Salesman Problem (TSP).
//!
//! # Features
//!
//! - Stochastic hill climbing with random swap moves
//! - Genetic algorithm with truncation selection, order crossover (OX) and
//!   swap mutation
//! - Seedable randomness threaded through every operator
//! - TSP-LIB and CSV instance loading
//! - Benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use route_optimizer::instance::{Instance, Point};
//! use route_optimizer::heuristics::{GAConfig, GeneticAlgorithm, TourSolver};
//!
//! let cities = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(2.0, 3.0),
//!     Point::new(5.0, 4.0),
//!     Point::new(7.0, 1.0),
//! ];
//! let instance = Instance::new("example", cities).unwrap();
//!
//! let ga = GeneticAlgorithm::new(GAConfig { seed: Some(42), ..Default::default() });
//! let solution = ga.solve(&instance).unwrap();
//!
//! println!("Route distance: {:.2}", solution.distance);
//! ```

pub mod error;
pub mod instance;
pub mod route;
pub mod solution;
pub mod heuristics;
pub mod benchmark;
pub mod visualization;

pub use error::{Error, InvalidInputError, Result};
pub use instance::{Instance, Point};
pub use route::Route;
pub use solution::Solution;
