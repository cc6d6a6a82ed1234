//! Heuristics module for the TSP.
//!
//! This module exports the hill climbing local search and the genetic
//! algorithm, both behind the [`TourSolver`] trait.

pub mod local_search;
pub mod genetic;

pub use local_search::*;
pub use genetic::*;

use crate::error::Result;
use crate::instance::Instance;
use crate::solution::Solution;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Trait for complete tour optimizers
pub trait TourSolver {
    fn solve(&self, instance: &Instance) -> Result<Solution>;
    fn name(&self) -> &str;
}

/// Seeded generator when a seed is given, OS entropy otherwise
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
