//! Route representation.
//!
//! A route is an ordered permutation of the input locations, closed into a
//! cycle: the last point connects back to the first. Routes are values;
//! every move returns a new route and leaves the original untouched.

use crate::instance::{Point, PointKey};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Total length of the closed tour through `points`, wrap-around edge included.
pub fn total_distance(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut length = 0.0;
    for pair in points.windows(2) {
        length += pair[0].distance(&pair[1]);
    }

    length += points[points.len() - 1].distance(&points[0]);

    length
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<Point>,
}

impl Route {
    pub fn new(points: Vec<Point>) -> Self {
        Route { points }
    }

    /// Uniformly random visiting order of `locations`
    pub fn random<R: Rng + ?Sized>(locations: &[Point], rng: &mut R) -> Self {
        let mut points = locations.to_vec();
        points.shuffle(rng);
        Route { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_distance(&self) -> f64 {
        total_distance(&self.points)
    }

    /// Route with the points at positions `i` and `j` exchanged
    pub fn with_swap(&self, i: usize, j: usize) -> Route {
        let mut points = self.points.clone();
        points.swap(i, j);
        Route { points }
    }

    /// Same cycle, starting `k` positions later
    pub fn rotated(&self, k: usize) -> Route {
        let mut points = self.points.clone();
        if !points.is_empty() {
            points.rotate_left(k % self.points.len());
        }
        Route { points }
    }

    /// Same cycle, travelled in the opposite direction
    pub fn reversed(&self) -> Route {
        let mut points = self.points.clone();
        points.reverse();
        Route { points }
    }

    /// Check that this route visits exactly the given locations, each as many
    /// times as it occurs in `locations`.
    pub fn is_permutation_of(&self, locations: &[Point]) -> bool {
        if self.points.len() != locations.len() {
            return false;
        }

        let mut ours: Vec<PointKey> = self.points.iter().map(Point::key).collect();
        let mut theirs: Vec<PointKey> = locations.iter().map(Point::key).collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        ours == theirs
    }
}

impl From<Vec<Point>> for Route {
    fn from(points: Vec<Point>) -> Self {
        Route::new(points)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.points.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", parts.join(" -> "))
    }
}
