//! Module for loading and representing TSP instances.
//!
//! An instance is a named set of 2-D locations. Instances can be read from
//! TSP-LIB files (`NODE_COORD_SECTION`, Euclidean 2D) or from CSV files with
//! an `x,y` header, or generated at random.

use crate::error::{Error, InvalidInputError, Result};
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A location in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Hashable identity of a point, used for multiset comparisons
pub type PointKey = (OrderedFloat<f64>, OrderedFloat<f64>);

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn key(&self) -> PointKey {
        (OrderedFloat(self.x), OrderedFloat(self.y))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Check that a set of locations can be toured: every coordinate finite and
/// at least two distinct points.
pub fn validate_locations(points: &[Point]) -> std::result::Result<(), InvalidInputError> {
    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(InvalidInputError::NonFiniteCoordinate { index, x: p.x, y: p.y });
    }

    let distinct = count_distinct(points);
    if distinct < 2 {
        return Err(InvalidInputError::TooFewLocations { distinct });
    }

    Ok(())
}

fn count_distinct(points: &[Point]) -> usize {
    points.iter().map(Point::key).collect::<HashSet<_>>().len()
}

/// A complete TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Locations to visit
    pub points: Vec<Point>,
}

impl Instance {
    /// Build an instance from in-memory points
    pub fn new(name: &str, points: Vec<Point>) -> Result<Self> {
        validate_locations(&points)?;

        Ok(Instance {
            name: name.to_string(),
            comment: String::new(),
            points,
        })
    }

    /// Generate `n` cities with integer coordinates in `0..=max_coord`
    pub fn random<R: Rng + ?Sized>(n: usize, max_coord: u32, rng: &mut R) -> Result<Self> {
        let points = (0..n)
            .map(|_| {
                Point::new(
                    rng.gen_range(0..=max_coord) as f64,
                    rng.gen_range(0..=max_coord) as f64,
                )
            })
            .collect();

        let mut instance = Instance::new(&format!("random{}", n), points)?;
        instance.comment = format!("{} random cities in [0, {}]", n, max_coord);
        Ok(instance)
    }

    /// Load an instance, choosing the format from the file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let is_csv = path
            .as_ref()
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Parse an instance from a TSP-LIB format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mut instance = Self::from_tsplib_reader(BufReader::new(file))?;
        if instance.name.is_empty() {
            instance.name = file_stem(path.as_ref());
        }
        Ok(instance)
    }

    /// Parse TSP-LIB content. Only the coordinate section is read; other
    /// sections (demands, display data) are skipped.
    pub fn from_tsplib_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut points: Vec<Point> = Vec::new();
        let mut in_coords = false;
        let mut last_line = 0;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            if let Some((key, value)) = header_field(line) {
                match key {
                    "NAME" => name = value.to_string(),
                    "COMMENT" => comment = value.to_string(),
                    "DIMENSION" => {
                        dimension = Some(value.parse().map_err(|_| Error::Parse {
                            line: line_no,
                            message: format!("Invalid dimension `{}`", value),
                        })?);
                    }
                    _ => {}
                }
                in_coords = false;
                continue;
            }

            if line.ends_with("_SECTION") {
                in_coords = line == "NODE_COORD_SECTION";
                continue;
            }

            if in_coords {
                points.push(parse_coord_line(line, line_no)?);
            }
        }

        if let Some(dim) = dimension {
            if dim != points.len() {
                return Err(Error::Format(format!(
                    "DIMENSION is {} but {} coordinates were read (up to line {})",
                    dim,
                    points.len(),
                    last_line
                )));
            }
        }

        let mut instance = Instance::new(&name, points)?;
        instance.comment = comment;
        Ok(instance)
    }

    /// Parse an instance from a CSV file with an `x,y` header
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mut instance = Self::from_csv_reader(file)?;
        instance.name = file_stem(path.as_ref());
        Ok(instance)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let points = rdr
            .deserialize::<Point>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Instance::new("", points)
    }

    /// Number of locations
    pub fn dimension(&self) -> usize {
        self.points.len()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.points.len();

        let mut distances: Vec<f64> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                distances.push(self.points[i].distance(&self.points[j]));
            }
        }

        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        let min_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        let (min_x, max_x, min_y, max_y) = bounds(&self.points);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            distinct_locations: count_distinct(&self.points),
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            min_distance: if min_distance.is_finite() { min_distance } else { 0.0 },
            max_distance,
        }
    }
}

/// Bounding box `(min_x, max_x, min_y, max_y)` of a point set
pub fn bounds(points: &[Point]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), p| {
            (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
        },
    )
}

/// Split `KEY: value` / `KEY : value` header lines
fn header_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_coord_line(line: &str, line_no: usize) -> Result<Point> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(Error::Parse {
            line: line_no,
            message: "Expected `id x y`".to_string(),
        });
    }

    let parse = |s: &str, what: &str| -> Result<f64> {
        s.parse().map_err(|_| Error::Parse {
            line: line_no,
            message: format!("Invalid {} `{}`", what, s),
        })
    };

    Ok(Point::new(parse(parts[1], "x coordinate")?, parse(parts[2], "y coordinate")?))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub distinct_locations: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Locations: {} ({} distinct)", self.dimension, self.distinct_locations)?;
        writeln!(f, "  X range: [{:.2}, {:.2}]", self.min_x, self.max_x)?;
        writeln!(f, "  Y range: [{:.2}, {:.2}]", self.min_y, self.max_y)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
