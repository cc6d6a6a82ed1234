//! Error types for the route optimizer.

/// Rejected set of input locations.
///
/// Distance and crossover are undefined on fewer than two distinct points,
/// so the solvers refuse such input instead of returning an empty tour.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("at least 2 distinct locations are required, got {distinct}")]
    TooFewLocations { distinct: usize },

    #[error("location {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { index: usize, x: f64, y: f64 },
}

/// Possible errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("malformed instance: {0}")]
    Format(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
