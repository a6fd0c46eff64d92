//! Error types for the loading planner.

use thiserror::Error;

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning a truck load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The truck, the crates or the solver configuration cannot describe a
    /// solvable problem.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Random sampling ran out of attempts before finding a free spot.
    #[error("Crate {crate_id} could not be placed after {attempts} attempts")]
    PlacementInfeasible { crate_id: u32, attempts: usize },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
