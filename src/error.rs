use thiserror::Error;

// ---------------------------------------------------------------------------
// Core error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised by the filtering, selection and analysis layers.
///
/// Every variant except the load-time ones ([`ExplorerError::Schema`],
/// [`ExplorerError::MalformedRow`], [`ExplorerError::DuplicateHousehold`])
/// is recoverable: the viewer reports
/// it and waits for the user to change filters or pick another household.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplorerError {
    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row} has no usable value for '{column}'")]
    MalformedRow { row: usize, column: String },

    #[error("household id {household_id} appears more than once")]
    DuplicateHousehold { household_id: i64 },

    #[error("no households match the current filters")]
    EmptyResult,

    #[error("household {household_id} is not in the filtered dataset")]
    NotFound { household_id: i64 },

    #[error("rank #{rank} is outside the {available} ranked households")]
    RankOutOfRange { rank: usize, available: usize },

    #[error("cannot draw a weighted household: {0}")]
    InvalidWeight(String),

    #[error("household {household_id} has no usable value for '{column}'")]
    MissingColumn { household_id: i64, column: String },

    #[error("waterfall does not add up: baseline plus reforms is {actual}, expected {expected}")]
    DecompositionMismatch { expected: f64, actual: f64 },
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
