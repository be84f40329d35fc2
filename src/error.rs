//! Error types for the grid indexer and configuration layer

use thiserror::Error;

/// Raised by the grid indexer when an id or coordinate falls outside the grid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell id {id} out of range (grid has {total} cells)")]
    IdOutOfRange { id: u32, total: u32 },

    #[error(
        "coordinate (day {day}, weight step {weight_step}, hour {hour}) out of range \
         for grid {days}x{weight_steps}x{hours}"
    )]
    CoordinateOutOfRange {
        day: u32,
        weight_step: u32,
        hour: u32,
        days: u32,
        weight_steps: u32,
        hours: u32,
    },

    #[error("day {day} past {base} is not a representable date")]
    DateOutOfRange { base: chrono::NaiveDate, day: u32 },
}

/// Crate-level error context carried inside an `error_stack::Report`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BetCubeError {
    #[error("failed to parse pool config")]
    ConfigParse,

    #[error("invalid pool config: {0}")]
    InvalidConfig(String),
}
