//! Grid-subsystem error type.

use thiserror::Error;

use td_core::Intersection;

use crate::RoadClass;

/// Errors produced by `td-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    /// Malformed layout input.  Fatal at start-up.
    #[error("layout rejected at line {line}: {reason}")]
    LoadRejected { line: usize, reason: String },

    /// The requested class is outside what the intersection was built with.
    #[error("cannot set {at} to {class}")]
    RoadEditRejected { at: Intersection, class: RoadClass },

    #[error("intersection {0} is outside the grid")]
    OutOfRange(Intersection),

    #[error("no route from {from} to {to}")]
    NoRoute { from: Intersection, to: Intersection },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
