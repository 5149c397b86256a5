use thiserror::Error;

use td_core::Intersection;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Start equals end, or either lies off the grid.  No state changes.
    #[error("invalid request from {start} to {end}")]
    InvalidRequest { start: Intersection, end: Intersection },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
