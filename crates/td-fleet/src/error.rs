//! Fleet error type.

use thiserror::Error;

use td_core::{Intersection, TaxiId};

#[derive(Debug, Error)]
pub enum FleetError {
    /// No taxi carries this id.  Raw so that ids outside `1..=N` can be
    /// reported as given.
    #[error("no taxi with id {0}")]
    NotFound(u32),

    #[error("{0} is not a priority vehicle")]
    NotPriorityVehicle(TaxiId),

    #[error("{taxi} has no trip #{index}")]
    NoSuchTrip { taxi: TaxiId, index: usize },

    #[error("initial position {0} is outside the grid")]
    OffGrid(Intersection),
}

pub type FleetResult<T> = Result<T, FleetError>;
