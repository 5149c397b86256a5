//! A ride bound to a taxi.

use std::fmt;

use td_core::{Intersection, RequestId, Tick};

/// The immutable part of a passenger request, as carried by the taxi that
/// won it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RideOrder {
    pub id:         RequestId,
    pub start:      Intersection,
    pub end:        Intersection,
    /// Tick at which the request was submitted.
    pub created_at: Tick,
}

impl fmt::Display for RideOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request{{id={}, start={}, end={}, created={}}}",
            self.id.0, self.start, self.end, self.created_at
        )
    }
}
