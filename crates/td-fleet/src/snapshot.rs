//! Point-in-time view of a taxi for administrative queries and tracing.

use std::fmt;

use td_core::{Direction, Intersection, TaxiId};

use crate::taxi::{TaxiKind, TaxiStatus};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxiSnapshot {
    pub id:             TaxiId,
    pub kind:           TaxiKind,
    pub status:         TaxiStatus,
    pub position:       Intersection,
    pub last_direction: Option<Direction>,
    pub credit:         u32,
    /// Simulated time the snapshot was taken at.
    pub sim_time_ms:    u64,
}

/// `Taxi{id=7, status=WAIT, now=12.3s, at=(4,5), credit=2}`
impl fmt::Display for TaxiSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Taxi{{id={}, status={}, now={}s, at={}, credit={}}}",
            self.id.0,
            self.status,
            self.sim_time_ms as f64 / 1000.0,
            self.position,
            self.credit,
        )
    }
}
