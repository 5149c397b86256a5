//! Plain data row types written by output backends.

/// A request whose window closed, with the taxi that took it (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRow {
    pub tick:        u64,
    pub sim_time_ms: u64,
    pub request_id:  u64,
    /// `None` when the request was dropped.
    pub taxi_id:     Option<u32>,
    pub start_x:     i32,
    pub start_y:     i32,
    pub end_x:       i32,
    pub end_y:       i32,
}

/// A taxi reaching a drop-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRow {
    pub tick:        u64,
    pub sim_time_ms: u64,
    pub request_id:  u64,
    pub taxi_id:     u32,
    /// The taxi's credit after the completion bonus.
    pub credit:      u32,
}

/// Counts for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:          u64,
    pub sim_time_ms:   u64,
    pub open_requests: u64,
    pub registered:    u64,
    pub assigned:      u64,
    pub dropped:       u64,
    pub completed:     u64,
    pub moved:         u64,
    pub blocked:       u64,
}
