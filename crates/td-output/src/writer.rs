//! The `EventWriter` trait implemented by backend writers.

use crate::{AssignmentRow, CompletionRow, OutputResult, TickSummaryRow};

/// Sink for dispatch event rows.
///
/// Errors surface to the observer, which stores them; see
/// [`OutputObserver::take_error`][crate::OutputObserver::take_error].
pub trait EventWriter {
    fn write_assignment(&mut self, row: &AssignmentRow) -> OutputResult<()>;

    fn write_completion(&mut self, row: &CompletionRow) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
