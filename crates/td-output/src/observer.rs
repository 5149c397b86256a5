//! `OutputObserver<W>` — bridges `DispatchObserver` to an `EventWriter`.

use td_core::{SimClock, TaxiId};
use td_fleet::RideOrder;
use td_sim::{DispatchObserver, TickSummary};

use crate::row::{AssignmentRow, CompletionRow, TickSummaryRow};
use crate::writer::EventWriter;
use crate::{CsvEventWriter, OutputError, OutputResult};

/// The observer most callers want.
pub type CsvEventObserver = OutputObserver<CsvEventWriter>;

/// A [`DispatchObserver`] that writes assignments, completions and tick
/// summaries to any [`EventWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Once stepping is over, call
/// [`finish`][Self::finish] to flush and collect the first error.
pub struct OutputObserver<W: EventWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: EventWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer and report the first error seen.
    pub fn finish(&mut self) -> OutputResult<()> {
        let result = self.writer.finish();
        self.store_err(result);
        match self.take_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Unwrap the inner writer (e.g. to inspect files afterwards).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("event output failed: {e}");
                self.last_error = Some(e);
            }
        }
    }

    fn assignment(&mut self, order: &RideOrder, taxi: Option<TaxiId>, clock: &SimClock) {
        let row = AssignmentRow {
            tick:        clock.current_tick.0,
            sim_time_ms: clock.elapsed_ms(),
            request_id:  order.id.0,
            taxi_id:     taxi.map(|t| t.0),
            start_x:     order.start.x,
            start_y:     order.start.y,
            end_x:       order.end.x,
            end_y:       order.end.y,
        };
        let result = self.writer.write_assignment(&row);
        self.store_err(result);
    }
}

impl<W: EventWriter> DispatchObserver for OutputObserver<W> {
    fn on_assigned(&mut self, order: &RideOrder, taxi: TaxiId, clock: &SimClock) {
        self.assignment(order, Some(taxi), clock);
    }

    fn on_dropped(&mut self, order: &RideOrder, clock: &SimClock) {
        self.assignment(order, None, clock);
    }

    fn on_completed(&mut self, order: &RideOrder, taxi: TaxiId, credit: u32, clock: &SimClock) {
        let row = CompletionRow {
            tick:        clock.current_tick.0,
            sim_time_ms: clock.elapsed_ms(),
            request_id:  order.id.0,
            taxi_id:     taxi.0,
            credit,
        };
        let result = self.writer.write_completion(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        let row = TickSummaryRow {
            tick:          s.tick.0,
            sim_time_ms:   s.sim_time_ms,
            open_requests: s.open_requests as u64,
            registered:    s.registered as u64,
            assigned:      s.assigned as u64,
            dropped:       s.dropped as u64,
            completed:     s.completed as u64,
            moved:         s.moved as u64,
            blocked:       s.blocked as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }
}
