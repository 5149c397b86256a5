//! Dispatch observer trait for event logging and data collection.

use td_core::{SimClock, TaxiId, Tick};
use td_dispatch::Registration;
use td_fleet::RideOrder;

/// Counts for one completed tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickSummary {
    pub tick:          Tick,
    pub sim_time_ms:   u64,
    /// Requests still collecting candidates after this tick.
    pub open_requests: usize,
    pub registered:    usize,
    pub assigned:      usize,
    pub dropped:       usize,
    pub completed:     usize,
    /// Taxis that changed intersection.
    pub moved:         usize,
    /// Taxis held by a light.
    pub blocked:       usize,
}

/// Callbacks invoked by [`World::step`][crate::World::step] at key points of
/// the tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Every callback runs while the world
/// locks are held; keep them short.
///
/// # Example: counting completions
///
/// ```rust,ignore
/// struct Completions(usize);
///
/// impl DispatchObserver for Completions {
///     fn on_completed(&mut self, _: &RideOrder, _: TaxiId, _: u32, _: &SimClock) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Called after the clock advanced, before anything else.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// A taxi joined a request's candidate list during the tick.
    fn on_registered(&mut self, _registration: &Registration, _clock: &SimClock) {}

    /// A request's window closed and `taxi` won it.
    fn on_assigned(&mut self, _order: &RideOrder, _taxi: TaxiId, _clock: &SimClock) {}

    /// A request's window closed with no waiting candidate.
    fn on_dropped(&mut self, _order: &RideOrder, _clock: &SimClock) {}

    /// `taxi` reached the drop-off.  `credit` is its new total.
    fn on_completed(&mut self, _order: &RideOrder, _taxi: TaxiId, _credit: u32, _clock: &SimClock) {}

    fn on_tick_end(&mut self, _summary: &TickSummary) {}
}

/// A [`DispatchObserver`] that does nothing.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

/// Emits every event as a `log` record.
///
/// | Event        | Level   |
/// |--------------|---------|
/// | registered   | `debug` |
/// | assigned     | `info`  |
/// | completed    | `info`  |
/// | dropped      | `warn`  |
/// | tick summary | `trace` |
#[derive(Default)]
pub struct LogObserver;

impl DispatchObserver for LogObserver {
    fn on_registered(&mut self, registration: &Registration, clock: &SimClock) {
        log::debug!(
            "taxi {} registered for request {} at {clock}",
            registration.taxi.0,
            registration.request.0
        );
    }

    fn on_assigned(&mut self, order: &RideOrder, taxi: TaxiId, clock: &SimClock) {
        log::info!("taxi {} takes {order} at {clock}", taxi.0);
    }

    fn on_dropped(&mut self, order: &RideOrder, clock: &SimClock) {
        log::warn!("{order} can not be finished (no waiting taxi at {clock})");
    }

    fn on_completed(&mut self, order: &RideOrder, taxi: TaxiId, credit: u32, clock: &SimClock) {
        log::info!("taxi {} finished {order} at {clock}, credit now {credit}", taxi.0);
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        log::trace!(
            "{}: open={} assigned={} dropped={} completed={} moved={} blocked={}",
            s.tick, s.open_requests, s.assigned, s.dropped, s.completed, s.moved, s.blocked
        );
    }
}
