//! The `World` and its tick.
//!
//! # Locking
//!
//! Three mutexes guard the shared state and are always taken in this order:
//!
//! ```text
//! requests ──► fleet ──► city (grid + lights + clock)
//! ```
//!
//! [`World::lock`] is the only place that acquires them, so the order cannot
//! drift between the stepper and administrative callers.  A call made while
//! a tick is in progress waits for the tick to finish and then sees its
//! complete effects.
//!
//! Trip logs of priority taxis sit outside that hierarchy: each is its own
//! `RwLock`, taken by the owning taxi while it steps and by history queries.

use std::sync::{Mutex, MutexGuard};

use td_core::{DispatchConfig, SimClock, TaxiId};
use td_dispatch::{RequestRegistry, Resolution};
use td_fleet::{Fleet, SharedTripLog, StepContext, StepOutcome};
use td_grid::{CityGrid, LightMap, Router};

use crate::{DispatchObserver, SimError, SimResult, TickSummary};

// ── City ──────────────────────────────────────────────────────────────────────

/// Road state and time, guarded together.
pub struct City {
    pub grid:   CityGrid,
    pub lights: LightMap,
    pub clock:  SimClock,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// All simulation state.  Create via [`WorldBuilder`][crate::WorldBuilder];
/// share as `Arc<World>`.
pub struct World {
    pub(crate) config:    DispatchConfig,
    pub(crate) requests:  Mutex<RequestRegistry>,
    pub(crate) fleet:     Mutex<Fleet>,
    pub(crate) city:      Mutex<City>,
    pub(crate) router:    Box<dyn Router>,
    /// Indexed by `TaxiId::slot`; `None` for standard taxis.
    pub(crate) trip_logs: Vec<Option<SharedTripLog>>,
}

/// All three world locks, held together.
pub struct WorldGuard<'a> {
    pub requests: MutexGuard<'a, RequestRegistry>,
    pub fleet:    MutexGuard<'a, Fleet>,
    pub city:     MutexGuard<'a, City>,
}

impl World {
    #[inline]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    #[inline]
    pub fn router(&self) -> &dyn Router {
        self.router.as_ref()
    }

    /// Acquire requests, fleet and city, in that order.
    pub fn lock(&self) -> SimResult<WorldGuard<'_>> {
        let requests = self.requests.lock().map_err(|_| SimError::Poisoned)?;
        let fleet = self.fleet.lock().map_err(|_| SimError::Poisoned)?;
        let city = self.city.lock().map_err(|_| SimError::Poisoned)?;
        Ok(WorldGuard { requests, fleet, city })
    }

    /// Current simulated time.
    pub fn clock(&self) -> SimResult<SimClock> {
        Ok(self.lock()?.city.clock)
    }

    pub(crate) fn trip_log(&self, raw: u32) -> Option<&Option<SharedTripLog>> {
        if raw == 0 {
            return None;
        }
        self.trip_logs.get(TaxiId(raw).slot())
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Run `n` ticks back to back, without pacing.
    pub fn run_ticks<O: DispatchObserver + ?Sized>(&self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Advance the world by exactly one tick.
    ///
    /// 1. advance the clock;
    /// 2. toggle the lights every `light_period_ticks`;
    /// 3. resolve requests whose window closed;
    /// 4. register newly eligible taxis on the remaining requests;
    /// 5. step every taxi in id order;
    /// 6. rebuild flow from the standard taxis' last moves.
    pub fn step<O: DispatchObserver + ?Sized>(&self, observer: &mut O) -> SimResult<TickSummary> {
        let mut guard = self.lock()?;
        let WorldGuard { requests, fleet, city } = &mut guard;
        let city: &mut City = city;

        // ── ① Clock ───────────────────────────────────────────────────────
        city.clock.advance();
        let clock = city.clock;
        observer.on_tick_start(&clock);
        let mut summary = TickSummary {
            tick: clock.current_tick,
            sim_time_ms: clock.elapsed_ms(),
            ..TickSummary::default()
        };

        // ── ② Lights ──────────────────────────────────────────────────────
        if clock.current_tick.0.is_multiple_of(self.config.light_period_ticks) {
            city.lights.toggle();
        }

        // ── ③ Expired requests ────────────────────────────────────────────
        for resolution in requests.resolve_expired(fleet, &city.grid, self.router(), &clock) {
            match resolution {
                Resolution::Assigned { order, taxi } => {
                    summary.assigned += 1;
                    observer.on_assigned(&order, taxi, &clock);
                }
                Resolution::Dropped { order } => {
                    summary.dropped += 1;
                    observer.on_dropped(&order, &clock);
                }
            }
        }

        // ── ④ Registration ────────────────────────────────────────────────
        for registration in requests.register_eligible(fleet) {
            summary.registered += 1;
            observer.on_registered(&registration, &clock);
        }
        summary.open_requests = requests.len();

        // ── ⑤ Taxis ───────────────────────────────────────────────────────
        let ctx = StepContext::new(&city.grid, &city.lights, self.router(), &self.config, clock);
        for taxi in fleet.iter_mut() {
            match taxi.step(&ctx) {
                StepOutcome::Idle => {}
                StepOutcome::Blocked(_) => summary.blocked += 1,
                StepOutcome::Moved(_) => summary.moved += 1,
                StepOutcome::Completed { order, credit } => {
                    summary.moved += 1;
                    summary.completed += 1;
                    observer.on_completed(&order, taxi.id(), credit, &clock);
                }
            }
            if taxi.trace() {
                log::info!("{}", taxi.snapshot(&clock));
            }
        }

        // ── ⑥ Flow ────────────────────────────────────────────────────────
        city.grid.reset_flow();
        for taxi in fleet.iter().filter(|t| !t.is_priority()) {
            city.grid.record_movement(taxi.position(), taxi.last_direction());
        }

        observer.on_tick_end(&summary);
        Ok(summary)
    }
}
