//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter owned by the world
//! stepper.  Every tick represents a fixed number of simulated milliseconds:
//!
//!   elapsed_ms = tick * tick_ms
//!
//! All thresholds (request window, idle limit, dwell) are expressed in
//! simulated milliseconds and compared against `elapsed_ms`, so changing the
//! tick length keeps the behaviour in simulated time.
//!
//! Nothing outside the stepper mutates the clock.  Readers receive the
//! current `Tick` or `SimClock` by value.

use std::fmt;

use crate::CoreError;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self` (saturating).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks to simulated milliseconds.
///
/// `SimClock` is `Copy`; snapshots handed to readers never alias the
/// stepper's copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per tick.  Default: 100.
    pub tick_ms: u32,
    /// The current tick, advanced once per world step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_ms: u32) -> Self {
        Self { tick_ms, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.ms_at(self.current_tick)
    }

    /// Simulated milliseconds at an arbitrary tick.
    #[inline]
    pub fn ms_at(&self, tick: Tick) -> u64 {
        tick.0 * self.tick_ms as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.elapsed_ms() as f64 / 1000.0)
    }
}

// ── DispatchConfig ────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// `Default` reproduces the reference city: an 80 × 80 grid, 100 taxis of
/// which the first 30 are priority vehicles, 100 ms ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Side length N of the square grid.
    pub grid_size: usize,

    /// Simulated (and real pacing) milliseconds per tick.
    pub tick_ms: u32,

    /// Lights toggle every this many ticks.
    pub light_period_ticks: u64,

    /// Age at which a request stops collecting candidates and is resolved.
    pub request_window_ms: u64,

    /// Maximum Chebyshev distance between a taxi and a pickup for the taxi
    /// to register interest.
    pub register_radius: u32,

    /// Idle cruising time after which a waiting taxi takes a break.
    pub wait_limit_ms: u64,

    /// Length of every stop (break, pickup, drop-off).
    pub dwell_ms: u64,

    /// Credit granted for registering on a request.
    pub pickup_credit: u32,

    /// Credit granted for completing a trip.
    pub completion_credit: u32,

    /// Number of taxis, ids `1..=taxi_count`.
    pub taxi_count: usize,

    /// The first `vip_count` ids are priority vehicles.
    pub vip_count: usize,

    /// Master RNG seed.  The same seed always yields identical idle cruising.
    pub seed: u64,
}

/// Upper bound on fleet size; taxi ids are `1..=100`.
pub const MAX_TAXIS: usize = 100;

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            grid_size:          80,
            tick_ms:            100,
            light_period_ticks: 3,
            request_window_ms:  3_000,
            register_radius:    2,
            wait_limit_ms:      20_000,
            dwell_ms:           1_000,
            pickup_credit:      1,
            completion_credit:  3,
            taxi_count:         MAX_TAXIS,
            vip_count:          30,
            seed:               42,
        }
    }
}

impl DispatchConfig {
    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_ms)
    }

    /// Reject configurations the world cannot be built from.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.grid_size == 0 {
            return Err(CoreError::Config("grid_size must be positive".into()));
        }
        if self.tick_ms == 0 {
            return Err(CoreError::Config("tick_ms must be positive".into()));
        }
        if self.light_period_ticks == 0 {
            return Err(CoreError::Config("light_period_ticks must be positive".into()));
        }
        if self.taxi_count > MAX_TAXIS {
            return Err(CoreError::Config(format!(
                "taxi_count {} exceeds the maximum of {MAX_TAXIS}",
                self.taxi_count
            )));
        }
        if self.vip_count > self.taxi_count {
            return Err(CoreError::Config(format!(
                "vip_count {} exceeds taxi_count {}",
                self.vip_count, self.taxi_count
            )));
        }
        Ok(())
    }
}
