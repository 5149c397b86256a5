//! Read-only city state passed to every taxi step.

use td_core::{DispatchConfig, SimClock};
use td_grid::{CityGrid, LightMap, Router};

/// A snapshot of everything a taxi consults during one tick.
///
/// Built once per tick by the world stepper while it holds the city lock and
/// shared across all taxi steps.  The grid's flow counters are those of the
/// previous tick; they are reset only after every taxi has moved.
pub struct StepContext<'a> {
    pub grid:   &'a CityGrid,
    pub lights: &'a LightMap,
    pub router: &'a dyn Router,
    pub config: &'a DispatchConfig,
    /// Already advanced to the tick being stepped.
    pub clock:  SimClock,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(
        grid:   &'a CityGrid,
        lights: &'a LightMap,
        router: &'a dyn Router,
        config: &'a DispatchConfig,
        clock:  SimClock,
    ) -> Self {
        Self { grid, lights, router, config, clock }
    }

    /// Simulated milliseconds one step accrues on a taxi's timer.
    #[inline]
    pub fn tick_ms(&self) -> u64 {
        self.clock.tick_ms as u64
    }
}
