//! Fluent builder for constructing a [`World`].

use std::sync::Mutex;

use td_core::{DispatchConfig, Intersection};
use td_dispatch::RequestRegistry;
use td_fleet::FleetBuilder;
use td_grid::{CityGrid, FlowBfsRouter, LightMap, Router};

use crate::{City, SimError, SimResult, World};

/// Fluent builder for [`World`].
///
/// # Required inputs
///
/// - [`DispatchConfig`] — grid size, fleet size, timings, seed, …
/// - [`CityGrid`] + [`LightMap`] — usually from [`td_grid::load_layout_files`]
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                  |
/// |--------------------------|------------------------------------------|
/// | `.router(r)`             | [`FlowBfsRouter`]                        |
/// | `.initial_positions(v)`  | Uniformly random, drawn from `seed`      |
///
/// # Example
///
/// ```rust,ignore
/// let (grid, lights) = load_layout_files("map.txt", "light.txt", config.grid_size)?;
/// let world = Arc::new(WorldBuilder::new(config, grid, lights).build()?);
/// let stepper = Scheduler::spawn(Arc::clone(&world), LogObserver)?;
/// ```
pub struct WorldBuilder {
    config:    DispatchConfig,
    grid:      CityGrid,
    lights:    LightMap,
    router:    Box<dyn Router>,
    positions: Option<Vec<Intersection>>,
}

impl WorldBuilder {
    pub fn new(config: DispatchConfig, grid: CityGrid, lights: LightMap) -> Self {
        Self {
            config,
            grid,
            lights,
            router:    Box::new(FlowBfsRouter),
            positions: None,
        }
    }

    /// Replace the default flow-aware BFS router.
    pub fn router(mut self, router: impl Router + 'static) -> Self {
        self.router = Box::new(router);
        self
    }

    /// Starting intersection of every taxi (must be length `taxi_count`).
    pub fn initial_positions(mut self, positions: Vec<Intersection>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Validate all inputs and construct the [`World`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] if the configuration is invalid.
    /// - [`SimError::Config`] if the grid or light map size differs from
    ///   `grid_size`.
    /// - [`SimError::CountMismatch`] if initial positions are given and their
    ///   count differs from `taxi_count`.
    /// - [`SimError::Fleet`] if an initial position is off the grid.
    pub fn build(self) -> SimResult<World> {
        self.config.validate()?;
        let n = self.config.grid_size;

        if self.grid.size() != n {
            return Err(SimError::Config(format!(
                "road grid is {0}x{0}, expected {n}x{n}",
                self.grid.size()
            )));
        }
        if self.lights.size() != n {
            return Err(SimError::Config(format!(
                "light map is {0}x{0}, expected {n}x{n}",
                self.lights.size()
            )));
        }

        let mut fleet = FleetBuilder::new(&self.config);
        if let Some(positions) = self.positions {
            if positions.len() != self.config.taxi_count {
                return Err(SimError::CountMismatch {
                    expected: self.config.taxi_count,
                    got:      positions.len(),
                    what:     "initial positions",
                });
            }
            fleet = fleet.positions(positions);
        }
        let fleet = fleet.build()?;
        let trip_logs = fleet.iter().map(|t| t.trip_log().cloned()).collect();

        log::info!(
            "world ready: {n}x{n} grid, {} taxis ({} priority), seed {}",
            fleet.len(),
            self.config.vip_count,
            self.config.seed
        );

        Ok(World {
            requests: Mutex::new(RequestRegistry::new(&self.config)),
            fleet: Mutex::new(fleet),
            city: Mutex::new(City {
                grid:   self.grid,
                lights: self.lights,
                clock:  self.config.make_clock(),
            }),
            router: self.router,
            trip_logs,
            config: self.config,
        })
    }
}
