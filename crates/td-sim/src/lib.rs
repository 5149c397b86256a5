//! `td-sim` — the shared world and its tick loop.
//!
//! # Tick
//!
//! ```text
//! every tick_ms:
//!   ① Clock     — advance one tick.
//!   ② Lights    — toggle every light_period_ticks.
//!   ③ Resolve   — requests aged ≥ request_window_ms pick a taxi or drop.
//!   ④ Register  — taxis within register_radius of an open pickup join it.
//!   ⑤ Taxis     — step every taxi in id order (WAIT/READY/WORK/STOP).
//!   ⑥ Flow      — rebuild road flow from standard taxis' last moves.
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`world`]     | `World`, `City`, `WorldGuard`, `World::step`           |
//! | [`operator`]  | request submission, road edits, taxi and trip queries  |
//! | [`scheduler`] | `Scheduler`: fixed-rate stepper thread                 |
//! | [`builder`]   | `WorldBuilder`                                         |
//! | [`observer`]  | `DispatchObserver`, `TickSummary`, `LogObserver`       |
//! | [`error`]     | `SimError`, `SimResult<T>`                             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use td_core::DispatchConfig;
//! use td_grid::load_layout_files;
//! use td_sim::{LogObserver, Scheduler, WorldBuilder};
//!
//! let config = DispatchConfig::default();
//! let (grid, lights) = load_layout_files("map.txt", "light.txt", config.grid_size)?;
//! let world = Arc::new(WorldBuilder::new(config, grid, lights).build()?);
//! let stepper = Scheduler::spawn(Arc::clone(&world), LogObserver)?;
//! world.submit_request(3, 4, 10, 12)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod operator;
pub mod scheduler;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::WorldBuilder;
pub use error::{SimError, SimResult};
pub use observer::{DispatchObserver, LogObserver, NoopObserver, TickSummary};
pub use scheduler::Scheduler;
pub use world::{City, World, WorldGuard};
