//! `td-core` — foundational types for the taxi dispatch simulator.
//!
//! This crate is a dependency of every other `td-*` crate.  It has no `td-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `TaxiId`, `RequestId`                                     |
//! | [`geo`]    | `Intersection`, `Direction`, Chebyshev distance           |
//! | [`access`] | `RoadView` — which road classes a route may use           |
//! | [`time`]   | `Tick`, `SimClock`, `DispatchConfig`                      |
//! | [`rng`]    | `TaxiRng` (per-taxi), `SimRng` (global)                   |
//! | [`error`]  | `CoreError`                                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod access;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use access::RoadView;
pub use error::CoreError;
pub use geo::{Direction, Intersection};
pub use ids::{RequestId, TaxiId};
pub use rng::{SimRng, TaxiRng};
pub use time::{DispatchConfig, MAX_TAXIS, SimClock, Tick};
