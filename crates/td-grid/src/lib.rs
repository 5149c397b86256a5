//! `td-grid` — the city: roads, lights, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`road`]   | `RoadClass` and the edit-capability table                    |
//! | [`grid`]   | `CityGrid` (classes + flow counters), `CityGridBuilder`      |
//! | [`lights`] | `LightPhase`, `LightMap`                                     |
//! | [`router`] | `Router` trait, `Route`, `FlowBfsRouter`                     |
//! | [`loader`] | `load_roads`, `load_lights`, `load_layout_files`             |
//! | [`error`]  | `GridError`, `GridResult<T>`                                 |
//!
//! # Segment ownership
//!
//! A road segment joins two adjacent intersections and is owned by the one
//! with the lower coordinate on the moving axis.  The owner's road class
//! decides whether the segment exists, and the owner's flow counter records
//! how many taxis used it during the last tick.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod grid;
pub mod lights;
pub mod loader;
pub mod road;
pub mod router;


pub use error::{GridError, GridResult};
pub use grid::{CityGrid, CityGridBuilder, FLOW_BLOCKED};
pub use lights::{LightMap, LightPhase};
pub use loader::{load_layout_files, load_lights, load_roads};
pub use road::RoadClass;
pub use router::{FlowBfsRouter, Route, Router};
