//! `td-fleet` — taxis, their state machine, and their trip history.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`taxi`]     | `Taxi`, `TaxiStatus`, `TaxiKind`, `StepOutcome`            |
//! | [`context`]  | `StepContext<'a>`: read-only city state for one tick       |
//! | [`order`]    | `RideOrder`: the request a taxi is serving                 |
//! | [`trip`]     | `TripLog`, `SharedTripLog`, `TripCursor`                   |
//! | [`snapshot`] | `TaxiSnapshot` for queries and tracing                     |
//! | [`store`]    | `Fleet`: taxis indexed by `TaxiId`                         |
//! | [`builder`]  | `FleetBuilder`: seeded or explicit placement               |
//! | [`error`]    | `FleetError`, `FleetResult<T>`                             |
//!
//! # Design notes
//!
//! Standard and priority taxis are one type.  The difference is carried by
//! [`TaxiKind`]: a priority taxi routes over the original road classes
//! ([`td_core::RoadView::Original`]) and owns a trip log.  Nothing dispatches
//! on the kind at runtime beyond those two points.
//!
//! A taxi never touches shared state while stepping.  It reads the grid,
//! lights and router through [`StepContext`] and reports what it did as a
//! [`StepOutcome`]; the world applies flow accounting and events afterwards.

pub mod builder;
pub mod context;
pub mod error;
pub mod order;
pub mod snapshot;
pub mod store;
pub mod taxi;
pub mod trip;


pub use builder::FleetBuilder;
pub use context::StepContext;
pub use error::{FleetError, FleetResult};
pub use order::RideOrder;
pub use snapshot::TaxiSnapshot;
pub use store::Fleet;
pub use taxi::{StepOutcome, Taxi, TaxiKind, TaxiStatus};
pub use trip::{SharedTripLog, TRIP_SEPARATOR, TripCursor, TripLog};
