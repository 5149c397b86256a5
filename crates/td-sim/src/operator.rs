//! Administrative operations on a running world.
//!
//! Every method here may be called from any thread, including while the
//! stepper is running.  Calls that touch requests, fleet or roads take the
//! world locks through [`World::lock`]; trip-history queries lock only the
//! taxi's own log.

use std::sync::PoisonError;

use td_core::{Intersection, RequestId, TaxiId};
use td_fleet::{FleetError, TaxiSnapshot, TripCursor};
use td_grid::RoadClass;

use crate::{SimResult, World};

impl World {
    /// Open a passenger request from `(sx, sy)` to `(ex, ey)` and register
    /// every taxi already in range.
    ///
    /// Fails with [`DispatchError::InvalidRequest`][td_dispatch::DispatchError]
    /// when either endpoint is off the grid or both are equal.
    pub fn submit_request(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> SimResult<RequestId> {
        let mut guard = self.lock()?;
        let clock = guard.city.clock;
        let id = guard.requests.create(Intersection::new(sx, sy), Intersection::new(ex, ey), &clock)?;

        let registrations = guard.requests.register_eligible_for(id, &mut guard.fleet);
        log::debug!(
            "request {} ({sx},{sy})->({ex},{ey}) submitted at {clock}, {} taxi(s) registered",
            id.0,
            registrations.len()
        );
        for r in &registrations {
            log::debug!("taxi {} registered for request {}", r.taxi.0, id.0);
        }
        Ok(id)
    }

    /// Change the class of the road at `(x, y)`.
    ///
    /// Returns `Ok(false)` when `code` is not a road class, the cell is off
    /// the grid, or the edit is not allowed for the cell's original class.
    /// Priority taxis route on the original layout and are not affected.
    pub fn edit_road(&self, x: i32, y: i32, code: u8) -> SimResult<bool> {
        let Some(class) = RoadClass::from_code(code) else {
            log::debug!("road edit at ({x},{y}) rejected: unknown class code {code}");
            return Ok(false);
        };
        let at = Intersection::new(x, y);
        let mut guard = self.lock()?;
        match guard.city.grid.set_road_class(at, class) {
            Ok(()) => {
                log::info!("road at {at} is now {class}");
                Ok(true)
            }
            Err(e) => {
                log::debug!("road edit rejected: {e}");
                Ok(false)
            }
        }
    }

    /// Turn per-tick state logging on or off for one taxi.
    pub fn set_trace(&self, id: u32, enabled: bool) -> SimResult<()> {
        let mut guard = self.lock()?;
        guard.fleet.lookup_mut(id)?.set_trace(enabled);
        Ok(())
    }

    /// Current state of taxi `id`, or `None` when no such taxi exists.
    pub fn describe_taxi(&self, id: u32) -> SimResult<Option<TaxiSnapshot>> {
        let guard = self.lock()?;
        let clock = guard.city.clock;
        Ok(guard.fleet.lookup(id).ok().map(|t| t.snapshot(&clock)))
    }

    // ── Trip history ──────────────────────────────────────────────────────

    /// Number of trips priority taxi `id` has completed.
    pub fn trip_count(&self, id: u32) -> SimResult<usize> {
        let log = match self.trip_log(id) {
            None => return Err(FleetError::NotFound(id).into()),
            Some(None) => return Err(FleetError::NotPriorityVehicle(TaxiId(id)).into()),
            Some(Some(log)) => log,
        };
        Ok(log.read().unwrap_or_else(PoisonError::into_inner).len())
    }

    /// A cursor over trip `index` (0-based) of priority taxi `id`.
    pub fn trip_path(&self, id: u32, index: usize) -> SimResult<TripCursor> {
        let log = match self.trip_log(id) {
            None => return Err(FleetError::NotFound(id).into()),
            Some(None) => return Err(FleetError::NotPriorityVehicle(TaxiId(id)).into()),
            Some(Some(log)) => log,
        };
        let log = log.read().unwrap_or_else(PoisonError::into_inner);
        log.cursor(index)
            .ok_or_else(|| FleetError::NoSuchTrip { taxi: TaxiId(id), index }.into())
    }
}
