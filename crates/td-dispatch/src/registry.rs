//! The request registry.
//!
//! # Lifecycle
//!
//! ```text
//! create ──► open ──(age ≥ window)──► select ──► Assigned { taxi }
//!              │                          └────► Dropped
//!              └── register_eligible (every tick while open)
//! ```
//!
//! A request is removed the moment it is resolved, whether or not a taxi
//! took it.  There are no retries.
//!
//! # Selection order
//!
//! Candidates still in WAIT are ranked by credit (highest first), then by
//! route length to the pickup under each taxi's own road view (shortest
//! first).  A candidate with no route ranks after every reachable one.
//! Remaining ties keep registration order.

use std::cmp::Reverse;

use td_core::{DispatchConfig, Intersection, RequestId, SimClock, TaxiId};
use td_fleet::{Fleet, RideOrder};
use td_grid::{CityGrid, Router};

use crate::{DispatchError, DispatchResult, Request};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// A taxi joined a request's candidate list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Registration {
    pub request: RequestId,
    pub taxi:    TaxiId,
}

/// What happened to a request whose window closed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Resolution {
    /// `taxi` now carries `order`.
    Assigned { order: RideOrder, taxi: TaxiId },
    /// No candidate was still waiting.
    Dropped { order: RideOrder },
}

impl Resolution {
    pub fn order(&self) -> &RideOrder {
        match self {
            Resolution::Assigned { order, .. } | Resolution::Dropped { order } => order,
        }
    }
}

// ── RequestRegistry ───────────────────────────────────────────────────────────

pub struct RequestRegistry {
    open:          Vec<Request>,
    next_id:       u64,
    grid_size:     usize,
    radius:        u32,
    window_ms:     u64,
    pickup_credit: u32,
}

impl RequestRegistry {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            open:          Vec::new(),
            next_id:       1,
            grid_size:     config.grid_size,
            radius:        config.register_radius,
            window_ms:     config.request_window_ms,
            pickup_credit: config.pickup_credit,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.open.iter().find(|r| r.id() == id)
    }

    /// Open requests in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.open.iter()
    }

    // ── Creation ──────────────────────────────────────────────────────────

    /// Open a request stamped with the clock's current tick.
    pub fn create(&mut self, start: Intersection, end: Intersection, clock: &SimClock) -> DispatchResult<RequestId> {
        if start == end || !start.is_within(self.grid_size) || !end.is_within(self.grid_size) {
            return Err(DispatchError::InvalidRequest { start, end });
        }
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.open.push(Request::new(RideOrder { id, start, end, created_at: clock.current_tick }));
        log::trace!("opened request {} {start}->{end} at {clock}", id.0);
        Ok(id)
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register every eligible taxi on request `id`, in fleet order.
    pub fn register_eligible_for(&mut self, id: RequestId, fleet: &mut Fleet) -> Vec<Registration> {
        let (radius, credit) = (self.radius, self.pickup_credit);
        let mut out = Vec::new();
        if let Some(request) = self.open.iter_mut().find(|r| r.id() == id) {
            register_on(request, fleet, radius, credit, &mut out);
        }
        out
    }

    /// Register every eligible taxi on every open request.
    pub fn register_eligible(&mut self, fleet: &mut Fleet) -> Vec<Registration> {
        let (radius, credit) = (self.radius, self.pickup_credit);
        let mut out = Vec::new();
        for request in &mut self.open {
            register_on(request, fleet, radius, credit, &mut out);
        }
        out
    }

    // ── Resolution ────────────────────────────────────────────────────────

    /// Remove every request whose window has closed, in submission order.
    pub fn take_expired(&mut self, clock: &SimClock) -> Vec<Request> {
        let window = self.window_ms;
        let (expired, open): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.open).into_iter().partition(|r| r.age_ms(clock) >= window);
        self.open = open;
        expired
    }

    /// Resolve every expired request: select a taxi and bind the order to
    /// it, or drop the request.
    pub fn resolve_expired(
        &mut self,
        fleet:  &mut Fleet,
        grid:   &CityGrid,
        router: &dyn Router,
        clock:  &SimClock,
    ) -> Vec<Resolution> {
        self.take_expired(clock)
            .into_iter()
            .map(|mut request| {
                let order = *request.order();
                match select(&mut request, fleet, grid, router) {
                    Some(taxi_id) => {
                        if let Some(taxi) = fleet.get_mut(taxi_id) {
                            taxi.carry_request(order);
                        }
                        Resolution::Assigned { order, taxi: taxi_id }
                    }
                    None => Resolution::Dropped { order },
                }
            })
            .collect()
    }
}

fn register_on(request: &mut Request, fleet: &mut Fleet, radius: u32, credit: u32, out: &mut Vec<Registration>) {
    for taxi in fleet.iter_mut() {
        if request.is_eligible(taxi, radius) && request.register(taxi, credit) {
            out.push(Registration { request: request.id(), taxi: taxi.id() });
        }
    }
}

/// Discard candidates that left WAIT, then pick the best remaining one.
///
/// The discarded candidates stay discarded; the request keeps only the
/// waiting ones.
pub fn select(request: &mut Request, fleet: &Fleet, grid: &CityGrid, router: &dyn Router) -> Option<TaxiId> {
    request.retain_candidates(|id| fleet.get(id).is_some_and(|t| t.is_waiting()));

    let start = request.start();
    let mut ranked: Vec<(TaxiId, u32, usize)> = request
        .candidates()
        .iter()
        .filter_map(|&id| fleet.get(id))
        .map(|t| {
            let distance = t.distance_to(start, grid, router).unwrap_or(usize::MAX);
            (t.id(), t.credit(), distance)
        })
        .collect();

    // Stable: equal keys keep registration order.
    ranked.sort_by_key(|&(_, credit, distance)| (Reverse(credit), distance));
    ranked.first().map(|&(id, _, _)| id)
}
