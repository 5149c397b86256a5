//! The taxi state machine.
//!
//! # States
//!
//! ```text
//!            carry_request (not at pickup)
//!   WAIT ──────────────────────────────────► READY
//!    ▲  │                                      │ arrived at pickup
//!    │  │ idle limit                           ▼
//!    │  └──────────────► STOP ◄─────────────── ┘
//!    │                    │  ▲
//!    │  dwell, no order   │  │ arrived at drop-off
//!    └────────────────────┘  │
//!                 dwell, order held ──► WORK
//! ```
//!
//! Every movement is gated by the light at the taxi's position, using the
//! direction of its last move as the arriving direction.  A gated step leaves
//! position and status untouched.
//!
//! # Priority vehicles
//!
//! A priority taxi routes over the original road classes, is left out of
//! flow accounting by the world, and records the path of every trip it
//! completes in its [`SharedTripLog`].

use std::fmt;

use td_core::{Direction, Intersection, RoadView, SimClock, TaxiId, TaxiRng};
use td_grid::{CityGrid, Route, Router};

use crate::context::StepContext;
use crate::order::RideOrder;
use crate::snapshot::TaxiSnapshot;
use crate::trip::{self, SharedTripLog, TRIP_SEPARATOR, TripLog};

// ── Status & kind ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaxiStatus {
    /// Idle, cruising towards quiet roads.
    #[default]
    Wait,
    /// Assigned, driving to the pickup.
    Ready,
    /// Passenger on board, driving to the drop-off.
    Work,
    /// Dwelling: a break, a pickup, or a drop-off.
    Stop,
}

impl TaxiStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaxiStatus::Wait  => "WAIT",
            TaxiStatus::Ready => "READY",
            TaxiStatus::Work  => "WORK",
            TaxiStatus::Stop  => "STOP",
        }
    }
}

impl fmt::Display for TaxiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaxiKind {
    #[default]
    Standard,
    Priority,
}

impl TaxiKind {
    #[inline]
    pub fn is_priority(self) -> bool {
        self == TaxiKind::Priority
    }
}

// ── StepOutcome ───────────────────────────────────────────────────────────────

/// What one call to [`Taxi::step`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    /// No movement: dwelling, nowhere to go, or no route.
    Idle,
    /// The light forbade the wanted move.
    Blocked(Direction),
    Moved(Direction),
    /// Moved onto the drop-off; the order is finished and released.
    Completed { order: RideOrder, credit: u32 },
}

impl StepOutcome {
    pub fn moved(self) -> bool {
        matches!(self, StepOutcome::Moved(_) | StepOutcome::Completed { .. })
    }
}

// ── Trip recorder ─────────────────────────────────────────────────────────────

/// Priority-only component: the finished-trip log and the trip in progress.
#[derive(Debug)]
struct TripRecorder {
    log:     SharedTripLog,
    current: Option<String>,
}

impl TripRecorder {
    fn begin(&mut self, at: Intersection) {
        self.current = Some(at.to_string());
    }

    fn extend(&mut self, at: Intersection) {
        if let Some(path) = &mut self.current {
            path.push_str(TRIP_SEPARATOR);
            path.push_str(&at.to_string());
        }
    }

    fn finish(&mut self) {
        if let Some(path) = self.current.take() {
            trip::append(&self.log, path);
        }
    }
}

// ── Taxi ──────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Taxi {
    id:             TaxiId,
    kind:           TaxiKind,
    credit:         u32,
    position:       Intersection,
    /// Direction of the most recent move; `None` until the first move.
    last_direction: Option<Direction>,
    status:         TaxiStatus,
    /// Simulated ms spent in WAIT (towards the idle limit) or STOP.
    timer_ms:       u64,
    order:          Option<RideOrder>,
    trace:          bool,
    rng:            TaxiRng,
    trips:          Option<TripRecorder>,
}

/// Arriving direction assumed for the light check before a taxi has moved.
const INITIAL_HEADING: Direction = Direction::Up;

impl Taxi {
    /// A fresh taxi in WAIT with zero credit.  Priority taxis get an empty
    /// trip log.
    pub fn new(id: TaxiId, kind: TaxiKind, position: Intersection, global_seed: u64) -> Self {
        let trips = kind.is_priority().then(|| TripRecorder { log: TripLog::shared(), current: None });
        Self {
            id,
            kind,
            credit: 0,
            position,
            last_direction: None,
            status: TaxiStatus::Wait,
            timer_ms: 0,
            order: None,
            trace: false,
            rng: TaxiRng::new(global_seed, id),
            trips,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> TaxiId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> TaxiKind {
        self.kind
    }

    #[inline]
    pub fn is_priority(&self) -> bool {
        self.kind.is_priority()
    }

    #[inline]
    pub fn credit(&self) -> u32 {
        self.credit
    }

    #[inline]
    pub fn position(&self) -> Intersection {
        self.position
    }

    #[inline]
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    #[inline]
    pub fn status(&self) -> TaxiStatus {
        self.status
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.status == TaxiStatus::Wait
    }

    #[inline]
    pub fn order(&self) -> Option<&RideOrder> {
        self.order.as_ref()
    }

    #[inline]
    pub fn timer_ms(&self) -> u64 {
        self.timer_ms
    }

    #[inline]
    pub fn trace(&self) -> bool {
        self.trace
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    /// Handle on the trip log; `None` for standard taxis.
    pub fn trip_log(&self) -> Option<&SharedTripLog> {
        self.trips.as_ref().map(|t| &t.log)
    }

    /// Which road classes this taxi drives on.
    #[inline]
    pub fn view(&self) -> RoadView {
        RoadView::for_priority(self.is_priority())
    }

    pub fn add_credit(&mut self, amount: u32) {
        self.credit = self.credit.saturating_add(amount);
    }

    pub fn snapshot(&self, clock: &SimClock) -> TaxiSnapshot {
        TaxiSnapshot {
            id:             self.id,
            kind:           self.kind,
            status:         self.status,
            position:       self.position,
            last_direction: self.last_direction,
            credit:         self.credit,
            sim_time_ms:    clock.elapsed_ms(),
        }
    }

    /// Route length to `target` under this taxi's road view.  `None` if
    /// unreachable.
    pub fn distance_to(&self, target: Intersection, grid: &CityGrid, router: &dyn Router) -> Option<usize> {
        router.route(grid, self.position, target, self.view()).ok().map(|r| r.len())
    }

    // ── Assignment ────────────────────────────────────────────────────────

    /// Bind `order`.  The taxi dwells at once if it already stands on the
    /// pickup, otherwise it heads there.
    pub fn carry_request(&mut self, order: RideOrder) {
        self.timer_ms = 0;
        self.status = if self.position == order.start { TaxiStatus::Stop } else { TaxiStatus::Ready };
        if let Some(trips) = &mut self.trips {
            trips.begin(order.start);
        }
        self.order = Some(order);
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance the state machine by one tick.
    pub fn step(&mut self, ctx: &StepContext<'_>) -> StepOutcome {
        match self.status {
            TaxiStatus::Wait  => self.cruise(ctx),
            TaxiStatus::Ready => self.drive_to_pickup(ctx),
            TaxiStatus::Work  => self.drive_to_drop_off(ctx),
            TaxiStatus::Stop  => self.dwell(ctx),
        }
    }

    fn cruise(&mut self, ctx: &StepContext<'_>) -> StepOutcome {
        self.timer_ms += ctx.tick_ms();

        let outcome = match self.pick_cruise_direction(ctx.grid) {
            None => StepOutcome::Idle,
            Some(dir) if !self.light_allows(ctx, dir) => return StepOutcome::Blocked(dir),
            Some(dir) => {
                self.advance(dir);
                StepOutcome::Moved(dir)
            }
        };

        if self.timer_ms >= ctx.config.wait_limit_ms {
            log::debug!("{} takes a break at {}", self.id, self.position);
            self.timer_ms = 0;
            self.status = TaxiStatus::Stop;
        }
        outcome
    }

    fn drive_to_pickup(&mut self, ctx: &StepContext<'_>) -> StepOutcome {
        let Some(order) = self.order else {
            self.status = TaxiStatus::Wait;
            return StepOutcome::Idle;
        };
        let Some(route) = self.route_to(ctx, order.start) else {
            return StepOutcome::Idle;
        };
        let Some(dir) = route.first() else {
            self.status = TaxiStatus::Stop;
            return StepOutcome::Idle;
        };
        if !self.light_allows(ctx, dir) {
            return StepOutcome::Blocked(dir);
        }
        self.advance(dir);
        if route.len() == 1 {
            self.status = TaxiStatus::Stop;
        }
        StepOutcome::Moved(dir)
    }

    fn drive_to_drop_off(&mut self, ctx: &StepContext<'_>) -> StepOutcome {
        let Some(order) = self.order else {
            self.status = TaxiStatus::Wait;
            return StepOutcome::Idle;
        };
        let Some(route) = self.route_to(ctx, order.end) else {
            return StepOutcome::Idle;
        };
        let Some(dir) = route.first() else {
            return self.complete(ctx, order);
        };
        if !self.light_allows(ctx, dir) {
            return StepOutcome::Blocked(dir);
        }
        self.advance(dir);
        if let Some(trips) = &mut self.trips {
            trips.extend(self.position);
        }
        if route.len() == 1 {
            return self.complete(ctx, order);
        }
        StepOutcome::Moved(dir)
    }

    fn dwell(&mut self, ctx: &StepContext<'_>) -> StepOutcome {
        self.timer_ms += ctx.tick_ms();
        if self.timer_ms >= ctx.config.dwell_ms {
            self.timer_ms = 0;
            self.status = if self.order.is_some() { TaxiStatus::Work } else { TaxiStatus::Wait };
        }
        StepOutcome::Idle
    }

    fn complete(&mut self, ctx: &StepContext<'_>, order: RideOrder) -> StepOutcome {
        self.add_credit(ctx.config.completion_credit);
        if let Some(trips) = &mut self.trips {
            trips.finish();
        }
        self.order = None;
        self.status = TaxiStatus::Stop;
        StepOutcome::Completed { order, credit: self.credit }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn route_to(&self, ctx: &StepContext<'_>, target: Intersection) -> Option<Route> {
        match ctx.router.route(ctx.grid, self.position, target, self.view()) {
            Ok(route) => Some(route),
            Err(e) => {
                log::debug!("{} idles: {e}", self.id);
                None
            }
        }
    }

    fn light_allows(&self, ctx: &StepContext<'_>, departing: Direction) -> bool {
        let arriving = self.last_direction.unwrap_or(INITIAL_HEADING);
        ctx.lights.is_movement_allowed(self.position, arriving, departing)
    }

    fn advance(&mut self, dir: Direction) {
        self.position = self.position.step(dir);
        self.last_direction = Some(dir);
    }

    fn can_go(&self, grid: &CityGrid, dir: Direction) -> bool {
        grid.can_traverse(self.position, self.position.step(dir), self.view())
    }

    /// Draw a direction among the least-used segments around the taxi.
    ///
    /// The minimal-flow ties are drawn without replacement until one is
    /// traversable.  If none is, any traversable direction is drawn instead;
    /// `None` means the taxi is boxed in.
    fn pick_cruise_direction(&mut self, grid: &CityGrid) -> Option<Direction> {
        let flows = Direction::ALL.map(|d| grid.flow(self.position, d));
        let min = flows.iter().copied().min()?;
        let mut ties: Vec<Direction> = Direction::ALL
            .into_iter()
            .zip(flows)
            .filter(|&(_, f)| f == min)
            .map(|(d, _)| d)
            .collect();

        while !ties.is_empty() {
            let dir = ties.swap_remove(self.rng.gen_range(0..ties.len()));
            if self.can_go(grid, dir) {
                return Some(dir);
            }
        }

        let open: Vec<Direction> = Direction::ALL.into_iter().filter(|&d| self.can_go(grid, d)).collect();
        self.rng.choose(&open).copied()
    }
}
