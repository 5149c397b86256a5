//! One open passenger request and its candidate list.

use rustc_hash::FxHashSet;

use td_core::{Intersection, RequestId, SimClock, TaxiId};
use td_fleet::{RideOrder, Taxi};

/// A request still collecting candidates.
///
/// Candidates are kept twice: a `Vec` in registration order, which is the
/// final tie-break of selection, and a set for O(1) membership checks.
#[derive(Debug, Clone)]
pub struct Request {
    order:      RideOrder,
    candidates: Vec<TaxiId>,
    members:    FxHashSet<TaxiId>,
}

impl Request {
    pub(crate) fn new(order: RideOrder) -> Self {
        Self { order, candidates: Vec::new(), members: FxHashSet::default() }
    }

    #[inline]
    pub fn id(&self) -> RequestId {
        self.order.id
    }

    #[inline]
    pub fn order(&self) -> &RideOrder {
        &self.order
    }

    #[inline]
    pub fn start(&self) -> Intersection {
        self.order.start
    }

    /// Registered taxis, oldest first.
    pub fn candidates(&self) -> &[TaxiId] {
        &self.candidates
    }

    #[inline]
    pub fn is_registered(&self, taxi: TaxiId) -> bool {
        self.members.contains(&taxi)
    }

    /// Simulated milliseconds since submission.
    pub fn age_ms(&self, clock: &SimClock) -> u64 {
        clock.current_tick.since(self.order.created_at) * u64::from(clock.tick_ms)
    }

    /// `true` iff `taxi` has not registered yet and stands within `radius`
    /// (Chebyshev) of the pickup.  Status does not matter here; busy
    /// candidates are discarded at selection.
    pub fn is_eligible(&self, taxi: &Taxi, radius: u32) -> bool {
        !self.is_registered(taxi.id()) && taxi.position().chebyshev(self.order.start) <= radius
    }

    /// Add `taxi` as a candidate and pay it `credit`.  Returns `false` if it
    /// was already registered.
    pub fn register(&mut self, taxi: &mut Taxi, credit: u32) -> bool {
        if !self.members.insert(taxi.id()) {
            return false;
        }
        self.candidates.push(taxi.id());
        taxi.add_credit(credit);
        true
    }

    /// Drop every candidate `keep` rejects, preserving order.
    pub(crate) fn retain_candidates(&mut self, mut keep: impl FnMut(TaxiId) -> bool) {
        let members = &mut self.members;
        self.candidates.retain(|&id| {
            let k = keep(id);
            if !k {
                members.remove(&id);
            }
            k
        });
    }
}
