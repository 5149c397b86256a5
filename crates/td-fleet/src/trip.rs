//! Priority-vehicle trip history.
//!
//! A finished trip is stored as the path string `"(x,y)->(x,y)->…"`, starting
//! at the pickup and ending at the drop-off.  [`TripCursor`] walks one trip's
//! intersection labels in either direction.
//!
//! Each priority taxi owns one [`SharedTripLog`].  The world keeps a clone of
//! every handle so history queries lock only that taxi's log, never the fleet.

use std::sync::{Arc, PoisonError, RwLock};

/// Separator between intersection labels in a trip string.
pub const TRIP_SEPARATOR: &str = "->";

pub type SharedTripLog = Arc<RwLock<TripLog>>;

// ── TripLog ───────────────────────────────────────────────────────────────────

/// Ordered history of completed trips.
#[derive(Debug, Default, Clone)]
pub struct TripLog {
    trips: Vec<String>,
}

impl TripLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedTripLog {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn push(&mut self, trip: String) {
        self.trips.push(trip);
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.trips.get(index).map(String::as_str)
    }

    /// A cursor over trip `index`, positioned before its first label.
    pub fn cursor(&self, index: usize) -> Option<TripCursor> {
        self.get(index).map(TripCursor::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.trips.iter().map(String::as_str)
    }
}

/// Append to a shared log.  A poisoned log is still a valid `Vec`, so the
/// write goes through.
pub(crate) fn append(log: &SharedTripLog, trip: String) {
    log.write().unwrap_or_else(PoisonError::into_inner).push(trip);
}

// ── TripCursor ────────────────────────────────────────────────────────────────

/// Bidirectional cursor over the `"(x,y)"` labels of one trip.
///
/// The cursor sits between labels.  `next` returns the label after it and
/// moves forward; `previous` returns the label before it and moves back, so
/// alternating the two returns the same label.
///
/// ```
/// use td_fleet::TripCursor;
///
/// let mut c = TripCursor::new("(0,0)->(0,1)");
/// assert_eq!(c.next().as_deref(), Some("(0,0)"));
/// assert_eq!(c.previous().as_deref(), Some("(0,0)"));
/// assert!(!c.has_previous());
/// ```
#[derive(Debug, Clone)]
pub struct TripCursor {
    labels: Vec<String>,
    pos:    usize,
}

impl TripCursor {
    pub fn new(trip: &str) -> Self {
        let labels = trip.split(TRIP_SEPARATOR).map(str::to_owned).collect();
        Self { labels, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.pos < self.labels.len()
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.pos > 0
    }

    /// Index of the label `next` would return.
    pub fn next_index(&self) -> Option<usize> {
        self.has_next().then_some(self.pos)
    }

    /// Index of the label `previous` would return.
    pub fn previous_index(&self) -> Option<usize> {
        self.has_previous().then(|| self.pos - 1)
    }

    pub fn previous(&mut self) -> Option<String> {
        if !self.has_previous() {
            return None;
        }
        self.pos -= 1;
        Some(self.labels[self.pos].clone())
    }
}

impl Iterator for TripCursor {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let label = self.labels.get(self.pos)?.clone();
        self.pos += 1;
        Some(label)
    }
}
