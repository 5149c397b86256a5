//! Which road classes a movement is judged against.
//!
//! Administrative edits can close roads; standard taxis see the edited
//! (current) classes while priority taxis keep driving on the classes the
//! city was loaded with.

/// The road layer consulted by traversal checks and route search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadView {
    /// Current classes, including administrative restrictions.
    #[default]
    Current,
    /// Load-time classes, ignoring restrictions.
    Original,
}

impl RoadView {
    /// The view used by a taxi of the given priority.
    #[inline]
    pub fn for_priority(priority: bool) -> Self {
        if priority { RoadView::Original } else { RoadView::Current }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadView::Current  => "current",
            RoadView::Original => "original",
        }
    }
}

impl std::fmt::Display for RoadView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
