//! The city grid: road classes and per-segment flow counters.
//!
//! # Data layout
//!
//! Every per-intersection array is row-major, `size * size` long, and
//! indexed with [`Intersection::index`].  Two classes are kept per cell:
//!
//! - `original` — fixed at load time, never changes;
//! - `current`  — what standard taxis drive on; always admitted by
//!   `original` (see [`RoadClass::admits`]).
//!
//! Two flow counters are kept per cell, one for the segment leaving it
//! southwards and one for the segment leaving it eastwards.  A counter holds
//! [`FLOW_BLOCKED`] when the current class does not carry that segment.

use td_core::{Direction, Intersection, RoadView};

use crate::{GridError, GridResult, RoadClass};

/// Flow value of a segment that does not exist (or lies off the grid).
pub const FLOW_BLOCKED: u32 = u32::MAX;

// ── CityGrid ──────────────────────────────────────────────────────────────────

/// Road classes and traffic flow of the whole city.
///
/// Do not construct directly; use [`CityGridBuilder`] or
/// [`load_roads`](crate::load_roads).
#[derive(Clone, Debug)]
pub struct CityGrid {
    size:       usize,
    original:   Vec<RoadClass>,
    current:    Vec<RoadClass>,
    south_flow: Vec<u32>,
    east_flow:  Vec<u32>,
}

impl CityGrid {
    fn from_classes(size: usize, classes: Vec<RoadClass>) -> Self {
        let cells = classes.len();
        let mut grid = Self {
            size,
            original:   classes.clone(),
            current:    classes,
            south_flow: vec![FLOW_BLOCKED; cells],
            east_flow:  vec![FLOW_BLOCKED; cells],
        };
        grid.reset_flow();
        grid
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of intersections (N²).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn contains(&self, at: Intersection) -> bool {
        at.is_within(self.size)
    }

    // ── Road classes ──────────────────────────────────────────────────────

    /// Class of `at` as seen through `view`.  Off-grid cells are `None`.
    pub fn class_at(&self, at: Intersection, view: RoadView) -> RoadClass {
        if !self.contains(at) {
            return RoadClass::None;
        }
        let i = at.index(self.size);
        match view {
            RoadView::Current  => self.current[i],
            RoadView::Original => self.original[i],
        }
    }

    /// `true` iff `to` is one unit from `from` and the owning intersection's
    /// class (through `view`) carries that axis.
    ///
    /// The owner is `from` for RIGHT/DOWN moves and `to` for LEFT/UP moves.
    pub fn can_traverse(&self, from: Intersection, to: Intersection, view: RoadView) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        let Some(dir) = from.direction_to(to) else {
            return false;
        };
        let owner = match dir {
            Direction::Right | Direction::Down => from,
            Direction::Left | Direction::Up    => to,
        };
        let class = self.class_at(owner, view);
        if dir.is_vertical() {
            class.carries_north_south()
        } else {
            class.carries_east_west()
        }
    }

    /// Restrict (or restore) the current class of `at`.
    ///
    /// Rejected without mutation if `at` is off the grid or `class` is not
    /// admitted by the intersection's original class.  Setting a cell back to
    /// its original class always succeeds unless that class is `None`.
    pub fn set_road_class(&mut self, at: Intersection, class: RoadClass) -> GridResult<()> {
        if !self.contains(at) {
            return Err(GridError::OutOfRange(at));
        }
        let i = at.index(self.size);
        if !self.original[i].edit_targets().contains(&class) {
            return Err(GridError::RoadEditRejected { at, class });
        }
        self.current[i] = class;
        Ok(())
    }

    // ── Flow ──────────────────────────────────────────────────────────────

    /// Reseed every counter: `0` where the current class carries the
    /// segment, [`FLOW_BLOCKED`] elsewhere.
    pub fn reset_flow(&mut self) {
        for (i, class) in self.current.iter().enumerate() {
            self.east_flow[i]  = if class.carries_east_west()   { 0 } else { FLOW_BLOCKED };
            self.south_flow[i] = if class.carries_north_south() { 0 } else { FLOW_BLOCKED };
        }
    }

    /// Count one traversal of the segment a taxi at `position` just used
    /// when it arrived moving `direction`.
    ///
    /// Arriving UP or LEFT means the segment is owned by `position` itself;
    /// arriving DOWN or RIGHT means it is owned by the cell behind it, which
    /// does not exist on row / column 0.
    pub fn record_movement(&mut self, position: Intersection, direction: Option<Direction>) {
        let Some(direction) = direction else {
            return;
        };
        if !self.contains(position) {
            return;
        }
        let (counters, owner) = match direction {
            Direction::Up    => (&mut self.south_flow, Some(position)),
            Direction::Left  => (&mut self.east_flow, Some(position)),
            Direction::Down  => (&mut self.south_flow, (position.x > 0).then(|| position.step(Direction::Up))),
            Direction::Right => (&mut self.east_flow, (position.y > 0).then(|| position.step(Direction::Left))),
        };
        if let Some(owner) = owner {
            let c = &mut counters[owner.index(self.size)];
            *c = c.saturating_add(1);
        }
    }

    /// Flow on the segment adjacent to `at` in `direction`.
    ///
    /// Returns [`FLOW_BLOCKED`] when that segment has no owner on the grid.
    pub fn flow(&self, at: Intersection, direction: Direction) -> u32 {
        if !self.contains(at) {
            return FLOW_BLOCKED;
        }
        let owner = match direction {
            Direction::Down | Direction::Right => at,
            Direction::Up if at.x > 0          => at.step(Direction::Up),
            Direction::Left if at.y > 0        => at.step(Direction::Left),
            Direction::Up | Direction::Left    => return FLOW_BLOCKED,
        };
        let i = owner.index(self.size);
        if direction.is_vertical() {
            self.south_flow[i]
        } else {
            self.east_flow[i]
        }
    }
}

// ── CityGridBuilder ───────────────────────────────────────────────────────────

/// Construct a [`CityGrid`] cell by cell, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use td_core::Intersection;
/// use td_grid::{CityGridBuilder, RoadClass};
///
/// let grid = CityGridBuilder::new(3)
///     .fill(RoadClass::Both)
///     .set(Intersection::new(1, 1), RoadClass::None)
///     .build();
/// assert_eq!(grid.cell_count(), 9);
/// ```
pub struct CityGridBuilder {
    size:    usize,
    classes: Vec<RoadClass>,
}

impl CityGridBuilder {
    /// An `size × size` grid with every class `None`.
    pub fn new(size: usize) -> Self {
        Self { size, classes: vec![RoadClass::None; size * size] }
    }

    /// Set every intersection to `class`.
    pub fn fill(mut self, class: RoadClass) -> Self {
        self.classes.fill(class);
        self
    }

    /// Set one intersection.  Off-grid coordinates are ignored.
    pub fn set(mut self, at: Intersection, class: RoadClass) -> Self {
        if at.is_within(self.size) {
            self.classes[at.index(self.size)] = class;
        }
        self
    }

    /// Set a whole row from a slice of codes; used by the text loader.
    pub(crate) fn set_row(&mut self, row: usize, classes: &[RoadClass]) {
        let start = row * self.size;
        self.classes[start..start + classes.len()].copy_from_slice(classes);
    }

    /// Consume the builder.  The loaded classes become the original classes.
    pub fn build(self) -> CityGrid {
        CityGrid::from_classes(self.size, self.classes)
    }
}
