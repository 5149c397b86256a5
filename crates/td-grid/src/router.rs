//! Routing trait and the default flow-aware breadth-first router.
//!
//! # Pluggability
//!
//! Taxis call routing via the [`Router`] trait, so a world can be built with
//! a different search (A*, precomputed tables) without touching the fleet.
//!
//! # Tie-breaking
//!
//! Every segment costs one step.  Among shortest routes the one whose first
//! segment carried the least traffic during the last tick wins; equal first
//! flows keep the route found first.  Expansion order is
//! [`Direction::ALL`], so results are deterministic for a given grid state.

use std::collections::VecDeque;

use td_core::{Direction, Intersection, RoadView};

use crate::grid::CityGrid;
use crate::{GridError, GridResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: unit moves from source to destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub directions: Vec<Direction>,
}

impl Route {
    /// Number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// The move to make next, if any.
    #[inline]
    pub fn first(&self) -> Option<Direction> {
        self.directions.first().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the world shares one router between
/// the stepper and administrative callers.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to` over the roads visible through
    /// `view`.
    ///
    /// `from == to` is an empty route, not an error.  An unreachable
    /// destination is [`GridError::NoRoute`].
    fn route(
        &self,
        grid: &CityGrid,
        from: Intersection,
        to: Intersection,
        view: RoadView,
    ) -> GridResult<Route>;
}

// ── FlowBfsRouter ─────────────────────────────────────────────────────────────

/// Breadth-first search over [`CityGrid::can_traverse`] with first-edge flow
/// tie-breaking.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowBfsRouter;

impl Router for FlowBfsRouter {
    fn route(
        &self,
        grid: &CityGrid,
        from: Intersection,
        to: Intersection,
        view: RoadView,
    ) -> GridResult<Route> {
        bfs(grid, from, to, view)
    }
}

// ── BFS internals ─────────────────────────────────────────────────────────────

/// One reached intersection.  `parent` indexes the arena.
struct Visit {
    at:     Intersection,
    parent: Option<usize>,
    via:    Option<Direction>,
    depth:  usize,
}

fn bfs(grid: &CityGrid, from: Intersection, to: Intersection, view: RoadView) -> GridResult<Route> {
    if !grid.contains(from) {
        return Err(GridError::OutOfRange(from));
    }
    if !grid.contains(to) {
        return Err(GridError::OutOfRange(to));
    }
    if from == to {
        return Ok(Route::default());
    }

    let n = grid.size();
    let mut arena: Vec<Visit> = Vec::with_capacity(grid.cell_count());
    let mut visited = vec![false; grid.cell_count()];
    let mut frontier: VecDeque<usize> = VecDeque::with_capacity(grid.cell_count());

    arena.push(Visit { at: from, parent: None, via: None, depth: 0 });
    visited[from.index(n)] = true;
    frontier.push_back(0);

    let mut best: Option<Vec<Direction>> = None;

    while let Some(idx) = frontier.pop_front() {
        let (at, depth) = (arena[idx].at, arena[idx].depth);

        // Anything found from here is one step longer than `depth`.
        if best.as_ref().is_some_and(|b| depth + 1 > b.len()) {
            break;
        }

        for dir in Direction::ALL {
            let next = at.step(dir);
            if !grid.contains(next) || !grid.can_traverse(at, next, view) {
                continue;
            }

            if next == to {
                let candidate = reconstruct(&arena, idx, dir);
                let better = match &best {
                    None => true,
                    Some(b) => first_flow(grid, from, &candidate) < first_flow(grid, from, b),
                };
                if better {
                    best = Some(candidate);
                }
                continue;
            }

            let slot = next.index(n);
            if visited[slot] {
                continue;
            }
            visited[slot] = true;
            arena.push(Visit { at: next, parent: Some(idx), via: Some(dir), depth: depth + 1 });
            frontier.push_back(arena.len() - 1);
        }
    }

    best.map(|directions| Route { directions })
        .ok_or(GridError::NoRoute { from, to })
}

#[inline]
fn first_flow(grid: &CityGrid, from: Intersection, path: &[Direction]) -> u32 {
    path.first().map_or(u32::MAX, |&d| grid.flow(from, d))
}

/// Walk back-pointers from `last` and append the final move.
fn reconstruct(arena: &[Visit], last: usize, final_dir: Direction) -> Vec<Direction> {
    let mut dirs = vec![final_dir];
    let mut cur = Some(last);
    while let Some(i) = cur {
        if let Some(d) = arena[i].via {
            dirs.push(d);
        }
        cur = arena[i].parent;
    }
    dirs.reverse();
    dirs
}
