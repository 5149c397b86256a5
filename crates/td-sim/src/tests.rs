//! Integration tests for td-sim.

use std::sync::Arc;

use td_core::{DispatchConfig, Intersection, RequestId, RoadView, SimClock, SimRng, TaxiId, Tick};
use td_fleet::{FleetError, RideOrder, TaxiStatus};
use td_grid::{CityGrid, CityGridBuilder, LightMap, LightPhase, RoadClass};

use crate::{DispatchObserver, NoopObserver, SimError, TickSummary, World, WorldBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(grid_size: usize, taxis: usize, vips: usize) -> DispatchConfig {
    DispatchConfig {
        grid_size,
        taxi_count: taxis,
        vip_count: vips,
        ..DispatchConfig::default()
    }
}

fn open_grid(n: usize) -> CityGrid {
    CityGridBuilder::new(n).fill(RoadClass::Both).build()
}

fn at(x: i32, y: i32) -> Intersection {
    Intersection::new(x, y)
}

fn world(config: DispatchConfig, grid: CityGrid, positions: &[(i32, i32)]) -> World {
    let n = grid.size();
    WorldBuilder::new(config, grid, LightMap::unlit(n))
        .initial_positions(positions.iter().map(|&(x, y)| at(x, y)).collect())
        .build()
        .unwrap()
}

/// 3 × 3 town where only column 0 is a (north-south) road.
fn column_grid() -> CityGrid {
    CityGridBuilder::new(3)
        .fill(RoadClass::None)
        .set(at(0, 0), RoadClass::NorthSouth)
        .set(at(1, 0), RoadClass::NorthSouth)
        .set(at(2, 0), RoadClass::NorthSouth)
        .build()
}

#[derive(Default)]
struct Recorder {
    assigned:  Vec<(RequestId, TaxiId, Tick)>,
    dropped:   Vec<(RequestId, Tick)>,
    completed: Vec<(RequestId, TaxiId, u32)>,
    summaries: Vec<TickSummary>,
}

impl DispatchObserver for Recorder {
    fn on_assigned(&mut self, order: &RideOrder, taxi: TaxiId, clock: &SimClock) {
        self.assigned.push((order.id, taxi, clock.current_tick));
    }

    fn on_dropped(&mut self, order: &RideOrder, clock: &SimClock) {
        self.dropped.push((order.id, clock.current_tick));
    }

    fn on_completed(&mut self, order: &RideOrder, taxi: TaxiId, credit: u32, _clock: &SimClock) {
        self.completed.push((order.id, taxi, credit));
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
    }
}

// ── WorldBuilder validation ───────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_random_fleet() {
        let config = test_config(10, 20, 5);
        let w = WorldBuilder::new(config, open_grid(10), LightMap::unlit(10)).build().unwrap();
        let guard = w.lock().unwrap();
        assert_eq!(guard.fleet.len(), 20);
        assert!(guard.fleet.iter().all(|t| t.position().is_within(10)));
        assert_eq!(guard.city.clock.current_tick, Tick::ZERO);
        drop(guard);
        assert_eq!(w.trip_logs.iter().filter(|l| l.is_some()).count(), 5);
    }

    #[test]
    fn grid_size_mismatch_errors() {
        let result = WorldBuilder::new(test_config(5, 1, 0), open_grid(4), LightMap::unlit(5)).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn light_size_mismatch_errors() {
        let result = WorldBuilder::new(test_config(5, 1, 0), open_grid(5), LightMap::unlit(3)).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn position_count_mismatch_errors() {
        let result = WorldBuilder::new(test_config(5, 3, 0), open_grid(5), LightMap::unlit(5))
            .initial_positions(vec![at(0, 0)])
            .build();
        assert!(matches!(result, Err(SimError::CountMismatch { expected: 3, got: 1, .. })));
    }

    #[test]
    fn invalid_config_errors() {
        let result = WorldBuilder::new(test_config(5, 2, 3), open_grid(5), LightMap::unlit(5)).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn off_grid_position_errors() {
        let result = WorldBuilder::new(test_config(5, 1, 0), open_grid(5), LightMap::unlit(5))
            .initial_positions(vec![at(5, 0)])
            .build();
        assert!(matches!(result, Err(SimError::Fleet(FleetError::OffGrid(_)))));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn clock_advances_once_per_step() {
        let w = world(test_config(3, 1, 0), open_grid(3), &[(1, 1)]);
        let summary = w.step(&mut NoopObserver).unwrap();
        assert_eq!(summary.tick, Tick(1));
        assert_eq!(summary.sim_time_ms, 100);
        w.run_ticks(9, &mut NoopObserver).unwrap();
        assert_eq!(w.clock().unwrap().elapsed_ms(), 1_000);
    }

    #[test]
    fn lights_toggle_every_third_tick() {
        let config = test_config(3, 1, 0);
        let lights = LightMap::unlit(3).with_phase(at(1, 1), LightPhase::NsPriority);
        let w = WorldBuilder::new(config, open_grid(3), lights)
            .initial_positions(vec![at(0, 0)])
            .build()
            .unwrap();

        w.run_ticks(2, &mut NoopObserver).unwrap();
        assert_eq!(w.lock().unwrap().city.lights.phase_at(at(1, 1)), LightPhase::NsPriority);
        w.step(&mut NoopObserver).unwrap();
        assert_eq!(w.lock().unwrap().city.lights.phase_at(at(1, 1)), LightPhase::EwPriority);
        w.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(w.lock().unwrap().city.lights.phase_at(at(1, 1)), LightPhase::NsPriority);
        assert_eq!(w.lock().unwrap().city.lights.phase_at(at(0, 0)), LightPhase::None);
    }

    #[test]
    fn flow_counts_standard_taxis_only() {
        let w = world(test_config(5, 2, 1), open_grid(5), &[(2, 2), (2, 2)]);
        let summary = w.step(&mut NoopObserver).unwrap();
        assert_eq!(summary.moved, 2);

        let guard = w.lock().unwrap();
        let grid = &guard.city.grid;
        let mut total = 0;
        for x in 0..5 {
            for y in 0..5 {
                total += grid.flow(at(x, y), td_core::Direction::Down);
                total += grid.flow(at(x, y), td_core::Direction::Right);
            }
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn boxed_in_taxi_idles() {
        let grid = CityGridBuilder::new(3).fill(RoadClass::None).build();
        let w = world(test_config(3, 1, 0), grid, &[(1, 1)]);
        let summary = w.step(&mut NoopObserver).unwrap();
        assert_eq!(summary.moved, 0);
        assert_eq!(w.describe_taxi(1).unwrap().unwrap().position, at(1, 1));
    }
}

// ── Dispatch end to end ───────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn small_city_ride_completes() {
        let w = world(test_config(3, 1, 0), open_grid(3), &[(0, 0)]);
        let id = w.submit_request(2, 2, 0, 0).unwrap();
        assert_eq!(id, RequestId(1));
        // Registered at submission.
        assert_eq!(w.describe_taxi(1).unwrap().unwrap().credit, 1);

        let mut rec = Recorder::default();
        w.run_ticks(29, &mut rec).unwrap();
        assert!(rec.assigned.is_empty());
        assert_eq!(rec.summaries.last().unwrap().open_requests, 1);

        w.step(&mut rec).unwrap();
        assert_eq!(rec.assigned, vec![(id, TaxiId(1), Tick(30))]);
        assert_eq!(rec.summaries.last().unwrap().open_requests, 0);

        w.run_ticks(30, &mut rec).unwrap();
        assert_eq!(rec.completed, vec![(id, TaxiId(1), 4)]);
        let snap = w.describe_taxi(1).unwrap().unwrap();
        assert_eq!(snap.credit, 4);
        assert_ne!(snap.status, TaxiStatus::Work);
        assert!(rec.dropped.is_empty());
    }

    #[test]
    fn request_without_candidates_is_dropped() {
        let grid = CityGridBuilder::new(5).fill(RoadClass::None).build();
        let w = world(test_config(5, 1, 0), grid, &[(0, 0)]);
        let id = w.submit_request(4, 4, 0, 4).unwrap();

        let mut rec = Recorder::default();
        w.run_ticks(30, &mut rec).unwrap();
        assert_eq!(rec.dropped, vec![(id, Tick(30))]);
        assert!(rec.assigned.is_empty());
        assert_eq!(rec.summaries[29].dropped, 1);
        assert_eq!(w.describe_taxi(1).unwrap().unwrap().credit, 0);
        assert!(w.lock().unwrap().requests.is_empty());
    }

    #[test]
    fn invalid_request_rejected() {
        let w = world(test_config(3, 1, 0), open_grid(3), &[(0, 0)]);
        assert!(matches!(w.submit_request(1, 1, 1, 1), Err(SimError::Dispatch(_))));
        assert!(matches!(w.submit_request(0, 0, 3, 0), Err(SimError::Dispatch(_))));
        assert!(w.lock().unwrap().requests.is_empty());
    }

    #[test]
    fn priority_trip_is_recorded() {
        let w = world(test_config(3, 1, 1), column_grid(), &[(0, 0)]);
        w.submit_request(0, 0, 2, 0).unwrap();
        assert_eq!(w.trip_count(1).unwrap(), 0);

        let mut rec = Recorder::default();
        w.run_ticks(60, &mut rec).unwrap();
        assert_eq!(rec.completed.len(), 1);
        assert_eq!(w.trip_count(1).unwrap(), 1);

        let mut cursor = w.trip_path(1, 0).unwrap();
        let labels: Vec<String> = cursor.by_ref().collect();
        assert_eq!(labels, ["(0,0)", "(1,0)", "(2,0)"]);
        assert!(!cursor.has_next());
        assert_eq!(cursor.previous().as_deref(), Some("(2,0)"));
    }
}

// ── Operator ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod operator_tests {
    use super::*;

    fn edit_world() -> World {
        let grid = CityGridBuilder::new(3).fill(RoadClass::Both).set(at(1, 1), RoadClass::EastWest).build();
        world(test_config(3, 1, 0), grid, &[(0, 0)])
    }

    fn class_at(w: &World, x: i32, y: i32, view: RoadView) -> RoadClass {
        w.lock().unwrap().city.grid.class_at(at(x, y), view)
    }

    #[test]
    fn edit_road_respects_original_class() {
        let w = edit_world();
        assert!(!w.edit_road(1, 1, 2).unwrap());
        assert_eq!(class_at(&w, 1, 1, RoadView::Current), RoadClass::EastWest);

        assert!(w.edit_road(1, 1, 0).unwrap());
        assert_eq!(class_at(&w, 1, 1, RoadView::Current), RoadClass::None);
        assert_eq!(class_at(&w, 1, 1, RoadView::Original), RoadClass::EastWest);

        assert!(w.edit_road(1, 1, 1).unwrap());
        assert_eq!(class_at(&w, 1, 1, RoadView::Current), RoadClass::EastWest);
    }

    #[test]
    fn edit_road_rejects_bad_input() {
        let w = edit_world();
        assert!(!w.edit_road(1, 1, 4).unwrap());
        assert!(!w.edit_road(3, 0, 0).unwrap());
        assert!(!w.edit_road(-1, 0, 0).unwrap());
        assert_eq!(class_at(&w, 1, 1, RoadView::Current), RoadClass::EastWest);
    }

    #[test]
    fn describe_and_trace() {
        let w = edit_world();
        let snap = w.describe_taxi(1).unwrap().unwrap();
        assert_eq!(snap.id, TaxiId(1));
        assert_eq!(snap.position, at(0, 0));
        assert_eq!(snap.status, TaxiStatus::Wait);
        assert!(w.describe_taxi(0).unwrap().is_none());
        assert!(w.describe_taxi(2).unwrap().is_none());

        w.set_trace(1, true).unwrap();
        assert!(w.lock().unwrap().fleet.lookup(1).unwrap().trace());
        assert!(matches!(w.set_trace(5, true), Err(SimError::Fleet(FleetError::NotFound(5)))));
    }

    #[test]
    fn trip_queries_check_the_taxi() {
        let w = world(test_config(3, 2, 1), open_grid(3), &[(0, 0), (2, 2)]);
        assert!(matches!(w.trip_count(0), Err(SimError::Fleet(FleetError::NotFound(0)))));
        assert!(matches!(w.trip_count(3), Err(SimError::Fleet(FleetError::NotFound(3)))));
        assert!(matches!(
            w.trip_count(2),
            Err(SimError::Fleet(FleetError::NotPriorityVehicle(TaxiId(2))))
        ));
        assert!(matches!(
            w.trip_path(1, 0),
            Err(SimError::Fleet(FleetError::NoSuchTrip { index: 0, .. }))
        ));
        assert!(matches!(
            w.trip_path(2, 0),
            Err(SimError::Fleet(FleetError::NotPriorityVehicle(_)))
        ));
    }

    #[test]
    fn poisoned_world_reports_error() {
        let w = Arc::new(world(test_config(3, 1, 0), open_grid(3), &[(0, 0)]));
        let w2 = Arc::clone(&w);
        let joined = std::thread::spawn(move || {
            let guard = w2.lock().unwrap();
            if guard.fleet.len() == 1 {
                panic!("tick failed");
            }
        })
        .join();
        assert!(joined.is_err());
        assert!(matches!(w.clock(), Err(SimError::Poisoned)));
        assert!(matches!(w.step(&mut NoopObserver), Err(SimError::Poisoned)));
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use std::time::Duration;

    use super::*;
    use crate::Scheduler;

    #[test]
    fn stepper_advances_and_stops() {
        let config = DispatchConfig { tick_ms: 5, ..test_config(3, 1, 0) };
        let w = Arc::new(world(config, open_grid(3), &[(0, 0)]));
        let stepper = Scheduler::spawn(Arc::clone(&w), NoopObserver).unwrap();

        std::thread::sleep(Duration::from_millis(100));
        // Administrative calls interleave with the stepper.
        w.submit_request(2, 2, 0, 0).unwrap();
        assert!(!stepper.is_finished());
        stepper.stop().unwrap();

        let tick = w.clock().unwrap().current_tick;
        assert!(tick > Tick::ZERO);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(w.clock().unwrap().current_tick, tick);
    }

    #[test]
    fn operators_race_the_stepper() {
        let config = DispatchConfig { tick_ms: 1, ..test_config(4, 3, 1) };
        let w = Arc::new(world(config, open_grid(4), &[(0, 0), (3, 3), (1, 2)]));
        let stepper = Scheduler::spawn(Arc::clone(&w), Recorder::default()).unwrap();

        let mut submitted: Vec<RequestId> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..4u64)
                .map(|seed| {
                    let w = &w;
                    s.spawn(move || {
                        let mut rng = SimRng::new(seed);
                        let mut ids = Vec::new();
                        for _ in 0..100 {
                            let (x, y) = (rng.gen_range(0..4), rng.gen_range(0..4));
                            match rng.gen_range(0..4u32) {
                                0 => {
                                    if let Ok(id) = w.submit_request(x, y, 3 - x, (y + 1) % 4) {
                                        ids.push(id);
                                    }
                                }
                                1 => {
                                    w.edit_road(x, y, rng.gen_range(0..5)).unwrap();
                                }
                                2 => {
                                    w.trip_count(1).unwrap();
                                }
                                _ => {
                                    let id = rng.gen_range(1..=3);
                                    let snap = w.describe_taxi(id).unwrap().unwrap();
                                    assert_eq!(snap.id, TaxiId(id));
                                }
                            }
                        }
                        ids
                    })
                })
                .collect();
            workers.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        let rec = stepper.stop().unwrap();
        let guard = w.lock().unwrap();

        // Every tick ran exactly once, in order.
        let ticks = guard.city.clock.current_tick.0;
        assert!(ticks > 0);
        assert_eq!(rec.summaries.len() as u64, ticks);
        assert!(rec.summaries.iter().enumerate().all(|(i, s)| s.tick == Tick(i as u64 + 1)));

        // Request ids were handed out once each, with no gaps.
        submitted.sort();
        assert!(submitted.iter().enumerate().all(|(i, id)| *id == RequestId(i as u64 + 1)));

        // No request was both assigned and dropped, or resolved twice.
        let mut resolved: Vec<RequestId> =
            rec.assigned.iter().map(|a| a.0).chain(rec.dropped.iter().map(|d| d.0)).collect();
        resolved.sort();
        let resolved_len = resolved.len();
        resolved.dedup();
        assert_eq!(resolved.len(), resolved_len);
        assert!(resolved.iter().all(|id| submitted.binary_search(id).is_ok()));

        assert!(guard.fleet.iter().all(|t| t.position().is_within(4)));
        for x in 0..4 {
            for y in 0..4 {
                let original = guard.city.grid.class_at(at(x, y), RoadView::Original);
                assert!(original.admits(guard.city.grid.class_at(at(x, y), RoadView::Current)));
            }
        }
    }
}
