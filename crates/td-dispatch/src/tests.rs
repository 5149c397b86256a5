//! Unit tests for td-dispatch.

#[cfg(test)]
mod helpers {
    use td_core::{DispatchConfig, Intersection, SimClock};
    use td_fleet::{Fleet, FleetBuilder};
    use td_grid::{CityGrid, CityGridBuilder, RoadClass};

    pub fn config() -> DispatchConfig {
        DispatchConfig { grid_size: 5, vip_count: 0, ..DispatchConfig::default() }
    }

    pub fn open_grid() -> CityGrid {
        CityGridBuilder::new(5).fill(RoadClass::Both).build()
    }

    pub fn fleet_at(cells: &[(i32, i32)]) -> Fleet {
        let positions = cells.iter().map(|&(x, y)| Intersection::new(x, y)).collect();
        FleetBuilder::new(&config()).positions(positions).build().unwrap()
    }

    pub fn at(x: i32, y: i32) -> Intersection {
        Intersection::new(x, y)
    }

    pub fn advance(clock: &mut SimClock, ticks: u32) {
        for _ in 0..ticks {
            clock.advance();
        }
    }
}

// ── Creation ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod create {
    use td_core::{RequestId, SimClock};

    use super::helpers::{advance, at, config};
    use crate::{DispatchError, RequestRegistry};

    #[test]
    fn rejects_bad_coordinates() {
        let mut reg = RequestRegistry::new(&config());
        let clock = SimClock::new(100);
        assert!(matches!(
            reg.create(at(1, 1), at(1, 1), &clock),
            Err(DispatchError::InvalidRequest { .. })
        ));
        assert!(reg.create(at(0, 0), at(5, 0), &clock).is_err());
        assert!(reg.create(at(-1, 0), at(1, 0), &clock).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn sequential_ids() {
        let mut reg = RequestRegistry::new(&config());
        let clock = SimClock::new(100);
        assert_eq!(reg.create(at(0, 0), at(1, 1), &clock).unwrap(), RequestId(1));
        assert_eq!(reg.create(at(0, 0), at(1, 1), &clock).unwrap(), RequestId(2));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn age_counts_ticks_since_creation() {
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        advance(&mut clock, 2);
        let id = reg.create(at(0, 0), at(1, 1), &clock).unwrap();
        assert_eq!(reg.get(id).unwrap().age_ms(&clock), 0);

        advance(&mut clock, 3);
        assert_eq!(reg.get(id).unwrap().age_ms(&clock), 300);
    }
}

// ── Registration ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod registration {
    use td_core::{SimClock, TaxiId};

    use super::helpers::{at, config, fleet_at};
    use crate::{Registration, RequestRegistry};

    #[test]
    fn radius_and_credit() {
        let mut fleet = fleet_at(&[(0, 0), (3, 3), (4, 4)]);
        let mut reg = RequestRegistry::new(&config());
        let id = reg.create(at(2, 2), at(0, 4), &SimClock::new(100)).unwrap();

        let regs = reg.register_eligible_for(id, &mut fleet);
        assert_eq!(
            regs,
            vec![
                Registration { request: id, taxi: TaxiId(1) },
                Registration { request: id, taxi: TaxiId(2) },
                Registration { request: id, taxi: TaxiId(3) },
            ]
        );
        assert_eq!(fleet.get(TaxiId(1)).unwrap().credit(), 1);

        // Nobody registers twice.
        assert!(reg.register_eligible(&mut fleet).is_empty());
        assert_eq!(fleet.get(TaxiId(1)).unwrap().credit(), 1);
    }

    #[test]
    fn out_of_radius_ignored() {
        let mut fleet = fleet_at(&[(0, 0), (4, 4)]);
        let mut reg = RequestRegistry::new(&config());
        let id = reg.create(at(0, 1), at(3, 3), &SimClock::new(100)).unwrap();

        let regs = reg.register_eligible(&mut fleet);
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].taxi, TaxiId(1));
        let request = reg.get(id).unwrap();
        assert!(request.is_registered(TaxiId(1)));
        assert!(!request.is_registered(TaxiId(2)));
        assert_eq!(fleet.get(TaxiId(2)).unwrap().credit(), 0);
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use td_core::{SimClock, TaxiId, Tick};
    use td_fleet::{RideOrder, TaxiStatus};
    use td_grid::FlowBfsRouter;

    use super::helpers::{advance, at, config, fleet_at, open_grid};
    use crate::{RequestRegistry, Resolution};

    #[test]
    fn window_is_inclusive() {
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        reg.create(at(0, 0), at(1, 1), &clock).unwrap();

        advance(&mut clock, 29);
        assert!(reg.take_expired(&clock).is_empty());
        advance(&mut clock, 1);
        assert_eq!(reg.take_expired(&clock).len(), 1);
        assert!(reg.is_empty());
    }

    #[test]
    fn no_candidate_drops_without_credit() {
        let mut fleet = fleet_at(&[(4, 4)]);
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        reg.create(at(0, 0), at(1, 1), &clock).unwrap();
        reg.register_eligible(&mut fleet);

        advance(&mut clock, 30);
        let out = reg.resolve_expired(&mut fleet, &open_grid(), &FlowBfsRouter, &clock);
        assert!(matches!(out.as_slice(), [Resolution::Dropped { .. }]));
        assert!(reg.is_empty());
        assert_eq!(fleet.get(TaxiId(1)).unwrap().credit(), 0);
        assert_eq!(fleet.get(TaxiId(1)).unwrap().status(), TaxiStatus::Wait);
    }

    #[test]
    fn credit_beats_distance() {
        // Taxi 1 is three steps away, taxi 2 one step away.
        let mut fleet = fleet_at(&[(0, 2), (1, 1)]);
        fleet.get_mut(TaxiId(1)).unwrap().add_credit(5);
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        reg.create(at(1, 0), at(4, 4), &clock).unwrap();
        reg.register_eligible(&mut fleet);

        advance(&mut clock, 30);
        let out = reg.resolve_expired(&mut fleet, &open_grid(), &FlowBfsRouter, &clock);
        assert!(matches!(out[0], Resolution::Assigned { taxi: TaxiId(1), .. }));
        assert_eq!(fleet.get(TaxiId(1)).unwrap().status(), TaxiStatus::Ready);
        assert_eq!(fleet.get(TaxiId(2)).unwrap().status(), TaxiStatus::Wait);
    }

    #[test]
    fn equal_credit_nearest_wins() {
        let mut fleet = fleet_at(&[(0, 2), (1, 1)]);
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        reg.create(at(1, 0), at(4, 4), &clock).unwrap();
        reg.register_eligible(&mut fleet);

        advance(&mut clock, 30);
        let out = reg.resolve_expired(&mut fleet, &open_grid(), &FlowBfsRouter, &clock);
        assert!(matches!(out[0], Resolution::Assigned { taxi: TaxiId(2), .. }));
    }

    #[test]
    fn full_tie_keeps_registration_order() {
        let mut fleet = fleet_at(&[(0, 1), (2, 1)]);
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        reg.create(at(1, 1), at(4, 4), &clock).unwrap();
        reg.register_eligible(&mut fleet);

        advance(&mut clock, 30);
        let out = reg.resolve_expired(&mut fleet, &open_grid(), &FlowBfsRouter, &clock);
        assert!(matches!(out[0], Resolution::Assigned { taxi: TaxiId(1), .. }));
    }

    #[test]
    fn busy_candidates_discarded() {
        let mut fleet = fleet_at(&[(0, 0), (1, 1)]);
        fleet.get_mut(TaxiId(1)).unwrap().add_credit(5);
        let mut reg = RequestRegistry::new(&config());
        let mut clock = SimClock::new(100);
        reg.create(at(1, 0), at(4, 4), &clock).unwrap();
        reg.register_eligible(&mut fleet);

        // Taxi 1 gets another job before the window closes.
        fleet.get_mut(TaxiId(1)).unwrap().carry_request(RideOrder {
            id:         td_core::RequestId(99),
            start:      at(4, 4),
            end:        at(0, 4),
            created_at: Tick::ZERO,
        });

        advance(&mut clock, 30);
        let out = reg.resolve_expired(&mut fleet, &open_grid(), &FlowBfsRouter, &clock);
        assert!(matches!(out[0], Resolution::Assigned { taxi: TaxiId(2), .. }));
    }

    #[test]
    fn small_city_assignment() {
        let config = td_core::DispatchConfig { grid_size: 3, vip_count: 0, ..td_core::DispatchConfig::default() };
        let grid = td_grid::CityGridBuilder::new(3).fill(td_grid::RoadClass::Both).build();
        let mut fleet = td_fleet::FleetBuilder::new(&config)
            .positions(vec![at(0, 0)])
            .build()
            .unwrap();
        let mut reg = RequestRegistry::new(&config);
        let mut clock = config.make_clock();
        reg.create(at(2, 2), at(0, 0), &clock).unwrap();
        assert_eq!(reg.register_eligible(&mut fleet).len(), 1);

        let taxi = fleet.get(TaxiId(1)).unwrap();
        assert_eq!(taxi.distance_to(at(2, 2), &grid, &FlowBfsRouter), Some(4));

        advance(&mut clock, 30);
        let out = reg.resolve_expired(&mut fleet, &grid, &FlowBfsRouter, &clock);
        assert!(matches!(out[0], Resolution::Assigned { taxi: TaxiId(1), .. }));
        assert_eq!(fleet.get(TaxiId(1)).unwrap().status(), TaxiStatus::Ready);
    }
}
