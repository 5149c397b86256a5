//! Fluent builder for a [`Fleet`].
//!
//! # Usage
//!
//! ```rust
//! use td_core::DispatchConfig;
//! use td_fleet::FleetBuilder;
//!
//! let config = DispatchConfig { taxi_count: 10, vip_count: 3, ..DispatchConfig::default() };
//! let fleet = FleetBuilder::new(&config).build().unwrap();
//!
//! assert_eq!(fleet.len(), 10);
//! assert_eq!(fleet.iter().filter(|t| t.is_priority()).count(), 3);
//! ```

use td_core::{DispatchConfig, Intersection, SimRng, TaxiId};

use crate::{Fleet, FleetError, FleetResult, Taxi, TaxiKind};

/// Builds taxis `1..=taxi_count`; the first `vip_count` ids are priority
/// vehicles.
///
/// Without explicit positions every taxi is placed uniformly at random on the
/// grid, drawn from the run seed so placement is reproducible.
pub struct FleetBuilder {
    grid_size: usize,
    count:     usize,
    vip_count: usize,
    seed:      u64,
    positions: Option<Vec<Intersection>>,
}

impl FleetBuilder {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            count:     config.taxi_count,
            vip_count: config.vip_count,
            seed:      config.seed,
            positions: None,
        }
    }

    /// Place taxi `i + 1` at `positions[i]`.  The fleet size becomes
    /// `positions.len()`; the priority count is capped at it.
    pub fn positions(mut self, positions: Vec<Intersection>) -> Self {
        self.count = positions.len();
        self.vip_count = self.vip_count.min(self.count);
        self.positions = Some(positions);
        self
    }

    pub fn build(self) -> FleetResult<Fleet> {
        let positions = match self.positions {
            Some(p) => {
                if let Some(&bad) = p.iter().find(|at| !at.is_within(self.grid_size)) {
                    return Err(FleetError::OffGrid(bad));
                }
                p
            }
            None => random_positions(self.count, self.grid_size, self.seed),
        };

        let taxis = positions
            .into_iter()
            .enumerate()
            .map(|(slot, at)| {
                let kind = if slot < self.vip_count { TaxiKind::Priority } else { TaxiKind::Standard };
                Taxi::new(TaxiId::from_slot(slot), kind, at, self.seed)
            })
            .collect();

        Ok(Fleet::from_taxis(taxis))
    }
}

fn random_positions(count: usize, grid_size: usize, seed: u64) -> Vec<Intersection> {
    let mut rng = SimRng::new(seed);
    let n = grid_size as i32;
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..n);
            let y = rng.gen_range(0..n);
            Intersection::new(x, y)
        })
        .collect()
}
