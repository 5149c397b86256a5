//! city — taxi dispatch over an 80 × 80 street grid.
//!
//! Loads `map.txt` and `light.txt` from the data directory (first argument,
//! default `apps/city/data`), falling back to a synthetic street grid when
//! they are absent.  An optional `config.json` there overrides any
//! `DispatchConfig` field.  The world then runs in real time for
//! `RUN_SECS` while a few dispatcher threads submit random rides.
//!
//! `RUST_LOG=info` shows assignments and completions, `debug` adds
//! registrations, `trace` adds per-tick summaries.

mod layout;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use td_core::{DispatchConfig, Intersection, RoadView, SimClock, SimRng, TaxiId};
use td_dispatch::Registration;
use td_fleet::RideOrder;
use td_grid::{CityGrid, LightMap, RoadClass, load_layout_files};
use td_output::{CsvEventObserver, CsvEventWriter};
use td_sim::{DispatchObserver, LogObserver, Scheduler, TickSummary, World, WorldBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_DATA_DIR:   &str = "apps/city/data";
const OUTPUT_DIR:         &str = "output/city";
const RUN_SECS:           u64  = 30;
const DISPATCHERS:        u64  = 2;
const REQUEST_EVERY_MS:   u64  = 400;
const TRACED_TAXI:        u32  = 1;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs every event, exports it to CSV, and keeps a few totals.
struct CityObserver {
    log:       LogObserver,
    csv:       CsvEventObserver,
    assigned:  usize,
    dropped:   usize,
    completed: usize,
    ticks:     usize,
}

impl CityObserver {
    fn new(csv: CsvEventObserver) -> Self {
        Self { log: LogObserver, csv, assigned: 0, dropped: 0, completed: 0, ticks: 0 }
    }
}

impl DispatchObserver for CityObserver {
    fn on_registered(&mut self, registration: &Registration, clock: &SimClock) {
        self.log.on_registered(registration, clock);
    }

    fn on_assigned(&mut self, order: &RideOrder, taxi: TaxiId, clock: &SimClock) {
        self.assigned += 1;
        self.log.on_assigned(order, taxi, clock);
        self.csv.on_assigned(order, taxi, clock);
    }

    fn on_dropped(&mut self, order: &RideOrder, clock: &SimClock) {
        self.dropped += 1;
        self.log.on_dropped(order, clock);
        self.csv.on_dropped(order, clock);
    }

    fn on_completed(&mut self, order: &RideOrder, taxi: TaxiId, credit: u32, clock: &SimClock) {
        self.completed += 1;
        self.log.on_completed(order, taxi, credit, clock);
        self.csv.on_completed(order, taxi, credit, clock);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.ticks += 1;
        self.log.on_tick_end(summary);
        self.csv.on_tick_end(summary);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config(dir: &Path) -> Result<DispatchConfig> {
    let path = dir.join("config.json");
    if !path.exists() {
        return Ok(DispatchConfig::default());
    }
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn load_layout(dir: &Path, size: usize) -> Result<(CityGrid, LightMap)> {
    let (map, light) = (dir.join("map.txt"), dir.join("light.txt"));
    if map.exists() && light.exists() {
        return Ok(load_layout_files(&map, &light, size)?);
    }
    log::info!("no layout in {}, using a synthetic {size}x{size} street grid", dir.display());
    std::fs::write(Path::new(OUTPUT_DIR).join("map.txt"), layout::map_text(size))?;
    std::fs::write(Path::new(OUTPUT_DIR).join("light.txt"), layout::light_text(size))?;
    Ok(layout::synthesize(size)?)
}

/// Every road intersection of the grid.
fn road_cells(grid: &CityGrid) -> Vec<Intersection> {
    let n = grid.size() as i32;
    (0..n)
        .flat_map(|x| (0..n).map(move |y| Intersection::new(x, y)))
        .filter(|&at| grid.class_at(at, RoadView::Current) != RoadClass::None)
        .collect()
}

/// Start every taxi on a random road, never inside a block.
fn road_positions(cells: &[Intersection], count: usize, seed: u64) -> Vec<Intersection> {
    let mut rng = SimRng::new(seed);
    (0..count).map(|_| cells[rng.gen_range(0..cells.len())]).collect()
}

// ── Dispatchers ───────────────────────────────────────────────────────────────

/// Submit random rides between road cells until `deadline`.
fn dispatch(world: &World, cells: &[Intersection], seed: u64, deadline: Instant) -> usize {
    let mut rng = SimRng::new(seed);
    let mut submitted = 0;
    while Instant::now() < deadline {
        let start = cells[rng.gen_range(0..cells.len())];
        let end = cells[rng.gen_range(0..cells.len())];
        match world.submit_request(start.x, start.y, end.x, end.y) {
            Ok(_) => submitted += 1,
            Err(e) => log::debug!("dispatcher skipped a ride: {e}"),
        }
        thread::sleep(Duration::from_millis(REQUEST_EVERY_MS));
    }
    submitted
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir: PathBuf = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_DATA_DIR.into()).into();
    std::fs::create_dir_all(OUTPUT_DIR)?;

    // 1. Configuration and layout.
    let config = load_config(&data_dir)?;
    let (grid, lights) = load_layout(&data_dir, config.grid_size)?;
    let cells = road_cells(&grid);
    anyhow::ensure!(!cells.is_empty(), "the layout has no roads");

    println!("=== city — taxi dispatch ===");
    println!(
        "Grid: {0}x{0} ({1} road cells)  |  Taxis: {2} ({3} priority)  |  Seed: {4}",
        config.grid_size,
        cells.len(),
        config.taxi_count,
        config.vip_count,
        config.seed
    );
    println!();

    // 2. World.
    let positions = road_positions(&cells, config.taxi_count, config.seed);
    let seed = config.seed;
    let vip_count = config.vip_count as u32;
    let world = Arc::new(WorldBuilder::new(config, grid, lights).initial_positions(positions).build()?);
    if world.describe_taxi(TRACED_TAXI)?.is_some() {
        world.set_trace(TRACED_TAXI, true)?;
    }

    // 3. Stepper.
    let writer = CsvEventWriter::new(Path::new(OUTPUT_DIR))?;
    let stepper = Scheduler::spawn(Arc::clone(&world), CityObserver::new(CsvEventObserver::new(writer)))?;

    // 4. Dispatchers and one road closure half way through.
    let t0 = Instant::now();
    let deadline = t0 + Duration::from_secs(RUN_SECS);
    let submitted: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..DISPATCHERS)
            .map(|i| {
                let (world, cells) = (&world, &cells);
                s.spawn(move || dispatch(world, cells, seed.wrapping_add(i + 1), deadline))
            })
            .collect();

        thread::sleep(Duration::from_secs(RUN_SECS / 2));
        let closed = cells[cells.len() / 2];
        match world.edit_road(closed.x, closed.y, RoadClass::None.code()) {
            Ok(true) => println!("Closed the road at {closed}"),
            Ok(false) => println!("Road at {closed} could not be closed"),
            Err(e) => log::error!("road edit failed: {e}"),
        }
        if let Err(e) = world.set_trace(TRACED_TAXI, false) {
            log::debug!("trace not cleared: {e}");
        }

        handles.into_iter().map(|h| h.join().unwrap_or(0)).sum()
    });

    // 5. Stop and flush.
    let mut obs = stepper.stop()?;
    obs.csv.finish()?;
    let now = world.clock()?;

    println!();
    println!("Ran {} ticks ({now} simulated) in {:.1} s", obs.ticks, t0.elapsed().as_secs_f64());
    println!("  requests submitted : {submitted}");
    println!("  assigned           : {}", obs.assigned);
    println!("  dropped            : {}", obs.dropped);
    println!("  completed          : {}", obs.completed);
    println!("  events written to  : {OUTPUT_DIR}");
    println!();

    // 6. Priority-vehicle history.
    println!("{:<8} {:<8} {:<8} {}", "Taxi", "Credit", "Trips", "Last trip");
    println!("{}", "-".repeat(60));
    for id in 1..=vip_count {
        let trips = world.trip_count(id)?;
        let credit = world.describe_taxi(id)?.map_or(0, |s| s.credit);
        let last = match trips.checked_sub(1) {
            Some(i) => world.trip_path(id, i)?.collect::<Vec<_>>().join(" "),
            None => "-".into(),
        };
        println!("{id:<8} {credit:<8} {trips:<8} {last}");
    }

    Ok(())
}
