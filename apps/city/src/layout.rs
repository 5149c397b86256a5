//! Synthetic Manhattan-style layout for runs without `map.txt`/`light.txt`.
//!
//! Every 4th row is an east-west street, every 4th column a north-south
//! avenue; their crossings carry both directions and a light.  The text is
//! produced in the same digit format the loader reads, so a generated layout
//! can be saved, edited by hand and loaded back.

use std::io::Cursor;

use td_grid::{CityGrid, LightMap, RoadClass, load_lights, load_roads};

const BLOCK: usize = 4;

fn road_class(x: usize, y: usize) -> RoadClass {
    match (x.is_multiple_of(BLOCK), y.is_multiple_of(BLOCK)) {
        (true, true)   => RoadClass::Both,
        (true, false)  => RoadClass::EastWest,
        (false, true)  => RoadClass::NorthSouth,
        (false, false) => RoadClass::None,
    }
}

/// `map.txt` contents: `size` lines of `size` road-class digits.
pub fn map_text(size: usize) -> String {
    grid_text(size, |x, y| char::from(b'0' + road_class(x, y).code()))
}

/// `light.txt` contents: a light on every crossing.
pub fn light_text(size: usize) -> String {
    grid_text(size, |x, y| if road_class(x, y) == RoadClass::Both { '1' } else { '0' })
}

fn grid_text(size: usize, cell: impl Fn(usize, usize) -> char) -> String {
    let mut out = String::with_capacity(size * (size + 1));
    for x in 0..size {
        out.extend((0..size).map(|y| cell(x, y)));
        out.push('\n');
    }
    out
}

/// Parse the synthetic layout through the regular loader.
pub fn synthesize(size: usize) -> td_grid::GridResult<(CityGrid, LightMap)> {
    let grid = load_roads(Cursor::new(map_text(size)), size)?;
    let lights = load_lights(Cursor::new(light_text(size)), size)?;
    Ok((grid, lights))
}
