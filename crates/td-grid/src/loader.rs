//! Text layout loader.
//!
//! # Format
//!
//! Both files are `N` lines of `N` ASCII digits, row `x` on line `x + 1`,
//! column `y` at character `y`.  Surrounding whitespace is trimmed; lines
//! past the `N`th are ignored.
//!
//! ```text
//! map.txt         light.txt
//! 333             000
//! 303             010
//! 333             000
//! ```
//!
//! | File       | Digits                                                   |
//! |------------|----------------------------------------------------------|
//! | road map   | `0`..`3`, see [`RoadClass`]                              |
//! | light map  | `0` = no light, `1` = light starting in `NsPriority`     |
//!
//! Any short, long, or non-digit line rejects the whole layout.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::grid::{CityGrid, CityGridBuilder};
use crate::lights::{LightMap, LightPhase};
use crate::{GridError, GridResult, RoadClass};

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse an `size × size` road map.
pub fn load_roads<R: BufRead>(reader: R, size: usize) -> GridResult<CityGrid> {
    let mut builder = CityGridBuilder::new(size);
    let mut row_buf = Vec::with_capacity(size);

    for_each_row(reader, size, |row, line_no, digits| {
        row_buf.clear();
        for (col, &d) in digits.iter().enumerate() {
            let class = RoadClass::from_code(d).ok_or_else(|| GridError::LoadRejected {
                line:   line_no,
                reason: format!("road code {d} at column {col} is not in 0..=3"),
            })?;
            row_buf.push(class);
        }
        builder.set_row(row, &row_buf);
        Ok(())
    })?;

    Ok(builder.build())
}

/// Parse an `size × size` light map.
pub fn load_lights<R: BufRead>(reader: R, size: usize) -> GridResult<LightMap> {
    let mut phases = Vec::with_capacity(size * size);

    for_each_row(reader, size, |_, line_no, digits| {
        for (col, &d) in digits.iter().enumerate() {
            let phase = match d {
                0 => LightPhase::None,
                1 => LightPhase::NsPriority,
                _ => {
                    return Err(GridError::LoadRejected {
                        line:   line_no,
                        reason: format!("light code {d} at column {col} is not 0 or 1"),
                    });
                }
            };
            phases.push(phase);
        }
        Ok(())
    })?;

    Ok(LightMap::from_phases(size, phases))
}

/// Open and parse both layout files.
pub fn load_layout_files(
    map_path: &Path,
    light_path: &Path,
    size: usize,
) -> GridResult<(CityGrid, LightMap)> {
    let grid = load_roads(BufReader::new(File::open(map_path)?), size)?;
    let lights = load_lights(BufReader::new(File::open(light_path)?), size)?;
    log::info!(
        "loaded {size}x{size} layout from {} and {}",
        map_path.display(),
        light_path.display()
    );
    Ok((grid, lights))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Feed the first `size` lines to `f` as digit values, checking shape.
///
/// `f` receives `(row, 1-based line number, digits)`.
fn for_each_row<R, F>(reader: R, size: usize, mut f: F) -> GridResult<()>
where
    R: BufRead,
    F: FnMut(usize, usize, &[u8]) -> GridResult<()>,
{
    let mut digits = Vec::with_capacity(size);
    let mut rows = 0;

    for (row, line) in reader.lines().take(size).enumerate() {
        let line = line?;
        let line_no = row + 1;
        let text = line.trim();

        if text.len() != size {
            return Err(GridError::LoadRejected {
                line:   line_no,
                reason: format!("expected {size} digits, found {}", text.len()),
            });
        }

        digits.clear();
        for (col, b) in text.bytes().enumerate() {
            if !b.is_ascii_digit() {
                return Err(GridError::LoadRejected {
                    line:   line_no,
                    reason: format!("non-digit {:?} at column {col}", b as char),
                });
            }
            digits.push(b - b'0');
        }

        f(row, line_no, &digits)?;
        rows += 1;
    }

    if rows < size {
        return Err(GridError::LoadRejected {
            line:   rows + 1,
            reason: format!("expected {size} rows, found {rows}"),
        });
    }
    Ok(())
}
