//! Per-intersection road classes.
//!
//! Every intersection owns the segment leaving it eastwards and the segment
//! leaving it southwards.  Its class says which of the two exist:
//!
//! | Code | Class        | East segment | South segment |
//! |------|--------------|--------------|---------------|
//! | 0    | `None`       | no           | no            |
//! | 1    | `EastWest`   | yes          | no            |
//! | 2    | `NorthSouth` | no           | yes           |
//! | 3    | `Both`       | yes          | yes           |
//!
//! Administrative edits may only remove segments the intersection was built
//! with, never add new ones.  [`RoadClass::edit_targets`] is the full table.

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadClass {
    #[default]
    None,
    EastWest,
    NorthSouth,
    Both,
}

impl RoadClass {
    /// Parse a layout / edit code.  Codes outside `0..=3` have no class and
    /// return `Option::None`.
    pub fn from_code(code: u8) -> Option<RoadClass> {
        match code {
            0 => Some(RoadClass::None),
            1 => Some(RoadClass::EastWest),
            2 => Some(RoadClass::NorthSouth),
            3 => Some(RoadClass::Both),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            RoadClass::None       => 0,
            RoadClass::EastWest   => 1,
            RoadClass::NorthSouth => 2,
            RoadClass::Both       => 3,
        }
    }

    /// `true` if the east-going segment exists.
    #[inline]
    pub fn carries_east_west(self) -> bool {
        matches!(self, RoadClass::EastWest | RoadClass::Both)
    }

    /// `true` if the south-going segment exists.
    #[inline]
    pub fn carries_north_south(self) -> bool {
        matches!(self, RoadClass::NorthSouth | RoadClass::Both)
    }

    /// Classes an intersection built as `self` may be set to.
    ///
    /// `None` intersections cannot be edited at all.
    pub fn edit_targets(self) -> &'static [RoadClass] {
        match self {
            RoadClass::None       => &[],
            RoadClass::EastWest   => &[RoadClass::None, RoadClass::EastWest],
            RoadClass::NorthSouth => &[RoadClass::None, RoadClass::NorthSouth],
            RoadClass::Both       => &[
                RoadClass::None,
                RoadClass::EastWest,
                RoadClass::NorthSouth,
                RoadClass::Both,
            ],
        }
    }

    /// `true` if an intersection built as `self` can currently be `class`.
    #[inline]
    pub fn admits(self, class: RoadClass) -> bool {
        class == self || self.edit_targets().contains(&class)
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoadClass::None       => "none",
            RoadClass::EastWest   => "east-west",
            RoadClass::NorthSouth => "north-south",
            RoadClass::Both       => "both",
        };
        f.write_str(name)
    }
}
