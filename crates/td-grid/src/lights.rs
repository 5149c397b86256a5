//! Traffic lights.
//!
//! A light gives priority to one axis.  Through traffic on the priority axis
//! always passes; traffic arriving on the other axis may only turn onto the
//! priority axis, and only in one turning sense:
//!
//! | Phase          | Allowed                                                   |
//! |----------------|-----------------------------------------------------------|
//! | `NsPriority`   | arriving UP/DOWN; RIGHT→DOWN; LEFT→UP                     |
//! | `EwPriority`   | arriving LEFT/RIGHT; UP→RIGHT; DOWN→LEFT                  |
//! | `None`         | everything                                                |
//!
//! "Arriving" is the direction of the taxi's last move; "departing" is the
//! move it wants to make next.

use td_core::{Direction, Intersection};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightPhase {
    /// No light.  Permanent.
    #[default]
    None,
    NsPriority,
    EwPriority,
}

impl LightPhase {
    /// The phase after one toggle.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            LightPhase::None       => LightPhase::None,
            LightPhase::NsPriority => LightPhase::EwPriority,
            LightPhase::EwPriority => LightPhase::NsPriority,
        }
    }

    pub fn allows(self, arriving: Direction, departing: Direction) -> bool {
        use Direction::*;
        match self {
            LightPhase::None => true,
            LightPhase::NsPriority => {
                arriving.is_vertical()
                    || (arriving == Right && departing == Down)
                    || (arriving == Left && departing == Up)
            }
            LightPhase::EwPriority => {
                !arriving.is_vertical()
                    || (arriving == Up && departing == Right)
                    || (arriving == Down && departing == Left)
            }
        }
    }
}

/// Phases of every intersection's light.
#[derive(Clone, Debug)]
pub struct LightMap {
    size:   usize,
    phases: Vec<LightPhase>,
}

impl LightMap {
    /// A map with no lights anywhere.
    pub fn unlit(size: usize) -> Self {
        Self { size, phases: vec![LightPhase::None; size * size] }
    }

    pub(crate) fn from_phases(size: usize, phases: Vec<LightPhase>) -> Self {
        Self { size, phases }
    }

    /// Install a light (tests and hand-built cities).  Off-grid is ignored.
    pub fn with_phase(mut self, at: Intersection, phase: LightPhase) -> Self {
        if at.is_within(self.size) {
            self.phases[at.index(self.size)] = phase;
        }
        self
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn phase_at(&self, at: Intersection) -> LightPhase {
        if at.is_within(self.size) {
            self.phases[at.index(self.size)]
        } else {
            LightPhase::None
        }
    }

    /// Flip every lit intersection between its two priority phases.
    pub fn toggle(&mut self) {
        for phase in &mut self.phases {
            *phase = phase.toggled();
        }
    }

    pub fn is_movement_allowed(&self, at: Intersection, arriving: Direction, departing: Direction) -> bool {
        self.phase_at(at).allows(arriving, departing)
    }
}
