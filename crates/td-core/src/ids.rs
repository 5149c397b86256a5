//! Strongly typed identifier wrappers.
//!
//! Taxi ids are 1-based (the fleet is addressed as "taxi 1 .. taxi 100"), so
//! unlike a raw array index they carry an explicit [`TaxiId::slot`] helper
//! for `Vec` indexing.  Request ids are allocated sequentially by the
//! registry and never reused.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for $inner {
            #[inline(always)]
            fn from(id: $name) -> $inner {
                id.0
            }
        }
    };
}

typed_id! {
    /// Identity of one taxi, `1..=fleet size`.
    pub struct TaxiId(u32);
}

typed_id! {
    /// Identity of one passenger request, unique for the process lifetime.
    pub struct RequestId(u64);
}

impl TaxiId {
    /// Zero-based storage slot: taxi 1 lives at index 0.
    ///
    /// # Panics
    /// Panics in debug mode for `TaxiId(0)`, which is never handed out.
    #[inline(always)]
    pub fn slot(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Inverse of [`slot`](Self::slot).
    #[inline(always)]
    pub fn from_slot(slot: usize) -> Self {
        TaxiId(slot as u32 + 1)
    }
}
