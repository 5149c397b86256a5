//! `Fleet`: every taxi, indexed by id.
//!
//! Taxi ids are dense, `1..=len`, and `TaxiId::slot` is the index into the
//! backing `Vec`.  Iteration is always in ascending id order, which is the
//! order the world steps taxis and registers candidates in.

use td_core::TaxiId;

use crate::{FleetError, FleetResult, SharedTripLog, Taxi};

pub struct Fleet {
    taxis: Vec<Taxi>,
}

impl Fleet {
    pub(crate) fn from_taxis(taxis: Vec<Taxi>) -> Self {
        Self { taxis }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.taxis.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taxis.is_empty()
    }

    #[inline]
    pub fn get(&self, id: TaxiId) -> Option<&Taxi> {
        if id.0 == 0 {
            return None;
        }
        self.taxis.get(id.slot())
    }

    #[inline]
    pub fn get_mut(&mut self, id: TaxiId) -> Option<&mut Taxi> {
        if id.0 == 0 {
            return None;
        }
        self.taxis.get_mut(id.slot())
    }

    /// Look up a raw, caller-supplied id.
    pub fn lookup(&self, raw: u32) -> FleetResult<&Taxi> {
        self.get(TaxiId(raw)).ok_or(FleetError::NotFound(raw))
    }

    pub fn lookup_mut(&mut self, raw: u32) -> FleetResult<&mut Taxi> {
        self.get_mut(TaxiId(raw)).ok_or(FleetError::NotFound(raw))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Taxi> {
        self.taxis.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Taxi> {
        self.taxis.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = TaxiId> + '_ {
        self.taxis.iter().map(Taxi::id)
    }

    /// Trip-log handles of every priority taxi.
    pub fn trip_logs(&self) -> impl Iterator<Item = (TaxiId, SharedTripLog)> + '_ {
        self.taxis
            .iter()
            .filter_map(|t| t.trip_log().map(|log| (t.id(), log.clone())))
    }
}
