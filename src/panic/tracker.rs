//! Tracked-unit registry - per-unit panic state for one encounter
//!
//! Units live in an arena keyed by `UnitId`. Only the resolvers and the
//! round-end recovery mutate them.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::panic::status::PanicStatus;

/// Panic state carried between checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUnit {
    pub id: UnitId,
    pub panic_status: PanicStatus,
    /// Status went up this round; blocks the round-end step down
    pub panic_worsened_recently: bool,
    /// Next ejection check auto-passes (then this clears)
    pub prevent_ejection: bool,
}

impl TrackedUnit {
    pub fn new(id: UnitId) -> Self {
        Self {
            id,
            panic_status: PanicStatus::Confident,
            panic_worsened_recently: false,
            prevent_ejection: false,
        }
    }
}

/// All units tracked in the current encounter
#[derive(Debug, Clone, Default)]
pub struct TrackedUnits {
    units: Vec<TrackedUnit>,
    index: AHashMap<UnitId, usize>,
}

impl TrackedUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a unit. Already-tracked units keep their state.
    pub fn track(&mut self, id: UnitId) -> &mut TrackedUnit {
        let idx = match self.index.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.units.len();
                self.units.push(TrackedUnit::new(id));
                self.index.insert(id, idx);
                idx
            }
        };
        &mut self.units[idx]
    }

    /// Stop tracking a unit, returning its last state
    pub fn untrack(&mut self, id: UnitId) -> Option<TrackedUnit> {
        let idx = self.index.remove(&id)?;
        let removed = self.units.swap_remove(idx);
        if let Some(moved) = self.units.get(idx) {
            self.index.insert(moved.id, idx);
        }
        Some(removed)
    }

    pub fn get(&self, id: UnitId) -> Option<&TrackedUnit> {
        self.index.get(&id).map(|&idx| &self.units[idx])
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut TrackedUnit> {
        match self.index.get(&id) {
            Some(&idx) => Some(&mut self.units[idx]),
            None => None,
        }
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedUnit> {
        self.units.iter()
    }

    /// Close out a round
    ///
    /// Units that didn't get worse this round calm down one step when
    /// `recover` is set. Every worsened flag is cleared either way.
    /// Returns the units that calmed down.
    pub fn end_round(&mut self, recover: bool) -> Vec<UnitId> {
        let mut recovered = Vec::new();
        for unit in &mut self.units {
            if recover && !unit.panic_worsened_recently && unit.panic_status > PanicStatus::Confident
            {
                unit.panic_status = unit.panic_status.improved();
                recovered.push(unit.id);
            }
            unit.panic_worsened_recently = false;
        }
        recovered
    }

    /// Drop everything (encounter over)
    pub fn clear(&mut self) {
        self.units.clear();
        self.index.clear();
    }
}
