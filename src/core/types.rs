//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a combat unit for the lifetime of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// What kind of unit is being checked
///
/// Only mechs get graduated panic and quirk vetoes. Vehicles panic
/// all at once (and only when enabled). Anything else never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Primary combatant with a pilot, locations, and chassis quirks
    #[default]
    Mech,
    /// Support vehicle
    Vehicle,
    /// Turrets, buildings, and anything the host can't classify
    Other,
}

impl UnitKind {
    pub fn is_mech(&self) -> bool {
        matches!(self, UnitKind::Mech)
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self, UnitKind::Vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_equality() {
        let a = UnitId::new();
        let b = a;
        let c = UnitId::new();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unit_id_hash() {
        use std::collections::HashMap;
        let id = UnitId::new();
        let mut map: HashMap<UnitId, &str> = HashMap::new();
        map.insert(id, "atlas");
        assert_eq!(map.get(&id), Some(&"atlas"));
    }

    #[test]
    fn test_unit_kind_deserializes_snake_case() {
        let kind: UnitKind = serde_json::from_str("\"vehicle\"").unwrap();
        assert_eq!(kind, UnitKind::Vehicle);
        assert!(kind.is_vehicle());
        assert!(!kind.is_mech());
    }
}
