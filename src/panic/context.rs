//! Saving-throw context - the read-only unit snapshot a check runs against
//!
//! The host fills one of these in per attack. Fractions are remaining
//! health in [0, 1]; 1.0 means untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{PanicError, Result};
use crate::core::types::{UnitId, UnitKind};

/// Remaining structure per mech location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationHealth {
    pub head: f32,
    pub center_torso: f32,
    pub left_torso: f32,
    pub right_torso: f32,
    pub left_leg: f32,
    pub right_leg: f32,
}

impl Default for LocationHealth {
    fn default() -> Self {
        Self::intact()
    }
}

impl LocationHealth {
    pub fn intact() -> Self {
        Self {
            head: 1.0,
            center_torso: 1.0,
            left_torso: 1.0,
            right_torso: 1.0,
            left_leg: 1.0,
            right_leg: 1.0,
        }
    }

    fn named(&self) -> [(&'static str, f32); 6] {
        [
            ("head", self.head),
            ("center_torso", self.center_torso),
            ("left_torso", self.left_torso),
            ("right_torso", self.right_torso),
            ("left_leg", self.left_leg),
            ("right_leg", self.right_leg),
        ]
    }
}

/// Pilot condition and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotSnapshot {
    /// Remaining pilot health fraction
    pub health: f32,
    pub guts: u32,
    pub tactics: u32,
    pub tags: BTreeSet<String>,
    /// Rounds left on the pilot's timeout (used by the drunk quirk)
    pub timeout_remaining: u32,
}

impl Default for PilotSnapshot {
    fn default() -> Self {
        Self {
            health: 1.0,
            guts: 0,
            tactics: 0,
            tags: BTreeSet::new(),
            timeout_remaining: 0,
        }
    }
}

impl PilotSnapshot {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatState {
    pub current: f32,
    pub overheat_level: f32,
    /// Heat damage from the last external heat source
    pub external_damage: f32,
}

impl HeatState {
    pub fn is_overheated(&self) -> bool {
        self.overheat_level < self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSnapshot {
    pub functional: bool,
    pub has_ammo: bool,
}

impl WeaponSnapshot {
    pub fn usable() -> Self {
        Self {
            functional: true,
            has_ammo: true,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.functional && self.has_ammo
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllySnapshot {
    pub unit: UnitId,
    pub is_dead: bool,
}

/// Everything a panic check needs to know about the defender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingThrowContext {
    pub unit: UnitId,
    pub kind: UnitKind,
    /// Overall remaining health fraction
    pub health: f32,
    pub locations: LocationHealth,
    pub pilot: PilotSnapshot,
    pub chassis_tags: BTreeSet<String>,
    pub attacker_chassis_tags: BTreeSet<String>,
    pub heat: HeatState,
    pub unsteady: bool,
    pub knockdown: bool,
    pub shutdown: bool,
    pub weapons: Vec<WeaponSnapshot>,
    /// Allied units, possibly including the defender itself
    pub allies: Vec<AllySnapshot>,
    pub team_morale: f32,
    /// Total damage this attack dealt, heat damage included
    pub damage_including_heat: f32,
}

impl Default for SavingThrowContext {
    fn default() -> Self {
        Self::healthy(UnitId::new(), UnitKind::Mech)
    }
}

impl SavingThrowContext {
    /// Undamaged unit with one working weapon and team morale at 50
    pub fn healthy(unit: UnitId, kind: UnitKind) -> Self {
        Self {
            unit,
            kind,
            health: 1.0,
            locations: LocationHealth::intact(),
            pilot: PilotSnapshot::default(),
            chassis_tags: BTreeSet::new(),
            attacker_chassis_tags: BTreeSet::new(),
            heat: HeatState::default(),
            unsteady: false,
            knockdown: false,
            shutdown: false,
            weapons: vec![WeaponSnapshot::usable()],
            allies: vec![AllySnapshot {
                unit: UnitId::new(),
                is_dead: false,
            }],
            team_morale: 50.0,
            damage_including_heat: 0.0,
        }
    }

    pub fn has_chassis_tag(&self, tag: &str) -> bool {
        self.chassis_tags.contains(tag)
    }

    pub fn attacker_has_chassis_tag(&self, tag: &str) -> bool {
        self.attacker_chassis_tags.contains(tag)
    }

    /// No living ally other than the defender
    pub fn is_alone(&self) -> bool {
        self.allies
            .iter()
            .all(|ally| ally.is_dead || ally.unit == self.unit)
    }

    /// No weapon can fire
    pub fn is_weaponless(&self) -> bool {
        self.weapons.iter().all(|w| !w.can_fire())
    }

    /// Reject snapshots the calculator can't make sense of
    pub fn validate(&self) -> Result<()> {
        check_fraction("health", self.health)?;
        check_fraction("pilot.health", self.pilot.health)?;
        if self.kind.is_mech() {
            for (name, value) in self.locations.named() {
                check_fraction(name, value)?;
            }
        }
        check_finite("team_morale", self.team_morale)?;
        check_finite("damage_including_heat", self.damage_including_heat)?;
        check_finite("heat.current", self.heat.current)?;
        check_finite("heat.overheat_level", self.heat.overheat_level)?;
        check_finite("heat.external_damage", self.heat.external_damage)?;
        Ok(())
    }
}

fn check_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PanicError::Computation(format!("{} is not finite ({})", name, value)))
    }
}

fn check_fraction(name: &str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PanicError::Computation(format!(
            "{} must be a fraction in [0, 1] ({})",
            name, value
        )))
    }
}
