//! Panic system configuration with documented constants
//!
//! Every tunable the calculator and resolvers read lives here. A config is
//! an immutable snapshot for one encounter and is always passed explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PanicError, Result};
use crate::panic::dice::RollRange;

/// Configuration for the panic and ejection checks
///
/// Loaded from TOML; every section has defaults so partial files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanicConfig {
    /// Enables pilot and chassis quirks (brave, dependable, drunk, no-eject, distracting)
    pub quirks_enabled: bool,

    /// Lets support vehicles take panic and ejection checks at all
    pub vehicles_can_panic: bool,

    /// Forces every panic save and ejection roll to fail (testing aid)
    ///
    /// Panic saves with a difficulty below 1 are still skipped. Ejection
    /// saves are not.
    pub always_panic: bool,

    /// Records the modifier trace in the diagnostics report
    pub debug: bool,

    /// Step status down once at round end for units that didn't worsen
    pub recover_each_round: bool,

    /// Range of the percentile roll
    pub roll_range: RollRange,

    pub modifiers: ModifierWeights,
    pub resolve: ResolveConfig,
    pub crit: CritConfig,
    pub status: StatusMultipliers,
    pub ejection: EjectionConfig,
    pub strings: NarrationStrings,
}

impl Default for PanicConfig {
    fn default() -> Self {
        Self {
            quirks_enabled: true,
            vehicles_can_panic: true,
            always_panic: false,
            debug: false,
            recover_each_round: true,
            roll_range: RollRange::default(),
            modifiers: ModifierWeights::default(),
            resolve: ResolveConfig::default(),
            crit: CritConfig::default(),
            status: StatusMultipliers::default(),
            ejection: EjectionConfig::default(),
            strings: NarrationStrings::default(),
        }
    }
}

/// Additive weights for each condition the calculator checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierWeights {
    /// Flat penalty when the attacker's chassis is distracting
    pub distracting: f32,
    /// Multiplier on the last external heat damage (disabled when <= 0)
    pub heat_damage_factor: f32,
    /// Penalty at zero pilot health, scaled by injury fraction
    pub pilot_health_max: f32,
    /// Flat penalty for unsteady, and again for knockdown
    pub unsteady: f32,
    /// Flat penalty when running above the overheat level (disabled when <= 0)
    pub overheated: f32,
    /// Flat penalty when shut down (disabled when <= 0)
    pub shutdown: f32,
    /// Penalty at a destroyed head, scaled by damage fraction
    pub head_max: f32,
    /// Penalty at a destroyed center torso
    pub center_torso_max: f32,
    /// Penalty at a destroyed side torso (each side counts)
    pub side_torso_max: f32,
    /// Penalty at a destroyed leg (each leg counts)
    pub legged_max: f32,
    /// Flat penalty when no allies remain
    pub alone: f32,
    /// Flat penalty when no weapon can fire
    pub weaponless: f32,
    /// Subtracted from panic difficulty for brave pilots
    pub brave: f32,
    /// Subtracted from ejection difficulty for dependable pilots
    pub dependable: f32,
}

impl Default for ModifierWeights {
    fn default() -> Self {
        Self {
            distracting: 5.0,
            heat_damage_factor: 1.0,
            pilot_health_max: 15.0,
            unsteady: 3.0,
            overheated: 10.0,
            shutdown: 15.0,
            head_max: 15.0,
            center_torso_max: 45.0,
            side_torso_max: 20.0,
            legged_max: 10.0,
            alone: 10.0,
            weaponless: 10.0,
            brave: 5.0,
            dependable: 5.0,
        }
    }
}

/// Team resolve and pilot skill offsets (both reduce difficulty)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Offset at double the median resolve
    pub resolve_max_modifier: f32,
    /// Team morale at which resolve neither helps nor hurts. Must be positive.
    pub median_resolve: f32,
    /// Scales the resolve offset for panicking vehicles
    pub vehicle_resolve_factor: f32,
    pub guts_ejection_resist_per_point: f32,
    pub tactics_ejection_resist_per_point: f32,
    /// Scales the guts and tactics offset for panicking vehicles
    pub vehicle_guts_and_tactics_factor: f32,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            resolve_max_modifier: 10.0,
            median_resolve: 50.0,
            vehicle_resolve_factor: 0.5,
            guts_ejection_resist_per_point: 2.0,
            tactics_ejection_resist_per_point: 0.0,
            vehicle_guts_and_tactics_factor: 0.5,
        }
    }
}

/// Critical failure thresholds for the panic save
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CritConfig {
    /// Overall health fraction at or below which a bad miss becomes a crit
    pub mech_health_for_crit: f32,
    /// How far under the difficulty a roll must land to crit
    pub crit_over: f32,
}

impl Default for CritConfig {
    fn default() -> Self {
        Self {
            mech_health_for_crit: 0.65,
            crit_over: 70.0,
        }
    }
}

/// Difficulty multiplier per panic status
///
/// Must be non-decreasing: a shakier pilot never has an easier save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMultipliers {
    pub confident: f32,
    pub stressed: f32,
    pub panicked: f32,
}

impl Default for StatusMultipliers {
    fn default() -> Self {
        Self {
            confident: 1.0,
            stressed: 1.25,
            panicked: 1.5,
        }
    }
}

/// Ejection save tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EjectionConfig {
    /// Subtracted from mech ejection difficulty
    pub base_ejection_resist: f32,
    /// Subtracted from vehicle ejection difficulty
    pub base_vehicle_ejection_resist: f32,
    /// Ceiling on ejection difficulty, i.e. the highest possible eject chance
    pub max_eject_chance: f32,
}

impl Default for EjectionConfig {
    fn default() -> Self {
        Self {
            base_ejection_resist: 50.0,
            base_vehicle_ejection_resist: 40.0,
            max_eject_chance: 50.0,
        }
    }
}

/// Opaque presentation tokens passed through in narration requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationStrings {
    pub save: String,
    pub roll: String,
    pub crit_save: String,
    pub fail: String,
    pub crit_fail: String,
    pub alone: String,
    pub no_weapons: String,
    pub eject_resist: String,
    pub no_eject_quirk: String,
    pub drunk_pilot: String,
}

impl Default for NarrationStrings {
    fn default() -> Self {
        Self {
            save: "Save".to_string(),
            roll: "Roll".to_string(),
            crit_save: "CRIT SAVE!".to_string(),
            fail: "Panic check failed".to_string(),
            crit_fail: "PANIC LEVEL CRITICAL!".to_string(),
            alone: "...I'm all alone...".to_string(),
            no_weapons: "...No weapons left!".to_string(),
            eject_resist: "Resisted ejection".to_string(),
            no_eject_quirk: "Mech quirk: Can't eject".to_string(),
            drunk_pilot: "Pilot quirk: Drunkard won't eject".to_string(),
        }
    }
}

impl PanicConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PanicConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        // Resolve divides by the median
        if !(self.resolve.median_resolve > 0.0) {
            return Err(PanicError::InvalidConfig(format!(
                "median_resolve ({}) must be positive",
                self.resolve.median_resolve
            )));
        }

        let s = &self.status;
        if s.confident > s.stressed || s.stressed > s.panicked {
            return Err(PanicError::InvalidConfig(format!(
                "status multipliers must be non-decreasing (confident {}, stressed {}, panicked {})",
                s.confident, s.stressed, s.panicked
            )));
        }

        if self.ejection.max_eject_chance < 0.0 {
            return Err(PanicError::InvalidConfig(format!(
                "max_eject_chance ({}) must not be negative",
                self.ejection.max_eject_chance
            )));
        }

        if !(0.0..=1.0).contains(&self.crit.mech_health_for_crit) {
            return Err(PanicError::InvalidConfig(format!(
                "mech_health_for_crit ({}) must be a fraction in [0, 1]",
                self.crit.mech_health_for_crit
            )));
        }

        Ok(())
    }
}
