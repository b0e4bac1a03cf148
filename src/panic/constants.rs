//! Panic system constants - tag names and fixed roll values
//!
//! Tunable weights live in `PanicConfig`. These never change between encounters.

use crate::panic::dice::RollRange;

// Pilot tags
pub const PILOT_BRAVE_TAG: &str = "pilot_brave";
pub const PILOT_DEPENDABLE_TAG: &str = "pilot_dependable";
pub const PILOT_DRUNK_TAG: &str = "pilot_drunk";

// Chassis tags
pub const CHASSIS_NO_EJECT_TAG: &str = "mech_quirk_noeject";
pub const CHASSIS_DISTRACTING_TAG: &str = "mech_quirk_distracting";

// Rolls
pub const CRIT_SUCCESS_ROLL: i32 = 100;
pub const CRIT_FAILURE_ROLL: i32 = 1;

/// Callouts (alone, weaponless) show up one time in this many
pub const CALLOUT_CHANCE_ONE_IN: u32 = 5;

/// Whether a crit save can come up at all with this roll range
pub fn crit_success_reachable(range: RollRange) -> bool {
    range.max() >= CRIT_SUCCESS_ROLL
}
