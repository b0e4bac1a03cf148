//! Panic system - morale saves and pilot ejection after damage
//!
//! Pipeline per attack:
//! - saving_throw: condition + config -> difficulty (pure)
//! - resolution: difficulty + roll -> panic status change
//! - ejection: only after a failed panic save
//!
//! The encounter module strings these together and owns the tracked units.

pub mod constants;
pub mod context;
pub mod dice;
pub mod ejection;
pub mod encounter;
pub mod narration;
pub mod report;
pub mod resolution;
pub mod saving_throw;
pub mod status;
pub mod tracker;

pub use constants::*;
pub use context::{
    AllySnapshot, HeatState, LocationHealth, PilotSnapshot, SavingThrowContext, WeaponSnapshot,
};
pub use dice::{Dice, RollRange, ScriptedDice};
pub use ejection::{resolve_ejection, EjectionOutcome, EjectionResolution, EjectionSaveReason};
pub use encounter::{AttackResolution, Encounter};
pub use narration::{Callout, MessageNature, NarrationRequest};
pub use report::PanicReport;
pub use resolution::{can_panic, resolve_panic_save, CriticalRoll, PanicOutcome, PanicResolution};
pub use saving_throw::{compute_saving_throw, AppliedModifier, SavingThrow};
pub use status::PanicStatus;
pub use tracker::{TrackedUnit, TrackedUnits};
