//! Panic-save resolution
//!
//! Rolls against the computed difficulty and moves the unit along the
//! panic ladder. Internal errors never escape: they are logged and the
//! save counts as failed.

use serde::{Deserialize, Serialize};

use crate::core::config::PanicConfig;
use crate::core::error::{PanicError, Result};
use crate::core::types::UnitKind;
use crate::panic::constants::{CRIT_FAILURE_ROLL, CRIT_SUCCESS_ROLL, PILOT_BRAVE_TAG};
use crate::panic::context::SavingThrowContext;
use crate::panic::dice::Dice;
use crate::panic::narration::{MessageNature, NarrationRequest};
use crate::panic::report::PanicReport;
use crate::panic::status::PanicStatus;
use crate::panic::tracker::TrackedUnits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanicOutcome {
    /// Held together (or the check didn't apply)
    Saved,
    /// Morale got worse; an ejection check follows
    Failed,
    /// Difficulty rounded below 1, no roll made
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalRoll {
    Success,
    Failure,
}

/// What happened on a panic save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanicResolution {
    pub outcome: PanicOutcome,
    /// Final rounded difficulty, when the check got that far
    pub difficulty: Option<f32>,
    pub roll: Option<i32>,
    pub critical: Option<CriticalRoll>,
    pub narration: Vec<NarrationRequest>,
}

impl PanicResolution {
    fn without_roll(outcome: PanicOutcome, difficulty: Option<f32>) -> Self {
        Self {
            outcome,
            difficulty,
            roll: None,
            critical: None,
            narration: Vec::new(),
        }
    }

    /// Contained failure: no roll, no narration
    pub fn failed() -> Self {
        Self::without_roll(PanicOutcome::Failed, None)
    }

    /// Automatic save for a unit that can't panic at all
    pub fn exempt() -> Self {
        Self::without_roll(PanicOutcome::Saved, None)
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == PanicOutcome::Failed
    }
}

/// Whether a unit of this kind takes panic saves at all
pub fn can_panic(kind: UnitKind, config: &PanicConfig) -> bool {
    match kind {
        UnitKind::Mech => true,
        UnitKind::Vehicle => config.vehicles_can_panic,
        UnitKind::Other => false,
    }
}

/// Resolve a panic save for the unit in `ctx`
///
/// `saving_throw` is the calculator's raw difficulty. Any error along the
/// way is logged, written to the report, and reported as `Failed`. State
/// changes made before the error stay in place.
pub fn resolve_panic_save(
    units: &mut TrackedUnits,
    ctx: &SavingThrowContext,
    saving_throw: f32,
    config: &PanicConfig,
    dice: &mut impl Dice,
    report: &mut PanicReport,
) -> PanicResolution {
    match try_resolve_panic_save(units, ctx, saving_throw, config, dice, report) {
        Ok(resolution) => resolution,
        Err(err) => {
            tracing::error!("Panic save for {:?} could not be resolved: {}", ctx.unit, err);
            report.note(format!("Panic save error, counting as failed: {}", err));
            PanicResolution::failed()
        }
    }
}

fn try_resolve_panic_save(
    units: &mut TrackedUnits,
    ctx: &SavingThrowContext,
    mut saving_throw: f32,
    config: &PanicConfig,
    dice: &mut impl Dice,
    report: &mut PanicReport,
) -> Result<PanicResolution> {
    if !can_panic(ctx.kind, config) {
        tracing::debug!("{:?} can't panic, passing save", ctx.unit);
        return Ok(PanicResolution::exempt());
    }

    if !saving_throw.is_finite() {
        return Err(PanicError::Computation(format!(
            "saving throw is not finite ({})",
            saving_throw
        )));
    }

    let strings = &config.strings;
    let unit = units
        .get_mut(ctx.unit)
        .ok_or(PanicError::UnitNotTracked(ctx.unit))?;

    if config.quirks_enabled && ctx.kind.is_mech() && ctx.pilot.has_tag(PILOT_BRAVE_TAG) {
        saving_throw -= config.modifiers.brave;
        report.modifier("Bravery", -config.modifiers.brave, saving_throw);
    }

    let multiplier = unit.panic_status.multiplier(&config.status);
    saving_throw *= multiplier;
    report.modifier("Panic multiplier", multiplier, saving_throw);

    let difficulty = saving_throw.round_ties_even().max(0.0);

    if difficulty < 1.0 {
        report.rule();
        report.note("Negative saving throw | skipping");
        return Ok(PanicResolution::without_roll(
            PanicOutcome::Skipped,
            Some(difficulty),
        ));
    }

    let roll = dice.roll(config.roll_range);
    report.roll(difficulty, roll);

    let mut resolution = PanicResolution {
        outcome: PanicOutcome::Saved,
        difficulty: Some(difficulty),
        roll: Some(roll),
        critical: None,
        narration: vec![NarrationRequest::floatie(
            ctx.unit,
            format!("{}:{} {}:{}!", strings.save, difficulty, strings.roll, roll),
        )],
    };

    if roll == CRIT_SUCCESS_ROLL {
        report.note("Critical success");
        unit.panic_status = unit.panic_status.improved();
        // a crit save can follow a worsening in the same round
        unit.panic_worsened_recently = false;
        resolution.critical = Some(CriticalRoll::Success);
        resolution
            .narration
            .push(NarrationRequest::floatie(ctx.unit, strings.crit_save.as_str()));
        return Ok(resolution);
    }

    if !config.always_panic && roll as f32 >= difficulty {
        report.note("Successful panic save");
        resolution
            .narration
            .push(NarrationRequest::floatie(ctx.unit, format!("{}!", strings.save)));
        return Ok(resolution);
    }

    report.note("Failed panic save");
    resolution.outcome = PanicOutcome::Failed;
    resolution
        .narration
        .push(NarrationRequest::floatie(ctx.unit, format!("{}!", strings.fail)));

    let prior_status = unit.panic_status;
    unit.panic_status = if ctx.kind.is_vehicle() {
        PanicStatus::Panicked
    } else {
        prior_status.worsened()
    };
    unit.panic_worsened_recently = true;

    let low_health_blowout = ctx.health <= config.crit.mech_health_for_crit
        && (roll as f32) < difficulty - config.crit.crit_over;
    if roll == CRIT_FAILURE_ROLL || low_health_blowout {
        report.note("Critical failure on panic save");
        // straight from Confident to Panicked is shock, not ejection; the next eject check passes
        unit.panic_status = PanicStatus::Panicked;
        unit.prevent_ejection = prior_status < PanicStatus::Stressed;
        resolution.critical = Some(CriticalRoll::Failure);
        resolution.narration.push(NarrationRequest::sequence(
            ctx.unit,
            strings.crit_fail.as_str(),
            MessageNature::CriticalHit,
        ));
    }

    tracing::debug!(
        "{:?} failed panic save: {} -> {}",
        ctx.unit,
        prior_status,
        unit.panic_status
    );

    Ok(resolution)
}
