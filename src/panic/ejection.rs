//! Ejection resolution
//!
//! Runs after a failed panic save. Decides whether the pilot punches out.

use serde::{Deserialize, Serialize};

use crate::core::config::PanicConfig;
use crate::core::error::{PanicError, Result};
use crate::core::types::UnitKind;
use crate::panic::constants::{CHASSIS_NO_EJECT_TAG, PILOT_DEPENDABLE_TAG, PILOT_DRUNK_TAG};
use crate::panic::context::SavingThrowContext;
use crate::panic::dice::Dice;
use crate::panic::narration::{MessageNature, NarrationRequest};
use crate::panic::report::PanicReport;
use crate::panic::tracker::TrackedUnits;

/// Why the pilot stayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EjectionSaveReason {
    /// One-shot immunity after a crit from Confident
    EjectionForbidden,
    /// Difficulty came out below 1
    Resisted,
    RollPassed,
    NoEjectQuirk,
    DrunkPilot,
    /// Resolution hit an internal error
    Contained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EjectionOutcome {
    Saved(EjectionSaveReason),
    Ejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EjectionResolution {
    pub outcome: EjectionOutcome,
    pub difficulty: Option<f32>,
    pub roll: Option<i32>,
    pub narration: Vec<NarrationRequest>,
}

impl EjectionResolution {
    fn saved(reason: EjectionSaveReason, difficulty: Option<f32>) -> Self {
        Self {
            outcome: EjectionOutcome::Saved(reason),
            difficulty,
            roll: None,
            narration: Vec::new(),
        }
    }

    pub fn ejected(&self) -> bool {
        self.outcome == EjectionOutcome::Ejected
    }
}

/// Resolve an ejection save for the unit in `ctx`
///
/// Takes the same raw saving throw the panic save used. Errors are
/// contained and reported as a save; they never eject a pilot.
pub fn resolve_ejection(
    units: &mut TrackedUnits,
    ctx: &SavingThrowContext,
    saving_throw: f32,
    config: &PanicConfig,
    dice: &mut impl Dice,
    report: &mut PanicReport,
) -> EjectionResolution {
    match try_resolve_ejection(units, ctx, saving_throw, config, dice, report) {
        Ok(resolution) => resolution,
        Err(err) => {
            tracing::error!("Ejection save for {:?} could not be resolved: {}", ctx.unit, err);
            report.note(format!("Ejection save error, pilot stays in: {}", err));
            EjectionResolution::saved(EjectionSaveReason::Contained, None)
        }
    }
}

fn try_resolve_ejection(
    units: &mut TrackedUnits,
    ctx: &SavingThrowContext,
    mut saving_throw: f32,
    config: &PanicConfig,
    dice: &mut impl Dice,
    report: &mut PanicReport,
) -> Result<EjectionResolution> {
    report.note("Panic save failure requires eject save");

    let unit = units
        .get_mut(ctx.unit)
        .ok_or(PanicError::UnitNotTracked(ctx.unit))?;
    if unit.prevent_ejection {
        report.note("Ejection forbidden after crit unless already stressed or panicked");
        unit.prevent_ejection = false;
        return Ok(EjectionResolution::saved(
            EjectionSaveReason::EjectionForbidden,
            None,
        ));
    }

    if !saving_throw.is_finite() {
        return Err(PanicError::Computation(format!(
            "saving throw is not finite ({})",
            saving_throw
        )));
    }

    let strings = &config.strings;
    let panicking_vehicle = config.vehicles_can_panic && ctx.kind.is_vehicle();

    if config.quirks_enabled && ctx.kind.is_mech() && ctx.pilot.has_tag(PILOT_DEPENDABLE_TAG) {
        saving_throw -= config.modifiers.dependable;
        report.modifier("Dependable", -config.modifiers.dependable, saving_throw);
    }

    let base_resist = match ctx.kind {
        UnitKind::Vehicle if panicking_vehicle => Some(config.ejection.base_vehicle_ejection_resist),
        UnitKind::Mech => Some(config.ejection.base_ejection_resist),
        _ => None,
    };
    if let Some(resist) = base_resist {
        saving_throw = (saving_throw - resist).max(0.0);
        report.modifier("Base ejection resist", -resist, saving_throw);
    }

    // this attack's damage is the whole story for a vehicle crew
    if panicking_vehicle {
        saving_throw = ctx.damage_including_heat;
        report.modifier("Vehicle damage", ctx.damage_including_heat, saving_throw);
    }

    let mut difficulty = saving_throw.round_ties_even();

    if !config.always_panic && difficulty < 1.0 {
        report.note("Negative saving throw | skipping");
        let mut resolution =
            EjectionResolution::saved(EjectionSaveReason::Resisted, Some(difficulty));
        resolution
            .narration
            .push(NarrationRequest::floatie(ctx.unit, strings.eject_resist.as_str()));
        return Ok(resolution);
    }

    difficulty = difficulty.min(config.ejection.max_eject_chance).trunc();

    let roll = dice.roll(config.roll_range);
    report.roll(difficulty, roll);

    let mut resolution = EjectionResolution {
        outcome: EjectionOutcome::Ejected,
        difficulty: Some(difficulty),
        roll: Some(roll),
        narration: vec![NarrationRequest::floatie(
            ctx.unit,
            format!("{}:{}  {}:{}!", strings.save, difficulty, strings.roll, roll),
        )],
    };

    if !config.always_panic && roll as f32 >= difficulty {
        report.note("Successful ejection save");
        resolution.outcome = EjectionOutcome::Saved(EjectionSaveReason::RollPassed);
        resolution.narration.push(NarrationRequest::floatie(
            ctx.unit,
            format!("{}!  {:.1}%", strings.save, ctx.health * 100.0),
        ));
        return Ok(resolution);
    }

    if ctx.kind.is_mech() && config.quirks_enabled {
        if ctx.has_chassis_tag(CHASSIS_NO_EJECT_TAG) {
            report.note("This mech can't eject (quirk)");
            resolution.outcome = EjectionOutcome::Saved(EjectionSaveReason::NoEjectQuirk);
            resolution.narration.push(NarrationRequest::sequence(
                ctx.unit,
                strings.no_eject_quirk.as_str(),
                MessageNature::PilotInjury,
            ));
            return Ok(resolution);
        }

        if ctx.pilot.has_tag(PILOT_DRUNK_TAG) && ctx.pilot.timeout_remaining > 0 {
            report.note("Drunkard - not ejecting");
            resolution.outcome = EjectionOutcome::Saved(EjectionSaveReason::DrunkPilot);
            resolution.narration.push(NarrationRequest::sequence(
                ctx.unit,
                strings.drunk_pilot.as_str(),
                MessageNature::PilotInjury,
            ));
            return Ok(resolution);
        }
    }

    report.note("Failed ejection save: Punchin' Out!!");
    tracing::info!("{:?} ejected (difficulty {}, roll {})", ctx.unit, difficulty, roll);
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitId;
    use crate::panic::dice::ScriptedDice;

    fn setup(kind: UnitKind) -> (TrackedUnits, SavingThrowContext, PanicConfig) {
        let ctx = SavingThrowContext::healthy(UnitId::new(), kind);
        let mut units = TrackedUnits::new();
        units.track(ctx.unit);
        (units, ctx, PanicConfig::default())
    }

    fn eject(
        units: &mut TrackedUnits,
        ctx: &SavingThrowContext,
        saving_throw: f32,
        config: &PanicConfig,
        dice: &mut ScriptedDice,
    ) -> EjectionResolution {
        resolve_ejection(units, ctx, saving_throw, config, dice, &mut PanicReport::disabled())
    }

    #[test]
    fn test_prevent_ejection_is_one_shot() {
        let (mut units, ctx, config) = setup(UnitKind::Mech);
        units.get_mut(ctx.unit).unwrap().prevent_ejection = true;
        let mut dice = ScriptedDice::new([1]);

        let first = eject(&mut units, &ctx, 200.0, &config, &mut dice);
        assert_eq!(
            first.outcome,
            EjectionOutcome::Saved(EjectionSaveReason::EjectionForbidden)
        );
        assert_eq!(dice.rolls_used(), 0);
        assert!(!units.get(ctx.unit).unwrap().prevent_ejection);

        let second = eject(&mut units, &ctx, 200.0, &config, &mut dice);
        assert!(second.ejected());
    }

    #[test]
    fn test_base_resist_can_zero_out_difficulty() {
        let (mut units, ctx, config) = setup(UnitKind::Mech);
        let mut dice = ScriptedDice::new([1]);

        let result = eject(&mut units, &ctx, 40.0, &config, &mut dice);

        assert_eq!(result.outcome, EjectionOutcome::Saved(EjectionSaveReason::Resisted));
        assert_eq!(dice.rolls_used(), 0);
    }

    #[test]
    fn test_difficulty_capped_at_max_eject_chance() {
        let (mut units, ctx, config) = setup(UnitKind::Mech);
        let mut dice = ScriptedDice::new([50]);

        // 200 - 50 = 150, capped to 50; roll 50 passes
        let result = eject(&mut units, &ctx, 200.0, &config, &mut dice);

        assert_eq!(result.difficulty, Some(50.0));
        assert_eq!(result.outcome, EjectionOutcome::Saved(EjectionSaveReason::RollPassed));
    }

    #[test]
    fn test_failed_roll_ejects() {
        let (mut units, ctx, config) = setup(UnitKind::Mech);
        let mut dice = ScriptedDice::new([49]);

        let result = eject(&mut units, &ctx, 200.0, &config, &mut dice);

        assert!(result.ejected());
    }

    #[test]
    fn test_dependable_pilot_subtracts() {
        let (mut units, mut ctx, config) = setup(UnitKind::Mech);
        ctx.pilot.tags.insert(PILOT_DEPENDABLE_TAG.to_string());
        let mut dice = ScriptedDice::new([10]);

        // 80 - 5 - 50 = 25
        let result = eject(&mut units, &ctx, 80.0, &config, &mut dice);

        assert_eq!(result.difficulty, Some(25.0));
        assert!(result.ejected());
    }

    #[test]
    fn test_no_eject_quirk_vetoes_before_drunk() {
        let (mut units, mut ctx, config) = setup(UnitKind::Mech);
        ctx.chassis_tags.insert(CHASSIS_NO_EJECT_TAG.to_string());
        ctx.pilot.tags.insert(PILOT_DRUNK_TAG.to_string());
        ctx.pilot.timeout_remaining = 2;
        let mut dice = ScriptedDice::new([1]);

        let result = eject(&mut units, &ctx, 200.0, &config, &mut dice);

        assert_eq!(result.outcome, EjectionOutcome::Saved(EjectionSaveReason::NoEjectQuirk));
        assert!(result.narration.iter().any(|n| n.text() == config.strings.no_eject_quirk));
    }

    #[test]
    fn test_drunk_pilot_needs_timeout() {
        let (mut units, mut ctx, config) = setup(UnitKind::Mech);
        ctx.pilot.tags.insert(PILOT_DRUNK_TAG.to_string());
        let mut dice = ScriptedDice::new([1, 1]);

        let sober = eject(&mut units, &ctx, 200.0, &config, &mut dice);
        assert!(sober.ejected());

        ctx.pilot.timeout_remaining = 1;
        let drunk = eject(&mut units, &ctx, 200.0, &config, &mut dice);
        assert_eq!(drunk.outcome, EjectionOutcome::Saved(EjectionSaveReason::DrunkPilot));
    }

    #[test]
    fn test_quirk_vetoes_off_without_quirks() {
        let (mut units, mut ctx, mut config) = setup(UnitKind::Mech);
        config.quirks_enabled = false;
        ctx.chassis_tags.insert(CHASSIS_NO_EJECT_TAG.to_string());
        let mut dice = ScriptedDice::new([1]);

        assert!(eject(&mut units, &ctx, 200.0, &config, &mut dice).ejected());
    }

    #[test]
    fn test_vehicle_uses_attack_damage() {
        let (mut units, mut ctx, config) = setup(UnitKind::Vehicle);
        ctx.damage_including_heat = 35.4;
        let mut dice = ScriptedDice::new([34]);

        // raw throw is irrelevant once the damage replaces it
        let result = eject(&mut units, &ctx, 0.0, &config, &mut dice);

        assert_eq!(result.difficulty, Some(35.0));
        assert!(result.ejected());
    }

    #[test]
    fn test_vehicle_no_eject_tag_does_not_veto() {
        let (mut units, mut ctx, config) = setup(UnitKind::Vehicle);
        ctx.damage_including_heat = 45.0;
        ctx.chassis_tags.insert(CHASSIS_NO_EJECT_TAG.to_string());
        let mut dice = ScriptedDice::new([2]);

        assert!(eject(&mut units, &ctx, 0.0, &config, &mut dice).ejected());
    }

    #[test]
    fn test_always_panic_skips_nothing() {
        let (mut units, ctx, mut config) = setup(UnitKind::Mech);
        config.always_panic = true;
        let mut dice = ScriptedDice::new([99]);

        // difficulty 0 after resist, but always_panic still rolls and fails
        let result = eject(&mut units, &ctx, 10.0, &config, &mut dice);

        assert_eq!(dice.rolls_used(), 1);
        assert!(result.ejected());
    }

    #[test]
    fn test_untracked_unit_stays_in() {
        let ctx = SavingThrowContext::healthy(UnitId::new(), UnitKind::Mech);
        let mut units = TrackedUnits::new();
        let mut dice = ScriptedDice::new([1]);

        let result = eject(&mut units, &ctx, 200.0, &PanicConfig::default(), &mut dice);

        assert_eq!(result.outcome, EjectionOutcome::Saved(EjectionSaveReason::Contained));
    }
}
