//! Property tests for the panic ladder and the calculator

use panic_system::core::config::PanicConfig;
use panic_system::core::types::{UnitId, UnitKind};
use panic_system::panic::{
    compute_saving_throw, resolve_ejection, resolve_panic_save, CriticalRoll, PanicOutcome,
    PanicReport, PanicStatus, SavingThrowContext, ScriptedDice, TrackedUnits,
};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = PanicStatus> {
    prop_oneof![
        Just(PanicStatus::Confident),
        Just(PanicStatus::Stressed),
        Just(PanicStatus::Panicked),
    ]
}

fn fraction() -> impl Strategy<Value = f32> {
    0.0f32..=1.0
}

proptest! {
    /// A mech's status never moves up more than one step unless the save crit-failed
    #[test]
    fn mech_status_climbs_one_step_without_crit(
        start in status_strategy(),
        throw in 0.0f32..300.0,
        roll in 1i32..=100,
        health in fraction(),
    ) {
        let config = PanicConfig::default();
        let mut ctx = SavingThrowContext::healthy(UnitId::new(), UnitKind::Mech);
        ctx.health = health;
        let mut units = TrackedUnits::new();
        units.track(ctx.unit).panic_status = start;

        let result = resolve_panic_save(
            &mut units, &ctx, throw, &config,
            &mut ScriptedDice::new([roll]), &mut PanicReport::disabled(),
        );
        let after = units.get(ctx.unit).unwrap().panic_status;

        match (result.outcome, result.critical) {
            (PanicOutcome::Failed, Some(CriticalRoll::Failure)) => {
                prop_assert_eq!(after, PanicStatus::Panicked)
            }
            (PanicOutcome::Failed, None) => prop_assert_eq!(after, start.worsened()),
            (PanicOutcome::Saved, Some(CriticalRoll::Success)) => {
                prop_assert_eq!(after, start.improved())
            }
            _ => prop_assert_eq!(after, start),
        }
    }

    /// A crit save drops exactly one step, floored at Confident
    #[test]
    fn crit_save_drops_one_step(start in status_strategy(), throw in 1.0f32..500.0) {
        let config = PanicConfig::default();
        let ctx = SavingThrowContext::healthy(UnitId::new(), UnitKind::Mech);
        let mut units = TrackedUnits::new();
        units.track(ctx.unit).panic_status = start;

        resolve_panic_save(
            &mut units, &ctx, throw, &config,
            &mut ScriptedDice::new([100]), &mut PanicReport::disabled(),
        );

        let after = units.get(ctx.unit).unwrap().panic_status;
        prop_assert_eq!(after, start.improved());
        prop_assert!(after >= PanicStatus::Confident);
    }

    /// Ejection immunity never survives an ejection check
    #[test]
    fn prevent_ejection_cleared_by_any_check(
        prevent in any::<bool>(),
        throw in -50.0f32..300.0,
        roll in 1i32..=100,
        vehicle in any::<bool>(),
    ) {
        let config = PanicConfig::default();
        let kind = if vehicle { UnitKind::Vehicle } else { UnitKind::Mech };
        let ctx = SavingThrowContext::healthy(UnitId::new(), kind);
        let mut units = TrackedUnits::new();
        units.track(ctx.unit).prevent_ejection = prevent;

        resolve_ejection(
            &mut units, &ctx, throw, &config,
            &mut ScriptedDice::new([roll]), &mut PanicReport::disabled(),
        );

        prop_assert!(!units.get(ctx.unit).unwrap().prevent_ejection);
    }

    /// Same context and config, same difficulty
    #[test]
    fn calculator_is_deterministic(
        head in fraction(),
        center_torso in fraction(),
        left_leg in fraction(),
        pilot_health in fraction(),
        morale in 0.0f32..100.0,
        unsteady in any::<bool>(),
        guts in 0u32..10,
    ) {
        let config = PanicConfig::default();
        let mut ctx = SavingThrowContext::healthy(UnitId::new(), UnitKind::Mech);
        ctx.locations.head = head;
        ctx.locations.center_torso = center_torso;
        ctx.locations.left_leg = left_leg;
        ctx.pilot.health = pilot_health;
        ctx.pilot.guts = guts;
        ctx.team_morale = morale;
        ctx.unsteady = unsteady;

        let first = compute_saving_throw(&ctx, &config).unwrap();
        let second = compute_saving_throw(&ctx, &config).unwrap();

        prop_assert_eq!(first.value.to_bits(), second.value.to_bits());
        prop_assert_eq!(first, second);
    }

    /// Below-1 panic difficulties never roll, even with always_panic
    #[test]
    fn tiny_panic_difficulty_always_skips(throw in -100.0f32..0.5, always_panic in any::<bool>()) {
        let mut config = PanicConfig::default();
        config.always_panic = always_panic;
        let ctx = SavingThrowContext::healthy(UnitId::new(), UnitKind::Mech);
        let mut units = TrackedUnits::new();
        units.track(ctx.unit);
        let mut dice = ScriptedDice::new([1]);

        let result = resolve_panic_save(
            &mut units, &ctx, throw, &config, &mut dice, &mut PanicReport::disabled(),
        );

        prop_assert_eq!(result.outcome, PanicOutcome::Skipped);
        prop_assert_eq!(dice.rolls_used(), 0);
    }
}
