//! Encounter - runs the whole panic pipeline for one attack at a time
//!
//! Owns the config, the tracked units, the dice, and the diagnostics report
//! for a single encounter. Nothing here is global.

use serde::{Deserialize, Serialize};

use crate::core::config::PanicConfig;
use crate::core::error::Result;
use crate::core::types::UnitId;
use crate::panic::constants::{crit_success_reachable, CALLOUT_CHANCE_ONE_IN};
use crate::panic::context::SavingThrowContext;
use crate::panic::dice::Dice;
use crate::panic::ejection::{resolve_ejection, EjectionResolution};
use crate::panic::narration::NarrationRequest;
use crate::panic::report::PanicReport;
use crate::panic::resolution::{can_panic, resolve_panic_save, PanicResolution};
use crate::panic::saving_throw::compute_saving_throw;
use crate::panic::status::PanicStatus;
use crate::panic::tracker::{TrackedUnit, TrackedUnits};

/// Everything that came out of one attack's panic check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResolution {
    pub unit: UnitId,
    /// Raw calculator output; None when the computation failed
    pub saving_throw: Option<f32>,
    pub panic: PanicResolution,
    /// Only present after a failed panic save with a usable saving throw
    pub ejection: Option<EjectionResolution>,
    /// Callouts first, then panic save, then ejection
    pub narration: Vec<NarrationRequest>,
    pub status_after: PanicStatus,
}

impl AttackResolution {
    pub fn ejected(&self) -> bool {
        self.ejection.as_ref().is_some_and(|e| e.ejected())
    }
}

pub struct Encounter<D: Dice> {
    config: PanicConfig,
    units: TrackedUnits,
    dice: D,
    report: PanicReport,
}

impl<D: Dice> Encounter<D> {
    /// Start an encounter. Fails on an inconsistent config.
    pub fn new(config: PanicConfig, dice: D) -> Result<Self> {
        config.validate()?;
        if !crit_success_reachable(config.roll_range) {
            tracing::debug!(
                "Roll range tops out at {}, crit saves are off",
                config.roll_range.max()
            );
        }
        let report = PanicReport::new(config.debug);
        Ok(Self {
            config,
            units: TrackedUnits::new(),
            dice,
            report,
        })
    }

    pub fn config(&self) -> &PanicConfig {
        &self.config
    }

    pub fn units(&self) -> &TrackedUnits {
        &self.units
    }

    pub fn report(&self) -> &PanicReport {
        &self.report
    }

    pub fn take_report_lines(&mut self) -> Vec<String> {
        self.report.take_lines()
    }

    pub fn track(&mut self, unit: UnitId) -> &TrackedUnit {
        self.units.track(unit)
    }

    pub fn untrack(&mut self, unit: UnitId) -> Option<TrackedUnit> {
        self.units.untrack(unit)
    }

    pub fn status(&self, unit: UnitId) -> Option<PanicStatus> {
        self.units.get(unit).map(|u| u.panic_status)
    }

    /// Run the full check for a unit that just took damage
    ///
    /// Units seen for the first time are tracked at Confident. If the saving
    /// throw can't be computed nothing changes and no ejection check is made;
    /// the save counts as failed for units that can panic and passes for
    /// units that can't.
    pub fn resolve_attack(&mut self, ctx: &SavingThrowContext) -> AttackResolution {
        if !self.units.contains(ctx.unit) {
            tracing::debug!("Tracking {:?} on first panic check", ctx.unit);
            self.units.track(ctx.unit);
        }

        self.report.header(ctx.health);

        let throw = match compute_saving_throw(ctx, &self.config) {
            Ok(throw) => throw,
            Err(err) => {
                self.report.note(format!("Saving throw error: {}", err));
                // units that never panic pass no matter what the snapshot says
                let panic = if can_panic(ctx.kind, &self.config) {
                    tracing::warn!("Saving throw for {:?} failed, treating as failed save: {}", ctx.unit, err);
                    PanicResolution::failed()
                } else {
                    tracing::debug!("Saving throw for {:?} failed, unit can't panic: {}", ctx.unit, err);
                    PanicResolution::exempt()
                };
                return AttackResolution {
                    unit: ctx.unit,
                    saving_throw: None,
                    panic,
                    ejection: None,
                    narration: Vec::new(),
                    status_after: self.status(ctx.unit).unwrap_or_default(),
                };
            }
        };
        self.report.modifiers(&throw.modifiers);

        let mut narration: Vec<NarrationRequest> = throw
            .callouts
            .iter()
            .filter(|_| self.dice.one_in(CALLOUT_CHANCE_ONE_IN))
            .map(|c| c.to_request(ctx.unit, &self.config.strings))
            .collect();

        let panic = resolve_panic_save(
            &mut self.units,
            ctx,
            throw.value,
            &self.config,
            &mut self.dice,
            &mut self.report,
        );
        narration.extend(panic.narration.iter().cloned());

        let ejection = if panic.is_failed() {
            let ejection = resolve_ejection(
                &mut self.units,
                ctx,
                throw.value,
                &self.config,
                &mut self.dice,
                &mut self.report,
            );
            narration.extend(ejection.narration.iter().cloned());
            Some(ejection)
        } else {
            None
        };

        AttackResolution {
            unit: ctx.unit,
            saving_throw: Some(throw.value),
            panic,
            ejection,
            narration,
            status_after: self.status(ctx.unit).unwrap_or_default(),
        }
    }

    /// Close out a round; returns the units that calmed down
    pub fn end_round(&mut self) -> Vec<UnitId> {
        let recovered = self.units.end_round(self.config.recover_each_round);
        for unit in &recovered {
            tracing::debug!("{:?} recovered one panic level at round end", unit);
        }
        recovered
    }

    /// Forget every tracked unit
    pub fn end_encounter(&mut self) {
        tracing::info!("Encounter over, dropping {} tracked units", self.units.len());
        self.units.clear();
        self.report.take_lines();
    }
}
