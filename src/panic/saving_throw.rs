//! Saving-throw calculator
//!
//! Folds the defender's condition into one difficulty number. Pure: the same
//! context and config always give the same result. Flavor callouts come back
//! as requests instead of being rolled here.

use serde::{Deserialize, Serialize};

use crate::core::config::PanicConfig;
use crate::core::error::{PanicError, Result};
use crate::panic::constants::CHASSIS_DISTRACTING_TAG;
use crate::panic::context::SavingThrowContext;
use crate::panic::narration::Callout;

/// One term that went into the total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedModifier {
    pub name: String,
    pub delta: f32,
    /// Running total after this term
    pub total: f32,
}

/// The computed difficulty and how it got there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingThrow {
    pub value: f32,
    pub modifiers: Vec<AppliedModifier>,
    pub callouts: Vec<Callout>,
}

impl SavingThrow {
    /// Numeric stand-in for a failed computation
    pub const FAILURE_SENTINEL: f32 = -1.0;

    /// Collapse a calculator result into a plain number
    pub fn value_or_sentinel(result: &Result<SavingThrow>) -> f32 {
        match result {
            Ok(throw) => throw.value,
            Err(_) => Self::FAILURE_SENTINEL,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    total: f32,
    modifiers: Vec<AppliedModifier>,
    callouts: Vec<Callout>,
}

impl Accumulator {
    fn add(&mut self, name: impl Into<String>, delta: f32) {
        self.total += delta;
        self.modifiers.push(AppliedModifier {
            name: name.into(),
            delta,
            total: self.total,
        });
    }

    fn subtract(&mut self, name: impl Into<String>, amount: f32) {
        self.total -= amount;
        self.modifiers.push(AppliedModifier {
            name: name.into(),
            delta: -amount,
            total: self.total,
        });
    }

    /// weight × damage fraction, only for damaged locations
    fn location(&mut self, name: &str, weight: f32, remaining: f32) {
        if remaining < 1.0 {
            self.add(name, weight * (1.0 - remaining));
        }
    }

    fn finish(self) -> SavingThrow {
        SavingThrow {
            value: self.total,
            modifiers: self.modifiers,
            callouts: self.callouts,
        }
    }
}

/// Compute the panic difficulty for a defender
///
/// Terms are added in a fixed order. Mech-only terms (quirks, heat, pilot,
/// stance, locations, alone) come first, then terms for every unit.
/// Support vehicles that can panic add this attack's damage on top of
/// whatever has accumulated. Resolve and pilot skill come off last.
pub fn compute_saving_throw(ctx: &SavingThrowContext, config: &PanicConfig) -> Result<SavingThrow> {
    ctx.validate()?;
    if !(config.resolve.median_resolve > 0.0) {
        return Err(PanicError::Computation(format!(
            "median_resolve must be positive ({})",
            config.resolve.median_resolve
        )));
    }

    let weights = &config.modifiers;
    let mut acc = Accumulator::default();

    if ctx.kind.is_mech() {
        if config.quirks_enabled && ctx.attacker_has_chassis_tag(CHASSIS_DISTRACTING_TAG) {
            acc.add("Distracting mech", weights.distracting);
        }

        if weights.heat_damage_factor > 0.0 {
            acc.add(
                format!("Heat damage {}", ctx.heat.external_damage),
                weights.heat_damage_factor * ctx.heat.external_damage,
            );
        }

        if ctx.pilot.health < 1.0 {
            acc.add("Pilot injuries", weights.pilot_health_max * (1.0 - ctx.pilot.health));
        }

        if ctx.unsteady {
            acc.add("Unsteady", weights.unsteady);
        }

        if ctx.knockdown {
            acc.add("Knockdown", weights.unsteady);
        }

        if weights.overheated > 0.0 && ctx.heat.is_overheated() {
            acc.add("Heat", weights.overheated);
        }

        if weights.shutdown > 0.0 && ctx.shutdown {
            acc.add("Shutdown", weights.shutdown);
        }

        let loc = &ctx.locations;
        acc.location("Head", weights.head_max, loc.head);
        acc.location("CT", weights.center_torso_max, loc.center_torso);
        acc.location("LT", weights.side_torso_max, loc.left_torso);
        acc.location("RT", weights.side_torso_max, loc.right_torso);
        acc.location("LL", weights.legged_max, loc.left_leg);
        acc.location("RL", weights.legged_max, loc.right_leg);

        if ctx.is_alone() {
            acc.callouts.push(Callout::Alone);
            acc.add("Alone", weights.alone);
        }
    }

    if ctx.is_weaponless() {
        acc.callouts.push(Callout::Weaponless);
        acc.add("Weaponless", weights.weaponless);
    }

    let panicking_vehicle = config.vehicles_can_panic && ctx.kind.is_vehicle();

    // Vehicles have no graduated damage model; this attack's damage stands in for it
    if panicking_vehicle {
        acc.add("Vehicle damage", ctx.damage_including_heat);
    }

    let resolve = &config.resolve;
    let mut resolve_modifier = resolve.resolve_max_modifier * (ctx.team_morale - resolve.median_resolve)
        / resolve.median_resolve;
    if panicking_vehicle {
        resolve_modifier *= resolve.vehicle_resolve_factor;
    }
    acc.subtract(format!("Resolve {}", ctx.team_morale), resolve_modifier);

    let mut guts_and_tactics = ctx.pilot.guts as f32 * resolve.guts_ejection_resist_per_point
        + ctx.pilot.tactics as f32 * resolve.tactics_ejection_resist_per_point;
    if panicking_vehicle {
        guts_and_tactics *= resolve.vehicle_guts_and_tactics_factor;
    }
    acc.subtract("Guts and Tactics", guts_and_tactics);

    Ok(acc.finish())
}
