//! Percentile rolls for panic and ejection saves
//!
//! Everything random in the panic system goes through `Dice` so encounters
//! can be replayed from a seed or scripted roll by roll.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range of a percentile roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollRange {
    /// 1 to 99. The crit save on 100 can never come up.
    SourceLiteral,
    /// 1 to 100
    #[default]
    Percentile,
}

impl RollRange {
    pub fn min(&self) -> i32 {
        1
    }

    pub fn max(&self) -> i32 {
        match self {
            RollRange::SourceLiteral => 99,
            RollRange::Percentile => 100,
        }
    }
}

/// Source of randomness for saves and cosmetic callouts
pub trait Dice {
    /// Roll a percentile die within `range` (inclusive on both ends)
    fn roll(&mut self, range: RollRange) -> i32;

    /// True one time in `n`
    fn one_in(&mut self, n: u32) -> bool;
}

impl Dice for ChaCha8Rng {
    fn roll(&mut self, range: RollRange) -> i32 {
        self.gen_range(range.min()..=range.max())
    }

    fn one_in(&mut self, n: u32) -> bool {
        n > 0 && self.gen_ratio(1, n)
    }
}

/// Dice that replay a fixed sequence of rolls
///
/// Once the script runs out the last roll repeats. Callouts come from a
/// separate script and default to not showing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
    callouts: VecDeque<bool>,
    last_roll: Option<i32>,
    rolls_used: usize,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Script the 1-in-n checks as well
    pub fn with_callouts(mut self, callouts: impl IntoIterator<Item = bool>) -> Self {
        self.callouts = callouts.into_iter().collect();
        self
    }

    /// How many rolls have been drawn so far
    pub fn rolls_used(&self) -> usize {
        self.rolls_used
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, range: RollRange) -> i32 {
        self.rolls_used += 1;
        let roll = self
            .rolls
            .pop_front()
            .or(self.last_roll)
            .unwrap_or_else(|| range.max());
        self.last_roll = Some(roll);
        roll
    }

    fn one_in(&mut self, _n: u32) -> bool {
        self.callouts.pop_front().unwrap_or(false)
    }
}
