//! Panic status ladder
//!
//! Confident -> Stressed -> Panicked, one rung at a time unless a crit says otherwise.

use serde::{Deserialize, Serialize};

use crate::core::config::StatusMultipliers;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum PanicStatus {
    #[default]
    Confident,
    Stressed,
    Panicked,
}

impl PanicStatus {
    pub fn all() -> &'static [PanicStatus] {
        &[
            PanicStatus::Confident,
            PanicStatus::Stressed,
            PanicStatus::Panicked,
        ]
    }

    /// One step up, saturating at Panicked
    pub fn worsened(self) -> Self {
        match self {
            PanicStatus::Confident => PanicStatus::Stressed,
            PanicStatus::Stressed | PanicStatus::Panicked => PanicStatus::Panicked,
        }
    }

    /// One step down, saturating at Confident
    pub fn improved(self) -> Self {
        match self {
            PanicStatus::Panicked => PanicStatus::Stressed,
            PanicStatus::Stressed | PanicStatus::Confident => PanicStatus::Confident,
        }
    }

    /// Difficulty multiplier for a save taken in this status
    pub fn multiplier(self, multipliers: &StatusMultipliers) -> f32 {
        match self {
            PanicStatus::Confident => multipliers.confident,
            PanicStatus::Stressed => multipliers.stressed,
            PanicStatus::Panicked => multipliers.panicked,
        }
    }
}

impl std::fmt::Display for PanicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PanicStatus::Confident => "Confident",
            PanicStatus::Stressed => "Stressed",
            PanicStatus::Panicked => "Panicked",
        };
        write!(f, "{}", name)
    }
}
