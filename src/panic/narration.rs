//! Narration requests for the presentation layer
//!
//! The panic system never draws anything. It hands these back and the
//! host decides how (and whether) to show them.

use serde::{Deserialize, Serialize};

use crate::core::config::NarrationStrings;
use crate::core::types::UnitId;

/// How a stacked info sequence should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageNature {
    CriticalHit,
    PilotInjury,
}

/// Something the host should show the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NarrationRequest {
    /// Floating text over the unit
    Floatie { unit: UnitId, text: String },
    /// Info sequence pushed onto the unit's message stack
    Sequence {
        unit: UnitId,
        text: String,
        nature: MessageNature,
    },
}

impl NarrationRequest {
    pub fn floatie(unit: UnitId, text: impl Into<String>) -> Self {
        NarrationRequest::Floatie {
            unit,
            text: text.into(),
        }
    }

    pub fn sequence(unit: UnitId, text: impl Into<String>, nature: MessageNature) -> Self {
        NarrationRequest::Sequence {
            unit,
            text: text.into(),
            nature,
        }
    }

    pub fn unit(&self) -> UnitId {
        match self {
            NarrationRequest::Floatie { unit, .. } | NarrationRequest::Sequence { unit, .. } => {
                *unit
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            NarrationRequest::Floatie { text, .. } | NarrationRequest::Sequence { text, .. } => {
                text
            }
        }
    }
}

/// Flavor lines the calculator asks for when a condition applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Callout {
    /// Every ally is down
    Alone,
    /// No weapon can fire
    Weaponless,
}

impl Callout {
    pub fn text<'a>(&self, strings: &'a NarrationStrings) -> &'a str {
        match self {
            Callout::Alone => &strings.alone,
            Callout::Weaponless => &strings.no_weapons,
        }
    }

    pub fn to_request(self, unit: UnitId, strings: &NarrationStrings) -> NarrationRequest {
        NarrationRequest::floatie(unit, self.text(strings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callout_uses_configured_text() {
        let mut strings = NarrationStrings::default();
        strings.alone = "Nobody left".to_string();
        let unit = UnitId::new();

        let request = Callout::Alone.to_request(unit, &strings);

        assert_eq!(request.unit(), unit);
        assert_eq!(request.text(), "Nobody left");
        assert!(matches!(request, NarrationRequest::Floatie { .. }));
    }

    #[test]
    fn test_sequence_keeps_nature() {
        let request =
            NarrationRequest::sequence(UnitId::new(), "PANIC", MessageNature::CriticalHit);
        assert!(matches!(
            request,
            NarrationRequest::Sequence {
                nature: MessageNature::CriticalHit,
                ..
            }
        ));
    }
}
