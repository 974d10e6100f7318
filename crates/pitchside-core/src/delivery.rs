use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Lateral behaviour selected for a delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BowlingMode {
    /// Curved flight; bounce follows the direction of travel along the curve.
    #[default]
    Swing,
    /// Straight flight; bounce turns by a power and side dependent angle.
    Spin,
}

/// Side the delivery is biased toward. Converts to the ±1 side multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Off,
    Leg,
}

impl Side {
    /// The side multiplier: `+1` for off, `-1` for leg.
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Off => 1.0,
            Self::Leg => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Off => Self::Leg,
            Self::Leg => Self::Off,
        }
    }
}

/// Why a delivery ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The ball reached the wicket.
    Wicket,
    /// The ball touched ground outside the pitch.
    Ground,
}

/// Notifications emitted by the simulation for the owning controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeliveryEvent {
    /// The one-shot bounce reaction was applied.
    Bounced {
        mode: BowlingMode,
        point: Vec3,
        velocity: Vec3,
    },
    /// The delivery concluded; collaborators can be re-armed.
    Ended { reason: EndReason, point: Vec3 },
}
