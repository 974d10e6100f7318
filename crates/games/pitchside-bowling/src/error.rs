use thiserror::Error;

use crate::delivery::DeliveryPhase;

/// Reasons a delivery request is rejected. The ball state is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    /// The target sits (almost) directly above or below the release point,
    /// so no finite flight time exists.
    #[error("target is {distance} units from the release point horizontally; too close to solve")]
    DegenerateTarget { distance: f32 },
    /// A delivery is already in flight.
    #[error("cannot start a delivery while {phase:?}")]
    NotIdle { phase: DeliveryPhase },
    #[error("power {0} is outside [0, 1]")]
    InvalidPower(f32),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0} is not finite")]
    NonFinite(&'static str),
}
