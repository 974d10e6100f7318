use serde::{Deserialize, Serialize};

use crate::delivery::EndReason;
use crate::math::Vec3;

/// Surface kinds a ball can touch during a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceTag {
    /// The prepared strip the ball is meant to bounce on.
    PitchSurface,
    /// The wicket at the batting end.
    EndMarker,
    /// Outfield or any ground that is not the pitch.
    GeneralGround,
    /// Anything else the collision layer reports.
    Other,
}

impl SurfaceTag {
    /// Why touching this surface ends a delivery, or `None` if it does not.
    pub fn end_reason(self) -> Option<EndReason> {
        match self {
            Self::EndMarker => Some(EndReason::Wicket),
            Self::GeneralGround => Some(EndReason::Ground),
            Self::PitchSurface | Self::Other => None,
        }
    }
}

/// A single physical contact reported by the collision layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub surface: SurfaceTag,
    /// Ball centre at the moment of contact.
    pub point: Vec3,
}

impl CollisionEvent {
    pub fn new(surface: SurfaceTag, point: Vec3) -> Self {
        Self { surface, point }
    }
}
