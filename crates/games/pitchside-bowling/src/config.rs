use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;
use crate::trajectory::MIN_HORIZONTAL_DISTANCE;

/// Horizontal release speed (units/s).
pub const FORWARD_SPEED: f32 = 18.0;
/// Vertical impulse applied at the bounce.
pub const BOUNCE_FORCE: f32 = 6.0;
/// Lateral offset scale for swing deliveries.
pub const SWING_STRENGTH: f32 = 4.0;
/// Maximum spin deflection at full power (degrees).
pub const SPIN_TURN_ANGLE: f32 = 25.0;
/// Downward gravity magnitude (units/s^2).
pub const GRAVITY: f32 = 9.81;

/// Sign applied to the side multiplier when turning a spin delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinConvention {
    /// Off side turns toward +X.
    #[default]
    Natural,
    /// Off side turns toward -X.
    Inverted,
}

impl SpinConvention {
    /// Turn direction for a given side multiplier.
    pub fn turn_direction(self, side_multiplier: f32) -> f32 {
        match self {
            Self::Natural => side_multiplier,
            Self::Inverted => -side_multiplier,
        }
    }
}

/// How swing deliveries move through the air.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingModel {
    /// Kinematic quadratic Bézier toward the target; the bounce follows the
    /// curve's direction of travel.
    #[default]
    Curve,
    /// Gravity flight plus a constant lateral acceleration; the bounce keeps
    /// the horizontal velocity.
    Drift,
}

/// Data-driven tuning for deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowlingConfig {
    pub forward_speed: f32,
    /// Vertical impulse at the bounce; divided by `ball_mass` to get the
    /// velocity change.
    pub bounce_force: f32,
    pub ball_mass: f32,
    pub swing_strength: f32,
    /// Spin deflection at power 1.0 (degrees).
    pub spin_turn_angle: f32,
    pub gravity: f32,
    /// Minimum step length before the swing direction is updated.
    pub direction_epsilon: f32,
    /// Targets closer than this (horizontally) are rejected.
    pub min_horizontal_distance: f32,
    pub spin_convention: SpinConvention,
    pub swing_model: SwingModel,
    /// Return to idle immediately when a delivery ends.
    pub auto_reset: bool,
    /// Maximum positions kept in the ball's trail.
    pub trail_capacity: usize,
}

impl Default for BowlingConfig {
    fn default() -> Self {
        Self {
            forward_speed: FORWARD_SPEED,
            bounce_force: BOUNCE_FORCE,
            ball_mass: 1.0,
            swing_strength: SWING_STRENGTH,
            spin_turn_angle: SPIN_TURN_ANGLE,
            gravity: GRAVITY,
            direction_epsilon: 1e-4,
            min_horizontal_distance: MIN_HORIZONTAL_DISTANCE,
            spin_convention: SpinConvention::Natural,
            swing_model: SwingModel::Curve,
            auto_reset: true,
            trail_capacity: 256,
        }
    }
}

impl BowlingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, DeliveryError> {
        let cfg: Self =
            toml::from_str(content).map_err(|e| DeliveryError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make the solver or the bounce undefined.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        let positive = [
            ("forward_speed", self.forward_speed),
            ("gravity", self.gravity),
            ("ball_mass", self.ball_mass),
            ("min_horizontal_distance", self.min_horizontal_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DeliveryError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("bounce_force", self.bounce_force),
            ("swing_strength", self.swing_strength),
            ("direction_epsilon", self.direction_epsilon),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DeliveryError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !self.spin_turn_angle.is_finite() {
            return Err(DeliveryError::NonFinite("spin_turn_angle"));
        }
        Ok(())
    }

    /// Vertical velocity change produced by the bounce impulse.
    pub fn bounce_speed(&self) -> f32 {
        self.bounce_force / self.ball_mass
    }
}
