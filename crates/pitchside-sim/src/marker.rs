use serde::{Deserialize, Serialize};

use pitchside_bowling::error::DeliveryError;
use pitchside_core::collaborators::TargetSource;
use pitchside_core::math::Vec3;

/// Movement range for the landing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub move_speed: f32,
    /// Lateral range (X) as `[min, max]`.
    pub straight_limits: [f32; 2],
    /// Range along the pitch (Z) as `[min, max]`.
    pub length_limits: [f32; 2],
    pub start: Vec3,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            straight_limits: [-1.2, 1.2],
            length_limits: [8.0, 18.0],
            start: Vec3::new(0.0, 0.0, 14.0),
        }
    }
}

impl MarkerConfig {
    /// Reject ranges the marker cannot be clamped into.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        let [x_min, x_max] = self.straight_limits;
        let [z_min, z_max] = self.length_limits;
        for (name, value) in [
            ("marker.move_speed", self.move_speed),
            ("marker.straight_limits", x_min),
            ("marker.straight_limits", x_max),
            ("marker.length_limits", z_min),
            ("marker.length_limits", z_max),
        ] {
            if !value.is_finite() {
                return Err(DeliveryError::NonFinite(name));
            }
        }
        if !self.start.is_finite() {
            return Err(DeliveryError::NonFinite("marker.start"));
        }
        if self.move_speed <= 0.0 {
            return Err(DeliveryError::InvalidConfig(format!(
                "marker.move_speed must be positive, got {}",
                self.move_speed
            )));
        }
        for (name, min, max) in [
            ("straight_limits", x_min, x_max),
            ("length_limits", z_min, z_max),
        ] {
            if min > max {
                return Err(DeliveryError::InvalidConfig(format!(
                    "marker.{name} is inverted: [{min}, {max}]"
                )));
            }
        }
        Ok(())
    }
}

/// Where the bowler wants the ball to pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingMarker {
    config: MarkerConfig,
    position: Vec3,
    height: f32,
    locked: bool,
}

impl LandingMarker {
    /// `height` is the ball-centre height at landing.
    pub fn new(config: MarkerConfig, height: f32) -> Self {
        let mut marker = Self {
            position: config.start,
            config,
            height,
            locked: false,
        };
        marker.clamp();
        marker
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Hidden while a delivery is in flight.
    pub fn is_visible(&self) -> bool {
        !self.locked
    }

    /// Move by a steering input in `[-1, 1]` on each axis.
    pub fn nudge(&mut self, lateral: f32, along: f32, dt: f32) {
        if self.locked {
            return;
        }
        let step = Vec3::new(lateral.clamp(-1.0, 1.0), 0.0, along.clamp(-1.0, 1.0))
            * self.config.move_speed
            * dt;
        self.position += step;
        self.clamp();
    }

    /// Put the marker at `(x, z)`, clamped to its limits.
    pub fn place(&mut self, x: f32, z: f32) {
        if self.locked {
            return;
        }
        self.position.x = x;
        self.position.z = z;
        self.clamp();
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Unlock and return to the start position.
    pub fn reset(&mut self) {
        self.unlock();
        self.position = self.config.start;
        self.clamp();
    }

    fn clamp(&mut self) {
        let [x_min, x_max] = self.config.straight_limits;
        let [z_min, z_max] = self.config.length_limits;
        self.position.x = self.position.x.min(x_max).max(x_min);
        self.position.z = self.position.z.min(z_max).max(z_min);
    }
}

impl TargetSource for LandingMarker {
    fn target_position(&self) -> Vec3 {
        self.position
    }

    fn target_height(&self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> LandingMarker {
        LandingMarker::new(MarkerConfig::default(), 0.036)
    }

    #[test]
    fn nudge_moves_at_speed() {
        let mut m = marker();
        m.nudge(1.0, -1.0, 0.1);
        assert!((m.position() - Vec3::new(0.5, 0.0, 13.5)).length() < 1e-5);
    }

    #[test]
    fn nudge_is_clamped() {
        let mut m = marker();
        m.nudge(-1.0, 1.0, 10.0);
        assert_eq!(m.position(), Vec3::new(-1.2, 0.0, 18.0));
    }

    #[test]
    fn locked_marker_hidden_and_fixed() {
        let mut m = marker();
        m.lock();
        assert!(!m.is_visible());
        m.nudge(1.0, 1.0, 1.0);
        m.place(0.5, 9.0);
        assert_eq!(m.position(), MarkerConfig::default().start);
    }

    #[test]
    fn reset_unlocks_and_restores() {
        let mut m = marker();
        m.place(1.0, 9.0);
        m.lock();
        m.reset();
        assert!(m.is_visible());
        assert_eq!(m.position(), MarkerConfig::default().start);
    }

    #[test]
    fn inverted_limits_rejected() {
        let config = MarkerConfig {
            straight_limits: [1.2, -1.2],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DeliveryError::InvalidConfig(_))
        ));

        let mut m = LandingMarker::new(config, 0.036);
        m.place(0.5, 12.0);
        assert!(m.position().is_finite());
    }

    #[test]
    fn non_finite_limits_rejected() {
        let config = MarkerConfig {
            length_limits: [8.0, f32::NAN],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(DeliveryError::NonFinite("marker.length_limits"))
        );
        assert!(MarkerConfig::default().validate().is_ok());
    }

    #[test]
    fn exposes_target() {
        let mut m = marker();
        m.place(0.4, 11.0);
        assert_eq!(m.target_position(), Vec3::new(0.4, 0.0, 11.0));
        assert_eq!(m.target_height(), 0.036);
    }
}
