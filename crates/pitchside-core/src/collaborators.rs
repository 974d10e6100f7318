use crate::math::Vec3;

/// Supplies the landing point for the next delivery.
pub trait TargetSource {
    /// Current landing-marker position.
    fn target_position(&self) -> Vec3;

    /// Height the ball centre should be at when it lands.
    fn target_height(&self) -> f32;
}

/// Supplies the release power for the next delivery.
pub trait PowerSource {
    /// Normalized power in `[0, 1]`.
    fn power(&self) -> f32;
}

/// A fixed landing point, for drivers that place the target directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTarget {
    pub position: Vec3,
    pub height: f32,
}

impl FixedTarget {
    pub fn new(position: Vec3, height: f32) -> Self {
        Self { position, height }
    }
}

impl TargetSource for FixedTarget {
    fn target_position(&self) -> Vec3 {
        self.position
    }

    fn target_height(&self) -> f32 {
        self.height
    }
}
