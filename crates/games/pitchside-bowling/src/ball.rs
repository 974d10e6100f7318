use serde::{Deserialize, Serialize};

use pitchside_core::math::Vec3;

/// Kinematic state of the ball. Owned and mutated by the delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// One-shot bounce latch; set at most once per delivery.
    pub has_bounced: bool,
    pub is_active: bool,
    /// Seconds spent airborne before the bounce.
    pub air_elapsed: f32,
    /// Solved flight time to the landing point.
    pub total_air_time: f32,
    /// Whether gravity-driven integration moves the ball.
    pub physics_enabled: bool,
    /// Recent positions, oldest first.
    pub trail: Vec<Vec3>,
}

impl BallState {
    /// A ball resting at `start` with physics disabled.
    pub fn at_rest(start: Vec3) -> Self {
        Self {
            position: start,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            has_bounced: false,
            is_active: false,
            air_elapsed: 0.0,
            total_air_time: 0.0,
            physics_enabled: false,
            trail: Vec::new(),
        }
    }

    /// Restore the pre-delivery rest state at `start`.
    ///
    /// Idempotent: resetting twice leaves the same state as resetting once.
    pub fn reset(&mut self, start: Vec3) {
        self.is_active = false;
        self.has_bounced = false;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.air_elapsed = 0.0;
        self.total_air_time = 0.0;
        self.physics_enabled = false;
        self.position = start;
        self.trail.clear();
    }

    /// Append the current position to the trail, dropping the oldest entries
    /// past `capacity`.
    pub fn record_trail(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if self.trail.len() >= capacity {
            let excess = self.trail.len() + 1 - capacity;
            self.trail.drain(..excess);
        }
        self.trail.push(self.position);
    }
}
