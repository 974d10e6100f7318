use serde::{Deserialize, Serialize};

use pitchside_core::collision::{CollisionEvent, SurfaceTag};
use pitchside_core::math::Vec3;

use crate::ball::BallState;
use crate::trajectory::{ballistic_position, ballistic_velocity};

/// Pitch geometry plus the integrator and contact detector that stand in
/// for a physics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchWorld {
    /// Height of the ground plane.
    pub pitch_y: f32,
    pub ball_radius: f32,
    /// Half width of the prepared strip (X).
    pub pitch_half_width: f32,
    /// Strip extent along the bowling direction (Z).
    pub pitch_start_z: f32,
    pub pitch_end_z: f32,
    /// Box at the batting end that concludes a delivery on contact. It
    /// spans the strip and the height a bounced ball can reach, and is deep
    /// enough that a ball at full speed cannot step over it in one tick.
    pub end_marker_center: Vec3,
    pub end_marker_half_extents: Vec3,
    /// Where the ball rests between deliveries.
    pub release_point: Vec3,
    /// Slack allowed when deciding the ball is touching the ground.
    pub contact_tolerance: f32,
}

impl Default for PitchWorld {
    fn default() -> Self {
        Self {
            pitch_y: 0.0,
            ball_radius: 0.036,
            pitch_half_width: 1.5,
            pitch_start_z: -1.2,
            pitch_end_z: 21.2,
            end_marker_center: Vec3::new(0.0, 1.25, 20.0),
            end_marker_half_extents: Vec3::new(1.5, 1.25, 0.25),
            release_point: Vec3::new(0.0, 2.2, 0.0),
            contact_tolerance: 1e-3,
        }
    }
}

impl PitchWorld {
    /// Ball-centre height when resting on the ground.
    pub fn contact_height(&self) -> f32 {
        self.pitch_y + self.ball_radius
    }

    /// Landing height handed to the trajectory solver.
    pub fn target_height(&self) -> f32 {
        self.contact_height()
    }

    /// Whether a horizontal location lies on the prepared strip.
    pub fn on_pitch(&self, point: Vec3) -> bool {
        point.x.abs() <= self.pitch_half_width
            && point.z >= self.pitch_start_z
            && point.z <= self.pitch_end_z
    }

    /// Exact constant-gravity step for a physics-driven ball.
    pub fn integrate(&self, ball: &mut BallState, gravity: f32, dt: f32) {
        if !(ball.is_active && ball.physics_enabled) || dt <= 0.0 {
            return;
        }
        ball.position = ballistic_position(ball.position, ball.velocity, gravity, dt);
        ball.velocity = ballistic_velocity(ball.velocity, gravity, dt);
    }

    /// Contacts for the ball's current pose, in detection order: ground
    /// first, then the end marker.
    pub fn detect_contacts(&self, ball: &BallState) -> Vec<CollisionEvent> {
        let mut contacts = Vec::new();
        if !ball.is_active {
            return contacts;
        }

        if self.touching_ground(ball) {
            let surface = if self.on_pitch(ball.position) {
                SurfaceTag::PitchSurface
            } else {
                SurfaceTag::GeneralGround
            };
            let point = Vec3::new(ball.position.x, self.contact_height(), ball.position.z);
            contacts.push(CollisionEvent::new(surface, point));
        }

        if self.touching_end_marker(ball.position) {
            contacts.push(CollisionEvent::new(SurfaceTag::EndMarker, ball.position));
        }
        contacts
    }

    /// Push a ball that sank below the ground back onto it.
    pub fn settle_on_ground(&self, ball: &mut BallState) {
        if ball.is_active && ball.position.y < self.contact_height() {
            ball.position.y = self.contact_height();
        }
    }

    /// Cancel downward motion of a ball resting on the ground.
    pub fn resolve_ground(&self, ball: &mut BallState) {
        if ball.is_active && ball.physics_enabled && self.touching_ground(ball) {
            ball.velocity.y = 0.0;
        }
    }

    fn touching_ground(&self, ball: &BallState) -> bool {
        ball.position.y <= self.contact_height() + self.contact_tolerance && ball.velocity.y <= 0.0
    }

    fn touching_end_marker(&self, center: Vec3) -> bool {
        let min = self.end_marker_center - self.end_marker_half_extents;
        let max = self.end_marker_center + self.end_marker_half_extents;
        let closest = center.max(min).min(max);
        closest.distance_squared(center) <= self.ball_radius * self.ball_radius
    }
}
