use serde::{Deserialize, Serialize};

use pitchside_core::math::{UP, Vec3, horizontal, is_finite};

use crate::config::BowlingConfig;
use crate::error::DeliveryError;

/// Horizontal separation below which a launch cannot be solved.
pub const MIN_HORIZONTAL_DISTANCE: f32 = 1e-3;

/// Initial velocity and flight time that land the ball on the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchSolution {
    pub velocity: Vec3,
    pub flight_time: f32,
}

/// Solve the launch velocity from `from` to the horizontal location of
/// `target`, arriving at `target_height`, with a fixed horizontal `speed`
/// under downward gravity of magnitude `gravity`.
pub fn solve_launch(
    from: Vec3,
    target: Vec3,
    target_height: f32,
    speed: f32,
    gravity: f32,
) -> Result<LaunchSolution, DeliveryError> {
    solve_launch_within(
        from,
        target,
        target_height,
        speed,
        gravity,
        MIN_HORIZONTAL_DISTANCE,
    )
}

/// [`solve_launch`] using the speed, gravity and distance floor from `config`.
pub fn solve_launch_with(
    config: &BowlingConfig,
    from: Vec3,
    target: Vec3,
    target_height: f32,
) -> Result<LaunchSolution, DeliveryError> {
    solve_launch_within(
        from,
        target,
        target_height,
        config.forward_speed,
        config.gravity,
        config.min_horizontal_distance,
    )
}

fn solve_launch_within(
    from: Vec3,
    target: Vec3,
    target_height: f32,
    speed: f32,
    gravity: f32,
    min_distance: f32,
) -> Result<LaunchSolution, DeliveryError> {
    if !is_finite(from) {
        return Err(DeliveryError::NonFinite("release position"));
    }
    if !is_finite(target) {
        return Err(DeliveryError::NonFinite("target position"));
    }
    if !target_height.is_finite() {
        return Err(DeliveryError::NonFinite("target height"));
    }
    if !(speed.is_finite() && speed > 0.0) {
        return Err(DeliveryError::InvalidConfig(format!(
            "forward speed must be positive, got {speed}"
        )));
    }
    if !(gravity.is_finite() && gravity > 0.0) {
        return Err(DeliveryError::InvalidConfig(format!(
            "gravity must be positive, got {gravity}"
        )));
    }

    let delta = horizontal(target - from);
    let distance = delta.length();
    if distance < min_distance {
        return Err(DeliveryError::DegenerateTarget { distance });
    }

    let flight_time = distance / speed;
    let drop = target_height - from.y;
    let vertical = (drop - 0.5 * -gravity * flight_time * flight_time) / flight_time;
    let velocity = delta / distance * speed + UP * vertical;

    Ok(LaunchSolution {
        velocity,
        flight_time,
    })
}

/// Position after `t` seconds of ballistic flight.
pub fn ballistic_position(from: Vec3, velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    from + velocity * t + UP * (0.5 * -gravity * t * t)
}

/// Velocity after `t` seconds of ballistic flight.
pub fn ballistic_velocity(velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    velocity + UP * (-gravity * t)
}
