//! Scripted reactions applied at the first pitch contact of a delivery.
//!
//! Every reaction discards the downward velocity (bounces are not elastic)
//! and adds a fixed vertical impulse. The functions here are pure; the
//! one-shot latch lives in the delivery state machine.

use pitchside_core::delivery::{BowlingMode, Side};
use pitchside_core::math::{BOWLING_DIRECTION, UP, Vec3, horizontal, rotate_about_up};

use crate::config::BowlingConfig;

/// What the reaction needs to know about the delivery at contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceInput {
    pub mode: BowlingMode,
    pub power: f32,
    pub side: Side,
    /// Ball velocity at contact.
    pub velocity: Vec3,
    /// Travel direction tracked along the swing curve, when one exists.
    pub swing_direction: Option<Vec3>,
}

/// Post-bounce velocity for the given contact.
pub fn react(input: &BounceInput, config: &BowlingConfig) -> Vec3 {
    let bounce_speed = config.bounce_speed();
    match (input.mode, input.swing_direction) {
        (BowlingMode::Swing, Some(direction)) => swing_bounce(
            direction,
            input.velocity,
            config.forward_speed,
            bounce_speed,
        ),
        (BowlingMode::Swing, None) => drift_bounce(input.velocity, bounce_speed),
        (BowlingMode::Spin, _) => {
            let angle = spin_deflection_degrees(input.power, input.side, config);
            spin_bounce(input.velocity, angle, bounce_speed)
        },
    }
}

/// Redirect along the tracked swing direction at `forward_speed`.
///
/// Falls back to the horizontal velocity, then the bowling direction, if the
/// tracked direction has no horizontal component.
pub fn swing_bounce(direction: Vec3, velocity: Vec3, forward_speed: f32, bounce_speed: f32) -> Vec3 {
    let heading = horizontal(direction)
        .try_normalize()
        .or_else(|| horizontal(velocity).try_normalize())
        .unwrap_or(BOWLING_DIRECTION);
    heading * forward_speed + UP * bounce_speed
}

/// Keep the horizontal velocity and replace the vertical component.
pub fn drift_bounce(velocity: Vec3, bounce_speed: f32) -> Vec3 {
    horizontal(velocity) + UP * bounce_speed
}

/// Turn the horizontal velocity by `angle_degrees` about the up axis,
/// preserving its magnitude, and add the vertical impulse.
pub fn spin_bounce(velocity: Vec3, angle_degrees: f32, bounce_speed: f32) -> Vec3 {
    let flat = horizontal(velocity);
    let speed = flat.length();
    let turned = match flat.try_normalize() {
        Some(dir) => rotate_about_up(dir, angle_degrees) * speed,
        None => Vec3::ZERO,
    };
    horizontal(turned) + UP * bounce_speed
}

/// Spin deflection in degrees: linear in power, sign from side and convention.
pub fn spin_deflection_degrees(power: f32, side: Side, config: &BowlingConfig) -> f32 {
    let turn = config.spin_convention.turn_direction(side.multiplier());
    config.spin_turn_angle * power * turn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpinConvention;
    use pitchside_core::math::yaw_between_degrees;
    use pitchside_core::test_helpers::{assert_near, assert_vec3_near};

    fn spin_input(power: f32, side: Side, velocity: Vec3) -> BounceInput {
        BounceInput {
            mode: BowlingMode::Spin,
            power,
            side,
            velocity,
            swing_direction: None,
        }
    }

    #[test]
    fn full_power_off_spin_turns_25_degrees() {
        let config = BowlingConfig::default();
        let before = Vec3::new(0.0, -6.0, 18.0);
        let after = react(&spin_input(1.0, Side::Off, before), &config);

        assert_near(yaw_between_degrees(before, after), 25.0, 1e-3);
        assert_near(horizontal(after).length(), 18.0, 1e-4);
        assert_near(after.y, config.bounce_speed(), 1e-6);
    }

    #[test]
    fn opposite_sides_mirror_deflection() {
        let config = BowlingConfig::default();
        for power in [0.1, 0.35, 0.8, 1.0] {
            let off = spin_deflection_degrees(power, Side::Off, &config);
            let leg = spin_deflection_degrees(power, Side::Leg, &config);
            assert_eq!(off, -leg);
        }
    }

    #[test]
    fn deflection_is_linear_in_power() {
        let config = BowlingConfig::default();
        let full = spin_deflection_degrees(1.0, Side::Off, &config);
        let half = spin_deflection_degrees(0.5, Side::Off, &config);
        assert_near(half * 2.0, full, 1e-6);
        assert_eq!(spin_deflection_degrees(0.0, Side::Leg, &config), 0.0);
    }

    #[test]
    fn inverted_convention_flips_turn() {
        let config = BowlingConfig {
            spin_convention: SpinConvention::Inverted,
            ..Default::default()
        };
        assert_near(spin_deflection_degrees(1.0, Side::Off, &config), -25.0, 1e-6);
    }

    #[test]
    fn vertical_velocity_discarded_not_reflected() {
        let config = BowlingConfig::default();
        let slow = react(&spin_input(0.0, Side::Off, Vec3::new(0.0, -1.0, 18.0)), &config);
        let fast = react(&spin_input(0.0, Side::Off, Vec3::new(0.0, -12.0, 18.0)), &config);
        assert_eq!(slow.y, fast.y);
        assert_eq!(slow.y, config.bounce_speed());
    }

    #[test]
    fn swing_bounce_follows_tracked_direction() {
        let config = BowlingConfig::default();
        let direction = Vec3::new(-0.3, -0.2, 0.93).normalize();
        let input = BounceInput {
            mode: BowlingMode::Swing,
            power: 1.0,
            side: Side::Off,
            velocity: Vec3::new(5.0, -3.0, 10.0),
            swing_direction: Some(direction),
        };
        let after = react(&input, &config);

        assert_near(horizontal(after).length(), config.forward_speed, 1e-4);
        assert_vec3_near(
            horizontal(after).normalize(),
            horizontal(direction).normalize(),
            1e-5,
        );
        assert_eq!(after.y, config.bounce_speed());
    }

    #[test]
    fn swing_bounce_speed_ignores_approach_speed() {
        let config = BowlingConfig::default();
        let dir = Vec3::Z;
        let a = swing_bounce(dir, Vec3::new(0.0, -2.0, 3.0), config.forward_speed, 6.0);
        let b = swing_bounce(dir, Vec3::new(0.0, -9.0, 30.0), config.forward_speed, 6.0);
        assert_eq!(a, b);
    }

    #[test]
    fn swing_bounce_vertical_direction_falls_back() {
        let after = swing_bounce(Vec3::NEG_Y, Vec3::new(1.0, -5.0, 0.0), 18.0, 6.0);
        assert_vec3_near(after, Vec3::new(18.0, 6.0, 0.0), 1e-5);
    }

    #[test]
    fn drift_bounce_keeps_horizontal() {
        let input = BounceInput {
            mode: BowlingMode::Swing,
            power: 0.6,
            side: Side::Leg,
            velocity: Vec3::new(-1.5, -7.0, 17.0),
            swing_direction: None,
        };
        let after = react(&input, &BowlingConfig::default());
        assert_eq!(after, Vec3::new(-1.5, 6.0, 17.0));
    }

    #[test]
    fn spin_with_no_horizontal_speed_only_bounces() {
        assert_eq!(spin_bounce(Vec3::new(0.0, -4.0, 0.0), 25.0, 6.0), Vec3::Y * 6.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn spin_preserves_horizontal_speed(
                power in 0.0f32..=1.0,
                leg in any::<bool>(),
                vx in -5.0f32..5.0,
                vy in -15.0f32..0.0,
                vz in 5.0f32..30.0,
            ) {
                let config = BowlingConfig::default();
                let side = if leg { Side::Leg } else { Side::Off };
                let before = Vec3::new(vx, vy, vz);
                let after = react(&spin_input(power, side, before), &config);
                prop_assert!((horizontal(after).length() - horizontal(before).length()).abs() < 1e-3);

                let expected = spin_deflection_degrees(power, side, &config);
                prop_assert!((yaw_between_degrees(before, after) - expected).abs() < 1e-2);
            }
        }
    }
}
