use serde::{Deserialize, Serialize};

use pitchside_core::delivery::Side;
use pitchside_core::math::{BOWLING_DIRECTION, LATERAL, Vec3};

/// Quadratic Bézier flight path for a swing delivery.
///
/// Sampling progress never moves backwards and is clamped to `[0, 1]`, so the
/// ball cannot overshoot the end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPath {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
    last_sampled: Vec3,
    current_direction: Vec3,
    progress: f32,
}

impl SwingPath {
    /// Build the path from the release point to the landing point, bending
    /// the control point sideways by `side * swing_strength * power`.
    pub fn new(start: Vec3, end: Vec3, side: Side, power: f32, swing_strength: f32) -> Self {
        let control =
            start.lerp(end, 0.5) + LATERAL * (side.multiplier() * swing_strength * power);
        let current_direction = (control - start)
            .try_normalize()
            .or_else(|| (end - start).try_normalize())
            .unwrap_or(BOWLING_DIRECTION);
        Self {
            start,
            control,
            end,
            last_sampled: start,
            current_direction,
            progress: 0.0,
        }
    }

    /// Point on the curve at `t` (clamped to `[0, 1]`).
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Curve derivative with respect to `t` (clamped to `[0, 1]`).
    pub fn tangent(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        (self.control - self.start) * (2.0 * (1.0 - t)) + (self.end - self.control) * (2.0 * t)
    }

    /// Advance to the progress implied by `air_elapsed / flight_time` and
    /// return the new position.
    ///
    /// The travel direction only changes when the step is longer than
    /// `epsilon`, so near-stationary samples keep the last good direction.
    pub fn advance(&mut self, air_elapsed: f32, flight_time: f32, epsilon: f32) -> Vec3 {
        let t = if flight_time > 0.0 {
            (air_elapsed / flight_time).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.progress = self.progress.max(t);

        let position = self.sample(self.progress);
        let step = position - self.last_sampled;
        if step.length() > epsilon
            && let Some(direction) = step.try_normalize()
        {
            self.current_direction = direction;
        }
        self.last_sampled = position;
        position
    }

    /// Unit vector of the ball's actual travel along the curve.
    pub fn current_direction(&self) -> Vec3 {
        self.current_direction
    }

    pub fn last_sampled(&self) -> Vec3 {
        self.last_sampled
    }

    /// Normalized progress along the curve in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_core::test_helpers::{assert_near, assert_vec3_near};

    fn default_path(side: Side, power: f32) -> SwingPath {
        SwingPath::new(
            Vec3::new(0.0, 2.2, 0.0),
            Vec3::new(0.0, 0.035, 16.0),
            side,
            power,
            4.0,
        )
    }

    #[test]
    fn endpoints_are_exact() {
        let path = default_path(Side::Off, 0.7);
        assert_eq!(path.sample(0.0), path.start);
        assert_eq!(path.sample(1.0), path.end);
    }

    #[test]
    fn control_point_offset_follows_side_and_power() {
        let off = default_path(Side::Off, 0.5);
        let leg = default_path(Side::Leg, 0.5);
        assert_near(off.control.x, 2.0, 1e-6);
        assert_near(leg.control.x, -2.0, 1e-6);
        assert_vec3_near(
            Vec3::new(0.0, off.control.y, off.control.z),
            off.start.lerp(off.end, 0.5),
            1e-6,
        );
    }

    #[test]
    fn zero_power_is_straight() {
        let path = default_path(Side::Off, 0.0);
        for i in 0..=10 {
            assert_near(path.sample(i as f32 / 10.0).x, 0.0, 1e-6);
        }
    }

    #[test]
    fn sample_clamps_out_of_range() {
        let path = default_path(Side::Leg, 1.0);
        assert_eq!(path.sample(-0.5), path.start);
        assert_eq!(path.sample(1.5), path.end);
    }

    #[test]
    fn advance_never_overshoots() {
        let mut path = default_path(Side::Off, 1.0);
        let pos = path.advance(5.0, 1.0, 1e-4);
        assert_eq!(pos, path.end);
        assert!(path.is_complete());
    }

    #[test]
    fn advance_is_monotonic() {
        let mut path = default_path(Side::Off, 1.0);
        path.advance(0.6, 1.0, 1e-4);
        let progress = path.progress();
        path.advance(0.2, 1.0, 1e-4);
        assert_eq!(path.progress(), progress);
    }

    #[test]
    fn direction_survives_stationary_step() {
        let mut path = default_path(Side::Off, 1.0);
        path.advance(0.5, 1.0, 1e-4);
        let dir = path.current_direction();
        path.advance(0.5, 1.0, 1e-4);
        assert_eq!(path.current_direction(), dir);
    }

    #[test]
    fn direction_bends_back_after_midpoint() {
        let mut path = default_path(Side::Off, 1.0);
        path.advance(0.2, 1.0, 1e-4);
        assert!(path.current_direction().x > 0.0, "moving outward early");
        path.advance(0.9, 1.0, 1e-4);
        path.advance(0.95, 1.0, 1e-4);
        assert!(path.current_direction().x < 0.0, "moving back in late");
    }

    #[test]
    fn initial_direction_is_unit() {
        let path = default_path(Side::Leg, 0.8);
        assert_near(path.current_direction().length(), 1.0, 1e-5);
    }

    #[test]
    fn tangent_matches_finite_difference() {
        let path = default_path(Side::Off, 0.9);
        let t = 0.4;
        let h = 1e-3;
        let numeric = (path.sample(t + h) - path.sample(t - h)) / (2.0 * h);
        assert_vec3_near(path.tangent(t), numeric, 1e-2);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn samples_stay_in_control_hull_bounds(
                power in 0.0f32..=1.0,
                leg in any::<bool>(),
                ex in -2.0f32..2.0,
                ez in 4.0f32..22.0,
                t in 0.0f32..=1.0,
            ) {
                let side = if leg { Side::Leg } else { Side::Off };
                let path = SwingPath::new(
                    Vec3::new(0.0, 2.2, 0.0),
                    Vec3::new(ex, 0.035, ez),
                    side,
                    power,
                    4.0,
                );
                let p = path.sample(t);
                let lo = path.start.min(path.control).min(path.end) - Vec3::splat(1e-4);
                let hi = path.start.max(path.control).max(path.end) + Vec3::splat(1e-4);
                prop_assert!(p.cmpge(lo).all() && p.cmple(hi).all(), "{p:?} outside {lo:?}..{hi:?}");
            }

            #[test]
            fn direction_stays_unit(
                power in 0.0f32..=1.0,
                steps in proptest::collection::vec(0.0f32..0.05, 1..60),
            ) {
                let mut path = SwingPath::new(
                    Vec3::new(0.0, 2.2, 0.0),
                    Vec3::new(0.5, 0.035, 15.0),
                    Side::Off,
                    power,
                    4.0,
                );
                let mut elapsed = 0.0;
                for dt in steps {
                    elapsed += dt;
                    path.advance(elapsed, 0.9, 1e-4);
                    prop_assert!((path.current_direction().length() - 1.0).abs() < 1e-4);
                }
            }
        }
    }
}
