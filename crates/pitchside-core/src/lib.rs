pub mod collaborators;
pub mod collision;
pub mod delivery;
pub mod math;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::collision::{CollisionEvent, SurfaceTag};
    use crate::math::Vec3;

    /// Assert two vectors are within `tolerance` of each other (Euclidean).
    #[track_caller]
    pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32) {
        let diff = (actual - expected).length();
        assert!(
            diff <= tolerance,
            "expected {expected:?}, got {actual:?} (off by {diff}, tolerance {tolerance})"
        );
    }

    /// Assert two scalars are within `tolerance` of each other.
    #[track_caller]
    pub fn assert_near(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual} (tolerance {tolerance})"
        );
    }

    /// Build a collision on the given surface at the origin.
    pub fn contact(surface: SurfaceTag) -> CollisionEvent {
        CollisionEvent::new(surface, Vec3::ZERO)
    }

    /// Build a collision on the given surface at `point`.
    pub fn contact_at(surface: SurfaceTag, point: Vec3) -> CollisionEvent {
        CollisionEvent::new(surface, point)
    }
}
