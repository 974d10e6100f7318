//! Vector helpers over `glam` for the pitch coordinate frame.
//!
//! The frame is right-handed with +Y up. Deliveries travel along +Z from the
//! bowler toward the batting end; +X is the lateral axis used for swing.

pub use glam::{Quat, Vec3};

/// World up axis.
pub const UP: Vec3 = Vec3::Y;
/// Default bowling direction (bowler end toward batting end).
pub const BOWLING_DIRECTION: Vec3 = Vec3::Z;
/// Fixed horizontal axis perpendicular to the bowling direction.
pub const LATERAL: Vec3 = Vec3::X;

/// Project a vector onto the horizontal (XZ) plane.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Rotate `v` about the up axis by `degrees`.
///
/// Positive angles turn +Z toward +X.
pub fn rotate_about_up(v: Vec3, degrees: f32) -> Vec3 {
    Quat::from_axis_angle(UP, degrees.to_radians()) * v
}

/// Signed angle in degrees that turns the horizontal projection of `from`
/// onto the horizontal projection of `to`, using the same sign convention
/// as [`rotate_about_up`]. Returns 0 when either projection is degenerate.
pub fn yaw_between_degrees(from: Vec3, to: Vec3) -> f32 {
    let a = horizontal(from);
    let b = horizontal(to);
    if a.length_squared() < f32::EPSILON || b.length_squared() < f32::EPSILON {
        return 0.0;
    }
    a.cross(b).y.atan2(a.dot(b)).to_degrees()
}

/// Whether every component of `v` is finite.
pub fn is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
