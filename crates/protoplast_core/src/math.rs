//! 2D geometry helpers shared by the topology engine and snapshot transforms.
//!
//! Angles are in degrees. An angle of 0 points towards negative y and grows
//! clockwise in screen coordinates, so (1, 0) is 90 and (0, 1) is 180.

use protoplast_data::Vector2D;

pub type RealMatrix2D = [[f32; 2]; 2];

/// Wraps any finite angle into [0, 360).
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Direction of `v` in [0, 360). The zero vector yields 0.
#[must_use]
pub fn angle_of_vector(v: Vector2D) -> f32 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    normalize_angle(v.x.atan2(-v.y).to_degrees())
}

/// Unit vector pointing in direction `angle`.
#[must_use]
pub fn unit_vector_of_angle(angle: f32) -> Vector2D {
    let rad = angle.to_radians();
    Vector2D::new(rad.sin(), -rad.cos())
}

#[must_use]
pub fn rotation_matrix(angle: f32) -> RealMatrix2D {
    let (sin, cos) = angle.to_radians().sin_cos();
    [[cos, -sin], [sin, cos]]
}

#[must_use]
pub fn apply(matrix: &RealMatrix2D, v: Vector2D) -> Vector2D {
    Vector2D::new(
        matrix[0][0] * v.x + matrix[0][1] * v.y,
        matrix[1][0] * v.x + matrix[1][1] * v.y,
    )
}

/// Rotates `v` clockwise by `angle`; `angle_of_vector` grows by the same amount.
#[must_use]
pub fn rotate(v: Vector2D, angle: f32) -> Vector2D {
    apply(&rotation_matrix(angle), v)
}

/// Velocity of a point at `rel_pos` on a body moving with `vel` and spinning
/// at `angular_vel` degrees per time step.
#[must_use]
pub fn tangential_velocity(rel_pos: Vector2D, vel: Vector2D, angular_vel: f32) -> Vector2D {
    let omega = angular_vel.to_radians();
    vel + Vector2D::new(-rel_pos.y, rel_pos.x) * omega
}
