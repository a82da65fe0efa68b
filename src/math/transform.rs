use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use std::f64::consts::TAU;

/// Wraps an angle (in radians) into [0, 2pi). Works for any finite input,
/// including negative angles and angles many turns away from the range.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2pi for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Local-to-world matrix for a body: translate, then rotate about X, then Y,
/// then Z (angles in degrees), then scale uniformly. Reading right to left,
/// a local point is scaled first and translated last.
pub fn world_transform(
    position: &Point3<f64>,
    rotation_degrees: &Vector3<f64>,
    scale: f64,
) -> Matrix4<f64> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation_degrees.x.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation_degrees.y.to_radians());
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), rotation_degrees.z.to_radians());

    Matrix4::new_translation(&position.coords)
        * (rx * ry * rz).to_homogeneous()
        * Matrix4::new_scaling(scale)
}
