//! Vector geometry of two-body orbits.
//!
//! Every vector here is measured from the center of the same central body;
//! nothing is translated between frames.

use nalgebra::Vector3;

use std::f64::consts::PI;

use crate::math::anomaly::TrueAnomaly;

/// Returns the angle between u and v, measured as a positive angle around 'up'.
pub fn directed_angle(u: &Vector3<f64>, v: &Vector3<f64>, up: &Vector3<f64>) -> f64 {
    let theta = u.angle(v);
    if u.cross(v).dot(up) >= 0.0 {
        theta
    } else {
        2.0 * PI - theta
    }
}

/// Normal to the orbital plane, pointing so that the motion is
/// counter-clockwise when viewed from its tip.
pub fn specific_angular_momentum(position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
    position.cross(velocity)
}

/// Points towards periapsis, with magnitude equal to the eccentricity.
pub fn eccentricity_vector(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    mu: f64,
) -> Vector3<f64> {
    let r = position.norm();
    (velocity.norm_squared() / mu - 1.0 / r) * position - (position.dot(velocity) / mu) * velocity
}

pub fn orbit_radius(true_anomaly: TrueAnomaly, ecc: f64, semimajor_axis: f64) -> f64 {
    semimajor_axis * (1.0 - ecc * ecc) / (1.0 + ecc * true_anomaly.radians().cos())
}

/// Angle in degrees, in [0, 360), that the position sweeps going prograde
/// from `r1` to `r2`.
///
/// Positions are in a right-handed frame, and `normal` is the orbit normal
/// (typically the specific angular momentum). Angles are counted
/// counter-clockwise around it; when r1 x r2 points against it, we've gone
/// more than halfway around.
pub fn angle_between_positions(r1: &Vector3<f64>, r2: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    let degrees = directed_angle(r1, r2, normal).to_degrees();
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}

/// Angle in degrees between two orbital planes, given their normals.
pub fn relative_inclination(h1: &Vector3<f64>, h2: &Vector3<f64>) -> f64 {
    h1.angle(h2).to_degrees()
}

/// Direction of the line where the two orbital planes cross. It's zero if
/// the planes coincide.
pub fn ascending_node_vector(h1: &Vector3<f64>, h2: &Vector3<f64>) -> Vector3<f64> {
    h1.cross(h2)
}
