use std::f64::consts::PI;

// Taken from the KSP wiki
pub const KERBIN_MU: f64 = 3.5316e12;
pub const KERBIN_RADIUS: f64 = 600_000.0;
pub const KERBIN_ROTATION_PERIOD: f64 = 21_549.425;

pub const MUN_MU: f64 = 6.5138398e10;
pub const MUN_RADIUS: f64 = 200_000.0;
pub const MUN_ROTATION_PERIOD: f64 = 138_984.38;

pub fn get_circular_velocity(radius: f64, mu: f64) -> f64 {
    (mu / radius).sqrt()
}

pub fn get_period(a: f64, mu: f64) -> f64 {
    (4.0 * PI * PI * a.powi(3) / mu).sqrt()
}
