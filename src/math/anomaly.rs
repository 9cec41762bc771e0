//! Conversions between the true, eccentric, and mean anomaly of an elliptic
//! orbit.
//!
//! All three anomalies are carried in degrees and normalized to [0, 360).
//! They get separate types so that they can't be mixed up; the conversion
//! functions here are the only way to go from one to another.

use crate::math::intervals::Interval;
use crate::math::root_finding::{newton_plus_bisection, RootFindingError};

const NUM_ITERATIONS_KEPLER: usize = 100;

fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

macro_rules! anomaly_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name(f64);

        impl $name {
            pub fn from_degrees(degrees: f64) -> Self {
                Self(normalize_degrees(degrees))
            }

            pub fn from_radians(radians: f64) -> Self {
                Self::from_degrees(radians.to_degrees())
            }

            pub fn degrees(&self) -> f64 {
                self.0
            }

            pub fn radians(&self) -> f64 {
                self.0.to_radians()
            }
        }
    };
}

anomaly_type!(
    /// Angle from periapsis to the body, measured at the focus.
    TrueAnomaly
);
anomaly_type!(
    /// Angle from periapsis to the body's projection onto the auxiliary
    /// circle, measured at the center of the ellipse.
    EccentricAnomaly
);
anomaly_type!(
    /// Fraction of the period elapsed since periapsis, as an angle.
    MeanAnomaly
);

/// Clamps into the domain of acos; rounding can push a cosine just past 1.
fn clamped_acos_degrees(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

pub fn true_to_eccentric(true_anomaly: TrueAnomaly, ecc: f64) -> EccentricAnomaly {
    assert!((0.0..1.0).contains(&ecc), "eccentricity {} is not elliptic", ecc);

    let cos_theta = true_anomaly.radians().cos();
    let principal = clamped_acos_degrees((ecc + cos_theta) / (1.0 + ecc * cos_theta));

    // acos only gives us [0, 180], so reflect to stay in the same half-plane
    if true_anomaly.degrees() > 180.0 {
        EccentricAnomaly::from_degrees(360.0 - principal)
    } else {
        EccentricAnomaly::from_degrees(principal)
    }
}

pub fn eccentric_to_true(eccentric_anomaly: EccentricAnomaly, ecc: f64) -> TrueAnomaly {
    assert!((0.0..1.0).contains(&ecc), "eccentricity {} is not elliptic", ecc);

    let cos_ecc = eccentric_anomaly.radians().cos();
    let principal = clamped_acos_degrees((cos_ecc - ecc) / (1.0 - ecc * cos_ecc));

    if eccentric_anomaly.degrees() > 180.0 {
        TrueAnomaly::from_degrees(360.0 - principal)
    } else {
        TrueAnomaly::from_degrees(principal)
    }
}

pub fn eccentric_to_mean(eccentric_anomaly: EccentricAnomaly, ecc: f64) -> MeanAnomaly {
    assert!((0.0..1.0).contains(&ecc), "eccentricity {} is not elliptic", ecc);

    // Kepler's equation, which needs radians for the subtraction
    let big_e = eccentric_anomaly.radians();
    MeanAnomaly::from_radians(big_e - ecc * big_e.sin())
}

pub fn mean_to_eccentric(
    mean_anomaly: MeanAnomaly,
    ecc: f64,
) -> Result<EccentricAnomaly, RootFindingError> {
    assert!((0.0..1.0).contains(&ecc), "eccentricity {} is not elliptic", ecc);

    // This doesn't have a closed form, so let's do some rootfinding. Since
    // |E - M| <= e, the root is always within this bracket.
    let mean = mean_anomaly.radians();
    let kepler = |x: f64| (x - ecc * x.sin() - mean, 1.0 - ecc * x.cos());
    let bracket = Interval::new(mean - ecc - 0.1, mean + ecc + 0.1);

    newton_plus_bisection(kepler, bracket, NUM_ITERATIONS_KEPLER)
        .map(EccentricAnomaly::from_radians)
}

pub fn true_to_mean(true_anomaly: TrueAnomaly, ecc: f64) -> MeanAnomaly {
    eccentric_to_mean(true_to_eccentric(true_anomaly, ecc), ecc)
}

pub fn mean_to_true(mean_anomaly: MeanAnomaly, ecc: f64) -> Result<TrueAnomaly, RootFindingError> {
    mean_to_eccentric(mean_anomaly, ecc).map(|big_e| eccentric_to_true(big_e, ecc))
}

/// Time to travel forward (prograde) from one true anomaly to another.
///
/// If the final anomaly is "behind" the initial one, this goes the long way
/// around, so the result is always in [0, period).
pub fn time_between(initial: TrueAnomaly, final_: TrueAnomaly, ecc: f64, period: f64) -> f64 {
    let mean_initial = true_to_mean(initial, ecc).degrees();
    let mean_final = true_to_mean(final_, ecc).degrees();

    let mut difference = mean_final - mean_initial;
    if difference < 0.0 {
        difference += 360.0;
    }

    difference * period / 360.0
}
