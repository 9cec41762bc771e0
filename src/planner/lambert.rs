//! Lambert's problem, in Lagrange's form.
//!
//! Given two positions and a flight time, find the ellipse that connects
//! them. Only single-revolution transfers on the "fast" branch are handled:
//! for a fixed geometry, flight time then decreases monotonically from the
//! minimum-energy ellipse (a = s/2) down to the parabola (a = infinity), which
//! is what lets us bisect on the semi-major axis.
//!
//! Transfer angles are in degrees, measured prograde around the orbit normal.
//! Past 180 degrees, the sign of β flips.

use nalgebra::Vector3;
use tracing::trace;

use crate::error::{PlannerError, PlannerResult};
use crate::math::geometry::angle_between_positions;
use crate::math::intervals::Interval;
use crate::math::root_finding::{bisection, extend_upward};

/// Relative error in flight time at which bisection stops.
pub const TOLERANCE_PCT: f64 = 0.001;

/// Degrees either side of 180 where the transfer plane is too poorly
/// determined to trust the departure velocity.
pub const DEGENERATE_ANGLE_TOLERANCE: f64 = 0.01;

const NUM_ITERATIONS_BRACKET: usize = 200;
const NUM_ITERATIONS_BISECTION: usize = 200;

fn semiperimeter(r1: f64, r2: f64, chord: f64) -> f64 {
    (r1 + r2 + chord) / 2.0
}

/// α and β from Lambert's theorem, in radians.
fn alpha_beta(s: f64, chord: f64, semimajor_axis: f64, transfer_angle: f64) -> (f64, f64) {
    // At the minimum-energy ellipse the arguments are exactly 1, and rounding
    // can push them over.
    let alpha = 2.0 * (s / (2.0 * semimajor_axis)).sqrt().min(1.0).asin();
    let beta = 2.0 * ((s - chord) / (2.0 * semimajor_axis)).sqrt().min(1.0).asin();

    if transfer_angle > 180.0 {
        (alpha, -beta)
    } else {
        (alpha, beta)
    }
}

pub fn transfer_time(
    r1: f64,
    r2: f64,
    chord: f64,
    semimajor_axis: f64,
    mu: f64,
    transfer_angle: f64,
) -> f64 {
    let s = semiperimeter(r1, r2, chord);
    let (alpha, beta) = alpha_beta(s, chord, semimajor_axis, transfer_angle);

    (semimajor_axis.powi(3) / mu).sqrt() * (alpha - beta - (alpha.sin() - beta.sin()))
}

/// Flight time along the parabola through both points. Every elliptic
/// transfer takes strictly longer than this.
pub fn parabolic_minimum_time(r1: f64, r2: f64, chord: f64, mu: f64, transfer_angle: f64) -> f64 {
    let s = semiperimeter(r1, r2, chord);
    let sign = if transfer_angle > 180.0 { -1.0 } else { 1.0 };

    std::f64::consts::SQRT_2 / 3.0
        * (s.powi(3) / mu).sqrt()
        * (1.0 - sign * ((s - chord) / s).powf(1.5))
}

/// Flight time along the minimum-energy ellipse, the slowest transfer on
/// the fast branch.
pub fn lambert_maximum_time(
    r1: f64,
    r2: f64,
    chord: f64,
    min_energy_semimajor_axis: f64,
    mu: f64,
    transfer_angle: f64,
) -> f64 {
    transfer_time(r1, r2, chord, min_energy_semimajor_axis, mu, transfer_angle)
}

/// One boundary-value problem: get from `r1` to `r2` around a body with
/// gravitational parameter `mu`.
#[derive(Debug, Clone)]
pub struct LambertProblem {
    r1: Vector3<f64>,
    r2: Vector3<f64>,
    r1_norm: f64,
    r2_norm: f64,
    chord: f64,
    transfer_angle: f64,
    mu: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LambertSolution {
    pub semimajor_axis: f64,
    pub departure_velocity: Vector3<f64>,
}

impl LambertProblem {
    /// `normal` fixes which way is prograde; usually it's the departure
    /// orbit's angular momentum.
    pub fn new(r1: Vector3<f64>, r2: Vector3<f64>, normal: &Vector3<f64>, mu: f64) -> Self {
        Self {
            r1,
            r2,
            r1_norm: r1.norm(),
            r2_norm: r2.norm(),
            chord: (r2 - r1).norm(),
            transfer_angle: angle_between_positions(&r1, &r2, normal),
            mu,
        }
    }

    pub fn chord(&self) -> f64 {
        self.chord
    }

    pub fn transfer_angle(&self) -> f64 {
        self.transfer_angle
    }

    /// Near-opposite positions span no plane, and the chord and
    /// radius directions that build the departure velocity nearly coincide.
    pub fn is_degenerate(&self) -> bool {
        (self.transfer_angle - 180.0).abs() < DEGENERATE_ANGLE_TOLERANCE
    }

    pub fn semiperimeter(&self) -> f64 {
        semiperimeter(self.r1_norm, self.r2_norm, self.chord)
    }

    pub fn min_energy_semimajor_axis(&self) -> f64 {
        // (r1 + r2 + c) / 4
        self.semiperimeter() / 2.0
    }

    pub fn transfer_time(&self, semimajor_axis: f64) -> f64 {
        transfer_time(
            self.r1_norm,
            self.r2_norm,
            self.chord,
            semimajor_axis,
            self.mu,
            self.transfer_angle,
        )
    }

    pub fn parabolic_minimum_time(&self) -> f64 {
        parabolic_minimum_time(
            self.r1_norm,
            self.r2_norm,
            self.chord,
            self.mu,
            self.transfer_angle,
        )
    }

    pub fn maximum_time(&self) -> f64 {
        lambert_maximum_time(
            self.r1_norm,
            self.r2_norm,
            self.chord,
            self.min_energy_semimajor_axis(),
            self.mu,
            self.transfer_angle,
        )
    }

    /// Durations strictly inside this window have an elliptic solution.
    pub fn feasible_window(&self) -> Interval {
        Interval::new(self.parabolic_minimum_time(), self.maximum_time())
    }

    pub fn check_feasible(&self, duration: f64) -> PlannerResult<()> {
        let window = self.feasible_window();
        if window.contains_strictly(duration) {
            Ok(())
        } else {
            Err(PlannerError::InfeasibleTransfer {
                duration,
                min: window.lo(),
                max: window.hi(),
            })
        }
    }

    pub fn solve_semimajor_axis(&self, duration: f64) -> PlannerResult<f64> {
        self.check_feasible(duration)?;

        let s = self.semiperimeter();
        let bracket = extend_upward(
            |a| self.transfer_time(a) >= duration,
            Interval::new(s / 2.0, 2.0 * s),
            NUM_ITERATIONS_BRACKET,
        )?;
        trace!("semi-major axis bracket for {} s: {}", duration, bracket);

        // Too slow means a is too small, so the lower bound moves up
        let a = bisection(
            |a| self.transfer_time(a) - duration,
            bracket,
            TOLERANCE_PCT * duration,
            NUM_ITERATIONS_BISECTION,
        )?;
        Ok(a)
    }

    pub fn departure_velocity(&self, semimajor_axis: f64) -> Vector3<f64> {
        let s = self.semiperimeter();
        let (alpha, beta) = alpha_beta(s, self.chord, semimajor_axis, self.transfer_angle);

        let scale = (self.mu / (4.0 * semimajor_axis)).sqrt();
        let a_coeff = scale / (alpha / 2.0).tan();
        let b_coeff = scale / (beta / 2.0).tan();

        let chord_dir = (self.r2 - self.r1) / self.chord;
        let r1_dir = self.r1 / self.r1_norm;

        (b_coeff + a_coeff) * chord_dir + (b_coeff - a_coeff) * r1_dir
    }

    pub fn solve(&self, duration: f64) -> PlannerResult<LambertSolution> {
        let semimajor_axis = self.solve_semimajor_axis(duration)?;
        Ok(LambertSolution {
            semimajor_axis,
            departure_velocity: self.departure_velocity(semimajor_axis),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::astro::{PointMass, StateVector};

    const EARTH_MU: f64 = 3.986004418e14;

    fn quarter_circle() -> LambertProblem {
        LambertProblem::new(
            Vector3::new(7.0e6, 0.0, 0.0),
            Vector3::new(0.0, 7.0e6, 0.0),
            &Vector3::z(),
            EARTH_MU,
        )
    }

    fn assert_arrives(problem: &LambertProblem, duration: f64) {
        let solution = problem.solve(duration).unwrap();
        let state = StateVector::new(problem.r1, solution.departure_velocity);
        let arrival = state.propagate(PointMass::with_mu(EARTH_MU), duration).unwrap();

        let miss = (arrival.position - problem.r2).norm() / problem.r2_norm;
        assert!(miss < 1e-2, "missed by {:e} of |r2| for duration {}", miss, duration);
    }

    #[test]
    fn test_near_circular_transfer() {
        let problem = quarter_circle();
        assert_relative_eq!(problem.transfer_angle(), 90.0, max_relative = 1e-12);

        let radius: f64 = 7.0e6;
        let quarter_period = std::f64::consts::FRAC_PI_2 * (radius.powi(3) / EARTH_MU).sqrt();

        let solution = problem.solve(quarter_period).unwrap();
        assert_relative_eq!(solution.semimajor_axis, radius, max_relative = 1e-2);

        let circular_speed = (EARTH_MU / radius).sqrt();
        assert_relative_eq!(
            solution.departure_velocity.norm(),
            circular_speed,
            max_relative = 1e-2
        );
        // Heading straight along +y, like a circular orbit would
        assert!(solution.departure_velocity.normalize().dot(&Vector3::y()) > 0.999);
    }

    #[test]
    fn test_exact_circular_velocity() {
        let problem = quarter_circle();
        let velocity = problem.departure_velocity(7.0e6);
        let circular_speed = (EARTH_MU / 7.0e6).sqrt();
        assert_relative_eq!(velocity, Vector3::y() * circular_speed, epsilon = 1e-6);
    }

    #[test]
    fn test_solution_reproduces_duration() {
        let problem = quarter_circle();
        let window = problem.feasible_window();

        for fraction in [0.05, 0.3, 0.5, 0.8, 0.95] {
            let duration = window.lo() + fraction * window.width();
            let a = problem.solve_semimajor_axis(duration).unwrap();
            assert!(a >= problem.min_energy_semimajor_axis());

            let error = (problem.transfer_time(a) - duration).abs();
            assert!(error <= TOLERANCE_PCT * duration);

            // Solving again gives the same answer
            let again = problem.solve_semimajor_axis(duration).unwrap();
            assert_relative_eq!(a, again, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_transfer_time_is_monotone() {
        let problem = quarter_circle();
        let a_min = problem.min_energy_semimajor_axis();

        let mut previous = problem.transfer_time(a_min);
        assert_relative_eq!(previous, problem.maximum_time());
        for i in 1..200 {
            let a = a_min * (1.0 + 0.05 * i as f64);
            let t = problem.transfer_time(a);
            assert!(t < previous, "t({}) = {} >= {}", a, t, previous);
            assert!(t > problem.parabolic_minimum_time());
            previous = t;
        }

        // Very large ellipses look like the parabola
        let huge = problem.transfer_time(a_min * 1e8);
        assert_relative_eq!(huge, problem.parabolic_minimum_time(), max_relative = 1e-3);
    }

    #[test]
    fn test_degenerate_geometry() {
        let opposite = |degrees: f64| {
            let theta = degrees.to_radians();
            LambertProblem::new(
                Vector3::new(7.0e6, 0.0, 0.0),
                Vector3::new(theta.cos(), theta.sin(), 0.0) * 7.0e6,
                &Vector3::z(),
                EARTH_MU,
            )
        };

        assert!(opposite(180.0).is_degenerate());
        assert!(opposite(180.0 - DEGENERATE_ANGLE_TOLERANCE / 2.0).is_degenerate());
        assert!(opposite(180.0 + DEGENERATE_ANGLE_TOLERANCE / 2.0).is_degenerate());
        assert!(!opposite(179.0).is_degenerate());
        assert!(!quarter_circle().is_degenerate());
    }

    #[test]
    fn test_infeasible_durations() {
        let problem = quarter_circle();
        let window = problem.feasible_window();

        for duration in [0.5 * window.lo(), window.lo(), window.hi(), 2.0 * window.hi()] {
            match problem.solve(duration) {
                Err(PlannerError::InfeasibleTransfer { min, max, .. }) => {
                    assert_eq!(min, window.lo());
                    assert_eq!(max, window.hi());
                }
                other => panic!("expected an infeasible transfer, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_transfers_arrive() {
        // Out of plane, and less than 180 degrees
        let problem = LambertProblem::new(
            Vector3::new(7.0e6, 1.0e6, 0.5e6),
            Vector3::new(-2.0e6, 6.5e6, 1.0e6),
            &Vector3::z(),
            EARTH_MU,
        );
        assert!(problem.transfer_angle() < 180.0);
        let window = problem.feasible_window();
        for fraction in [0.1, 0.5, 0.9] {
            assert_arrives(&problem, window.lo() + fraction * window.width());
        }

        // The long way around
        let problem = LambertProblem::new(
            Vector3::new(7.0e6, 0.0, 0.0),
            Vector3::new(-5.0e6, -5.0e6, 0.0),
            &Vector3::z(),
            EARTH_MU,
        );
        assert_relative_eq!(problem.transfer_angle(), 225.0, max_relative = 1e-12);
        let window = problem.feasible_window();
        for fraction in [0.1, 0.5, 0.9] {
            assert_arrives(&problem, window.lo() + fraction * window.width());
        }
    }
}
