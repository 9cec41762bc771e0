use thiserror::Error;

use super::intervals::Interval;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RootFindingError {
    #[error("no sign change found around {center}, starting with radius {radius}")]
    NoBracket { center: f64, radius: f64 },
    #[error("hit max iterations ({iterations}) when trying to find a root in {interval}")]
    MaxIterations { iterations: usize, interval: Interval },
}

/// Very primitive way to construct a bracket for future root-finding.
/// Simply doubles the radius until a bracket with opposite signs at the
/// endpoints is found.
pub fn find_root_bracket(
    f: impl Fn(f64) -> f64,
    center: f64,
    mut radius: f64,
    num_iterations: usize,
) -> Result<Interval, RootFindingError> {
    let initial_radius = radius;
    for _ in 0..num_iterations {
        let a = center - radius;
        let b = center + radius;

        if f(a) * f(b) <= 0.0 {
            return Ok(Interval::new(a, b));
        }

        radius *= 2.0;
    }

    Err(RootFindingError::NoBracket {
        center,
        radius: initial_radius,
    })
}

/// Doubles the upper end of the interval for as long as `keep_going` says
/// the root still lies above it. The lower end never moves.
pub fn extend_upward(
    keep_going: impl Fn(f64) -> bool,
    mut interval: Interval,
    num_iterations: usize,
) -> Result<Interval, RootFindingError> {
    for _ in 0..num_iterations {
        if !keep_going(interval.hi()) {
            return Ok(interval);
        }
        interval = interval.with_hi(2.0 * interval.hi());
    }

    Err(RootFindingError::MaxIterations {
        iterations: num_iterations,
        interval,
    })
}

/// Bisects until |f| drops to `tolerance`, or until the interval can't be
/// split any further.
#[allow(clippy::float_cmp)]
pub fn bisection(
    f: impl Fn(f64) -> f64,
    mut interval: Interval,
    tolerance: f64,
    num_iterations: usize,
) -> Result<f64, RootFindingError> {
    // We need to determine which way f is oriented in our interval.
    let lo_is_neg = f(interval.lo()) < 0.0;

    for _ in 0..num_iterations {
        let guess = interval.midpoint();

        if guess == interval.lo() || guess == interval.hi() {
            return Ok(guess);
        }

        let value = f(guess);
        if value.abs() <= tolerance {
            return Ok(guess);
        }

        interval = match (lo_is_neg, value < 0.0) {
            (true, true) => interval.split_right(guess),   // - - +
            (true, false) => interval.split_left(guess),   // - + +
            (false, true) => interval.split_left(guess),   // + - -
            (false, false) => interval.split_right(guess), // + + -
        }
    }

    Err(RootFindingError::MaxIterations {
        iterations: num_iterations,
        interval,
    })
}

// Adapted from `rtsafe` in http://www.grad.hr/nastava/gs/prg/NumericalRecipesinC.pdf
#[allow(clippy::float_cmp)]
pub fn newton_plus_bisection(
    f_and_f_prime: impl Fn(f64) -> (f64, f64),
    mut interval: Interval,
    num_iterations: usize,
) -> Result<f64, RootFindingError> {
    let mut guess = interval.midpoint();
    let lo_is_neg = f_and_f_prime(interval.lo()).0 < 0.0;

    for _ in 0..num_iterations {
        let (f, f_prime) = f_and_f_prime(guess);
        if f == 0.0 {
            return Ok(guess);
        }

        interval = match (lo_is_neg, f < 0.0) {
            (true, true) => interval.split_right(guess),   // - - +
            (true, false) => interval.split_left(guess),   // - + +
            (false, true) => interval.split_left(guess),   // + - -
            (false, false) => interval.split_right(guess), // + + -
        };

        let midpoint = interval.midpoint();
        if midpoint == interval.lo() || midpoint == interval.hi() {
            return Ok(guess);
        }

        // Newton steps that land outside the bracket (or on its edge) can't
        // shrink it, so fall back to the midpoint.
        let newton_guess = guess - f / f_prime;
        guess = if interval.contains_strictly(newton_guess) {
            newton_guess
        } else {
            midpoint
        };
    }

    Err(RootFindingError::MaxIterations {
        iterations: num_iterations,
        interval,
    })
}
