//! Stumpff functions, for propagating along a conic with universal variables.

/// Which kind of conic the argument `x = beta s^2` corresponds to.
enum Regime {
    Elliptic(f64),
    Hyperbolic(f64),
    Parabolic,
}

fn regime(x: f64) -> Regime {
    debug_assert!(!x.is_nan(), "Stumpff function evaluated at NaN");
    if x > 0.0 {
        Regime::Elliptic(x.sqrt())
    } else if x < 0.0 {
        Regime::Hyperbolic((-x).sqrt())
    } else {
        Regime::Parabolic
    }
}

pub fn c0(x: f64) -> f64 {
    match regime(x) {
        Regime::Elliptic(u) => u.cos(),
        Regime::Hyperbolic(u) => u.cosh(),
        Regime::Parabolic => 1.0,
    }
}

pub fn c1(x: f64) -> f64 {
    match regime(x) {
        Regime::Elliptic(u) => u.sin() / u,
        Regime::Hyperbolic(u) => u.sinh() / u,
        Regime::Parabolic => 1.0,
    }
}

pub fn c2(x: f64) -> f64 {
    // Half-angle forms avoid cancellation in 1 - cos u
    match regime(x) {
        Regime::Elliptic(u) => 2.0 * (u / 2.0).sin().powi(2) / x,
        Regime::Hyperbolic(u) => -2.0 * (u / 2.0).sinh().powi(2) / x,
        Regime::Parabolic => 0.5,
    }
}

// Chebyshev expansion of c3 on [-1, 1]
const C3_CHEBYSHEV: [f64; 9] = [
    1.6676588241065263e-1,
    -8.335400232645692e-3,
    9.921887561900632e-5,
    -6.889831660341532e-7,
    3.1316569342984595e-9,
    -1.0037209903903158e-11,
    2.3897900455039615e-14,
    -4.392970771382075e-17,
    6.422446836919863e-20,
];

pub fn c3(x: f64) -> f64 {
    // (1 - c1) / x cancels badly near the origin
    if x.abs() < 1.0 {
        evaluate_chebyshev(x, &C3_CHEBYSHEV)
    } else {
        (1.0 - c1(x)) / x
    }
}

/// Clenshaw's recurrence for a sum of Chebyshev polynomials.
fn evaluate_chebyshev(x: f64, coeffs: &[f64]) -> f64 {
    let (b1, b2) = coeffs[1..]
        .iter()
        .rev()
        .fold((0.0, 0.0), |(b1, b2), a_k| (a_k + 2.0 * x * b1 - b2, b1));

    coeffs[0] + x * b1 - b2
}

/// The kth entry is s^k c_k(beta s^2).
#[allow(non_snake_case)]
pub fn stumpff_G(beta: f64, s: f64) -> [f64; 4] {
    let x = beta * s * s;
    [c0(x), s * c1(x), s * s * c2(x), s * s * s * c3(x)]
}
