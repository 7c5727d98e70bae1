//! Special functions needed by the hindered rotor and translation models.
//!
//! The modified Bessel functions are evaluated by their power series for moderate arguments
//! and by the Hankel asymptotic expansion for large ones; the `*e` variants return
//! `exp(-|x|)*I(x)`, which stays finite for any barrier height. The complete elliptic integral
//! of the first kind uses the arithmetic-geometric mean.
use crate::errors::KiStatError;
use std::f64::consts::PI;

/// switch from the power series to the asymptotic expansion
const ASYMPTOTIC_LIMIT: f64 = 15.0;
const MAX_TERMS: usize = 500;

fn series_scaled(x: f64, order: u32) -> f64 {
    // I_nu(x) = (x/2)^nu * sum_k (x^2/4)^k / (k! (k+nu)!)
    let q = 0.25 * x * x;
    let mut term = if order == 0 { 1.0 } else { 0.5 * x };
    let mut sum = term;
    for k in 1..MAX_TERMS {
        let kf = k as f64;
        term *= q / (kf * (kf + order as f64));
        sum += term;
        if term < 1e-17 * sum {
            break;
        }
    }
    sum * (-x).exp()
}

fn asymptotic_scaled(x: f64, order: u32) -> f64 {
    // I_nu(x) e^-x ~ 1/sqrt(2 pi x) * sum_k (-1)^k prod_{j<=k} (mu - (2j-1)^2) / (k! (8x)^k)
    let mu = 4.0 * (order as f64).powi(2);
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..MAX_TERMS {
        let kf = k as f64;
        let next = -term * (mu - (2.0 * kf - 1.0).powi(2)) / (kf * 8.0 * x);
        // the expansion is divergent: stop at the smallest term
        if next.abs() >= term.abs() {
            break;
        }
        term = next;
        sum += term;
        if term.abs() < 1e-17 * sum.abs() {
            break;
        }
    }
    sum / (2.0 * PI * x).sqrt()
}

/// exp(-|x|) * I0(x)
pub fn besseli0e(x: f64) -> f64 {
    let ax = x.abs();
    if ax < ASYMPTOTIC_LIMIT {
        series_scaled(ax, 0)
    } else {
        asymptotic_scaled(ax, 0)
    }
}

/// exp(-|x|) * I1(x)
pub fn besseli1e(x: f64) -> f64 {
    let ax = x.abs();
    let value = if ax < ASYMPTOTIC_LIMIT {
        series_scaled(ax, 1)
    } else {
        asymptotic_scaled(ax, 1)
    };
    if x < 0.0 { -value } else { value }
}

/// zeroth-order modified Bessel function of the first kind
pub fn besseli0(x: f64) -> f64 {
    besseli0e(x) * x.abs().exp()
}

/// first-order modified Bessel function of the first kind
pub fn besseli1(x: f64) -> f64 {
    besseli1e(x) * x.abs().exp()
}

/// Complete elliptic integral of the first kind K(m) = int_0^{pi/2} dθ / sqrt(1 - m sin^2 θ),
/// with the parameter m = k^2 (not the modulus k). K diverges at m = 1.
pub fn cellipk(m: f64) -> Result<f64, KiStatError> {
    if !m.is_finite() || m >= 1.0 {
        return Err(KiStatError::domain(
            "cellipk",
            m,
            "complete elliptic integral requires m < 1",
        ));
    }
    let mut a = 1.0;
    let mut g = (1.0 - m).sqrt();
    for _ in 0..64 {
        if (a - g).abs() <= 1e-16 * a {
            break;
        }
        let a_next = 0.5 * (a + g);
        g = (a * g).sqrt();
        a = a_next;
    }
    Ok(PI / (2.0 * a))
}

pub fn gamma(x: f64) -> f64 {
    libm::tgamma(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bessel_reference_values() {
        // reference values from Abramowitz & Stegun, table 9.8
        assert_relative_eq!(besseli0(0.0), 1.0, max_relative = 1e-14);
        assert_relative_eq!(besseli0(1.0), 1.266065877752008, max_relative = 1e-12);
        assert_relative_eq!(besseli1(1.0), 0.565159103992485, max_relative = 1e-12);
        assert_relative_eq!(besseli0(10.0), 2815.716628466254, max_relative = 1e-11);
        assert_relative_eq!(besseli1(10.0), 2670.988303701255, max_relative = 1e-11);
        assert_eq!(besseli1(0.0), 0.0);
        assert_relative_eq!(besseli1(-1.0), -0.565159103992485, max_relative = 1e-12);
    }

    #[test]
    fn test_bessel_series_and_asymptotic_agree_at_switch() {
        let below = series_scaled(ASYMPTOTIC_LIMIT, 0);
        let above = asymptotic_scaled(ASYMPTOTIC_LIMIT, 0);
        assert_relative_eq!(below, above, max_relative = 1e-10);
        let below = series_scaled(ASYMPTOTIC_LIMIT, 1);
        let above = asymptotic_scaled(ASYMPTOTIC_LIMIT, 1);
        assert_relative_eq!(below, above, max_relative = 1e-10);
    }

    #[test]
    fn test_scaled_bessel_large_argument() {
        // I0(x) e^-x -> 1/sqrt(2 pi x) and the ratio I1/I0 -> 1 - 1/(2x)
        let x = 1e4;
        assert_relative_eq!(besseli0e(x), 1.0 / (2.0 * PI * x).sqrt(), max_relative = 1e-4);
        assert_relative_eq!(besseli1e(x) / besseli0e(x), 1.0 - 0.5 / x, max_relative = 1e-7);
    }

    #[test]
    fn test_cellipk() {
        assert_relative_eq!(cellipk(0.0).unwrap(), PI / 2.0, max_relative = 1e-15);
        assert_relative_eq!(cellipk(0.5).unwrap(), 1.854074677301372, max_relative = 1e-13);
        assert_relative_eq!(cellipk(0.9).unwrap(), 2.578092113348173, max_relative = 1e-13);
        assert!(matches!(cellipk(1.0), Err(KiStatError::DomainError { .. })));
        assert!(cellipk(1.5).is_err());
    }

    #[test]
    fn test_gamma() {
        assert_relative_eq!(gamma(2.5), 0.75 * PI.sqrt(), max_relative = 1e-14);
        assert_relative_eq!(gamma(5.0), 24.0, max_relative = 1e-14);
    }
}
