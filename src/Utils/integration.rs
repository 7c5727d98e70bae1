//! Globally adaptive quadrature on a finite interval.
//!
//! Every subinterval is integrated with a 10-point and a 21-point Gauss-Legendre rule; the
//! difference of the two is the local error estimate. The subinterval with the largest error
//! is bisected until the total error satisfies `max(epsabs, epsrel*|I|)`, or the
//! subinterval budget runs out, which is reported as a numerical failure.
use crate::errors::KiStatError;
use gauss_quad::GaussLegendre;
use log::error;

const LOW_ORDER: usize = 10;
const HIGH_ORDER: usize = 21;

#[derive(Debug, Clone, Copy)]
pub struct QuadResult {
    pub value: f64,
    pub abserr: f64,
    pub subintervals: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

pub struct AdaptiveQuadrature {
    low: (Vec<f64>, Vec<f64>),
    high: (Vec<f64>, Vec<f64>),
    pub epsabs: f64,
    pub epsrel: f64,
    pub max_subintervals: usize,
}

impl AdaptiveQuadrature {
    pub fn new(epsabs: f64, epsrel: f64, max_subintervals: usize) -> Self {
        Self {
            low: GaussLegendre::nodes_and_weights(LOW_ORDER),
            high: GaussLegendre::nodes_and_weights(HIGH_ORDER),
            epsabs,
            epsrel,
            max_subintervals,
        }
    }

    fn rule<F: Fn(f64) -> f64>(rule: &(Vec<f64>, Vec<f64>), f: &F, a: f64, b: f64) -> f64 {
        // nodes live on [-1, 1]
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        let (nodes, weights) = rule;
        half * nodes
            .iter()
            .zip(weights.iter())
            .map(|(x, w)| w * f(mid + half * x))
            .sum::<f64>()
    }

    fn segment<F: Fn(f64) -> f64>(&self, f: &F, a: f64, b: f64) -> Segment {
        let coarse = Self::rule(&self.low, f, a, b);
        let fine = Self::rule(&self.high, f, a, b);
        Segment {
            a,
            b,
            value: fine,
            error: (fine - coarse).abs(),
        }
    }

    pub fn integrate<F: Fn(f64) -> f64>(
        &self,
        f: F,
        a: f64,
        b: f64,
        context: &str,
    ) -> Result<QuadResult, KiStatError> {
        if !(a.is_finite() && b.is_finite()) {
            return Err(KiStatError::domain(context, if a.is_finite() { b } else { a }, "integration bounds must be finite"));
        }
        if a == b {
            return Ok(QuadResult {
                value: 0.0,
                abserr: 0.0,
                subintervals: 1,
            });
        }
        let mut segments = vec![self.segment(&f, a, b)];
        loop {
            let value: f64 = segments.iter().map(|s| s.value).sum();
            let abserr: f64 = segments.iter().map(|s| s.error).sum();
            if !value.is_finite() {
                let message = "integrand is not finite on the interval".to_string();
                error!("{}: {}", context, message);
                return Err(KiStatError::numerical_failure(context, message));
            }
            if abserr <= self.epsabs.max(self.epsrel * value.abs()) {
                return Ok(QuadResult {
                    value,
                    abserr,
                    subintervals: segments.len(),
                });
            }
            if segments.len() >= self.max_subintervals {
                let message = format!(
                    "no convergence with {} subintervals, estimated error {:e} for value {:e}",
                    segments.len(),
                    abserr,
                    value
                );
                error!("{}: {}", context, message);
                return Err(KiStatError::numerical_failure(context, message));
            }
            let worst = segments
                .iter()
                .enumerate()
                .max_by(|(_, s1), (_, s2)| s1.error.total_cmp(&s2.error))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let Segment { a, b, .. } = segments.swap_remove(worst);
            let mid = 0.5 * (a + b);
            segments.push(self.segment(&f, a, mid));
            segments.push(self.segment(&f, mid, b));
        }
    }
}

/// One-shot adaptive integration of `f` over [a, b].
pub fn quad<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    epsabs: f64,
    epsrel: f64,
    max_subintervals: usize,
    context: &str,
) -> Result<QuadResult, KiStatError> {
    AdaptiveQuadrature::new(epsabs, epsrel, max_subintervals).integrate(f, a, b, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_smooth_integrands() {
        let r = quad(|x| x.sin(), 0.0, PI, 1.49e-8, 1.49e-8, 50, "sin").unwrap();
        assert_relative_eq!(r.value, 2.0, max_relative = 1e-12);
        let r = quad(|x| (-x).exp(), 0.0, 50.0, 1.49e-8, 1.49e-8, 50, "exp").unwrap();
        assert_relative_eq!(r.value, 1.0 - (-50.0f64).exp(), max_relative = 1e-10);
    }

    #[test]
    fn test_peaked_integrand_needs_subdivision() {
        // narrow Lorentzian, integral = atan(100) - atan(-100) scaled
        let f = |x: f64| 1.0 / (1.0 + (100.0 * x).powi(2));
        let r = quad(f, -1.0, 1.0, 1e-10, 1e-10, 200, "lorentzian").unwrap();
        assert_relative_eq!(r.value, 2.0 * 100f64.atan() / 100.0, max_relative = 1e-9);
        assert!(r.subintervals > 1);
    }

    #[test]
    fn test_budget_exhausted() {
        let f = |x: f64| 1.0 / (1.0 + (1e4 * x).powi(2));
        let r = quad(f, -1.0, 1.0, 1e-14, 1e-14, 3, "too few subintervals");
        assert!(matches!(r, Err(KiStatError::NumericalFailure { .. })));
    }
}
