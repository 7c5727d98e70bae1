//! Tunneling corrections to transition state theory rate coefficients.
//!
//! Both corrections depend on the imaginary frequency of the reaction coordinate in cm^-1,
//! only its magnitude is used. The Eckart correction also needs the barrier heights measured
//! from the reactant side (dV1) and from the product side (dV2), both in J/mol.
use crate::Utils::integration::quad;
use crate::constants::{Na, R, c, h, kB, pi};
use crate::errors::{KiStatError, check_temperature};
use crate::settings::EckartSettings;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tunneling {
    None,
    Wigner,
    Eckart,
}

impl FromStr for Tunneling {
    type Err = KiStatError;
    /// `""` and `"none"` mean no correction; case is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Tunneling::None),
            "wigner" => Ok(Tunneling::Wigner),
            "eckart" => Ok(Tunneling::Eckart),
            other => Err(KiStatError::invalid_argument(
                "Tunneling",
                format!("unknown tunneling correction '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Tunneling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Tunneling::None => "none",
            Tunneling::Wigner => "Wigner",
            Tunneling::Eckart => "Eckart",
        };
        write!(f, "{}", name)
    }
}

fn check_frequency(frequency: f64, context: &str) -> Result<f64, KiStatError> {
    if frequency.is_finite() && frequency != 0.0 {
        Ok(frequency.abs())
    } else {
        Err(KiStatError::domain(
            context,
            frequency,
            "imaginary frequency must be finite and nonzero",
        ))
    }
}

/// kappa = 1 + (h c |nu| / (kB T))^2 / 24
pub fn wigner_correction(frequency: f64, T: f64) -> Result<f64, KiStatError> {
    let context = "Wigner tunneling";
    check_temperature(T, context)?;
    let frequency = check_frequency(frequency, context)?;
    let u = h * c * 100.0 * frequency / (kB * T);
    Ok(1.0 + u * u / 24.0)
}

/// Integrand of the Eckart correction in the reduced energy E/kT: the Boltzmann factor
/// times the transmission probability of an unsymmetric Eckart barrier.
fn eckart_integrand(E_kT: f64, kT: f64, dV1: f64, alpha1: f64, alpha2: f64) -> f64 {
    let xi = E_kT * kT / dV1;
    let norm = 1.0 / alpha1.sqrt() + 1.0 / alpha2.sqrt();
    let twopia = 2.0 * (alpha1 * xi).sqrt() / norm;
    let twopib = 2.0 * ((xi - 1.0) * alpha1 + alpha2).abs().sqrt() / norm;
    let twopid = 2.0 * (alpha1 * alpha2 - 4.0 * pi * pi / 16.0).abs().sqrt();

    let kappaE = if twopia < 200.0 && twopib < 200.0 && twopid < 200.0 {
        1.0 - ((twopia - twopib).cosh() + twopid.cosh())
            / ((twopia + twopib).cosh() + twopid.cosh())
    } else if twopia - twopib - twopid > 10.0
        || twopib - twopia - twopid > 10.0
        || twopia + twopib - twopid > 10.0
    {
        // one exponential dominates the hyperbolic functions
        1.0 - (-2.0 * twopia).exp()
            - (-2.0 * twopib).exp()
            - (-twopia - twopib + twopid).exp()
            - (-twopia - twopib - twopid).exp()
    } else {
        // numerator and denominator divided by exp(twopid)
        1.0 - ((twopia - twopib - twopid).exp()
            + (-twopia + twopib - twopid).exp()
            + 1.0
            + (-2.0 * twopid).exp())
            / ((twopia + twopib - twopid).exp()
                + (-twopia - twopib - twopid).exp()
                + 1.0
                + (-2.0 * twopid).exp())
    };
    (-E_kT).exp() * kappaE
}

/// Eckart tunneling correction with the default integration settings.
pub fn eckart_correction(frequency: f64, dV1: f64, dV2: f64, T: f64) -> Result<f64, KiStatError> {
    eckart_correction_with_settings(frequency, dV1, dV2, T, &EckartSettings::default())
}

/// The barrier is always crossed from its lower side, so the heights are swapped when
/// dV2 < dV1. The integration range is bracketed on a coarse E/kT grid where the
/// integrand exceeds `cutoff` times its maximum, then integrated adaptively.
pub fn eckart_correction_with_settings(
    frequency: f64,
    dV1: f64,
    dV2: f64,
    T: f64,
    settings: &EckartSettings,
) -> Result<f64, KiStatError> {
    let context = "Eckart tunneling";
    check_temperature(T, context)?;
    let frequency = check_frequency(frequency, context)?;
    let (dV1, dV2) = if dV2 < dV1 {
        debug!("{}: barrier heights swapped to dV1 = {}, dV2 = {}", context, dV2, dV1);
        (dV2, dV1)
    } else {
        (dV1, dV2)
    };
    if !(dV1.is_finite() && dV1 > 0.0 && dV2.is_finite()) {
        return Err(KiStatError::domain(
            context,
            dV1,
            "barrier heights must be finite and positive",
        ));
    }
    if !(settings.e_kt_step > 0.0 && settings.e_kt_max > settings.e_kt_step) {
        return Err(KiStatError::invalid_argument(
            context,
            format!(
                "bad scan grid: step {} up to {}",
                settings.e_kt_step, settings.e_kt_max
            ),
        ));
    }

    let quantum = h * c * 100.0 * frequency;
    let alpha1 = 2.0 * pi * dV1 / Na / quantum;
    let alpha2 = 2.0 * pi * dV2 / Na / quantum;
    let kT = R * T;
    let f = |E_kT: f64| eckart_integrand(E_kT, kT, dV1, alpha1, alpha2);

    let points = (settings.e_kt_max / settings.e_kt_step).round() as usize + 1;
    let grid: Vec<f64> = (0..points).map(|i| i as f64 * settings.e_kt_step).collect();
    let values: Vec<f64> = grid.iter().map(|&x| f(x)).collect();
    let fmax = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !(fmax.is_finite() && fmax > 0.0) {
        let message = format!("integrand maximum on the scan grid is {}", fmax);
        error!("{}: {}", context, message);
        return Err(KiStatError::numerical_failure(context, message));
    }
    let fcrit = settings.cutoff * fmax;
    // fmax > fcrit, so both searches succeed
    let first = values.iter().position(|&v| v > fcrit).unwrap_or(0);
    let last = values.iter().rposition(|&v| v > fcrit).unwrap_or(points - 1);
    let (Emin, Emax) = (grid[first], grid[last]);
    debug!("{}: integrating E/kT over [{}, {}]", context, Emin, Emax);

    let integral = quad(
        f,
        Emin,
        Emax,
        settings.epsabs,
        settings.epsrel,
        settings.max_subintervals,
        context,
    )?;
    Ok(integral.value * (dV1 / kT).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::kB_cm;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_tunneling() {
        assert_eq!("".parse::<Tunneling>().unwrap(), Tunneling::None);
        assert_eq!("Wigner".parse::<Tunneling>().unwrap(), Tunneling::Wigner);
        assert_eq!("ECKART".parse::<Tunneling>().unwrap(), Tunneling::Eckart);
        assert!(matches!(
            "bell".parse::<Tunneling>(),
            Err(KiStatError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_wigner() {
        let kappa = wigner_correction(-1000.0, 300.0).unwrap();
        assert_relative_eq!(kappa, 1.9583675747760299, max_relative = 1e-10);
        let u: f64 = 1000.0 / (kB_cm * 300.0);
        assert_relative_eq!(kappa, 1.0 + u * u / 24.0, max_relative = 1e-5);
        assert!(wigner_correction(0.0, 300.0).is_err());
    }

    #[test]
    fn test_eckart_reference_values() {
        let kappa = eckart_correction(1500.0, 40000.0, 40000.0, 300.0).unwrap();
        assert_relative_eq!(kappa, 12.956622749022005, max_relative = 1e-4);
        let kappa = eckart_correction(1500.0, 40000.0, 60000.0, 300.0).unwrap();
        assert_relative_eq!(kappa, 14.519158038830657, max_relative = 1e-4);
        let kappa = eckart_correction(1000.0, 30000.0, 50000.0, 500.0).unwrap();
        assert_relative_eq!(kappa, 1.4603931034724356, max_relative = 1e-4);
    }

    #[test]
    fn test_eckart_direction_and_limits() {
        let forward = eckart_correction(1500.0, 40000.0, 60000.0, 300.0).unwrap();
        let backward = eckart_correction(-1500.0, 60000.0, 40000.0, 300.0).unwrap();
        assert_relative_eq!(forward, backward, max_relative = 1e-12);
        // tunneling matters less as the temperature rises
        let hot = eckart_correction(1500.0, 40000.0, 40000.0, 2000.0).unwrap();
        assert_relative_eq!(hot, 1.0686545563810812, max_relative = 1e-4);
        assert!(hot < forward);
        assert!(matches!(
            eckart_correction(1500.0, -100.0, 40000.0, 300.0),
            Err(KiStatError::DomainError { .. })
        ));
    }
}
