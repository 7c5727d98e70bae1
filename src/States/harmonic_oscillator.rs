use super::convolution::beyer_swinehart;
use super::mode::{ModeCalculator, check_energy_grid};
use crate::constants::{R, kB_cm};
use crate::errors::{KiStatError, check_temperature};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of independent quantum harmonic oscillators. Energies are counted from the
/// zero-point level, so Q -> 1 as T -> 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HarmonicOscillatorInput")]
pub struct HarmonicOscillator {
    /// cm^-1
    frequencies: Vec<f64>,
}

#[derive(Deserialize)]
struct HarmonicOscillatorInput {
    frequencies: Vec<f64>,
}

impl TryFrom<HarmonicOscillatorInput> for HarmonicOscillator {
    type Error = KiStatError;
    fn try_from(input: HarmonicOscillatorInput) -> Result<Self, Self::Error> {
        HarmonicOscillator::new(input.frequencies)
    }
}

/// x/(e^x - 1), equal to 1 at x = 0
fn x_over_expm1(x: f64) -> f64 {
    if x < 1e-8 { 1.0 - 0.5 * x } else { x / x.exp_m1() }
}

/// x^2 e^x/(1 - e^x)^2 written with e^-x so it cannot overflow for large x
pub(crate) fn einstein_heat_capacity(x: f64) -> f64 {
    if x < 1e-6 {
        1.0 - x * x / 12.0
    } else {
        let exp_x = (-x).exp();
        let one_minus = -(-x).exp_m1();
        x * x * exp_x / (one_minus * one_minus)
    }
}

impl HarmonicOscillator {
    pub fn new(frequencies: Vec<f64>) -> Result<Self, KiStatError> {
        if let Some(&bad) = frequencies.iter().find(|&&f| !(f.is_finite() && f > 0.0)) {
            return Err(KiStatError::domain(
                "HarmonicOscillator",
                bad,
                "vibrational frequencies must be positive",
            ));
        }
        Ok(Self { frequencies })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    fn reduced_frequencies(&self, T: f64) -> Result<impl Iterator<Item = f64> + '_, KiStatError> {
        check_temperature(T, &self.to_string())?;
        Ok(self.frequencies.iter().map(move |&freq| freq / (kB_cm * T)))
    }

    /// Adds the oscillators to an existing density of states `rho0` on the grid `Elist`
    /// by direct count. An oscillator whose quantum is narrower than the grid spacing
    /// cannot be represented and is skipped with a warning.
    pub fn convolve_density_of_states(
        &self,
        Elist: &[f64],
        rho0: &[f64],
    ) -> Result<Vec<f64>, KiStatError> {
        check_energy_grid(Elist, &self.to_string())?;
        if rho0.len() != Elist.len() {
            return Err(KiStatError::invalid_argument(
                self.to_string(),
                format!(
                    "density of states has {} points but the energy grid has {}",
                    rho0.len(),
                    Elist.len()
                ),
            ));
        }
        beyer_swinehart(&self.frequencies, Elist, rho0.to_vec())
            .map_err(|e| e.within(&self.to_string()))
    }
}

impl ModeCalculator for HarmonicOscillator {
    fn get_partition_function(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self
            .reduced_frequencies(T)?
            .map(|x| 1.0 / -(-x).exp_m1())
            .product())
    }

    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.reduced_frequencies(T)?.map(einstein_heat_capacity).sum::<f64>() * R)
    }

    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.reduced_frequencies(T)?.map(x_over_expm1).sum::<f64>() * R * T)
    }

    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        // ln Q = -sum ln(1 - e^-x)
        let S: f64 = self
            .reduced_frequencies(T)?
            .map(|x| x_over_expm1(x) - (-(-x).exp()).ln_1p())
            .sum();
        Ok(S * R)
    }

    /// Oscillators alone: counts start from a single state in the lowest grid bin.
    fn get_density_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        let dE = check_energy_grid(Elist, &self.to_string())?;
        let mut rho0 = vec![0.0; Elist.len()];
        rho0[0] = 1.0 / dE;
        self.convolve_density_of_states(Elist, &rho0)
    }
}

impl fmt::Display for HarmonicOscillator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HarmonicOscillator(frequencies={:?})", self.frequencies)
    }
}
