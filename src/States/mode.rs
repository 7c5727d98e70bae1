use super::harmonic_oscillator::HarmonicOscillator;
use super::hindered_rotor::HinderedRotor;
use super::rigid_rotor::RigidRotor;
use super::translation::Translation;
use crate::errors::KiStatError;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common interface of all molecular degrees of freedom.
/// Temperatures in K, results in SI molar units. The list versions evaluate the scalar
/// method elementwise and stop at the first failure.
#[enum_dispatch]
pub trait ModeCalculator {
    /// dimensionless partition function Q(T)
    fn get_partition_function(&self, T: f64) -> Result<f64, KiStatError>;
    /// heat capacity contribution, J/(mol*K)
    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError>;
    /// enthalpy contribution, J/mol
    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError>;
    /// entropy contribution, J/(mol*K)
    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError>;
    /// density of states on a uniform energy grid (J/mol), mol/J
    fn get_density_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError>;

    fn get_partition_functions(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_partition_function(T)).collect()
    }
    fn get_heat_capacities(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_heat_capacity(T)).collect()
    }
    fn get_enthalpies(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_enthalpy(T)).collect()
    }
    fn get_entropies(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_entropy(T)).collect()
    }
}

/// One degree-of-freedom group of a molecule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
#[enum_dispatch(ModeCalculator)]
pub enum Mode {
    Translation(Translation),
    RigidRotor(RigidRotor),
    HinderedRotor(HinderedRotor),
    HarmonicOscillator(HarmonicOscillator),
}

impl Mode {
    pub fn is_harmonic_oscillator(&self) -> bool {
        matches!(self, Mode::HarmonicOscillator(_))
    }

    pub fn is_rigid_rotor(&self) -> bool {
        matches!(self, Mode::RigidRotor(_))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Translation(m) => m.fmt(f),
            Mode::RigidRotor(m) => m.fmt(f),
            Mode::HinderedRotor(m) => m.fmt(f),
            Mode::HarmonicOscillator(m) => m.fmt(f),
        }
    }
}

/// Grid checks shared by the density-of-states routines: at least two points, nonnegative
/// start, constant positive spacing. Returns the spacing dE.
pub fn check_energy_grid(Elist: &[f64], context: &str) -> Result<f64, KiStatError> {
    if Elist.len() < 2 {
        return Err(KiStatError::invalid_argument(
            context,
            format!("energy grid needs at least 2 points, got {}", Elist.len()),
        ));
    }
    if !(Elist[0].is_finite() && Elist[0] >= 0.0) {
        return Err(KiStatError::domain(
            context,
            Elist[0],
            "energy grid must start at a nonnegative energy",
        ));
    }
    let dE = Elist[1] - Elist[0];
    if !(dE.is_finite() && dE > 0.0) {
        return Err(KiStatError::invalid_argument(
            context,
            format!("energy grid must be increasing, spacing {}", dE),
        ));
    }
    for pair in Elist.windows(2) {
        let step = pair[1] - pair[0];
        if (step - dE).abs() > 1e-6 * dE {
            return Err(KiStatError::invalid_argument(
                context,
                format!("energy grid must be uniform: step {} differs from {}", step, dE),
            ));
        }
    }
    Ok(dE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_grid_checks() {
        let grid: Vec<f64> = (0..10).map(|i| i as f64 * 100.0).collect();
        assert_eq!(check_energy_grid(&grid, "grid").unwrap(), 100.0);
        assert!(matches!(
            check_energy_grid(&[0.0], "grid"),
            Err(KiStatError::InvalidArgument { .. })
        ));
        assert!(matches!(
            check_energy_grid(&[-10.0, 0.0, 10.0], "grid"),
            Err(KiStatError::DomainError { .. })
        ));
        assert!(matches!(
            check_energy_grid(&[0.0, 10.0, 25.0], "grid"),
            Err(KiStatError::InvalidArgument { .. })
        ));
    }
}
