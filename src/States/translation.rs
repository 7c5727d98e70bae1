use super::mode::{ModeCalculator, check_energy_grid};
use crate::Utils::special_functions::gamma;
use crate::constants::{Na, P0, R, h, kB, pi};
use crate::errors::{KiStatError, check_temperature};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-dimensional translation of an ideal gas molecule at the standard pressure P0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TranslationInput")]
pub struct Translation {
    /// molar mass, kg/mol
    mass: f64,
}

#[derive(Deserialize)]
struct TranslationInput {
    mass: f64,
}

impl TryFrom<TranslationInput> for Translation {
    type Error = KiStatError;
    fn try_from(input: TranslationInput) -> Result<Self, Self::Error> {
        Translation::new(input.mass)
    }
}

impl Translation {
    pub fn new(mass: f64) -> Result<Self, KiStatError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(KiStatError::domain(
                "Translation",
                mass,
                "molar mass must be positive",
            ));
        }
        Ok(Self { mass })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    fn context(&self) -> String {
        self.to_string()
    }
}

impl ModeCalculator for Translation {
    fn get_partition_function(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        let qt = (2.0 * pi * self.mass / Na / (h * h)).powf(1.5) / P0;
        Ok(qt * (kB * T).powf(2.5))
    }

    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        Ok(1.5 * R)
    }

    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        Ok(1.5 * R * T)
    }

    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        let Q = self.get_partition_function(T)?;
        Ok(R * (Q.ln() + 1.5 + 1.0))
    }

    /// rho(E) = qt * E^1.5 / Gamma(2.5) with the energy per molecule, converted to mol/J
    fn get_density_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        check_energy_grid(Elist, &self.context())?;
        let qt = (2.0 * pi * self.mass / Na / (h * h)).powf(1.5) / P0;
        let norm = qt / gamma(2.5) / Na;
        Ok(Elist
            .iter()
            .map(|&E| norm * (E / Na).powf(1.5))
            .collect())
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Translation(mass={})", self.mass)
    }
}
