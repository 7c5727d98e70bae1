use super::mode::{ModeCalculator, check_energy_grid};
use crate::constants::{Na, R, h, kB, pi};
use crate::errors::{KiStatError, check_temperature};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External rotation of a rigid molecule in the classical (high temperature) limit.
/// A linear rotor has one moment of inertia, a nonlinear one has three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RigidRotorInput")]
pub struct RigidRotor {
    linear: bool,
    /// kg*m^2
    inertia: Vec<f64>,
    symmetry: u32,
}

#[derive(Deserialize)]
struct RigidRotorInput {
    linear: bool,
    inertia: Vec<f64>,
    symmetry: u32,
}

impl TryFrom<RigidRotorInput> for RigidRotor {
    type Error = KiStatError;
    fn try_from(input: RigidRotorInput) -> Result<Self, Self::Error> {
        RigidRotor::new(input.linear, input.inertia, input.symmetry)
    }
}

impl RigidRotor {
    pub fn new(linear: bool, inertia: Vec<f64>, symmetry: u32) -> Result<Self, KiStatError> {
        let expected = if linear { 1 } else { 3 };
        if inertia.len() != expected {
            return Err(KiStatError::invalid_argument(
                "RigidRotor",
                format!(
                    "{} rotor needs {} moment(s) of inertia, got {}",
                    if linear { "linear" } else { "nonlinear" },
                    expected,
                    inertia.len()
                ),
            ));
        }
        if let Some(&bad) = inertia.iter().find(|&&I| !(I.is_finite() && I > 0.0)) {
            return Err(KiStatError::domain(
                "RigidRotor",
                bad,
                "moments of inertia must be positive",
            ));
        }
        if symmetry == 0 {
            return Err(KiStatError::invalid_argument(
                "RigidRotor",
                "symmetry number must be at least 1",
            ));
        }
        Ok(Self {
            linear,
            inertia,
            symmetry,
        })
    }

    pub fn linear(&self) -> bool {
        self.linear
    }

    pub fn inertia(&self) -> &[f64] {
        &self.inertia
    }

    pub fn symmetry(&self) -> u32 {
        self.symmetry
    }

    /// product of the rotational temperatures h^2/(8 pi^2 I kB), K (K^3 for nonlinear)
    fn theta(&self) -> f64 {
        self.inertia
            .iter()
            .map(|&I| h * h / (8.0 * pi * pi * I * kB))
            .product()
    }

    /// same as `theta` with the molar energy instead of the temperature, J/mol (or (J/mol)^3)
    fn theta_energy(&self) -> f64 {
        self.inertia
            .iter()
            .map(|&I| h * h / (8.0 * pi * pi * I) * Na)
            .product()
    }

    fn check(&self, T: f64) -> Result<(), KiStatError> {
        check_temperature(T, &self.to_string())
    }
}

impl ModeCalculator for RigidRotor {
    fn get_partition_function(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        let sigma = self.symmetry as f64;
        let theta = self.theta();
        if self.linear {
            Ok(T / theta / sigma)
        } else {
            Ok((pi * T.powi(3) / theta).sqrt() / sigma)
        }
    }

    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        Ok(if self.linear { R } else { 1.5 * R })
    }

    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        Ok(if self.linear { R * T } else { 1.5 * R * T })
    }

    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        let Q = self.get_partition_function(T)?;
        Ok(if self.linear {
            R * (Q.ln() + 1.0)
        } else {
            R * (Q.ln() + 1.5)
        })
    }

    fn get_density_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        check_energy_grid(Elist, &self.to_string())?;
        let sigma = self.symmetry as f64;
        let theta = self.theta_energy();
        if self.linear {
            Ok(vec![1.0 / theta / sigma; Elist.len()])
        } else {
            Ok(Elist
                .iter()
                .map(|&E| 2.0 * (E / theta).sqrt() / sigma)
                .collect())
        }
    }
}

impl fmt::Display for RigidRotor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RigidRotor(linear={}, inertia={:?}, symmetry={})",
            self.linear, self.inertia, self.symmetry
        )
    }
}
