//! # Settings Module
//!
//! ## Purpose
//! Numerical knobs of the crate collected in one serializable structure: size of the
//! plane-wave basis of the hindered rotor eigensolver, tolerances of the inverse Laplace
//! transform minimizer and the bracketing/quadrature parameters of the Eckart correction.
//!
//! The settings are passed by reference to the `*_with_settings` flavours of the
//! corresponding methods; the plain methods use `Settings::default()`. There is no global
//! mutable state.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "hindered_rotor": { "basis_half_width": 200, "eigen_max_iterations": 0 },
//!   "ilt": { "initial_guess": 1e-5, "xtol": 1e-8, "ftol": 1e-8, "max_iterations": 100,
//!            "max_evaluations": 1000, "second_derivative_step": 1e-4,
//!            "higher_derivative_step": 1e-2 },
//!   "eckart": { "e_kt_max": 1000.0, "e_kt_step": 0.1, "cutoff": 1e-3,
//!               "epsabs": 1.49e-8, "epsrel": 1.49e-8, "max_subintervals": 50 }
//! }
//! ```
//! Missing sections or fields fall back to their defaults.
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use KiStat::settings::Settings;
//! let settings = Settings::from_json_file("kistat_settings.json")?;
//! let rho = states.get_density_of_states_ILT_with_settings(&Elist, 1, &settings.ilt)?;
//! ```
use crate::errors::KiStatError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Plane-wave basis of the Fourier hindered rotor: functions e^{imφ}, m = -M..M.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HinderedRotorSettings {
    /// M, the basis has 2M+1 functions
    pub basis_half_width: usize,
    /// cap on the QR sweeps of the eigensolver, 0 means 100*(2M+1)
    pub eigen_max_iterations: usize,
}

impl Default for HinderedRotorSettings {
    fn default() -> Self {
        Self {
            basis_half_width: 200,
            eigen_max_iterations: 0,
        }
    }
}

impl HinderedRotorSettings {
    pub fn basis_size(&self) -> usize {
        2 * self.basis_half_width + 1
    }

    pub fn max_iterations(&self) -> usize {
        if self.eigen_max_iterations == 0 {
            100 * self.basis_size()
        } else {
            self.eigen_max_iterations
        }
    }
}

/// Steepest-descents inverse Laplace transform of the partition function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IltSettings {
    /// starting value of x = 1/RT (mol/J) for the lowest energy of the grid
    pub initial_guess: f64,
    pub xtol: f64,
    pub ftol: f64,
    pub max_iterations: usize,
    pub max_evaluations: usize,
    /// relative step of the central second difference of phi
    pub second_derivative_step: f64,
    /// relative step of the third and fourth differences (second-order correction)
    pub higher_derivative_step: f64,
}

impl Default for IltSettings {
    fn default() -> Self {
        Self {
            initial_guess: 1e-5,
            xtol: 1e-8,
            ftol: 1e-8,
            max_iterations: 100,
            max_evaluations: 1000,
            second_derivative_step: 1e-4,
            higher_derivative_step: 1e-2,
        }
    }
}

/// Bracketing grid and quadrature tolerances of the Eckart tunneling integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EckartSettings {
    /// upper end of the coarse E/kT scan
    pub e_kt_max: f64,
    pub e_kt_step: f64,
    /// integrand values below cutoff*max are treated as negligible
    pub cutoff: f64,
    pub epsabs: f64,
    pub epsrel: f64,
    pub max_subintervals: usize,
}

impl Default for EckartSettings {
    fn default() -> Self {
        Self {
            e_kt_max: 1000.0,
            e_kt_step: 0.1,
            cutoff: 1e-3,
            epsabs: 1.49e-8,
            epsrel: 1.49e-8,
            max_subintervals: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hindered_rotor: HinderedRotorSettings,
    pub ilt: IltSettings,
    pub eckart: EckartSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, KiStatError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file; absent fields keep their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, KiStatError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KiStatError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), KiStatError> {
        let positive = [
            ("ilt.initial_guess", self.ilt.initial_guess),
            ("ilt.xtol", self.ilt.xtol),
            ("ilt.ftol", self.ilt.ftol),
            ("ilt.second_derivative_step", self.ilt.second_derivative_step),
            ("ilt.higher_derivative_step", self.ilt.higher_derivative_step),
            ("eckart.e_kt_max", self.eckart.e_kt_max),
            ("eckart.e_kt_step", self.eckart.e_kt_step),
            ("eckart.cutoff", self.eckart.cutoff),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(KiStatError::invalid_argument(
                    "Settings",
                    format!("{} must be positive, got {}", name, value),
                ));
            }
        }
        if self.ilt.max_iterations == 0 || self.ilt.max_evaluations == 0 {
            return Err(KiStatError::invalid_argument(
                "Settings",
                "ilt iteration and evaluation caps must be nonzero",
            ));
        }
        if self.eckart.max_subintervals == 0 {
            return Err(KiStatError::invalid_argument(
                "Settings",
                "eckart.max_subintervals must be nonzero",
            ));
        }
        Ok(())
    }
}
