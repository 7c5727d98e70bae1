//! # States Model
//!
//! ## Purpose
//! Aggregates the degrees of freedom of one molecule (or transition state) and evaluates
//! the total partition function, the thermodynamic functions and the density and sum of
//! states. The density of states can be obtained either by direct convolution of the mode
//! densities or by the inverse Laplace transform (ILT) of the partition function in the
//! steepest-descents approximation.
//!
//! ## Conventions
//! - If the model has no `RigidRotor`, an active K-rotor with Q = sqrt(pi R T) and
//!   rho(E) = 1/sqrt(E) is included automatically.
//! - The spin multiplicity multiplies Q and rho.
//! - Heat capacity and enthalpy include the ideal-gas R and RT terms (Cp, H = U + pV);
//!   the entropy is the plain sum of the mode entropies.
//!
//! ## Example
//! ```rust, ignore
//! let states = StatesModel::new(vec![Mode::Translation(tr), Mode::HarmonicOscillator(ho)], 1)?;
//! let Q = states.get_partition_function(298.15)?;
//! let rho = states.get_density_of_states_ILT(&Elist, 2)?;
//! ```
use super::convolution::convolve;
use super::mode::{Mode, ModeCalculator, check_energy_grid};
use crate::Utils::optimization::fmin;
use crate::constants::{R, pi};
use crate::errors::{KiStatError, check_temperature};
use crate::settings::IltSettings;
use log::{debug, error, info};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Objective value for the simplex: a domain error (x <= 0 is a non-physical temperature)
/// becomes an infinite wall, any other error is kept in `failure` for the caller.
fn wall_or_record(value: Result<f64, KiStatError>, failure: &mut Option<KiStatError>) -> f64 {
    match value {
        Ok(value) => value,
        Err(KiStatError::DomainError { .. }) => f64::INFINITY,
        Err(other) => {
            if failure.is_none() {
                *failure = Some(other);
            }
            f64::INFINITY
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StatesModelInput")]
pub struct StatesModel {
    pub modes: Vec<Mode>,
    spin_multiplicity: u32,
}

#[derive(Deserialize)]
struct StatesModelInput {
    modes: Vec<Mode>,
    spin_multiplicity: u32,
}

impl TryFrom<StatesModelInput> for StatesModel {
    type Error = KiStatError;
    fn try_from(input: StatesModelInput) -> Result<Self, Self::Error> {
        StatesModel::new(input.modes, input.spin_multiplicity)
    }
}

impl StatesModel {
    pub fn new(modes: Vec<Mode>, spin_multiplicity: u32) -> Result<Self, KiStatError> {
        if spin_multiplicity == 0 {
            return Err(KiStatError::invalid_argument(
                "StatesModel",
                "spin multiplicity must be at least 1",
            ));
        }
        Ok(Self {
            modes,
            spin_multiplicity,
        })
    }

    pub fn spin_multiplicity(&self) -> u32 {
        self.spin_multiplicity
    }

    /// true if the molecule has explicit external rotation; otherwise the K-rotor is active
    pub fn has_external_rotor(&self) -> bool {
        self.modes.iter().any(|m| m.is_rigid_rotor())
    }

    fn context(&self) -> String {
        format!(
            "StatesModel({} modes, spin multiplicity {})",
            self.modes.len(),
            self.spin_multiplicity
        )
    }

    pub fn get_partition_function(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        let mut Q = 1.0;
        if !self.has_external_rotor() {
            let Trot = 1.0 / R / pi;
            Q *= (T / Trot).sqrt();
        }
        for mode in &self.modes {
            Q *= mode
                .get_partition_function(T)
                .map_err(|e| e.within(&self.context()))?;
        }
        Ok(Q * self.spin_multiplicity as f64)
    }

    /// constant-pressure heat capacity, J/(mol*K)
    pub fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        let mut Cp = R;
        for mode in &self.modes {
            Cp += mode
                .get_heat_capacity(T)
                .map_err(|e| e.within(&self.context()))?;
        }
        Ok(Cp)
    }

    pub fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        let mut H = R * T;
        for mode in &self.modes {
            H += mode.get_enthalpy(T).map_err(|e| e.within(&self.context()))?;
        }
        Ok(H)
    }

    pub fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.context())?;
        let mut S = 0.0;
        for mode in &self.modes {
            S += mode.get_entropy(T).map_err(|e| e.within(&self.context()))?;
        }
        Ok(S)
    }

    pub fn get_partition_functions(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_partition_function(T)).collect()
    }

    pub fn get_heat_capacities(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_heat_capacity(T)).collect()
    }

    pub fn get_enthalpies(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_enthalpy(T)).collect()
    }

    pub fn get_entropies(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_entropy(T)).collect()
    }

    /// Density of states (mol/J) on a uniform grid of energies above the ground state.
    /// Non-vibrational modes are convolved first, the oscillators are counted in last.
    pub fn get_density_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        let dE = check_energy_grid(Elist, &self.context())?;
        let mut rho = vec![0.0; Elist.len()];
        if !self.has_external_rotor() {
            let rho_k: Vec<f64> = Elist
                .iter()
                .map(|&E| if E > 0.0 { 1.0 / E.sqrt() } else { 0.0 })
                .collect();
            rho = convolve(&rho, &rho_k, Elist)?;
        }
        for mode in self.modes.iter().filter(|m| !m.is_harmonic_oscillator()) {
            let rho_mode = mode
                .get_density_of_states(Elist)
                .map_err(|e| e.within(&self.context()))?;
            rho = convolve(&rho, &rho_mode, Elist)?;
        }
        if rho.iter().all(|&r| r == 0.0) {
            // nothing but oscillators: one state at the lowest grid point
            rho[0] = 1.0 / dE;
        }
        for mode in &self.modes {
            if let Mode::HarmonicOscillator(oscillators) = mode {
                rho = oscillators
                    .convolve_density_of_states(Elist, &rho)
                    .map_err(|e| e.within(&self.context()))?;
            }
        }
        let spin = self.spin_multiplicity as f64;
        Ok(rho.into_iter().map(|r| r * spin).collect())
    }

    /// Sum of states N(E_i) = dE * sum_{j<i} rho(E_j)
    pub fn get_sum_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        let dE = check_energy_grid(Elist, &self.context())?;
        let rho = self.get_density_of_states(Elist)?;
        let mut sum_of_states = Vec::with_capacity(rho.len());
        let mut running = 0.0;
        for r in rho {
            sum_of_states.push(running * dE);
            running += r;
        }
        Ok(sum_of_states)
    }

    /// phi(x) = ln Q(1/(R x)) + x E, the exponent of the inverse Laplace integrand
    fn phi(&self, x: f64, E: f64) -> Result<f64, KiStatError> {
        let Q = self.get_partition_function(1.0 / (R * x))?;
        Ok(Q.ln() + x * E)
    }

    pub fn get_density_of_states_ILT(
        &self,
        Elist: &[f64],
        order: usize,
    ) -> Result<Vec<f64>, KiStatError> {
        self.get_density_of_states_ILT_with_settings(Elist, order, &IltSettings::default())
    }

    /// Density of states by the method of steepest descents,
    /// rho(E) = exp(phi(x*)) / sqrt(2 pi phi''(x*)), where x* minimizes phi for the given E.
    /// `order` 2 adds the correction factor 1 + phi''''/(8 phi''^2) - 5 phi'''^2/(24 phi''^3).
    /// The minimum found at one energy seeds the search at the next one. rho(Elist[0]) = 0.
    pub fn get_density_of_states_ILT_with_settings(
        &self,
        Elist: &[f64],
        order: usize,
        settings: &IltSettings,
    ) -> Result<Vec<f64>, KiStatError> {
        let context = self.context();
        if order != 1 && order != 2 {
            return Err(KiStatError::invalid_argument(
                &context,
                format!("steepest descents order must be 1 or 2, got {}", order),
            ));
        }
        if Elist.is_empty() {
            return Ok(Vec::new());
        }
        let mut rho = vec![0.0; Elist.len()];
        let mut x = settings.initial_guess;
        for i in 1..Elist.len() {
            let E = Elist[i];
            if !(E.is_finite() && E > 0.0) {
                return Err(KiStatError::domain(
                    &context,
                    E,
                    "inverse Laplace transform needs positive energies",
                ));
            }
            let mut failure: Option<KiStatError> = None;
            let objective = |x: f64| wall_or_record(self.phi(x, E), &mut failure);
            let minimum = fmin(
                objective,
                x,
                settings.xtol,
                settings.ftol,
                settings.max_iterations,
                settings.max_evaluations,
                &format!("{}: ILT at E = {} J/mol", context, E),
            );
            if let Some(err) = failure {
                return Err(err);
            }
            x = minimum?.x;
            debug!("ILT: E = {} J/mol, x* = {} mol/J", E, x);

            let f = self.phi(x, E)?;
            let dx = settings.second_derivative_step * x;
            let d2fdx2 = (self.phi(x + dx, E)? - 2.0 * f + self.phi(x - dx, E)?) / (dx * dx);
            if !(d2fdx2.is_finite() && d2fdx2 > 0.0) {
                error!(
                    "ILT: second derivative {} at x = {} (E = {} J/mol) is not positive",
                    d2fdx2, x, E
                );
                return Err(KiStatError::numerical_failure(
                    &context,
                    format!("phi has no minimum at E = {} J/mol", E),
                ));
            }
            rho[i] = f.exp() / (2.0 * pi * d2fdx2).sqrt();

            if order == 2 {
                let dy = settings.higher_derivative_step * x;
                let d3fdx3 = (self.phi(x + 1.5 * dy, E)? - 3.0 * self.phi(x + 0.5 * dy, E)?
                    + 3.0 * self.phi(x - 0.5 * dy, E)?
                    - self.phi(x - 1.5 * dy, E)?)
                    / dy.powi(3);
                let d4fdx4 = (self.phi(x + 2.0 * dy, E)? - 4.0 * self.phi(x + dy, E)?
                    + 6.0 * f
                    - 4.0 * self.phi(x - dy, E)?
                    + self.phi(x - 2.0 * dy, E)?)
                    / dy.powi(4);
                rho[i] *= 1.0 + d4fdx4 / 8.0 / d2fdx2.powi(2)
                    - 5.0 * d3fdx3.powi(2) / 24.0 / d2fdx2.powi(3);
            }
        }
        info!(
            "ILT (order {}) density of states on {} energies up to {} J/mol",
            order,
            Elist.len(),
            Elist[Elist.len() - 1]
        );
        Ok(rho)
    }

    /// Table of Q, Cp, H and S at the given temperatures
    pub fn thermo_table(&self, Tlist: &[f64]) -> Result<Table, KiStatError> {
        let mut table = Table::new();
        let header = ["T, K", "Q", "Cp, J/mol/K", "H, J/mol", "S, J/mol/K"];
        table.add_row(Row::new(header.iter().map(|h| Cell::new(h)).collect()));
        for &T in Tlist {
            let row = vec![
                Cell::new(&format!("{:.2}", T)),
                Cell::new(&format!("{:.4e}", self.get_partition_function(T)?)),
                Cell::new(&format!("{:.3}", self.get_heat_capacity(T)?)),
                Cell::new(&format!("{:.1}", self.get_enthalpy(T)?)),
                Cell::new(&format!("{:.3}", self.get_entropy(T)?)),
            ];
            table.add_row(Row::new(row));
        }
        Ok(table)
    }

    pub fn pretty_print_table(&self, Tlist: &[f64]) -> Result<(), KiStatError> {
        let table = self.thermo_table(Tlist)?;
        println!("{}", self.context());
        table.printstd();
        Ok(())
    }
}

impl fmt::Display for StatesModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StatesModel(modes=[")?;
        for (i, mode) in self.modes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", mode)?;
        }
        write!(f, "], spinMultiplicity={})", self.spin_multiplicity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_wall_keeps_real_failures() {
        let mut failure = None;
        assert_eq!(wall_or_record(Ok(1.5), &mut failure), 1.5);
        let wall = wall_or_record(Err(KiStatError::domain("T", -1.0, "negative")), &mut failure);
        assert_eq!(wall, f64::INFINITY);
        assert!(failure.is_none());

        let err = KiStatError::numerical_failure("HinderedRotor", "eigensolver");
        assert_eq!(wall_or_record(Err(err), &mut failure), f64::INFINITY);
        let later = KiStatError::numerical_failure("other", "second");
        wall_or_record(Err(later), &mut failure);
        match failure {
            Some(KiStatError::NumericalFailure { context, .. }) => assert_eq!(context, "HinderedRotor"),
            other => panic!("expected the first numerical failure, got {:?}", other),
        }
    }
}
