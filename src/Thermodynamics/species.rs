use super::thermo_models::ThermoModel;
use crate::States::states_model::StatesModel;
use crate::errors::KiStatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chemical species as seen by the reaction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// 1-based row of the species in a stoichiometry matrix, None when unassigned
    pub index: Option<usize>,
    pub label: String,
    /// ground-state energy, J/mol
    pub E0: f64,
    pub thermo: Option<ThermoModel>,
    pub states: Option<StatesModel>,
}

impl Species {
    pub fn new(label: &str, E0: f64) -> Self {
        Self {
            index: None,
            label: label.to_owned(),
            E0,
            thermo: None,
            states: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_thermo(mut self, thermo: ThermoModel) -> Self {
        self.thermo = Some(thermo);
        self
    }

    pub fn with_states(mut self, states: StatesModel) -> Self {
        self.states = Some(states);
        self
    }

    pub fn thermo(&self) -> Result<&ThermoModel, KiStatError> {
        self.thermo.as_ref().ok_or_else(|| {
            KiStatError::invalid_argument(
                format!("species {}", self.label),
                "no thermodynamic model",
            )
        })
    }

    pub fn states(&self) -> Result<&StatesModel, KiStatError> {
        self.states.as_ref().ok_or_else(|| {
            KiStatError::invalid_argument(format!("species {}", self.label), "no molecular states")
        })
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Saddle point between reactants and products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    /// ground-state energy, J/mol, on the same scale as the species E0
    pub E0: f64,
    /// reaction path degeneracy
    pub degeneracy: u32,
    pub states: StatesModel,
    /// imaginary frequency of the reaction coordinate, cm^-1 (sign ignored)
    pub frequency: f64,
}

impl TransitionState {
    pub fn new(E0: f64, degeneracy: u32, states: StatesModel, frequency: f64) -> Self {
        Self {
            E0,
            degeneracy,
            states,
            frequency,
        }
    }
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TransitionState(E0={}, degeneracy={}, frequency={})",
            self.E0, self.degeneracy, self.frequency
        )
    }
}
