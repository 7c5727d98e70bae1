//! Reactions built from shared species records: thermodynamics of reaction, equilibrium
//! constants, net rates, transition state theory and tunneling corrections, and the
//! stoichiometry of a whole reaction set.
//!
//! # Examples
//! ```
//! use KiStat::Reactions::reaction::{EquilibriumType, Reaction};
//! use KiStat::Thermodynamics::species::Species;
//! use KiStat::Thermodynamics::thermo_models::{NasaModel, ThermoModel};
//! use std::sync::Arc;
//! // identical thermo on both sides, so Ka = 1
//! let nasa = NasaModel::from_coefficients(&[
//!     300.0, 1000.0, 3.5, 0.0, 0.0, 0.0, 0.0, -1000.0, 4.0,
//! ])
//! .unwrap();
//! let a = Arc::new(Species::new("A", 0.0).with_thermo(ThermoModel::NASA(nasa.clone())));
//! let b = Arc::new(Species::new("B", 0.0).with_thermo(ThermoModel::NASA(nasa)));
//! let reaction = Reaction::new(vec![a], vec![b]);
//! assert_eq!(reaction.to_string(), "A <=> B");
//! let K = reaction.get_equilibrium_constant(500.0, EquilibriumType::Ka).unwrap();
//! assert!((K - 1.0).abs() < 1e-12);
//! ```
pub mod reaction;
pub mod reaction_model;
pub mod tunneling;
#[cfg(test)]
mod reaction_tests;
