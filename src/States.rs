//! Molecular degrees of freedom and their statistical mechanics.
//!
//! Every mode (translation, external rotation, hindered internal rotation, vibrations)
//! knows its partition function, heat capacity, enthalpy, entropy and density of states.
//! `StatesModel` multiplies the modes of one molecule together and adds the inverse Laplace
//! transform of the total partition function.
//!
//! Units: J/mol for energies, J/(mol*K) for heat capacities and entropies, kg/mol for masses,
//! kg*m^2 for moments of inertia, cm^-1 for frequencies, mol/J for densities of states.
pub mod convolution;
pub mod harmonic_oscillator;
pub mod hindered_rotor;
pub mod mode;
pub mod rigid_rotor;
pub mod states_model;
pub mod translation;
