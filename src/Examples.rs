/// partition functions, thermo tables and densities of states of single molecules
pub mod states_examples;
/// transition state theory, equilibrium constants and reaction sets
pub mod reaction_examples;
