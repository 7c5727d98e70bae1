/// thermodynamic functions of species: NASA-7 polynomials or functions derived from molecular states
/// # Examples
/// ```
/// use KiStat::Thermodynamics::thermo_models::{NasaModel, ThermoCalculator, ThermoModel};
/// // N2, one range 300 - 1000 K
/// let n2 = NasaModel::from_coefficients(&[
///     300.0, 1000.0, 3.298677, 1.4082404e-3, -3.963222e-6, 5.641515e-9, -2.444854e-12,
///     -1020.8999, 3.950372,
/// ])
/// .unwrap();
/// let thermo = ThermoModel::NASA(n2);
/// let cp = thermo.get_heat_capacity(298.15);
/// assert!(cp.is_err());
/// let cp = thermo.get_heat_capacity(400.0).unwrap();
/// assert!(cp > 29.0 && cp < 30.0);
/// ```
pub mod thermo_models;
/// species and transition states: ground-state energies, thermo and molecular states
pub mod species;
