use crate::States::states_model::StatesModel;
use crate::constants::R;
use crate::errors::{KiStatError, check_temperature};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thermodynamic functions of one species, SI molar units (J/mol, J/(mol*K)).
#[enum_dispatch]
pub trait ThermoCalculator {
    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError>;
    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError>;
    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError>;
    /// Gibbs free energy G = H - T S
    fn get_free_energy(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.get_enthalpy(T)? - T * self.get_entropy(T)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
#[enum_dispatch(ThermoCalculator)]
pub enum ThermoModel {
    NASA(NasaModel),
    States(StatesThermo),
}

/// One NASA 7-coefficient polynomial valid on [Tmin, Tmax]:
/// Cp/R = a1 + a2 T + a3 T^2 + a4 T^3 + a5 T^4, H/(RT) = ... + a6/T, S/R = ... + a7
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasaPolynomial {
    pub Tmin: f64,
    pub Tmax: f64,
    pub coeffs: [f64; 7],
}

impl NasaPolynomial {
    fn Cp(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _, _] = self.coeffs;
        R * (a + b * t + c * t.powi(2) + d * t.powi(3) + e * t.powi(4))
    }

    fn dh(&self, t: f64) -> f64 {
        let [a, b, c, d, e, f, _] = self.coeffs;
        R * t
            * (a + b * t / 2.0
                + c * t.powi(2) / 3.0
                + d * t.powi(3) / 4.0
                + e * t.powi(4) / 5.0
                + f / t)
    }

    fn ds(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _, g] = self.coeffs;
        R * (a * t.ln() + b * t + c * t.powi(2) / 2.0 + d * t.powi(3) / 3.0 + e * t.powi(4) / 4.0 + g)
    }
}

/// Piecewise NASA-7 thermo: adjacent temperature ranges, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasaModel {
    pub polynomials: Vec<NasaPolynomial>,
}

impl NasaModel {
    pub fn new(polynomials: Vec<NasaPolynomial>) -> Result<Self, KiStatError> {
        if polynomials.is_empty() {
            return Err(KiStatError::invalid_argument(
                "NasaModel",
                "at least one temperature range is required",
            ));
        }
        for pair in polynomials.windows(2) {
            if pair[0].Tmax != pair[1].Tmin {
                return Err(KiStatError::invalid_argument(
                    "NasaModel",
                    format!(
                        "temperature ranges must be adjacent: {} K vs {} K",
                        pair[0].Tmax, pair[1].Tmin
                    ),
                ));
            }
        }
        if let Some(p) = polynomials.iter().find(|p| !(p.Tmin < p.Tmax)) {
            return Err(KiStatError::invalid_argument(
                "NasaModel",
                format!("empty temperature range {} - {} K", p.Tmin, p.Tmax),
            ));
        }
        Ok(Self { polynomials })
    }

    /// Flat coefficient record: range boundaries followed by 7 coefficients per range,
    /// i.e. 9 (one range), 17 (two ranges) or 25 (three ranges) numbers.
    pub fn from_coefficients(c_data: &[f64]) -> Result<Self, KiStatError> {
        let ranges = match c_data.len() {
            9 => 1,
            17 => 2,
            25 => 3,
            n => {
                return Err(KiStatError::invalid_argument(
                    "NasaModel",
                    format!("expected 9, 17 or 25 coefficients, got {}", n),
                ));
            }
        };
        let bounds = &c_data[..ranges + 1];
        let polynomials = (0..ranges)
            .map(|i| {
                let start = ranges + 1 + 7 * i;
                let mut coeffs = [0.0; 7];
                coeffs.copy_from_slice(&c_data[start..start + 7]);
                NasaPolynomial {
                    Tmin: bounds[i],
                    Tmax: bounds[i + 1],
                    coeffs,
                }
            })
            .collect();
        Self::new(polynomials)
    }

    pub fn Tmin(&self) -> f64 {
        self.polynomials[0].Tmin
    }

    pub fn Tmax(&self) -> f64 {
        self.polynomials[self.polynomials.len() - 1].Tmax
    }

    /// polynomial covering T; a shared boundary belongs to the lower range
    fn polynomial(&self, T: f64) -> Result<&NasaPolynomial, KiStatError> {
        check_temperature(T, "NasaModel")?;
        self.polynomials
            .iter()
            .find(|p| p.Tmin <= T && T <= p.Tmax)
            .ok_or_else(|| {
                KiStatError::domain(
                    "NasaModel",
                    T,
                    format!("valid range is {} - {} K", self.Tmin(), self.Tmax()),
                )
            })
    }
}

impl ThermoCalculator for NasaModel {
    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.polynomial(T)?.Cp(T))
    }

    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.polynomial(T)?.dh(T))
    }

    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.polynomial(T)?.ds(T))
    }
}

/// Thermo derived from molecular states: H = H0 + H_states(T), S = S_states(T).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatesThermo {
    /// enthalpy offset, J/mol
    pub H0: f64,
    pub states: StatesModel,
}

impl StatesThermo {
    pub fn new(H0: f64, states: StatesModel) -> Self {
        Self { H0, states }
    }
}

impl ThermoCalculator for StatesThermo {
    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        self.states.get_heat_capacity(T)
    }

    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        Ok(self.H0 + self.states.get_enthalpy(T)?)
    }

    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        self.states.get_entropy(T)
    }
}

impl fmt::Display for ThermoModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThermoModel::NASA(nasa) => write!(
                f,
                "NasaModel({} ranges, {} - {} K)",
                nasa.polynomials.len(),
                nasa.Tmin(),
                nasa.Tmax()
            ),
            ThermoModel::States(thermo) => {
                write!(f, "StatesThermo(H0={}, states={})", thermo.H0, thermo.states)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::States::harmonic_oscillator::HarmonicOscillator;
    use crate::States::mode::Mode;
    use crate::States::translation::Translation;
    use approx::assert_relative_eq;

    /// GRI-Mech 3.0 coefficients of CO
    fn co_nasa() -> NasaModel {
        NasaModel::from_coefficients(&[
            200.0,
            1000.0,
            3500.0,
            3.57953347,
            -6.1035368e-4,
            1.01681433e-6,
            9.07005884e-10,
            -9.04424499e-13,
            -1.4344086e4,
            3.50840928,
            2.71518561,
            2.06252743e-3,
            -9.98825771e-7,
            2.30053008e-10,
            -2.03647716e-14,
            -1.41518724e4,
            7.81868772,
        ])
        .unwrap()
    }

    #[test]
    fn test_nasa_co_standard_values() {
        let co = ThermoModel::NASA(co_nasa());
        let T = 298.15;
        // JANAF: Cp = 29.14 J/mol/K, S = 197.66 J/mol/K, dHf = -110.53 kJ/mol
        assert_relative_eq!(co.get_heat_capacity(T).unwrap(), 29.14, max_relative = 2e-3);
        assert_relative_eq!(co.get_entropy(T).unwrap(), 197.66, max_relative = 2e-3);
        assert_relative_eq!(co.get_enthalpy(T).unwrap(), -110.53e3, max_relative = 2e-3);
        let G = co.get_free_energy(T).unwrap();
        assert_relative_eq!(
            G,
            co.get_enthalpy(T).unwrap() - T * co.get_entropy(T).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_nasa_ranges_are_continuous() {
        let co = co_nasa();
        let below = co.polynomials[0].Cp(1000.0);
        let above = co.polynomials[1].Cp(1000.0);
        assert_relative_eq!(below, above, max_relative = 1e-3);
        assert_relative_eq!(co.get_heat_capacity(1000.0).unwrap(), below);
    }

    #[test]
    fn test_nasa_out_of_range() {
        let co = co_nasa();
        assert!(matches!(
            co.get_enthalpy(100.0),
            Err(KiStatError::DomainError { .. })
        ));
        assert!(matches!(
            co.get_entropy(4000.0),
            Err(KiStatError::DomainError { .. })
        ));
        assert!(NasaModel::from_coefficients(&[1.0; 10]).is_err());
    }

    #[test]
    fn test_states_thermo() {
        let states = StatesModel::new(
            vec![
                Mode::Translation(Translation::new(0.028).unwrap()),
                Mode::HarmonicOscillator(HarmonicOscillator::new(vec![2359.0]).unwrap()),
            ],
            1,
        )
        .unwrap();
        let thermo = ThermoModel::States(StatesThermo::new(-5000.0, states.clone()));
        let T = 500.0;
        assert_relative_eq!(
            thermo.get_enthalpy(T).unwrap(),
            -5000.0 + states.get_enthalpy(T).unwrap()
        );
        assert_relative_eq!(thermo.get_entropy(T).unwrap(), states.get_entropy(T).unwrap());
        assert_relative_eq!(
            thermo.get_heat_capacity(T).unwrap(),
            states.get_heat_capacity(T).unwrap()
        );
    }
}
