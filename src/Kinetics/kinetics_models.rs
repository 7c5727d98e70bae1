use crate::constants::R;
use crate::errors::{KiStatError, check_temperature};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use log::info;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rate coefficient as a function of temperature (K) and pressure (Pa).
#[enum_dispatch]
pub trait KineticsCalculator {
    fn get_rate_coefficient(&self, T: f64, P: f64) -> Result<f64, KiStatError>;

    fn get_rate_coefficients(&self, Tlist: &[f64], P: f64) -> Result<Vec<f64>, KiStatError> {
        Tlist.iter().map(|&T| self.get_rate_coefficient(T, P)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[enum_dispatch(KineticsCalculator)]
pub enum KineticsModel {
    Arrhenius(ArrheniusModel),
    PDepArrhenius(PDepArrheniusModel),
}

/////////////////////////ARRHENIUS KINETICS///////////////////////////////////////////////////////
// modified Arrhenius form k = A (T/T0)^n exp(-Ea/(R T))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusModel {
    pub A: f64,
    pub n: f64,
    /// activation energy, J/mol
    pub Ea: f64,
    /// reference temperature, K
    pub T0: f64,
}

impl Default for ArrheniusModel {
    fn default() -> Self {
        Self {
            A: 0.0,
            n: 0.0,
            Ea: 0.0,
            T0: 1.0,
        }
    }
}

impl ArrheniusModel {
    pub fn new(A: f64, n: f64, Ea: f64, T0: f64) -> Self {
        Self { A, n, Ea, T0 }
    }

    pub fn K_const(&self, T: f64) -> Result<f64, KiStatError> {
        check_temperature(T, &self.to_string())?;
        Ok(self.A * (T / self.T0).powf(self.n) * (-self.Ea / (R * T)).exp())
    }

    /// symbolic k(T) in the variable `T`
    pub fn K_expr(&self) -> Expr {
        let T = Expr::Var("T".to_owned());
        let A = Expr::Const(self.A);
        let n = Expr::Const(self.n);
        let Ea = Expr::Const(self.Ea);
        let k0 = A * (T.clone() / Expr::Const(self.T0)).pow(n);
        let k = k0 * (-Ea / (Expr::Const(R) * T)).exp();
        k.symplify()
    }

    /// Linear least squares fit of ln k = ln A + n ln(T/T0) - Ea/(R T) through the points
    /// (Tlist, klist). Needs at least three points and positive rate coefficients.
    pub fn fit_to_data(Tlist: &[f64], klist: &[f64], T0: f64) -> Result<Self, KiStatError> {
        let context = "ArrheniusModel::fit_to_data";
        if Tlist.len() != klist.len() {
            return Err(KiStatError::invalid_argument(
                context,
                format!("{} temperatures but {} rate coefficients", Tlist.len(), klist.len()),
            ));
        }
        if Tlist.len() < 3 {
            return Err(KiStatError::invalid_argument(
                context,
                format!("three parameters need at least 3 points, got {}", Tlist.len()),
            ));
        }
        for &T in Tlist {
            check_temperature(T, context)?;
        }
        if let Some(&k) = klist.iter().find(|&&k| !(k.is_finite() && k > 0.0)) {
            return Err(KiStatError::domain(
                context,
                k,
                "rate coefficients must be positive to be fitted in log space",
            ));
        }
        let N = Tlist.len();
        let design = DMatrix::from_fn(N, 3, |i, j| match j {
            0 => 1.0,
            1 => (Tlist[i] / T0).ln(),
            _ => -1.0 / (R * Tlist[i]),
        });
        let rhs = DVector::from_iterator(N, klist.iter().map(|k| k.ln()));
        let svd = design.svd(true, true);
        let solution = svd
            .solve(&rhs, 1e-14)
            .map_err(|e| KiStatError::numerical_failure(context, e))?;
        let fitted = Self {
            A: solution[0].exp(),
            n: solution[1],
            Ea: solution[2],
            T0,
        };
        info!("fitted {} to {} points", fitted, N);
        Ok(fitted)
    }
}

impl KineticsCalculator for ArrheniusModel {
    fn get_rate_coefficient(&self, T: f64, _P: f64) -> Result<f64, KiStatError> {
        self.K_const(T)
    }
}

impl fmt::Display for ArrheniusModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ArrheniusModel(A={:e}, n={}, Ea={}, T0={})",
            self.A, self.n, self.Ea, self.T0
        )
    }
}

/////////////////////////PRESSURE DEPENDENT KINETICS///////////////////////////////////////////////
// Arrhenius expressions tabulated at a set of pressures; ln k is linear in ln P between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PDepArrheniusModel {
    /// Pa, strictly increasing
    pub pressures: Vec<f64>,
    pub arrhenius: Vec<ArrheniusModel>,
}

fn interpolate(x: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

impl PDepArrheniusModel {
    pub fn new(pressures: Vec<f64>, arrhenius: Vec<ArrheniusModel>) -> Result<Self, KiStatError> {
        if pressures.is_empty() || pressures.len() != arrhenius.len() {
            return Err(KiStatError::invalid_argument(
                "PDepArrheniusModel",
                format!(
                    "{} pressures for {} Arrhenius expressions",
                    pressures.len(),
                    arrhenius.len()
                ),
            ));
        }
        if let Some(&p) = pressures.iter().find(|&&p| !(p.is_finite() && p > 0.0)) {
            return Err(KiStatError::domain(
                "PDepArrheniusModel",
                p,
                "pressures must be positive",
            ));
        }
        if pressures.windows(2).any(|w| w[0] >= w[1]) {
            return Err(KiStatError::invalid_argument(
                "PDepArrheniusModel",
                "pressures must be strictly increasing",
            ));
        }
        Ok(Self {
            pressures,
            arrhenius,
        })
    }
}

impl KineticsCalculator for PDepArrheniusModel {
    /// Outside the tabulated range the nearest expression is used.
    fn get_rate_coefficient(&self, T: f64, P: f64) -> Result<f64, KiStatError> {
        if !(P.is_finite() && P > 0.0) {
            return Err(KiStatError::domain(
                "PDepArrheniusModel",
                P,
                "pressure must be positive",
            ));
        }
        let last = self.pressures.len() - 1;
        if P <= self.pressures[0] {
            return self.arrhenius[0].K_const(T);
        }
        if P >= self.pressures[last] {
            return self.arrhenius[last].K_const(T);
        }
        let i = self.pressures.partition_point(|&p| p <= P) - 1;
        let (p_low, p_high) = (self.pressures[i], self.pressures[i + 1]);
        let k_low = self.arrhenius[i].K_const(T)?;
        let k_high = self.arrhenius[i + 1].K_const(T)?;
        let ln_k = interpolate(P.ln(), p_low.ln(), p_high.ln(), k_low.ln(), k_high.ln());
        Ok(ln_k.exp())
    }
}

impl fmt::Display for KineticsModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KineticsModel::Arrhenius(k) => k.fmt(f),
            KineticsModel::PDepArrhenius(k) => {
                write!(f, "PDepArrheniusModel(pressures={:?})", k.pressures)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arrhenius_evaluation() {
        let k = ArrheniusModel::new(1.0e10, 0.5, 50000.0, 298.0);
        let T = 800.0;
        let expected = 1.0e10 * (800.0f64 / 298.0).powf(0.5) * (-50000.0 / (R * T)).exp();
        assert_relative_eq!(k.K_const(T).unwrap(), expected, max_relative = 1e-14);
        let model = KineticsModel::Arrhenius(k);
        assert_relative_eq!(model.get_rate_coefficient(T, 1e5).unwrap(), expected, max_relative = 1e-14);
        assert!(model.get_rate_coefficient(-5.0, 1e5).is_err());
    }

    #[test]
    fn test_symbolic_expression_matches_numbers() {
        let k = ArrheniusModel::new(3.0e8, 1.2, 42000.0, 1.0);
        let k_fun = k.K_expr().lambdify1D();
        for T in [400.0, 1000.0, 1800.0] {
            assert_relative_eq!(k_fun(T), k.K_const(T).unwrap(), max_relative = 1e-10);
        }
    }

    #[test]
    fn test_fit_recovers_parameters() {
        let exact = ArrheniusModel::new(2.5e12, -0.7, 83000.0, 300.0);
        let Tlist: Vec<f64> = (0..12).map(|i| 300.0 + 150.0 * i as f64).collect();
        let klist: Vec<f64> = Tlist.iter().map(|&T| exact.K_const(T).unwrap()).collect();
        let fitted = ArrheniusModel::fit_to_data(&Tlist, &klist, 300.0).unwrap();
        assert_relative_eq!(fitted.A, exact.A, max_relative = 1e-6);
        assert_relative_eq!(fitted.n, exact.n, epsilon = 1e-7);
        assert_relative_eq!(fitted.Ea, exact.Ea, max_relative = 1e-7);
        assert_eq!(fitted.T0, 300.0);
    }

    #[test]
    fn test_fit_rejects_bad_data() {
        assert!(matches!(
            ArrheniusModel::fit_to_data(&[300.0, 400.0], &[1.0, 2.0], 1.0),
            Err(KiStatError::InvalidArgument { .. })
        ));
        assert!(matches!(
            ArrheniusModel::fit_to_data(&[300.0, 400.0, 500.0], &[1.0, 0.0, 2.0], 1.0),
            Err(KiStatError::DomainError { .. })
        ));
    }

    #[test]
    fn test_pressure_dependent_interpolation() {
        let low = ArrheniusModel::new(1.0e6, 0.0, 40000.0, 1.0);
        let high = ArrheniusModel::new(1.0e8, 0.0, 40000.0, 1.0);
        let model = KineticsModel::PDepArrhenius(
            PDepArrheniusModel::new(vec![1e3, 1e5], vec![low.clone(), high.clone()]).unwrap(),
        );
        let T = 1000.0;
        // geometric mean of the pressures gives the geometric mean of k
        let k_mid = model.get_rate_coefficient(T, 1e4).unwrap();
        let expected = (low.K_const(T).unwrap() * high.K_const(T).unwrap()).sqrt();
        assert_relative_eq!(k_mid, expected, max_relative = 1e-12);
        assert_relative_eq!(
            model.get_rate_coefficient(T, 10.0).unwrap(),
            low.K_const(T).unwrap()
        );
        assert_relative_eq!(
            model.get_rate_coefficient(T, 1e7).unwrap(),
            high.K_const(T).unwrap()
        );
        assert!(PDepArrheniusModel::new(vec![1e5, 1e3], vec![low, high]).is_err());
    }
}
