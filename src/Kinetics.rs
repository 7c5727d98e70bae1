/// rate coefficient models: modified Arrhenius (with least-squares refit and symbolic form)
/// and pressure-dependent Arrhenius tables
/// # Examples
/// ```
/// use KiStat::Kinetics::kinetics_models::{ArrheniusModel, KineticsCalculator, KineticsModel};
/// let kf = ArrheniusModel::new(1.0e13, 0.0, 100000.0, 1.0);
/// let k_sym = kf.K_expr();
/// let k_fun = k_sym.lambdify1D();
/// let model = KineticsModel::Arrhenius(kf);
/// let k = model.get_rate_coefficient(1000.0, 1e5).unwrap();
/// assert!((k_fun(1000.0) - k).abs() < 1e-8 * k);
/// ```
pub mod kinetics_models;
