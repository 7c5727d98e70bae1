use super::tunneling::{Tunneling, eckart_correction_with_settings, wigner_correction};
use crate::Kinetics::kinetics_models::{ArrheniusModel, KineticsCalculator, KineticsModel};
use crate::Thermodynamics::species::{Species, TransitionState};
use crate::Thermodynamics::thermo_models::ThermoCalculator;
use crate::constants::{P0, R, h, kB};
use crate::errors::{KiStatError, check_temperature};
use crate::settings::EckartSettings;
use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Standard states of an equilibrium constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquilibriumType {
    /// dimensionless, from the standard Gibbs energy of reaction
    Ka,
    /// concentrations, (mol/m^3)^dn
    Kc,
    /// pressures, Pa^dn
    Kp,
}

impl FromStr for EquilibriumType {
    type Err = KiStatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ka" | "" => Ok(EquilibriumType::Ka),
            "Kc" => Ok(EquilibriumType::Kc),
            "Kp" => Ok(EquilibriumType::Kp),
            other => Err(KiStatError::invalid_argument(
                "EquilibriumType",
                format!("invalid equilibrium constant type '{}'", other),
            )),
        }
    }
}

/// An elementary reaction. Species are shared with the surrounding model; a species that
/// appears twice in `reactants` or `products` counts twice.
#[derive(Debug, Clone)]
pub struct Reaction {
    /// 1-based column in the stoichiometry matrix, None when unassigned
    pub index: Option<usize>,
    pub reactants: Vec<Arc<Species>>,
    pub products: Vec<Arc<Species>>,
    pub kinetics: Option<KineticsModel>,
    pub reversible: bool,
    pub transition_state: Option<TransitionState>,
    pub third_body: bool,
}

impl Reaction {
    pub fn new(reactants: Vec<Arc<Species>>, products: Vec<Arc<Species>>) -> Self {
        Self {
            index: None,
            reactants,
            products,
            kinetics: None,
            reversible: true,
            transition_state: None,
            third_body: false,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_kinetics(mut self, kinetics: KineticsModel) -> Self {
        self.kinetics = Some(kinetics);
        self
    }

    pub fn with_transition_state(mut self, transition_state: TransitionState) -> Self {
        self.transition_state = Some(transition_state);
        self
    }

    pub fn irreversible(mut self) -> Self {
        self.reversible = false;
        self
    }

    pub fn third_body(mut self) -> Self {
        self.third_body = true;
        self
    }

    /// `Reaction 3: A + B <=> C`, used as error context
    fn context(&self) -> String {
        match self.index {
            Some(index) => format!("Reaction {}: {}", index, self),
            None => format!("Reaction: {}", self),
        }
    }

    fn kinetics(&self) -> Result<&KineticsModel, KiStatError> {
        self.kinetics
            .as_ref()
            .ok_or_else(|| KiStatError::invalid_argument(self.context(), "no kinetics model"))
    }

    fn transition_state(&self) -> Result<&TransitionState, KiStatError> {
        self.transition_state
            .as_ref()
            .ok_or_else(|| KiStatError::invalid_argument(self.context(), "no transition state"))
    }

    /// True if the reaction has the given reactants and products, in either direction.
    /// Species are compared by label, the order inside each side does not matter.
    pub fn has_template(&self, reactants: &[Arc<Species>], products: &[Arc<Species>]) -> bool {
        let contains_all = |side: &[Arc<Species>], wanted: &[Arc<Species>]| {
            wanted
                .iter()
                .all(|w| side.iter().any(|s| s.label == w.label))
        };
        (contains_all(&self.reactants, reactants) && contains_all(&self.products, products))
            || (contains_all(&self.reactants, products) && contains_all(&self.products, reactants))
    }

    /// Net stoichiometric coefficient: -1 per occurrence as reactant, +1 per occurrence as product.
    pub fn get_stoichiometric_coefficient(&self, species: &Species) -> i32 {
        let count = |side: &[Arc<Species>]| {
            side.iter().filter(|s| s.label == species.label).count() as i32
        };
        count(&self.products) - count(&self.reactants)
    }

    /// change in the number of moles, products minus reactants
    fn delta_n(&self) -> i32 {
        self.products.len() as i32 - self.reactants.len() as i32
    }

    /// sum over products minus sum over reactants of a species property
    fn sum_of_reaction<F>(&self, T: f64, property: F) -> Result<f64, KiStatError>
    where
        F: Fn(&Species, f64) -> Result<f64, KiStatError>,
    {
        check_temperature(T, &self.context())?;
        let mut total = 0.0;
        for species in &self.reactants {
            total -= property(species, T).map_err(|e| e.within(&self.context()))?;
        }
        for species in &self.products {
            total += property(species, T).map_err(|e| e.within(&self.context()))?;
        }
        Ok(total)
    }

    /// J/mol
    pub fn get_enthalpy_of_reaction(&self, T: f64) -> Result<f64, KiStatError> {
        self.sum_of_reaction(T, |s, T| s.thermo()?.get_enthalpy(T))
    }

    /// J/(mol*K)
    pub fn get_entropy_of_reaction(&self, T: f64) -> Result<f64, KiStatError> {
        self.sum_of_reaction(T, |s, T| s.thermo()?.get_entropy(T))
    }

    /// J/mol
    pub fn get_free_energy_of_reaction(&self, T: f64) -> Result<f64, KiStatError> {
        self.sum_of_reaction(T, |s, T| s.thermo()?.get_free_energy(T))
    }

    pub fn get_enthalpies_of_reaction(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist
            .iter()
            .map(|&T| self.get_enthalpy_of_reaction(T))
            .collect()
    }

    pub fn get_entropies_of_reaction(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist
            .iter()
            .map(|&T| self.get_entropy_of_reaction(T))
            .collect()
    }

    pub fn get_free_energies_of_reaction(&self, Tlist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        Tlist
            .iter()
            .map(|&T| self.get_free_energy_of_reaction(T))
            .collect()
    }

    /// Ka = exp(-dG/(RT)), Kc = Ka (P0/(RT))^dn, Kp = Ka P0^dn
    pub fn get_equilibrium_constant(
        &self,
        T: f64,
        kind: EquilibriumType,
    ) -> Result<f64, KiStatError> {
        let dG = self.get_free_energy_of_reaction(T)?;
        let Ka = (-dG / (R * T)).exp();
        let dn = self.delta_n();
        let K = match kind {
            EquilibriumType::Ka => Ka,
            EquilibriumType::Kc => Ka * (P0 / (R * T)).powi(dn),
            EquilibriumType::Kp => Ka * P0.powi(dn),
        };
        Ok(K)
    }

    pub fn get_equilibrium_constants(
        &self,
        Tlist: &[f64],
        kind: EquilibriumType,
    ) -> Result<Vec<f64>, KiStatError> {
        Tlist
            .iter()
            .map(|&T| self.get_equilibrium_constant(T, kind))
            .collect()
    }

    /// Forward rate coefficient from the kinetics model; multiplied by the total
    /// concentration for third-body reactions.
    pub fn get_rate_coefficient(
        &self,
        T: f64,
        P: f64,
        total_conc: f64,
    ) -> Result<f64, KiStatError> {
        let k = self
            .kinetics()?
            .get_rate_coefficient(T, P)
            .map_err(|e| e.within(&self.context()))?;
        Ok(if self.third_body { k * total_conc } else { k })
    }

    /// Net rate of the reaction, mol/(m^3*s) for concentrations in mol/m^3:
    /// `kf * prod(reactants) - kf / Kc * prod(products)`. Species missing from `conc`
    /// have zero concentration. `total_conc` defaults to the sum of all concentrations.
    /// Both terms are evaluated whatever `reversible` says.
    pub fn get_rate(
        &self,
        T: f64,
        P: f64,
        conc: &HashMap<String, f64>,
        total_conc: Option<f64>,
    ) -> Result<f64, KiStatError> {
        let total_conc = total_conc.unwrap_or_else(|| conc.values().sum());
        let k = self.get_rate_coefficient(T, P, total_conc)?;
        let product_of = |side: &[Arc<Species>]| -> f64 {
            let mut prod = 1.0;
            for species in side {
                match conc.get(&species.label) {
                    Some(&value) => prod *= value,
                    None => return 0.0,
                }
            }
            prod
        };
        let forward = product_of(&self.reactants);
        let reverse = product_of(&self.products);
        let Keq = self.get_equilibrium_constant(T, EquilibriumType::Kc)?;
        Ok(k * (forward - reverse / Keq))
    }

    /// Arrhenius fit of kr(T) = kf(T)/Kc(T) on the given temperatures, with the
    /// reference temperature of the forward expression.
    pub fn generate_reverse_rate_coefficient(
        &self,
        Tlist: &[f64],
    ) -> Result<ArrheniusModel, KiStatError> {
        let kf = match self.kinetics()? {
            KineticsModel::Arrhenius(kf) => kf,
            other => {
                return Err(KiStatError::invalid_argument(
                    self.context(),
                    format!(
                        "Arrhenius kinetics required for the reverse rate coefficient, got {}",
                        other
                    ),
                ));
            }
        };
        let mut klist = Vec::with_capacity(Tlist.len());
        for &T in Tlist {
            let Kc = self.get_equilibrium_constant(T, EquilibriumType::Kc)?;
            klist.push(kf.K_const(T)? / Kc);
        }
        ArrheniusModel::fit_to_data(Tlist, &klist, kf.T0).map_err(|e| e.within(&self.context()))
    }

    /// sum of the ground-state energies of one side of the reaction, J/mol
    fn E0_of(side: &[Arc<Species>]) -> f64 {
        side.iter().map(|s| s.E0).sum()
    }

    pub fn calculate_wigner_tunneling_correction(&self, T: f64) -> Result<f64, KiStatError> {
        let ts = self.transition_state()?;
        wigner_correction(ts.frequency, T).map_err(|e| e.within(&self.context()))
    }

    pub fn calculate_eckart_tunneling_correction(&self, T: f64) -> Result<f64, KiStatError> {
        self.calculate_eckart_tunneling_correction_with_settings(T, &EckartSettings::default())
    }

    /// Barrier heights come from the ground-state energies. Without product data (no products,
    /// or a product without molecular states) the barrier is taken as symmetric.
    pub fn calculate_eckart_tunneling_correction_with_settings(
        &self,
        T: f64,
        settings: &EckartSettings,
    ) -> Result<f64, KiStatError> {
        let ts = self.transition_state()?;
        let dV1 = ts.E0 - Self::E0_of(&self.reactants);
        let product_data = !self.products.is_empty() && self.products.iter().all(|s| s.states.is_some());
        let dV2 = if product_data {
            ts.E0 - Self::E0_of(&self.products)
        } else {
            warn!(
                "{}: no product states, Eckart barrier taken as symmetric",
                self.context()
            );
            dV1
        };
        eckart_correction_with_settings(ts.frequency, dV1, dV2, T, settings)
            .map_err(|e| e.within(&self.context()))
    }

    pub fn calculate_TST_rate_coefficient(
        &self,
        T: f64,
        tunneling: Tunneling,
    ) -> Result<f64, KiStatError> {
        self.calculate_TST_rate_coefficient_with_settings(T, tunneling, &EckartSettings::default())
    }

    /// k = degeneracy (kB T / h) (Q_ts / prod Q_reactants) exp(-E0 / (R T)) kappa, where every
    /// partition function is divided by RT/P0 and E0 is the barrier height above the reactants.
    pub fn calculate_TST_rate_coefficient_with_settings(
        &self,
        T: f64,
        tunneling: Tunneling,
        settings: &EckartSettings,
    ) -> Result<f64, KiStatError> {
        let context = self.context();
        check_temperature(T, &context)?;
        let ts = self.transition_state()?;
        let E0 = ts.E0 - Self::E0_of(&self.reactants);
        let standard_state = R * T / P0;

        let mut Qreac = 1.0;
        for species in &self.reactants {
            let Q = species
                .states()
                .and_then(|states| states.get_partition_function(T))
                .map_err(|e| e.within(&context))?;
            Qreac *= Q / standard_state;
        }
        let Qts = ts
            .states
            .get_partition_function(T)
            .map_err(|e| e.within(&context))?
            / standard_state;

        let k = ts.degeneracy as f64 * (kB * T / h) * (Qts / Qreac) * (-E0 / (R * T)).exp();
        let kappa = match tunneling {
            Tunneling::None => 1.0,
            Tunneling::Wigner => self.calculate_wigner_tunneling_correction(T)?,
            Tunneling::Eckart => {
                self.calculate_eckart_tunneling_correction_with_settings(T, settings)?
            }
        };
        Ok(k * kappa)
    }

    pub fn calculate_TST_rate_coefficients(
        &self,
        Tlist: &[f64],
        tunneling: Tunneling,
    ) -> Result<Vec<f64>, KiStatError> {
        Tlist
            .iter()
            .map(|&T| self.calculate_TST_rate_coefficient(T, tunneling))
            .collect()
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let side = |species: &[Arc<Species>]| {
            species
                .iter()
                .map(|s| s.label.as_str())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        let arrow = if self.reversible { "<=>" } else { "->" };
        write!(f, "{} {} {}", side(&self.reactants), arrow, side(&self.products))
    }
}
