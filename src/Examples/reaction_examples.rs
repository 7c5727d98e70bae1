use crate::Kinetics::kinetics_models::{ArrheniusModel, KineticsModel};
use crate::Reactions::reaction::{EquilibriumType, Reaction};
use crate::Reactions::reaction_model::ReactionModel;
use crate::Reactions::tunneling::Tunneling;
use crate::States::harmonic_oscillator::HarmonicOscillator;
use crate::States::mode::Mode;
use crate::States::rigid_rotor::RigidRotor;
use crate::States::states_model::StatesModel;
use crate::States::translation::Translation;
use crate::Thermodynamics::species::{Species, TransitionState};
use crate::Thermodynamics::thermo_models::{NasaModel, StatesThermo, ThermoModel};
use std::collections::HashMap;
use std::sync::Arc;

fn molecule(mass: f64, inertia: Vec<f64>, symmetry: u32, frequencies: Vec<f64>) -> StatesModel {
    StatesModel::new(
        vec![
            Mode::Translation(Translation::new(mass).unwrap()),
            Mode::RigidRotor(RigidRotor::new(inertia.len() == 1, inertia, symmetry).unwrap()),
            Mode::HarmonicOscillator(HarmonicOscillator::new(frequencies).unwrap()),
        ],
        1,
    )
    .unwrap()
}

pub fn reaction_examples(task: usize) {
    match task {
        0 => {
            // TST rate coefficient of HCN <=> HNC with tunneling corrections
            let hcn_states = molecule(0.027, vec![1.89e-46], 1, vec![727.0, 727.0, 2127.0, 3311.0]);
            let hnc_states = molecule(0.027, vec![1.96e-46], 1, vec![477.0, 477.0, 2029.0, 3653.0]);
            let ts_states = molecule(
                0.027,
                vec![1.2e-46, 2.2e-46, 3.4e-46],
                1,
                vec![2015.0, 2630.0],
            );
            let hcn = Arc::new(
                Species::new("HCN", 0.0)
                    .with_index(1)
                    .with_thermo(ThermoModel::States(StatesThermo::new(0.0, hcn_states.clone())))
                    .with_states(hcn_states),
            );
            let hnc = Arc::new(
                Species::new("HNC", 61000.0)
                    .with_index(2)
                    .with_thermo(ThermoModel::States(StatesThermo::new(61000.0, hnc_states.clone())))
                    .with_states(hnc_states),
            );
            let ts = TransitionState::new(200000.0, 1, ts_states, -1200.0);
            let reaction = Reaction::new(vec![hcn], vec![hnc]).with_index(1).with_transition_state(ts);
            println!("{}", reaction);
            let Tlist = vec![300.0, 500.0, 1000.0, 2000.0];
            for tunneling in ["", "wigner", "eckart"] {
                let tunneling: Tunneling = tunneling.parse().unwrap();
                let k = reaction.calculate_TST_rate_coefficients(&Tlist, tunneling).unwrap();
                println!("tunneling {}: k = {:?}", tunneling, k);
            }
            let K = reaction
                .get_equilibrium_constants(&Tlist, EquilibriumType::Ka)
                .unwrap();
            println!("Ka = {:?}", K);
        }
        1 => {
            // reverse Arrhenius expression and net production rates of H + O2 <=> OH + O
            let nasa = |c: [f64; 9]| ThermoModel::NASA(NasaModel::from_coefficients(&c).unwrap());
            // GRI-Mech 3.0, low temperature range
            let H = Arc::new(Species::new("H", 0.0).with_index(1).with_thermo(nasa([
                200.0, 1000.0, 2.5, 7.05e-13, -1.99e-15, 2.3e-18, -9.28e-22, 25473.66, -0.446683,
            ])));
            let O2 = Arc::new(Species::new("O2", 0.0).with_index(2).with_thermo(nasa([
                200.0, 1000.0, 3.78245636, -2.99673416e-3, 9.84730201e-6, -9.68129509e-9,
                3.24372837e-12, -1063.94356, 3.65767573,
            ])));
            let OH = Arc::new(Species::new("OH", 0.0).with_index(3).with_thermo(nasa([
                200.0, 1000.0, 3.99201543, -2.40131752e-3, 4.61793841e-6, -3.88113333e-9,
                1.3641147e-12, 3615.08056, -0.103925458,
            ])));
            let O = Arc::new(Species::new("O", 0.0).with_index(4).with_thermo(nasa([
                200.0, 1000.0, 3.1682671, -3.27931884e-3, 6.64306396e-6, -6.12806624e-9,
                2.11265971e-12, 29122.2592, 2.05193346,
            ])));
            // A in m^3/(mol*s)
            let kf = ArrheniusModel::new(2.65e10, -0.6707, 71300.0, 1.0);
            println!("kf(T) = {}", kf.K_expr());
            let reaction = Reaction::new(vec![H.clone(), O2.clone()], vec![OH.clone(), O.clone()])
                .with_index(1)
                .with_kinetics(KineticsModel::Arrhenius(kf));
            let Tlist: Vec<f64> = (0..8).map(|i| 300.0 + 100.0 * i as f64).collect();
            let kr = reaction.generate_reverse_rate_coefficient(&Tlist).unwrap();
            println!("reverse: {}", kr);

            let mut model = ReactionModel::new(vec![H, O2, OH, O], vec![reaction]);
            model.generate_stoichiometry_matrix().unwrap();
            let conc: HashMap<String, f64> = [("H", 1e-3), ("O2", 5.0), ("OH", 1e-4), ("O", 1e-5)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect();
            let rates = model.get_net_production_rates(900.0, 1e5, &conc).unwrap();
            println!("net production rates, mol/(m^3 s): {:?}", rates);
        }
        _ => println!("no such task: {}", task),
    }
}
