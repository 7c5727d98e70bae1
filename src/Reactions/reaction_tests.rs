use super::reaction::{EquilibriumType, Reaction};
use super::reaction_model::ReactionModel;
use super::tunneling::{Tunneling, eckart_correction, wigner_correction};
use crate::Kinetics::kinetics_models::{ArrheniusModel, KineticsModel, PDepArrheniusModel};
use crate::States::harmonic_oscillator::HarmonicOscillator;
use crate::States::mode::Mode;
use crate::States::states_model::StatesModel;
use crate::States::translation::Translation;
use crate::Thermodynamics::species::{Species, TransitionState};
use crate::Thermodynamics::thermo_models::{NasaModel, ThermoCalculator, ThermoModel};
use crate::constants::{P0, R, h, kB};
use crate::errors::KiStatError;
use approx::assert_relative_eq;
use std::collections::HashMap;
use std::sync::Arc;

/// constant heat capacity a1*R: H = R (a1 T + a6), S = R (a1 ln T + a7)
fn simple_thermo(a1: f64, a6: f64, a7: f64) -> ThermoModel {
    ThermoModel::NASA(
        NasaModel::from_coefficients(&[300.0, 3000.0, a1, 0.0, 0.0, 0.0, 0.0, a6, a7]).unwrap(),
    )
}

/// A + B <=> C with dCp = 0, dH = -12000 R and dS = -5 R
fn association() -> (Arc<Species>, Arc<Species>, Arc<Species>) {
    let A = Arc::new(
        Species::new("A", 0.0)
            .with_index(1)
            .with_thermo(simple_thermo(3.5, -1000.0, 4.0)),
    );
    let B = Arc::new(
        Species::new("B", 0.0)
            .with_index(2)
            .with_thermo(simple_thermo(2.5, 5000.0, 3.0)),
    );
    let C = Arc::new(
        Species::new("C", 0.0)
            .with_index(3)
            .with_thermo(simple_thermo(6.0, -8000.0, 2.0)),
    );
    (A, B, C)
}

fn association_reaction() -> Reaction {
    let (A, B, C) = association();
    Reaction::new(vec![A, B], vec![C])
        .with_index(1)
        .with_kinetics(KineticsModel::Arrhenius(ArrheniusModel::new(
            1.0e7, 0.5, 20000.0, 300.0,
        )))
}

fn conc(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_thermo_of_reaction() {
    let reaction = association_reaction();
    for T in [400.0, 1000.0, 2500.0] {
        assert_relative_eq!(
            reaction.get_enthalpy_of_reaction(T).unwrap(),
            -12000.0 * R,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            reaction.get_entropy_of_reaction(T).unwrap(),
            -5.0 * R,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            reaction.get_free_energy_of_reaction(T).unwrap(),
            -12000.0 * R + 5.0 * R * T,
            max_relative = 1e-10
        );
    }
    let dH = reaction.get_enthalpies_of_reaction(&[400.0, 500.0]).unwrap();
    assert_eq!(dH.len(), 2);
    assert!(reaction.get_entropies_of_reaction(&[400.0, 100.0]).is_err());
}

#[test]
fn test_repeated_species_count_twice() {
    let (A, _, C) = association();
    let dimerization = Reaction::new(vec![A.clone(), A.clone()], vec![C.clone()]);
    let T = 800.0;
    let expected = C.thermo().unwrap().get_enthalpy(T).unwrap()
        - 2.0 * A.thermo().unwrap().get_enthalpy(T).unwrap();
    assert_relative_eq!(
        dimerization.get_enthalpy_of_reaction(T).unwrap(),
        expected,
        max_relative = 1e-12
    );
    assert_eq!(dimerization.get_stoichiometric_coefficient(&A), -2);
    assert_eq!(dimerization.get_stoichiometric_coefficient(&C), 1);
}

#[test]
fn test_equilibrium_constant_conversions() {
    let reaction = association_reaction();
    let T = 1000.0;
    let Ka = reaction.get_equilibrium_constant(T, EquilibriumType::Ka).unwrap();
    let dG = reaction.get_free_energy_of_reaction(T).unwrap();
    assert_relative_eq!(Ka, (-dG / (R * T)).exp(), max_relative = 1e-12);
    // dn = -1
    let Kc = reaction.get_equilibrium_constant(T, EquilibriumType::Kc).unwrap();
    assert_relative_eq!(Kc, Ka * (P0 / (R * T)).powi(-1), max_relative = 1e-12);
    let Kp = reaction.get_equilibrium_constant(T, EquilibriumType::Kp).unwrap();
    assert_relative_eq!(Kp, Ka / P0, max_relative = 1e-12);

    assert_eq!("".parse::<EquilibriumType>().unwrap(), EquilibriumType::Ka);
    assert_eq!("Kc".parse::<EquilibriumType>().unwrap(), EquilibriumType::Kc);
    assert!(matches!(
        "Kx".parse::<EquilibriumType>(),
        Err(KiStatError::InvalidArgument { .. })
    ));
    let Ks = reaction
        .get_equilibrium_constants(&[500.0, 1000.0], EquilibriumType::Kp)
        .unwrap();
    assert_relative_eq!(Ks[1], Kp, max_relative = 1e-12);
}

#[test]
fn test_missing_thermo_is_reported() {
    let A = Arc::new(Species::new("A", 0.0));
    let B = Arc::new(Species::new("B", 0.0));
    let reaction = Reaction::new(vec![A], vec![B]).with_index(7);
    let err = reaction.get_free_energy_of_reaction(300.0).unwrap_err();
    assert!(matches!(err, KiStatError::InvalidArgument { .. }));
    let text = err.to_string();
    assert!(text.contains("Reaction 7: A <=> B"));
    assert!(text.contains("species A"));
}

#[test]
fn test_rates() {
    let reaction = association_reaction();
    let (T, P) = (1000.0, 1e5);
    let kf = ArrheniusModel::new(1.0e7, 0.5, 20000.0, 300.0).K_const(T).unwrap();
    let Kc = reaction.get_equilibrium_constant(T, EquilibriumType::Kc).unwrap();

    assert_eq!(reaction.get_rate(T, P, &HashMap::new(), None).unwrap(), 0.0);

    let full = conc(&[("A", 2.0), ("B", 3.0), ("C", 5.0)]);
    let rate = reaction.get_rate(T, P, &full, None).unwrap();
    assert_relative_eq!(rate, kf * (6.0 - 5.0 / Kc), max_relative = 1e-12);

    // C is missing, so only the forward term survives
    let partial = conc(&[("A", 2.0), ("B", 3.0)]);
    assert_relative_eq!(
        reaction.get_rate(T, P, &partial, None).unwrap(),
        kf * 6.0,
        max_relative = 1e-12
    );

    let third_body = association_reaction().third_body();
    assert_relative_eq!(
        third_body.get_rate(T, P, &full, None).unwrap(),
        10.0 * rate,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        third_body.get_rate(T, P, &full, Some(40.0)).unwrap(),
        40.0 * rate,
        max_relative = 1e-12
    );

    // the flag changes the arrow, not the rate law
    let one_way = association_reaction().irreversible();
    assert_eq!(one_way.to_string(), "A + B -> C");
    assert_relative_eq!(
        one_way.get_rate(T, P, &full, None).unwrap(),
        kf * (6.0 - 5.0 / Kc),
        max_relative = 1e-12
    );

    let (A, B, C) = association();
    let no_kinetics = Reaction::new(vec![A, B], vec![C]);
    assert!(matches!(
        no_kinetics.get_rate(T, P, &full, None),
        Err(KiStatError::InvalidArgument { .. })
    ));
}

#[test]
fn test_reverse_rate_coefficient() {
    let reaction = association_reaction();
    let Tlist: Vec<f64> = (0..10).map(|i| 400.0 + 200.0 * i as f64).collect();
    let kr = reaction.generate_reverse_rate_coefficient(&Tlist).unwrap();
    // with constant dH and dS the reverse expression is exactly of Arrhenius form
    assert_relative_eq!(kr.n, 0.5 - 1.0, epsilon = 1e-7);
    assert_relative_eq!(kr.Ea, 20000.0 + 12000.0 * R, max_relative = 1e-7);
    assert_relative_eq!(
        kr.A,
        1.0e7 * 5.0f64.exp() * P0 / (R * 300.0),
        max_relative = 1e-6
    );
    assert_eq!(kr.T0, 300.0);
    for &T in &Tlist {
        let kf = ArrheniusModel::new(1.0e7, 0.5, 20000.0, 300.0).K_const(T).unwrap();
        let Kc = reaction.get_equilibrium_constant(T, EquilibriumType::Kc).unwrap();
        assert_relative_eq!(kr.K_const(T).unwrap(), kf / Kc, max_relative = 1e-6);
    }

    let (A, B, C) = association();
    let pdep = PDepArrheniusModel::new(
        vec![1e4, 1e6],
        vec![ArrheniusModel::new(1.0, 0.0, 0.0, 1.0); 2],
    )
    .unwrap();
    let reaction = Reaction::new(vec![A, B], vec![C]).with_kinetics(KineticsModel::PDepArrhenius(pdep));
    assert!(matches!(
        reaction.generate_reverse_rate_coefficient(&Tlist),
        Err(KiStatError::InvalidArgument { .. })
    ));
}

fn isomer_states(frequencies: Vec<f64>) -> StatesModel {
    StatesModel::new(
        vec![
            Mode::Translation(Translation::new(0.030).unwrap()),
            Mode::HarmonicOscillator(HarmonicOscillator::new(frequencies).unwrap()),
        ],
        1,
    )
    .unwrap()
}

/// R <=> P through a transition state 50 kJ/mol above the reactant
fn isomerization(product_states: bool) -> Reaction {
    let reactant = Arc::new(
        Species::new("R", -10000.0).with_states(isomer_states(vec![500.0, 1200.0, 3000.0])),
    );
    let mut product = Species::new("P", -20000.0);
    if product_states {
        product = product.with_states(isomer_states(vec![600.0, 1100.0, 3100.0]));
    }
    let ts = TransitionState::new(40000.0, 2, isomer_states(vec![1000.0, 3000.0]), -1500.0);
    Reaction::new(vec![reactant], vec![Arc::new(product)]).with_transition_state(ts)
}

#[test]
fn test_TST_unimolecular() {
    let reaction = isomerization(true);
    let T = 600.0;
    let ts = reaction.transition_state.as_ref().unwrap();
    let Qr = reaction.reactants[0].states().unwrap().get_partition_function(T).unwrap();
    let Qts = ts.states.get_partition_function(T).unwrap();
    let expected = 2.0 * kB * T / h * Qts / Qr * (-50000.0 / (R * T)).exp();
    let k = reaction.calculate_TST_rate_coefficient(T, Tunneling::None).unwrap();
    assert_relative_eq!(k, expected, max_relative = 1e-10);

    let kw = reaction.calculate_TST_rate_coefficient(T, Tunneling::Wigner).unwrap();
    assert_relative_eq!(
        kw,
        k * wigner_correction(1500.0, T).unwrap(),
        max_relative = 1e-10
    );

    // barrier heights 50 kJ/mol and 60 kJ/mol
    let ke = reaction.calculate_TST_rate_coefficient(T, Tunneling::Eckart).unwrap();
    let kappa = eckart_correction(1500.0, 50000.0, 60000.0, T).unwrap();
    assert_relative_eq!(ke, k * kappa, max_relative = 1e-10);
    assert!(kappa > 1.0);

    let klist = reaction
        .calculate_TST_rate_coefficients(&[500.0, T], Tunneling::None)
        .unwrap();
    assert_relative_eq!(klist[1], k, max_relative = 1e-12);
    assert!(klist[0] < klist[1]);
}

#[test]
fn test_TST_bimolecular_standard_state() {
    let A = Arc::new(Species::new("A", 0.0).with_states(isomer_states(vec![1000.0])));
    let B = Arc::new(Species::new("B", 0.0).with_states(isomer_states(vec![2000.0])));
    let ts = TransitionState::new(30000.0, 1, isomer_states(vec![1000.0, 2000.0]), 800.0);
    let reaction = Reaction::new(vec![A.clone(), B.clone()], vec![]).with_transition_state(ts.clone());
    let T = 1000.0;
    let Qa = A.states().unwrap().get_partition_function(T).unwrap();
    let Qb = B.states().unwrap().get_partition_function(T).unwrap();
    let Qts = ts.states.get_partition_function(T).unwrap();
    let expected =
        kB * T / h * Qts / (Qa * Qb) * (R * T / P0) * (-30000.0 / (R * T)).exp();
    assert_relative_eq!(
        reaction.calculate_TST_rate_coefficient(T, Tunneling::None).unwrap(),
        expected,
        max_relative = 1e-10
    );
}

#[test]
fn test_eckart_symmetric_fallback() {
    let reaction = isomerization(false);
    let T = 500.0;
    let kappa = reaction.calculate_eckart_tunneling_correction(T).unwrap();
    let symmetric = eckart_correction(1500.0, 50000.0, 50000.0, T).unwrap();
    assert_relative_eq!(kappa, symmetric, max_relative = 1e-12);

    let without_ts = Reaction::new(reaction.reactants.clone(), reaction.products.clone());
    assert!(matches!(
        without_ts.calculate_TST_rate_coefficient(T, Tunneling::None),
        Err(KiStatError::InvalidArgument { .. })
    ));
}

#[test]
fn test_has_template() {
    let (A, B, C) = association();
    let reaction = Reaction::new(vec![A.clone(), B.clone()], vec![C.clone()]);
    assert!(reaction.has_template(&[B.clone(), A.clone()], &[C.clone()]));
    assert!(reaction.has_template(&[C.clone()], &[A.clone(), B.clone()]));
    assert!(!reaction.has_template(&[A.clone(), C.clone()], &[B.clone()]));
    assert_eq!(reaction.to_string(), "A + B <=> C");
}

#[test]
fn test_reaction_model() {
    let (A, B, C) = association();
    let forward = Reaction::new(vec![A.clone(), B.clone()], vec![C.clone()])
        .with_index(1)
        .with_kinetics(KineticsModel::Arrhenius(ArrheniusModel::new(
            1.0e7, 0.5, 20000.0, 300.0,
        )));
    let decay = Reaction::new(vec![C.clone()], vec![A.clone(), A.clone()])
        .with_index(2)
        .irreversible()
        .with_kinetics(KineticsModel::Arrhenius(ArrheniusModel::new(
            1.0e3, 0.0, 10000.0, 1.0,
        )));
    let mut model = ReactionModel::new(vec![A, B, C], vec![forward, decay]);

    let (T, P) = (1000.0, 1e5);
    let c = conc(&[("A", 2.0), ("B", 3.0), ("C", 5.0)]);
    assert!(matches!(
        model.get_net_production_rates(T, P, &c),
        Err(KiStatError::InvalidArgument { .. })
    ));

    model.generate_stoichiometry_matrix().unwrap();
    let S = model.stoichiometry().unwrap();
    assert_eq!(S.shape(), (3, 2));
    assert_eq!(S.nnz(), 5);
    assert_eq!(S.get(0, 0), -1.0);
    assert_eq!(S.get(1, 0), -1.0);
    assert_eq!(S.get(2, 0), 1.0);
    assert_eq!(S.get(0, 1), 2.0);
    assert_eq!(S.get(1, 1), 0.0);
    assert_eq!(S.get(2, 1), -1.0);

    let rates = model.get_reaction_rates(T, P, &c).unwrap();
    assert_relative_eq!(
        rates[0],
        model.reactions[0].get_rate(T, P, &c, None).unwrap(),
        max_relative = 1e-12
    );
    // irreversible only in notation: the reverse term still applies
    let Kc_decay = model.reactions[1]
        .get_equilibrium_constant(T, EquilibriumType::Kc)
        .unwrap();
    assert_relative_eq!(
        rates[1],
        ArrheniusModel::new(1.0e3, 0.0, 10000.0, 1.0).K_const(T).unwrap()
            * (5.0 - 4.0 / Kc_decay),
        max_relative = 1e-12
    );
    let net = model.get_net_production_rates(T, P, &c).unwrap();
    assert_relative_eq!(net[0], -rates[0] + 2.0 * rates[1], max_relative = 1e-12);
    assert_relative_eq!(net[1], -rates[0], max_relative = 1e-12);
    assert_relative_eq!(net[2], rates[0] - rates[1], max_relative = 1e-12);

    // an unassigned index cannot be placed in the matrix
    model.reactions[1].index = None;
    assert!(matches!(
        model.generate_stoichiometry_matrix(),
        Err(KiStatError::InvalidArgument { .. })
    ));
}

#[test]
fn test_reaction_model_rejects_shared_index() {
    let (A, B, C) = association();
    let first = association_reaction();
    let second = Reaction::new(vec![C.clone()], vec![A.clone(), B.clone()])
        .with_index(1)
        .with_kinetics(KineticsModel::Arrhenius(ArrheniusModel::new(
            1.0e3, 0.0, 10000.0, 1.0,
        )));
    let mut model = ReactionModel::new(vec![A, B, C], vec![first, second]);
    let err = model.generate_stoichiometry_matrix().unwrap_err();
    assert!(matches!(err, KiStatError::InvalidArgument { .. }));
    assert!(err.to_string().contains("reaction index 1 is used twice"));
    assert!(model.stoichiometry().is_none());

    let c = conc(&[("A", 2.0), ("B", 3.0), ("C", 5.0)]);
    assert!(matches!(
        model.get_reaction_rates(1000.0, 1e5, &c),
        Err(KiStatError::InvalidArgument { .. })
    ));

    model.reactions[1].index = Some(2);
    model.generate_stoichiometry_matrix().unwrap();
    assert_eq!(model.get_reaction_rates(1000.0, 1e5, &c).unwrap().len(), 2);
}
