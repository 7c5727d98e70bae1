use crate::States::harmonic_oscillator::HarmonicOscillator;
use crate::States::hindered_rotor::HinderedRotor;
use crate::States::mode::{Mode, ModeCalculator};
use crate::States::rigid_rotor::RigidRotor;
use crate::States::states_model::StatesModel;
use crate::States::translation::Translation;
use crate::settings::Settings;
use nalgebra::DMatrix;

/// ethane-like molecule: translation, symmetric top, 17 vibrations and one methyl torsion
fn ethane() -> StatesModel {
    StatesModel::new(
        vec![
            Mode::Translation(Translation::new(0.030).unwrap()),
            Mode::RigidRotor(RigidRotor::new(false, vec![1.06e-46, 4.22e-46, 4.22e-46], 6).unwrap()),
            Mode::HarmonicOscillator(
                HarmonicOscillator::new(vec![
                    822.0, 822.0, 995.0, 1190.0, 1190.0, 1379.0, 1388.0, 1468.0, 1468.0, 1469.0,
                    1469.0, 2896.0, 2954.0, 2969.0, 2969.0, 2985.0, 2985.0,
                ])
                .unwrap(),
            ),
            Mode::HinderedRotor(HinderedRotor::new(2.6e-47, 12000.0, 3).unwrap()),
        ],
        1,
    )
    .unwrap()
}

pub fn states_examples(task: usize) {
    match task {
        0 => {
            // thermodynamic functions of every mode and of the whole molecule
            let molecule = ethane();
            let Tlist = vec![298.15, 500.0, 1000.0, 1500.0];
            for mode in &molecule.modes {
                println!("{}", mode);
                println!("  Q  {:?}", mode.get_partition_functions(&Tlist).unwrap());
                println!("  Cv {:?}", mode.get_heat_capacities(&Tlist).unwrap());
            }
            molecule.pretty_print_table(&Tlist).unwrap();
        }
        1 => {
            // density of states: direct count vs inverse Laplace transform
            let molecule = ethane();
            let dE = 500.0;
            let Elist: Vec<f64> = (0..400).map(|i| i as f64 * dE).collect();
            let rho = molecule.get_density_of_states(&Elist).unwrap();
            let rho_ilt = molecule.get_density_of_states_ILT(&Elist, 1).unwrap();
            let N = molecule.get_sum_of_states(&Elist).unwrap();
            for i in (40..400).step_by(40) {
                println!(
                    "E = {:8.0} J/mol  rho = {:.4e}  rho_ILT = {:.4e}  N = {:.4e}",
                    Elist[i], rho[i], rho_ilt[i], N[i]
                );
            }
        }
        2 => {
            // hindered rotor: cosine potential vs the same potential as a Fourier series
            let settings = Settings::new();
            let cosine = HinderedRotor::new(2.6e-47, 12000.0, 3).unwrap();
            // V(phi) = V0/2 (1 - cos 3 phi) as sum of a_k cos(k phi)
            let mut fourier = DMatrix::zeros(2, 3);
            fourier[(0, 2)] = -6000.0;
            let quantum = HinderedRotor::from_fourier_with_settings(
                2.6e-47,
                fourier,
                3,
                &settings.hindered_rotor,
            )
            .unwrap();
            println!("harmonic frequency {:.1} cm^-1", cosine.get_frequency());
            println!("lowest levels, J/mol: {:?}", &quantum.energies()[..6]);
            for T in [100.0, 300.0, 1000.0, 2000.0] {
                println!(
                    "T = {:6.1}  Q(cosine) = {:.5}  Q(Fourier) = {:.5}  Cv(cosine) = {:.4}  Cv(Fourier) = {:.4}",
                    T,
                    cosine.get_partition_function(T).unwrap(),
                    quantum.get_partition_function(T).unwrap(),
                    cosine.get_heat_capacity(T).unwrap(),
                    quantum.get_heat_capacity(T).unwrap()
                );
            }
        }
        _ => println!("no such task: {}", task),
    }
}
