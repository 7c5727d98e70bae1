//! Combining densities of states on a common uniform energy grid.
use super::mode::check_energy_grid;
use crate::constants::{Na, c, h};
use crate::errors::KiStatError;
use log::warn;

/// Density of states of two independent sets of modes:
/// rho(E_i) = sum_{j<=i} rho1(E_j) rho2(E_i - E_j) dE.
/// An operand that is identically zero stands for "no modes yet", so the other operand is
/// returned unchanged; two zero operands give zeros.
pub fn convolve(rho1: &[f64], rho2: &[f64], Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
    let dE = check_energy_grid(Elist, "convolve")?;
    let n = Elist.len();
    if rho1.len() != n || rho2.len() != n {
        return Err(KiStatError::invalid_argument(
            "convolve",
            format!(
                "densities have {} and {} points, the energy grid has {}",
                rho1.len(),
                rho2.len(),
                n
            ),
        ));
    }
    let found1 = rho1.iter().any(|&r| r != 0.0);
    let found2 = rho2.iter().any(|&r| r != 0.0);
    let rho = match (found1, found2) {
        (false, false) => vec![0.0; n],
        (true, false) => rho1.to_vec(),
        (false, true) => rho2.to_vec(),
        (true, true) => (0..n)
            .map(|i| {
                (0..=i)
                    .map(|j| rho1[j] * rho2[i - j])
                    .sum::<f64>()
                    * dE
            })
            .collect(),
    };
    Ok(rho)
}

/// Beyer-Swinehart direct count: every harmonic oscillator with frequency `freq` (cm^-1)
/// shifts a copy of the current density up by its quantum, rounded to whole grid steps.
pub fn beyer_swinehart(
    frequencies: &[f64],
    Elist: &[f64],
    mut rho: Vec<f64>,
) -> Result<Vec<f64>, KiStatError> {
    let dE = check_energy_grid(Elist, "beyer_swinehart")?;
    let n = Elist.len();
    if rho.len() != n {
        return Err(KiStatError::invalid_argument(
            "beyer_swinehart",
            format!("density has {} points, the energy grid has {}", rho.len(), n),
        ));
    }
    for &freq in frequencies {
        let quantum = freq * h * c * 100.0 * Na;
        let dn = (quantum / dE).round() as usize;
        if dn == 0 {
            warn!(
                "oscillator of {} cm^-1 is below the grid spacing {} J/mol and is skipped",
                freq, dE
            );
            continue;
        }
        for k in dn..n {
            rho[k] += rho[k - dn];
        }
    }
    Ok(rho)
}
