use super::harmonic_oscillator::einstein_heat_capacity;
use super::mode::{ModeCalculator, check_energy_grid};
use crate::Utils::special_functions::{besseli0e, besseli1e, cellipk};
use crate::constants::{Na, R, c, h, kB, pi};
use crate::errors::{KiStatError, check_temperature};
use crate::settings::HinderedRotorSettings;
use log::info;
use nalgebra::{Complex, DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One-dimensional hindered internal rotation.
///
/// The torsional potential is either the cosine V(phi) = V0/2 (1 - cos(sigma phi)), treated
/// semiclassically, or a Fourier series
/// V(phi) = sum_k a_k cos(k phi) + b_k sin(k phi) - sum_k a_k,
/// whose energy levels are found by diagonalizing the Hamiltonian in a plane-wave basis
/// once, at construction. Row 0 of `fourier` holds a_k, row 1 holds b_k, column k-1 holds
/// the coefficients of order k (J/mol).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HinderedRotorInput")]
pub struct HinderedRotor {
    /// reduced moment of inertia, kg*m^2
    inertia: f64,
    /// cosine barrier height, J/mol
    barrier: Option<f64>,
    symmetry: u32,
    fourier: Option<DMatrix<f64>>,
    /// levels above the ground level, J/mol, ascending; empty for the cosine potential
    #[serde(skip)]
    energies: Vec<f64>,
}

#[derive(Deserialize)]
struct HinderedRotorInput {
    inertia: f64,
    #[serde(default)]
    barrier: Option<f64>,
    symmetry: u32,
    #[serde(default)]
    fourier: Option<DMatrix<f64>>,
}

impl TryFrom<HinderedRotorInput> for HinderedRotor {
    type Error = KiStatError;
    fn try_from(input: HinderedRotorInput) -> Result<Self, Self::Error> {
        match (input.barrier, input.fourier) {
            (_, Some(fourier)) => HinderedRotor::from_fourier(input.inertia, fourier, input.symmetry),
            (Some(barrier), None) => HinderedRotor::new(input.inertia, barrier, input.symmetry),
            (None, None) => Err(KiStatError::invalid_argument(
                "HinderedRotor",
                "either a barrier height or Fourier coefficients are required",
            )),
        }
    }
}

fn check_inertia_and_symmetry(inertia: f64, symmetry: u32) -> Result<(), KiStatError> {
    if !(inertia.is_finite() && inertia > 0.0) {
        return Err(KiStatError::domain(
            "HinderedRotor",
            inertia,
            "moment of inertia must be positive",
        ));
    }
    if symmetry == 0 {
        return Err(KiStatError::invalid_argument(
            "HinderedRotor",
            "symmetry number must be at least 1",
        ));
    }
    Ok(())
}

/// x/(1 - e^-x), equal to 1 at x = 0
fn quantum_correction(x: f64) -> f64 {
    if x < 1e-8 { 1.0 + 0.5 * x } else { x / -(-x).exp_m1() }
}

/// Eigenvalues (J/mol, shifted so the lowest is zero) of
/// H = -hbar^2/(2I) d^2/dphi^2 + V(phi) in the basis e^{i m phi}/sqrt(2 pi), m = -M..M.
fn solve_schrodinger_equation(
    inertia: f64,
    fourier: &DMatrix<f64>,
    settings: &HinderedRotorSettings,
) -> Result<Vec<f64>, KiStatError> {
    let M = settings.basis_half_width as i64;
    let N = settings.basis_size();
    // a constant term that puts V(0) at zero, per molecule
    let A = -fourier.row(0).sum() / Na;
    let mut H = DMatrix::<Complex<f64>>::zeros(N, N);
    for row in 0..N {
        let m = (row as i64 - M) as f64;
        H[(row, row)] = Complex::new(A + h * h * m * m / (8.0 * pi * pi * inertia), 0.0);
        for n in 0..fourier.ncols() {
            let a = fourier[(0, n)] / Na / 2.0;
            let b = fourier[(1, n)] / Na / 2.0;
            if row > n {
                H[(row, row - n - 1)] = Complex::new(a, -b);
            }
            if row + n + 1 < N {
                H[(row, row + n + 1)] = Complex::new(a, b);
            }
        }
    }
    let eigen = SymmetricEigen::try_new(H, f64::EPSILON, settings.max_iterations()).ok_or_else(
        || {
            KiStatError::numerical_failure(
                "HinderedRotor",
                format!(
                    "eigensolver did not converge for the {}x{} Hamiltonian",
                    N, N
                ),
            )
        },
    )?;
    let mut levels: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    levels.sort_by(|a, b| a.total_cmp(b));
    let ground = levels[0];
    let energies: Vec<f64> = levels.iter().map(|&E| (E - ground) * Na).collect();
    info!(
        "hindered rotor: {} levels from the {}x{} Hamiltonian, first excitation {:.3} J/mol",
        energies.len(),
        N,
        N,
        energies.get(1).copied().unwrap_or(0.0)
    );
    Ok(energies)
}

impl HinderedRotor {
    /// Rotor with the cosine potential of height `barrier` (J/mol). A zero barrier is a
    /// free internal rotor.
    pub fn new(inertia: f64, barrier: f64, symmetry: u32) -> Result<Self, KiStatError> {
        check_inertia_and_symmetry(inertia, symmetry)?;
        if !(barrier.is_finite() && barrier >= 0.0) {
            return Err(KiStatError::domain(
                "HinderedRotor",
                barrier,
                "barrier height must be nonnegative",
            ));
        }
        Ok(Self {
            inertia,
            barrier: Some(barrier),
            symmetry,
            fourier: None,
            energies: Vec::new(),
        })
    }

    pub fn from_fourier(
        inertia: f64,
        fourier: DMatrix<f64>,
        symmetry: u32,
    ) -> Result<Self, KiStatError> {
        Self::from_fourier_with_settings(
            inertia,
            fourier,
            symmetry,
            &HinderedRotorSettings::default(),
        )
    }

    /// Rotor with a Fourier series potential; `fourier` must be 2 x C with C >= 1.
    pub fn from_fourier_with_settings(
        inertia: f64,
        fourier: DMatrix<f64>,
        symmetry: u32,
        settings: &HinderedRotorSettings,
    ) -> Result<Self, KiStatError> {
        check_inertia_and_symmetry(inertia, symmetry)?;
        if fourier.nrows() != 2 || fourier.ncols() == 0 {
            return Err(KiStatError::invalid_argument(
                "HinderedRotor",
                format!(
                    "Fourier coefficients must be a 2 x C matrix, got {} x {}",
                    fourier.nrows(),
                    fourier.ncols()
                ),
            ));
        }
        if let Some(&bad) = fourier.iter().find(|v| !v.is_finite()) {
            return Err(KiStatError::domain(
                "HinderedRotor",
                bad,
                "Fourier coefficients must be finite",
            ));
        }
        let energies = solve_schrodinger_equation(inertia, &fourier, settings)?;
        Ok(Self {
            inertia,
            barrier: None,
            symmetry,
            fourier: Some(fourier),
            energies,
        })
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn barrier(&self) -> Option<f64> {
        self.barrier
    }

    pub fn symmetry(&self) -> u32 {
        self.symmetry
    }

    pub fn fourier(&self) -> Option<&DMatrix<f64>> {
        self.fourier.as_ref()
    }

    /// energy levels above the ground level (J/mol); empty for the cosine potential
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// torsional potential (J/mol) at the dihedral angle `phi` (rad); V(0) = 0
    pub fn get_potential(&self, phi: f64) -> f64 {
        match &self.fourier {
            Some(fourier) => {
                let mut V = 0.0;
                for k in 0..fourier.ncols() {
                    let order = (k + 1) as f64;
                    V += fourier[(0, k)] * (order * phi).cos() + fourier[(1, k)] * (order * phi).sin();
                }
                V - fourier.row(0).sum()
            }
            None => {
                0.5 * self.barrier.unwrap_or(0.0) * (1.0 - (self.symmetry as f64 * phi).cos())
            }
        }
    }

    pub fn get_potentials(&self, phis: &[f64]) -> Vec<f64> {
        phis.iter().map(|&phi| self.get_potential(phi)).collect()
    }

    /// Effective barrier height: the cosine barrier, or -2 sum a_k for a Fourier series
    /// (exact when the series is a single cosine term). Negative values are clamped to 0.
    fn effective_barrier(&self) -> f64 {
        match &self.fourier {
            Some(fourier) => (-2.0 * fourier.row(0).sum()).max(0.0),
            None => self.barrier.unwrap_or(0.0),
        }
    }

    /// harmonic-limit torsional frequency sigma/(2 pi) sqrt(V0/(2I)), cm^-1
    pub fn get_frequency(&self) -> f64 {
        let V0 = self.effective_barrier();
        self.symmetry as f64 / 2.0 / pi * (V0 / Na / 2.0 / self.inertia).sqrt() / (c * 100.0)
    }

    fn check(&self, T: f64) -> Result<(), KiStatError> {
        check_temperature(T, &self.to_string())
    }

    /// Boltzmann sums over the levels: (sum e, sum E e, sum E^2 e) with e = exp(-E/RT)
    fn boltzmann_sums(&self, T: f64) -> (f64, f64, f64) {
        let mut sums = (0.0, 0.0, 0.0);
        for &E in &self.energies {
            let e = (-E / (R * T)).exp();
            sums.0 += e;
            sums.1 += E * e;
            sums.2 += E * E * e;
        }
        sums
    }

    fn cosine_partition_function(&self, T: f64) -> f64 {
        let V0 = self.barrier.unwrap_or(0.0);
        let x = h * self.get_frequency() * c * 100.0 / (kB * T);
        let z = 0.5 * V0 / (R * T);
        quantum_correction(x)
            * (2.0 * pi * self.inertia * kB * T / (h * h)).sqrt()
            * (2.0 * pi / self.symmetry as f64)
            * besseli0e(z)
    }

    /// T d(ln Q)/dT of the cosine rotor by a central difference over T +- 0.1%,
    /// returned together with ln Q at T
    fn cosine_log_derivative(&self, T: f64) -> (f64, f64) {
        let Tlow = T * 0.999;
        let Thigh = T * 1.001;
        let lnQ_high = self.cosine_partition_function(Thigh).ln();
        let lnQ_low = self.cosine_partition_function(Tlow).ln();
        let lnQ = self.cosine_partition_function(T).ln();
        (T * (lnQ_high - lnQ_low) / (Thigh - Tlow), lnQ)
    }

    /// Classical density of states of the cosine rotor at one energy, mol/J. The formula is
    /// singular at E = V0, which is reported as a domain error.
    pub fn get_density_of_states_at(&self, E: f64) -> Result<f64, KiStatError> {
        let V0 = match self.barrier {
            Some(V0) => V0,
            None => {
                return Err(KiStatError::invalid_argument(
                    self.to_string(),
                    "pointwise density of states needs the cosine potential",
                ));
            }
        };
        if !(E.is_finite() && E >= 0.0) {
            return Err(KiStatError::domain(
                self.to_string(),
                E,
                "energy must be nonnegative",
            ));
        }
        let q1f = (8.0 * pi * pi * pi * self.inertia / (h * h) / Na).sqrt() / self.symmetry as f64;
        if V0 == 0.0 {
            if E == 0.0 {
                return Err(KiStatError::domain(
                    self.to_string(),
                    E,
                    "free rotor density of states diverges at E = 0",
                ));
            }
            return Ok(q1f / (pi * E).sqrt());
        }
        let pre = 2.0 * q1f / (pi * pi * pi * V0).sqrt();
        if E < V0 {
            Ok(pre * cellipk(E / V0)?)
        } else if E > V0 {
            Ok(pre * (V0 / E).sqrt() * cellipk(V0 / E)?)
        } else {
            Err(KiStatError::domain(
                self.to_string(),
                E,
                "density of states diverges at the barrier top",
            ))
        }
    }
}

impl ModeCalculator for HinderedRotor {
    fn get_partition_function(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        if self.fourier.is_some() {
            let (s0, _, _) = self.boltzmann_sums(T);
            Ok(s0 / self.symmetry as f64)
        } else {
            Ok(self.cosine_partition_function(T))
        }
    }

    fn get_heat_capacity(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        if self.fourier.is_some() {
            let (s0, s1, s2) = self.boltzmann_sums(T);
            Ok((s2 * s0 - s1 * s1) / (R * T * T * s0 * s0))
        } else {
            let V0 = self.barrier.unwrap_or(0.0);
            let x = h * self.get_frequency() * c * 100.0 / (kB * T);
            let z = 0.5 * V0 / (R * T);
            let BB = besseli1e(z) / besseli0e(z);
            Ok((einstein_heat_capacity(x) - 0.5 + z * (z - BB - z * BB * BB)) * R)
        }
    }

    fn get_enthalpy(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        if self.fourier.is_some() {
            let (s0, s1, _) = self.boltzmann_sums(T);
            Ok(s1 / s0)
        } else {
            let (dlnQ, _) = self.cosine_log_derivative(T);
            Ok(dlnQ * R * T)
        }
    }

    fn get_entropy(&self, T: f64) -> Result<f64, KiStatError> {
        self.check(T)?;
        if self.fourier.is_some() {
            let (s0, s1, _) = self.boltzmann_sums(T);
            let Q = s0 / self.symmetry as f64;
            Ok(R * Q.ln() + s1 / (T * s0))
        } else {
            let (dlnQ, lnQ) = self.cosine_log_derivative(T);
            Ok((lnQ + dlnQ) * R)
        }
    }

    /// Cosine potential: classical formula, with the singular bin at E = V0 left at zero.
    /// Fourier potential: histogram of the levels on the grid, each level carrying
    /// 1/(sigma dE).
    fn get_density_of_states(&self, Elist: &[f64]) -> Result<Vec<f64>, KiStatError> {
        let dE = check_energy_grid(Elist, &self.to_string())?;
        let mut rho = vec![0.0; Elist.len()];
        if self.fourier.is_some() {
            let weight = 1.0 / (self.symmetry as f64 * dE);
            for &E in &self.energies {
                let bin = ((E - Elist[0]) / dE).round();
                if bin >= 0.0 && (bin as usize) < rho.len() {
                    rho[bin as usize] += weight;
                }
            }
        } else {
            for (r, &E) in rho.iter_mut().zip(Elist) {
                match self.get_density_of_states_at(E) {
                    Ok(value) => *r = value,
                    Err(KiStatError::DomainError { .. }) => *r = 0.0,
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(rho)
    }
}

impl fmt::Display for HinderedRotor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.fourier {
            Some(fourier) => {
                let a: Vec<f64> = fourier.row(0).iter().copied().collect();
                let b: Vec<f64> = fourier.row(1).iter().copied().collect();
                write!(
                    f,
                    "HinderedRotor(inertia={}, symmetry={}, fourier=[{:?}, {:?}])",
                    self.inertia, self.symmetry, a, b
                )
            }
            None => write!(
                f,
                "HinderedRotor(inertia={}, barrier={}, symmetry={})",
                self.inertia,
                self.barrier.unwrap_or(0.0),
                self.symmetry
            ),
        }
    }
}
