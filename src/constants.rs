//! Physical constants shared by every model of the crate.
//!
//! SI units throughout; molar quantities are per mole. The table is a set of
//! `const` items, so it is initialized at compile time and can never be mutated.
#![allow(non_upper_case_globals)]

/// gas law constant, J/(mol*K)
pub const R: f64 = 8.314472;
/// Boltzmann constant, J/K
pub const kB: f64 = 1.3806504e-23;
/// Planck constant, J*s
pub const h: f64 = 6.62606896e-34;
/// Avogadro number, 1/mol
pub const Na: f64 = 6.02214179e23;
/// speed of light in vacuum, m/s
pub const c: f64 = 299792458.0;
pub const pi: f64 = std::f64::consts::PI;
/// Boltzmann constant in wavenumbers, cm^-1/K (that is hc/kB inverted)
pub const kB_cm: f64 = 0.695039;
/// standard pressure, Pa
pub const P0: f64 = 1e5;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constants_are_consistent() {
        assert_relative_eq!(R, kB * Na, max_relative = 1e-6);
        // kB/(hc) in cm^-1/K
        assert_relative_eq!(kB / (h * c * 100.0), kB_cm, max_relative = 1e-5);
    }
}
