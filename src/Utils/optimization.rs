//! Downhill simplex (Nelder-Mead) minimization of a function of one variable.
//!
//! Same coefficients and termination test as the classic `fmin`: reflection 1, expansion 2,
//! contraction 0.5, shrink 0.5; converged when both the simplex width and the spread of the
//! function values drop below `xtol` and `ftol`. Hitting the iteration or evaluation cap
//! before that is reported as a numerical failure.
use crate::errors::KiStatError;
use log::error;

const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;
const NONZDELT: f64 = 0.05;
const ZDELT: f64 = 0.00025;

#[derive(Debug, Clone, Copy)]
pub struct OptimizeResult {
    pub x: f64,
    pub fun: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

pub struct NelderMead {
    pub xtol: f64,
    pub ftol: f64,
    pub max_iterations: usize,
    pub max_evaluations: usize,
}

impl NelderMead {
    pub fn new(xtol: f64, ftol: f64, max_iterations: usize, max_evaluations: usize) -> Self {
        Self {
            xtol,
            ftol,
            max_iterations,
            max_evaluations,
        }
    }

    /// Minimizes `f` starting from `x0`. `context` names the caller for error messages.
    pub fn minimize<F>(&self, mut f: F, x0: f64, context: &str) -> Result<OptimizeResult, KiStatError>
    where
        F: FnMut(f64) -> f64,
    {
        let mut evaluations = 0usize;
        let mut eval = |x: f64, evaluations: &mut usize| {
            *evaluations += 1;
            let value = f(x);
            // NaN compares false everywhere and would freeze the simplex
            if value.is_nan() { f64::INFINITY } else { value }
        };

        let x1 = if x0 != 0.0 { (1.0 + NONZDELT) * x0 } else { ZDELT };
        // sim[0] is always the best vertex
        let mut sim = [x0, x1];
        let mut fsim = [eval(x0, &mut evaluations), eval(x1, &mut evaluations)];
        if fsim[1] < fsim[0] {
            sim.swap(0, 1);
            fsim.swap(0, 1);
        }

        let mut iterations = 1usize;
        let mut converged = false;
        while evaluations < self.max_evaluations && iterations < self.max_iterations {
            if (sim[1] - sim[0]).abs() <= self.xtol && (fsim[0] - fsim[1]).abs() <= self.ftol {
                converged = true;
                break;
            }
            let xbar = sim[0];
            let xr = (1.0 + RHO) * xbar - RHO * sim[1];
            let fxr = eval(xr, &mut evaluations);
            let mut shrink = false;

            if fxr < fsim[0] {
                let xe = (1.0 + RHO * CHI) * xbar - RHO * CHI * sim[1];
                let fxe = eval(xe, &mut evaluations);
                if fxe < fxr {
                    sim[1] = xe;
                    fsim[1] = fxe;
                } else {
                    sim[1] = xr;
                    fsim[1] = fxr;
                }
            } else if fxr < fsim[1] {
                // outside contraction
                let xc = (1.0 + PSI * RHO) * xbar - PSI * RHO * sim[1];
                let fxc = eval(xc, &mut evaluations);
                if fxc <= fxr {
                    sim[1] = xc;
                    fsim[1] = fxc;
                } else {
                    shrink = true;
                }
            } else {
                // inside contraction
                let xcc = (1.0 - PSI) * xbar + PSI * sim[1];
                let fxcc = eval(xcc, &mut evaluations);
                if fxcc < fsim[1] {
                    sim[1] = xcc;
                    fsim[1] = fxcc;
                } else {
                    shrink = true;
                }
            }
            if shrink {
                sim[1] = sim[0] + SIGMA * (sim[1] - sim[0]);
                fsim[1] = eval(sim[1], &mut evaluations);
            }
            if fsim[1] < fsim[0] {
                sim.swap(0, 1);
                fsim.swap(0, 1);
            }
            iterations += 1;
        }
        if !converged
            && (sim[1] - sim[0]).abs() <= self.xtol
            && (fsim[0] - fsim[1]).abs() <= self.ftol
        {
            converged = true;
        }
        if !converged || !fsim[0].is_finite() {
            let message = format!(
                "simplex did not converge after {} iterations and {} function evaluations (x = {}, f = {})",
                iterations, evaluations, sim[0], fsim[0]
            );
            error!("{}: {}", context, message);
            return Err(KiStatError::numerical_failure(context, message));
        }
        Ok(OptimizeResult {
            x: sim[0],
            fun: fsim[0],
            iterations,
            evaluations,
        })
    }
}

/// Shortcut with the argument order of the classic `fmin(func, x0, xtol, ftol, maxiter, maxfun)`.
pub fn fmin<F>(
    f: F,
    x0: f64,
    xtol: f64,
    ftol: f64,
    max_iterations: usize,
    max_evaluations: usize,
    context: &str,
) -> Result<OptimizeResult, KiStatError>
where
    F: FnMut(f64) -> f64,
{
    NelderMead::new(xtol, ftol, max_iterations, max_evaluations).minimize(f, x0, context)
}
