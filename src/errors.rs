//! Error type shared by the states, thermodynamics, kinetics and reaction modules.
//!
//! Every fallible computation names the object it was working on (`context`), e.g.
//! `HinderedRotor(inertia=1.5e-46, barrier=10000, symmetry=3)` or `Reaction 2: A + B <=> C`,
//! so a failure inside a batch evaluation can be traced back to the offending record.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KiStatError {
    /// the caller supplied something the model cannot accept (wrong option string,
    /// wrong kinetics variant, missing data)
    #[error("{context}: invalid argument: {message}")]
    InvalidArgument { context: String, message: String },
    /// iterative numerics (eigensolver, minimizer, quadrature) did not converge within the cap
    #[error("{context}: numerical failure: {message}")]
    NumericalFailure { context: String, message: String },
    /// a formula was evaluated outside of its domain of validity
    #[error("{context}: value {value} is outside of the valid domain: {message}")]
    DomainError {
        context: String,
        value: f64,
        message: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize settings: {0}")]
    Serde(#[from] serde_json::Error),
}

impl KiStatError {
    pub fn invalid_argument(context: impl Into<String>, message: impl Into<String>) -> Self {
        KiStatError::InvalidArgument {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn numerical_failure(context: impl Into<String>, message: impl Into<String>) -> Self {
        KiStatError::NumericalFailure {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn domain(context: impl Into<String>, value: f64, message: impl Into<String>) -> Self {
        KiStatError::DomainError {
            context: context.into(),
            value,
            message: message.into(),
        }
    }

    /// prepend the name of the enclosing object to the context, so an error raised deep
    /// inside a mode reports e.g. `species CH4: HarmonicOscillator(...)`
    pub fn within(self, outer: &str) -> Self {
        match self {
            KiStatError::InvalidArgument { context, message } => KiStatError::InvalidArgument {
                context: format!("{}: {}", outer, context),
                message,
            },
            KiStatError::NumericalFailure { context, message } => KiStatError::NumericalFailure {
                context: format!("{}: {}", outer, context),
                message,
            },
            KiStatError::DomainError {
                context,
                value,
                message,
            } => KiStatError::DomainError {
                context: format!("{}: {}", outer, context),
                value,
                message,
            },
            other => other,
        }
    }
}

/// temperature must be a finite positive number of kelvins
#[allow(non_snake_case)]
pub fn check_temperature(T: f64, context: &str) -> Result<(), KiStatError> {
    if T.is_finite() && T > 0.0 {
        Ok(())
    } else {
        Err(KiStatError::domain(
            context,
            T,
            "temperature must be finite and positive",
        ))
    }
}
