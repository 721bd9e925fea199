//! Calculation input errors
//!
//! These are caller contract violations. Gaps in game data (unknown skills,
//! empty slots, unparseable modifier lines) never produce an error; they fall
//! back to canonical defaults instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("enemy evasion must be non-negative, got {0}")]
    NegativeEvasion(f64),
    #[error("accuracy must be non-negative, got {0}")]
    NegativeAccuracy(f64),
    #[error("level must be between 1 and 100, got {0}")]
    InvalidLevel(u32),
    #[error("invalid resistance cap: {0}")]
    InvalidResistanceCap(String),
    #[error("{field} must be a finite number")]
    NonFiniteInput { field: &'static str },
    #[error("armour reference hit must be positive, got {0}")]
    InvalidReferenceHit(f64),
    #[error("invalid combo configuration: {0}")]
    InvalidCombo(String),
    #[error("invalid game constants: {0}")]
    InvalidConstants(String),
}

/// Reject NaN and infinities for a named input
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFiniteInput { field })
    }
}
