//! Error types for decoding contract return values.

use thiserror::Error;

use crate::types::U256;

/// Errors raised while turning raw contract values into typed records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{method}: expected {expected} return values, got {got}")]
    Arity {
        method: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{method}: return value {position} should be {expected}, got {got}")]
    TypeMismatch {
        method: &'static str,
        position: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("integer {value} does not fit in {target}")]
    IntegerOverflow { value: U256, target: &'static str },

    #[error("timestamp {0} is outside the representable calendar range")]
    TimestampOutOfRange(U256),
}

/// Result type for decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;
