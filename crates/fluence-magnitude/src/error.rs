//! Error types for quantity construction and arithmetic

use thiserror::Error;

/// Result type alias for quantity operations.
pub type Result<T> = std::result::Result<T, MagnitudeError>;

/// Errors raised when a quantity would violate its physical invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MagnitudeError {
    /// Malformed construction: negative or non-finite inputs, both or neither
    /// uncertainty form, or a relative uncertainty that cannot be derived
    #[error("Invalid magnitude: {0}")]
    InvalidMagnitude(String),

    /// Addition or subtraction of quantities with different units
    #[error("Unit mismatch: cannot combine '{expected}' with '{actual}'")]
    UnitMismatch {
        /// Unit of the left-hand operand
        expected: String,
        /// Unit of the right-hand operand
        actual: String,
    },
}

impl MagnitudeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MagnitudeError::InvalidMagnitude(message.into())
    }
}
