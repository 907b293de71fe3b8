//! Error types for the Source layer

use fluence_magnitude::MagnitudeError;
use thiserror::Error;

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while building, mutating or evaluating a source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Attribute value below zero
    #[error("Source {attribute} value must be positive, got {value}")]
    NegativeValue {
        /// Offending attribute
        attribute: String,
        /// Rejected value
        value: f64,
    },

    /// Attribute uncertainty (absolute or relative) below zero
    #[error("Source {attribute} {form} must be positive, got {value}")]
    NegativeUncertainty {
        /// Offending attribute
        attribute: String,
        /// "uncertainty" or "relative uncertainty"
        form: &'static str,
        /// Rejected uncertainty
        value: f64,
    },

    /// Attribute unit differs from the standard unit
    #[error("Source {attribute} unit must be standard: expected '{expected}', got '{actual}'")]
    NonStandardUnit {
        /// Offending attribute
        attribute: String,
        /// Standard unit
        expected: String,
        /// Supplied unit
        actual: String,
    },

    /// Quantity construction or arithmetic failed
    #[error(transparent)]
    Magnitude(#[from] MagnitudeError),

    /// Date not in the configured calendar format
    #[error("Invalid date '{input}': expected format '{format}'")]
    InvalidDate {
        /// Rejected input
        input: String,
        /// Expected chrono format
        format: String,
    },

    /// Source built without one of its attributes
    #[error("Source is missing attribute: {0}")]
    MissingAttribute(String),

    /// No preset registered under the requested name
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Invalid conventions or registry file
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
