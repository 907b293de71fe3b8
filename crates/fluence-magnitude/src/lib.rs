//! Fluence Magnitude Layer
//!
//! This crate contains the quantity-with-uncertainty arithmetic that every
//! other Fluence crate builds on. It is deliberately small and only depends on
//! `thiserror` and `serde`.
//!
//! ## Key Concepts
//!
//! - **Quantity**: a non-negative value bound to a unit, with its absolute and
//!   relative standard uncertainty
//! - **Unit**: a textual unit token (`1/s`, `pSv·cm²`, `ND`, ...)
//! - **Measurement**: read access shared by validated quantities and raw
//!   [`QuantitySpec`] input records
//!
//! ## Conventions
//!
//! - Relative uncertainty is a fraction (`0.013` is 1.3 %); only the text
//!   representation renders a percentage
//! - Uncertainty propagation is first order and assumes independent variables
//! - Quantities are immutable; every operation returns a new value

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arithmetic;
pub mod error;
pub mod measurement;
pub mod quantity;
pub mod unit;

// Re-exports for convenience
pub use error::{MagnitudeError, Result};
pub use measurement::{Measurement, QuantitySpec};
pub use quantity::{Quantity, UncertaintyForm};
pub use unit::Unit;
