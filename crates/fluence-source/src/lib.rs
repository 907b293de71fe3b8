//! Fluence Source Layer
//!
//! Models calibration radionuclide neutron sources and computes their
//! time-dependent characteristics with propagated uncertainty.
//!
//! The Source layer provides:
//! - A [`Source`] entity whose quantity-valued attributes are validated on
//!   every assignment (non-negative, standard unit)
//! - Derived quantities: decay time, decay factor, strength, fluence rate
//!   and ambient dose equivalent rate
//! - Named presets ([`SourceRecord`]) and a [`SourceRegistry`] that can be
//!   loaded from TOML
//! - Modeling [`Conventions`] (day uncertainty, year length, dose-rate
//!   conversion, date format)
//!
//! # Examples
//!
//! ```
//! use fluence_magnitude::Quantity;
//! use fluence_source::SourceRegistry;
//!
//! let registry = SourceRegistry::builtin().unwrap();
//! let cf = registry.get("252-Cf").unwrap();
//!
//! let distance = Quantity::absolute(100.0, "cm", 1.0).unwrap();
//! let rate = cf.ambient_dose_equivalent_rate("2020/05/20", &distance).unwrap();
//! assert_eq!(rate.unit(), "uSv/h");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod conventions;
pub mod date;
pub mod error;
pub mod preset;
pub mod source;

pub use attribute::Attribute;
pub use conventions::Conventions;
pub use date::{elapsed_time, elapsed_time_with, AsDate};
pub use error::{Result, SourceError};
pub use preset::{RegistryFile, SourceRecord, SourceRegistry};
pub use source::{check_consistency, Source, SourceBuilder};
