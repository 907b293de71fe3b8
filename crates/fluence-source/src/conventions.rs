//! Modeling conventions
//!
//! Fixed constants the source model computes with. They are not measured
//! quantities and carry no uncertainty of their own.

use crate::error::{Result, SourceError};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Uncertainty assigned to every elapsed time, in days
pub const TIME_UNCERTAINTY_DAYS: f64 = 1.0;

/// Days per year used to convert half-lives
pub const DAYS_PER_YEAR: f64 = 365.242;

/// Conversion from pSv/s to uSv/h
pub const PSV_S_TO_USV_H: f64 = 0.0036;

/// Calendar format for date arguments
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Conventions used by source computations
///
/// # Examples
///
/// ```
/// use fluence_source::Conventions;
///
/// let conventions = Conventions::default();
/// assert_eq!(conventions.days_per_year, 365.242);
/// assert_eq!(conventions.date_format, "%Y/%m/%d");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conventions {
    /// chrono format of every date argument
    /// Default: `%Y/%m/%d`
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Absolute uncertainty of an elapsed time, in days
    /// Default: 1 day
    #[serde(default = "default_time_uncertainty_days")]
    pub time_uncertainty_days: f64,

    /// Length of a year in days (half-life conversion)
    /// Default: 365.242
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,

    /// pSv/s to uSv/h conversion factor
    /// Default: 0.0036
    #[serde(default = "default_psv_s_to_usv_h")]
    pub psv_s_to_usv_h: f64,
}

fn default_date_format() -> String {
    DATE_FORMAT.to_string()
}

fn default_time_uncertainty_days() -> f64 {
    TIME_UNCERTAINTY_DAYS
}

fn default_days_per_year() -> f64 {
    DAYS_PER_YEAR
}

fn default_psv_s_to_usv_h() -> f64 {
    PSV_S_TO_USV_H
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_uncertainty_days: default_time_uncertainty_days(),
            days_per_year: default_days_per_year(),
            psv_s_to_usv_h: default_psv_s_to_usv_h(),
        }
    }
}

impl Conventions {
    /// Check that every constant is usable
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(SourceError::Config("date_format must not be empty".into()));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(SourceError::Config(format!(
                "date_format '{}' is not a valid chrono format",
                self.date_format
            )));
        }
        if !self.time_uncertainty_days.is_finite() || self.time_uncertainty_days < 0.0 {
            return Err(SourceError::Config(format!(
                "time_uncertainty_days must be a non-negative number, got {}",
                self.time_uncertainty_days
            )));
        }
        if !self.days_per_year.is_finite() || self.days_per_year <= 0.0 {
            return Err(SourceError::Config(format!(
                "days_per_year must be positive, got {}",
                self.days_per_year
            )));
        }
        if !self.psv_s_to_usv_h.is_finite() || self.psv_s_to_usv_h <= 0.0 {
            return Err(SourceError::Config(format!(
                "psv_s_to_usv_h must be positive, got {}",
                self.psv_s_to_usv_h
            )));
        }
        Ok(())
    }
}
