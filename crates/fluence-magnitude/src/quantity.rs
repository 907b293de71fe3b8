//! Quantity module - a measured value with unit and standard uncertainty

use crate::error::{MagnitudeError, Result};
use crate::measurement::QuantitySpec;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which uncertainty form was supplied when a quantity was created
///
/// The supplied form is canonical: it is kept as-is when the value changes and
/// the other form is re-derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyForm {
    /// Absolute standard uncertainty, in the quantity's unit
    Absolute,
    /// Relative standard uncertainty, as a fraction of the value
    Relative,
}

/// A physical measurement: value, unit and standard uncertainty
///
/// Both uncertainty forms are stored and kept consistent through
/// `uncertainty = value × relative_uncertainty`. Every field is private and a
/// quantity never changes after construction; the `with_*` methods return
/// new, re-validated quantities.
///
/// # Invariants
///
/// - value, uncertainty and relative uncertainty are finite and `>= 0`
/// - the two uncertainty forms agree to floating-point precision
///
/// # Examples
///
/// ```
/// use fluence_magnitude::Quantity;
///
/// let distance = Quantity::absolute(100.0, "cm", 1.0).unwrap();
/// assert_eq!(distance.relative_uncertainty(), 0.01);
/// assert_eq!(distance.to_string(), "100 ± 1 cm (1%)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuantitySpec", into = "QuantitySpec")]
pub struct Quantity {
    value: f64,
    unit: Unit,
    uncertainty: f64,
    relative_uncertainty: f64,
    canonical: UncertaintyForm,
}

impl Quantity {
    /// Create a quantity from exactly one uncertainty form
    ///
    /// Fails with [`MagnitudeError::InvalidMagnitude`] when both or neither
    /// form is given, or when any input is negative or non-finite.
    pub fn new(
        value: f64,
        unit: impl Into<Unit>,
        uncertainty: Option<f64>,
        relative_uncertainty: Option<f64>,
    ) -> Result<Self> {
        match (uncertainty, relative_uncertainty) {
            (Some(uncertainty), None) => Self::absolute(value, unit, uncertainty),
            (None, Some(relative)) => Self::relative(value, unit, relative),
            (Some(_), Some(_)) => Err(MagnitudeError::invalid(
                "exactly one of uncertainty and relative uncertainty must be given, got both",
            )),
            (None, None) => Err(MagnitudeError::invalid(
                "exactly one of uncertainty and relative uncertainty must be given, got neither",
            )),
        }
    }

    /// Create a quantity from its absolute standard uncertainty
    ///
    /// A zero value only admits a zero uncertainty, since the relative form
    /// would be undefined otherwise.
    pub fn absolute(value: f64, unit: impl Into<Unit>, uncertainty: f64) -> Result<Self> {
        check_value(value)?;
        check_uncertainty("uncertainty", uncertainty)?;
        let relative_uncertainty = relative_from_absolute(value, uncertainty)?;

        Ok(Self {
            value,
            unit: unit.into(),
            uncertainty,
            relative_uncertainty,
            canonical: UncertaintyForm::Absolute,
        })
    }

    /// Create a quantity from its relative standard uncertainty (a fraction)
    pub fn relative(value: f64, unit: impl Into<Unit>, relative_uncertainty: f64) -> Result<Self> {
        check_value(value)?;
        check_uncertainty("relative uncertainty", relative_uncertainty)?;
        let uncertainty = value * relative_uncertainty;
        check_uncertainty("uncertainty", uncertainty)?;

        Ok(Self {
            value,
            unit: unit.into(),
            uncertainty,
            relative_uncertainty,
            canonical: UncertaintyForm::Relative,
        })
    }

    /// Create an exact constant (zero uncertainty)
    pub fn exact(value: f64, unit: impl Into<Unit>) -> Result<Self> {
        Self::absolute(value, unit, 0.0)
    }

    /// The measured value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit token
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Absolute standard uncertainty
    pub fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    /// Relative standard uncertainty as a fraction of the value
    pub fn relative_uncertainty(&self) -> f64 {
        self.relative_uncertainty
    }

    /// Relative standard uncertainty as a percentage
    pub fn percentage_uncertainty(&self) -> f64 {
        self.relative_uncertainty * 100.0
    }

    /// The uncertainty form supplied at construction
    pub fn canonical_form(&self) -> UncertaintyForm {
        self.canonical
    }

    /// Whether this quantity is non-dimensional
    pub fn is_non_dimensional(&self) -> bool {
        self.unit.is_non_dimensional()
    }

    /// Replace the value, keeping the canonical uncertainty form fixed
    ///
    /// ```
    /// use fluence_magnitude::Quantity;
    ///
    /// let b0 = Quantity::relative(5.471e8, "1/s", 0.013).unwrap();
    /// let b = b0.with_value(5.471e7).unwrap();
    /// assert_eq!(b.relative_uncertainty(), 0.013);
    /// assert!((b.uncertainty() - 5.471e7 * 0.013).abs() < 1e-6);
    /// ```
    pub fn with_value(&self, value: f64) -> Result<Self> {
        match self.canonical {
            UncertaintyForm::Absolute => Self::absolute(value, self.unit.clone(), self.uncertainty),
            UncertaintyForm::Relative => {
                Self::relative(value, self.unit.clone(), self.relative_uncertainty)
            }
        }
    }

    /// Replace the unit token
    ///
    /// Unit validity depends on where the quantity is used, so it is checked
    /// by the owner (a source attribute, for instance), not here.
    pub fn with_unit(&self, unit: impl Into<Unit>) -> Self {
        Self {
            unit: unit.into(),
            ..self.clone()
        }
    }

    /// Replace the absolute uncertainty, which becomes canonical
    pub fn with_uncertainty(&self, uncertainty: f64) -> Result<Self> {
        Self::absolute(self.value, self.unit.clone(), uncertainty)
    }

    /// Replace the relative uncertainty, which becomes canonical
    pub fn with_relative_uncertainty(&self, relative_uncertainty: f64) -> Result<Self> {
        Self::relative(self.value, self.unit.clone(), relative_uncertainty)
    }

    /// Multiply by an exact, non-negative factor (a unit conversion constant)
    ///
    /// The relative uncertainty is unchanged. The unit is kept; callers
    /// converting units follow up with [`Quantity::with_unit`].
    pub fn scale(&self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(MagnitudeError::invalid(format!(
                "scale factor must be a finite non-negative number, got {}",
                factor
            )));
        }
        match self.canonical {
            UncertaintyForm::Absolute => Self::absolute(
                self.value * factor,
                self.unit.clone(),
                self.uncertainty * factor,
            ),
            UncertaintyForm::Relative => Self::relative(
                self.value * factor,
                self.unit.clone(),
                self.relative_uncertainty,
            ),
        }
    }
}

impl fmt::Display for Quantity {
    /// `{value} ± {uncertainty} {unit} ({relative}%)`, with the `ND` token
    /// left out for non-dimensional quantities
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_non_dimensional() {
            write!(
                f,
                "{} ± {} ({}%)",
                self.value,
                self.uncertainty,
                self.percentage_uncertainty()
            )
        } else {
            write!(
                f,
                "{} ± {} {} ({}%)",
                self.value,
                self.uncertainty,
                self.unit,
                self.percentage_uncertainty()
            )
        }
    }
}

impl TryFrom<QuantitySpec> for Quantity {
    type Error = MagnitudeError;

    fn try_from(spec: QuantitySpec) -> Result<Self> {
        Self::new(spec.value, spec.unit, spec.uncertainty, spec.relative_uncertainty)
    }
}

fn check_value(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(MagnitudeError::invalid(format!(
            "value must be finite, got {}",
            value
        )));
    }
    if value < 0.0 {
        return Err(MagnitudeError::invalid(format!(
            "value must be non-negative, got {}",
            value
        )));
    }
    Ok(())
}

fn check_uncertainty(label: &str, uncertainty: f64) -> Result<()> {
    if !uncertainty.is_finite() {
        return Err(MagnitudeError::invalid(format!(
            "{} must be finite, got {}",
            label, uncertainty
        )));
    }
    if uncertainty < 0.0 {
        return Err(MagnitudeError::invalid(format!(
            "{} must be non-negative, got {}",
            label, uncertainty
        )));
    }
    Ok(())
}

/// `relative = absolute / value`, guarded against a zero value
fn relative_from_absolute(value: f64, uncertainty: f64) -> Result<f64> {
    if value == 0.0 {
        if uncertainty == 0.0 {
            return Ok(0.0);
        }
        return Err(MagnitudeError::invalid(format!(
            "relative uncertainty is undefined for a zero value with uncertainty {}",
            uncertainty
        )));
    }
    Ok(uncertainty / value)
}
