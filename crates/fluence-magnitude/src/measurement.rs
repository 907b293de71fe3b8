//! Measurement module - shared read access to validated and raw quantities

use crate::quantity::{Quantity, UncertaintyForm};
use crate::unit::Unit;
use serde::{Deserialize, Serialize};

/// Read access to the parts of a measurement
///
/// Implemented by [`Quantity`] and by the unvalidated [`QuantitySpec`] input
/// record, so consistency checks can inspect either before accepting it.
pub trait Measurement {
    /// The measured value
    fn value(&self) -> f64;

    /// The unit token
    fn unit(&self) -> &Unit;

    /// Absolute uncertainty, if known
    fn uncertainty(&self) -> Option<f64>;

    /// Relative uncertainty as a fraction, if known
    fn relative_uncertainty(&self) -> Option<f64>;
}

/// Raw quantity as written in configuration files
///
/// Exactly one of `uncertainty` and `relative_uncertainty` is expected;
/// converting into a [`Quantity`] enforces that along with the sign rules.
///
/// ```
/// use fluence_magnitude::{Quantity, QuantitySpec};
///
/// let spec: QuantitySpec = serde_json::from_str(
///     r#"{ "value": 1.051, "unit": "ND", "uncertainty": 0.019 }"#,
/// ).unwrap();
/// let quantity = Quantity::try_from(spec).unwrap();
/// assert_eq!(quantity.uncertainty(), 0.019);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySpec {
    /// Measured value
    pub value: f64,

    /// Unit token
    pub unit: Unit,

    /// Absolute standard uncertainty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,

    /// Relative standard uncertainty (fraction)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_uncertainty: Option<f64>,
}

impl QuantitySpec {
    /// Spec with an absolute uncertainty
    pub fn absolute(value: f64, unit: impl Into<Unit>, uncertainty: f64) -> Self {
        Self {
            value,
            unit: unit.into(),
            uncertainty: Some(uncertainty),
            relative_uncertainty: None,
        }
    }

    /// Spec with a relative uncertainty (fraction)
    pub fn relative(value: f64, unit: impl Into<Unit>, relative_uncertainty: f64) -> Self {
        Self {
            value,
            unit: unit.into(),
            uncertainty: None,
            relative_uncertainty: Some(relative_uncertainty),
        }
    }
}

impl From<Quantity> for QuantitySpec {
    fn from(quantity: Quantity) -> Self {
        match quantity.canonical_form() {
            UncertaintyForm::Absolute => Self::absolute(
                quantity.value(),
                quantity.unit().clone(),
                quantity.uncertainty(),
            ),
            UncertaintyForm::Relative => Self::relative(
                quantity.value(),
                quantity.unit().clone(),
                quantity.relative_uncertainty(),
            ),
        }
    }
}

impl Measurement for QuantitySpec {
    fn value(&self) -> f64 {
        self.value
    }

    fn unit(&self) -> &Unit {
        &self.unit
    }

    fn uncertainty(&self) -> Option<f64> {
        self.uncertainty
    }

    fn relative_uncertainty(&self) -> Option<f64> {
        self.relative_uncertainty
    }
}

impl Measurement for Quantity {
    fn value(&self) -> f64 {
        Quantity::value(self)
    }

    fn unit(&self) -> &Unit {
        Quantity::unit(self)
    }

    fn uncertainty(&self) -> Option<f64> {
        Some(Quantity::uncertainty(self))
    }

    fn relative_uncertainty(&self) -> Option<f64> {
        Some(Quantity::relative_uncertainty(self))
    }
}
