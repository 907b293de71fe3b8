//! Arithmetic module - uncertainty propagation for `+ − × ÷`
//!
//! First-order propagation for independent variables:
//!
//! - sums and differences combine absolute uncertainties,
//!   `u = sqrt(u_a² + u_b²)`
//! - products and quotients combine relative uncertainties,
//!   `u_r = sqrt(u_r(a)² + u_r(b)²)`
//!
//! Every operation returns `Result<Quantity>`: sums and differences need equal
//! units, and no result may break the quantity invariants (a negative
//! difference, a division by zero, an overflow).

use crate::error::{MagnitudeError, Result};
use crate::quantity::Quantity;
use std::ops::{Add, Div, Mul, Sub};

impl Quantity {
    /// `self + other`; units must match
    pub fn sum(&self, other: &Quantity) -> Result<Quantity> {
        check_same_unit(self, other)?;
        let value = self.value() + other.value();
        let uncertainty = self.uncertainty().hypot(other.uncertainty());
        Quantity::absolute(value, self.unit().clone(), uncertainty)
    }

    /// `self − other`; units must match and the result must not be negative
    ///
    /// A zero result is only accepted when both operands are exact: `a − a`
    /// with any uncertainty has no relative uncertainty and is rejected.
    pub fn difference(&self, other: &Quantity) -> Result<Quantity> {
        check_same_unit(self, other)?;
        let value = self.value() - other.value();
        if value < 0.0 {
            return Err(MagnitudeError::invalid(format!(
                "difference {} - {} is negative",
                self.value(),
                other.value()
            )));
        }
        let uncertainty = self.uncertainty().hypot(other.uncertainty());
        Quantity::absolute(value, self.unit().clone(), uncertainty)
    }

    /// `self × other`; any units combine
    pub fn product(&self, other: &Quantity) -> Result<Quantity> {
        let value = self.value() * other.value();
        let relative = self
            .relative_uncertainty()
            .hypot(other.relative_uncertainty());
        Quantity::relative(value, self.unit().product(other.unit()), relative)
    }

    /// `self ÷ other`; any units combine, `other` must not be zero
    pub fn quotient(&self, other: &Quantity) -> Result<Quantity> {
        if other.value() == 0.0 {
            return Err(MagnitudeError::invalid(format!(
                "cannot divide {} by a zero-valued quantity",
                self
            )));
        }
        let value = self.value() / other.value();
        let relative = self
            .relative_uncertainty()
            .hypot(other.relative_uncertainty());
        Quantity::relative(value, self.unit().ratio(other.unit()), relative)
    }
}

fn check_same_unit(a: &Quantity, b: &Quantity) -> Result<()> {
    if a.unit() != b.unit() {
        return Err(MagnitudeError::UnitMismatch {
            expected: a.unit().to_string(),
            actual: b.unit().to_string(),
        });
    }
    Ok(())
}

/// Implements an operator for every owned/borrowed operand combination by
/// delegating to the named method
macro_rules! impl_binary_op {
    ($trait:ident, $op:ident, $method:ident) => {
        impl $trait<&Quantity> for &Quantity {
            type Output = Result<Quantity>;

            fn $op(self, rhs: &Quantity) -> Self::Output {
                self.$method(rhs)
            }
        }

        impl $trait<Quantity> for Quantity {
            type Output = Result<Quantity>;

            fn $op(self, rhs: Quantity) -> Self::Output {
                self.$method(&rhs)
            }
        }

        impl $trait<&Quantity> for Quantity {
            type Output = Result<Quantity>;

            fn $op(self, rhs: &Quantity) -> Self::Output {
                self.$method(rhs)
            }
        }

        impl $trait<Quantity> for &Quantity {
            type Output = Result<Quantity>;

            fn $op(self, rhs: Quantity) -> Self::Output {
                self.$method(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, sum);
impl_binary_op!(Sub, sub, difference);
impl_binary_op!(Mul, mul, product);
impl_binary_op!(Div, div, quotient);
