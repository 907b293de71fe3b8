//! Unit module - textual unit tokens and how arithmetic combines them

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit token such as `1/s`, `pSv·cm²` or `ND`
///
/// Units are compared textually. Arithmetic builds composite tokens: products
/// join with `·`, ratios with `/`, and composite operands are parenthesized so
/// the result stays unambiguous. `ND` (non-dimensional) is the identity for
/// both operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    /// Token used for non-dimensional quantities
    pub const NON_DIMENSIONAL: &'static str = "ND";

    /// Create a unit from its token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The non-dimensional unit
    pub fn non_dimensional() -> Self {
        Self::new(Self::NON_DIMENSIONAL)
    }

    /// Whether this is the non-dimensional unit
    pub fn is_non_dimensional(&self) -> bool {
        self.0 == Self::NON_DIMENSIONAL
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unit of a product `self · other`
    ///
    /// # Examples
    ///
    /// ```
    /// use fluence_magnitude::Unit;
    ///
    /// assert_eq!(Unit::new("pSv·cm²").product(&Unit::new("1/cm²s")).as_str(), "pSv·cm²·(1/cm²s)");
    /// assert_eq!(Unit::new("1/s").product(&Unit::non_dimensional()).as_str(), "1/s");
    /// ```
    pub fn product(&self, other: &Unit) -> Unit {
        if self.is_non_dimensional() {
            return other.clone();
        }
        if other.is_non_dimensional() {
            return self.clone();
        }
        Unit(format!("{}·{}", self.factor(), other.factor()))
    }

    /// Unit of a ratio `self / other`
    ///
    /// # Examples
    ///
    /// ```
    /// use fluence_magnitude::Unit;
    ///
    /// assert_eq!(Unit::new("1/s").ratio(&Unit::new("cm")).as_str(), "(1/s)/cm");
    /// assert_eq!(Unit::non_dimensional().ratio(&Unit::new("cm")).as_str(), "1/cm");
    /// ```
    pub fn ratio(&self, other: &Unit) -> Unit {
        if other.is_non_dimensional() {
            return self.clone();
        }
        let numerator = if self.is_non_dimensional() {
            "1".to_string()
        } else {
            self.factor()
        };
        Unit(format!("{}/{}", numerator, other.divisor()))
    }

    /// Token as the operand of a product: ratios need parentheses
    fn factor(&self) -> String {
        if self.0.contains('/') {
            format!("({})", self.0)
        } else {
            self.0.clone()
        }
    }

    /// Token as the denominator of a ratio: any composite needs parentheses
    fn divisor(&self) -> String {
        if self.0.contains('/') || self.0.contains('·') {
            format!("({})", self.0)
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Unit {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Unit {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl PartialEq<str> for Unit {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Unit {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
