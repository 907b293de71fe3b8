//! Attribute module - the quantity-valued characteristics of a source

use crate::error::SourceError;
use std::fmt;

/// A quantity-valued source attribute
///
/// Every attribute has a standard unit that any quantity assigned to it must
/// carry. Variants are listed in declaration order, which is also the order of
/// [`Attribute::ALL`] and of every listing a source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    /// Neutron emission rate at the calibration date (1/s)
    CalibrationStrength,

    /// Decay half-life (y)
    HalfLife,

    /// Angular emission correction (non-dimensional)
    AnisotropyFactor,

    /// Shielding attenuation (1/cm)
    LinearAttenuationCoefficient,

    /// Fluence to ambient dose equivalent conversion (pSv·cm²)
    FluenceToDoseConversionFactor,

    /// Dose-equivalent weighting (non-dimensional)
    NeutronEffectiveness,

    /// Air-scatter correction (1/cm)
    TotalAirScatterComponent,
}

impl Attribute {
    /// Number of attributes
    pub const COUNT: usize = 7;

    /// All attributes, in declaration order
    pub const ALL: [Attribute; Self::COUNT] = [
        Attribute::CalibrationStrength,
        Attribute::HalfLife,
        Attribute::AnisotropyFactor,
        Attribute::LinearAttenuationCoefficient,
        Attribute::FluenceToDoseConversionFactor,
        Attribute::NeutronEffectiveness,
        Attribute::TotalAirScatterComponent,
    ];

    /// Field name, as used in configuration files and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::CalibrationStrength => "calibration_strength",
            Attribute::HalfLife => "half_life",
            Attribute::AnisotropyFactor => "anisotropy_factor",
            Attribute::LinearAttenuationCoefficient => "linear_attenuation_coefficient",
            Attribute::FluenceToDoseConversionFactor => "fluence_to_dose_conversion_factor",
            Attribute::NeutronEffectiveness => "neutron_effectiveness",
            Attribute::TotalAirScatterComponent => "total_air_scatter_component",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::CalibrationStrength => "Calibration strength",
            Attribute::HalfLife => "Half life",
            Attribute::AnisotropyFactor => "Anisotropy factor",
            Attribute::LinearAttenuationCoefficient => "Linear attenuation coefficient",
            Attribute::FluenceToDoseConversionFactor => "Fluence-to-dose conversion factor",
            Attribute::NeutronEffectiveness => "Neutron effectiveness",
            Attribute::TotalAirScatterComponent => "Total air scatter component",
        }
    }

    /// Standard unit of the attribute
    pub fn standard_unit(&self) -> &'static str {
        match self {
            Attribute::CalibrationStrength => "1/s",
            Attribute::HalfLife => "y",
            Attribute::AnisotropyFactor => "ND",
            Attribute::LinearAttenuationCoefficient => "1/cm",
            Attribute::FluenceToDoseConversionFactor => "pSv·cm²",
            Attribute::NeutronEffectiveness => "ND",
            Attribute::TotalAirScatterComponent => "1/cm",
        }
    }

    /// Position in declaration order
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Attribute {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.name() == s)
            .ok_or_else(|| SourceError::Config(format!("unknown attribute '{}'", s)))
    }
}
