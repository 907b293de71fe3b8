//! Preset module - named source records and the source registry
//!
//! A [`SourceRecord`] is the plain-data form of a source, as it appears in a
//! TOML registry file. Isotopes are data, not types: each preset is a record
//! built into a [`Source`] through the same validated path as user input.
//!
//! Registry file layout:
//!
//! ```toml
//! [conventions]
//! days_per_year = 365.25
//!
//! [[sources]]
//! name = "241-AmBe"
//! calibration_date = "2015/03/01"
//! calibration_strength = { value = 1.1e7, unit = "1/s", relative_uncertainty = 0.012 }
//! # ... the remaining six attributes
//! ```

use crate::attribute::Attribute;
use crate::conventions::{Conventions, DATE_FORMAT};
use crate::date::AsDate;
use crate::error::{Result, SourceError};
use crate::source::{Source, SourceBuilder};
use fluence_magnitude::QuantitySpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Plain-data description of a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Source name, used as the registry key
    pub name: String,

    /// Calibration date in the conventions' format
    pub calibration_date: String,

    /// Strength at the calibration date (1/s)
    pub calibration_strength: QuantitySpec,

    /// Half-life (y)
    pub half_life: QuantitySpec,

    /// Anisotropy factor (ND)
    pub anisotropy_factor: QuantitySpec,

    /// Linear attenuation coefficient (1/cm)
    pub linear_attenuation_coefficient: QuantitySpec,

    /// Fluence-to-dose conversion factor (pSv·cm²)
    pub fluence_to_dose_conversion_factor: QuantitySpec,

    /// Neutron effectiveness (ND)
    pub neutron_effectiveness: QuantitySpec,

    /// Total air scatter component (1/cm)
    pub total_air_scatter_component: QuantitySpec,
}

impl SourceRecord {
    /// Raw spec of one attribute
    pub fn spec(&self, attribute: Attribute) -> &QuantitySpec {
        match attribute {
            Attribute::CalibrationStrength => &self.calibration_strength,
            Attribute::HalfLife => &self.half_life,
            Attribute::AnisotropyFactor => &self.anisotropy_factor,
            Attribute::LinearAttenuationCoefficient => &self.linear_attenuation_coefficient,
            Attribute::FluenceToDoseConversionFactor => &self.fluence_to_dose_conversion_factor,
            Attribute::NeutronEffectiveness => &self.neutron_effectiveness,
            Attribute::TotalAirScatterComponent => &self.total_air_scatter_component,
        }
    }

    /// Build a validated source from this record
    pub fn to_source(&self, conventions: &Conventions) -> Result<Source> {
        self.clone().into_source(conventions)
    }

    /// Build a validated source, consuming the record
    pub fn into_source(self, conventions: &Conventions) -> Result<Source> {
        self.into_builder(conventions).build()
    }

    fn into_builder(self, conventions: &Conventions) -> SourceBuilder {
        Source::builder(self.name)
            .conventions(conventions.clone())
            .calibration_date(self.calibration_date)
            .calibration_strength(self.calibration_strength)
            .half_life(self.half_life)
            .anisotropy_factor(self.anisotropy_factor)
            .linear_attenuation_coefficient(self.linear_attenuation_coefficient)
            .fluence_to_dose_conversion_factor(self.fluence_to_dose_conversion_factor)
            .neutron_effectiveness(self.neutron_effectiveness)
            .total_air_scatter_component(self.total_air_scatter_component)
    }
}

impl From<&Source> for SourceRecord {
    fn from(source: &Source) -> Self {
        let spec = |attribute: Attribute| QuantitySpec::from(source.attribute(attribute).clone());
        Self {
            name: source.name().to_string(),
            calibration_date: source
                .calibration_date()
                .format(&source.conventions().date_format)
                .to_string(),
            calibration_strength: spec(Attribute::CalibrationStrength),
            half_life: spec(Attribute::HalfLife),
            anisotropy_factor: spec(Attribute::AnisotropyFactor),
            linear_attenuation_coefficient: spec(Attribute::LinearAttenuationCoefficient),
            fluence_to_dose_conversion_factor: spec(Attribute::FluenceToDoseConversionFactor),
            neutron_effectiveness: spec(Attribute::NeutronEffectiveness),
            total_air_scatter_component: spec(Attribute::TotalAirScatterComponent),
        }
    }
}

/// Built-in source presets
pub mod presets {
    use super::SourceRecord;
    use fluence_magnitude::QuantitySpec;

    /// Californium-252 reference source, calibrated 2012/05/20
    ///
    /// Preset dates are written in [`DATE_FORMAT`](crate::conventions::DATE_FORMAT).
    pub fn cf252() -> SourceRecord {
        SourceRecord {
            name: "252-Cf".to_string(),
            calibration_date: "2012/05/20".to_string(),
            calibration_strength: QuantitySpec::relative(5.471e8, "1/s", 0.013),
            half_life: QuantitySpec::absolute(2.6470, "y", 0.0026),
            anisotropy_factor: QuantitySpec::absolute(1.051, "ND", 0.019),
            linear_attenuation_coefficient: QuantitySpec::relative(1055e-7, "1/cm", 0.015),
            fluence_to_dose_conversion_factor: QuantitySpec::relative(385.0, "pSv·cm²", 0.01),
            neutron_effectiveness: QuantitySpec::absolute(0.5, "ND", 0.1),
            total_air_scatter_component: QuantitySpec::relative(0.00012, "1/cm", 0.15),
        }
    }

    /// Every built-in preset
    pub fn all() -> Vec<SourceRecord> {
        vec![cf252()]
    }
}

/// Contents of a registry TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Conventions applied to every source in the file
    #[serde(default)]
    pub conventions: Conventions,

    /// Additional source records
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

/// Named, validated sources sharing one set of conventions
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    conventions: Conventions,
    sources: BTreeMap<String, Source>,
}

impl SourceRegistry {
    /// Empty registry with the given conventions
    pub fn new(conventions: Conventions) -> Result<Self> {
        conventions.validate()?;
        Ok(Self {
            conventions,
            sources: BTreeMap::new(),
        })
    }

    /// Registry holding the built-in presets under default conventions
    pub fn builtin() -> Result<Self> {
        Self::with_presets(Conventions::default())
    }

    /// Registry holding the built-in presets under `conventions`
    pub fn with_presets(conventions: Conventions) -> Result<Self> {
        let mut registry = Self::new(conventions)?;
        registry.insert_builtin()?;
        Ok(registry)
    }

    /// Parse a registry file
    ///
    /// The built-in presets are loaded first, under the file's conventions;
    /// a file entry with the same name replaces the preset. Any rejected
    /// entry fails the whole load.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(contents)?;
        let mut registry = Self::with_presets(file.conventions)?;

        for record in file.sources {
            let name = record.name.clone();
            registry.insert(record).inspect_err(|e| {
                warn!("Rejected source '{}' from registry file: {}", name, e);
            })?;
        }

        info!("Loaded source registry with {} sources", registry.len());
        Ok(registry)
    }

    /// Load a registry file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&contents)?;
        info!("Source registry read from {}", path.display());
        Ok(registry)
    }

    /// Validate a record and register it under its name
    pub fn insert(&mut self, record: SourceRecord) -> Result<()> {
        let source = record.into_source(&self.conventions)?;
        debug!("Registered source '{}'", source.name());
        self.sources.insert(source.name().to_string(), source);
        Ok(())
    }

    /// Copy of the source registered as `name`
    pub fn get(&self, name: &str) -> Result<Source> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::UnknownSource(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Conventions shared by every registered source
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    fn insert_builtin(&mut self) -> Result<()> {
        for record in presets::all() {
            // Preset dates do not follow the registry's date format
            let calibration_date = record.calibration_date.as_str().to_date(DATE_FORMAT)?;
            let name = record.name.clone();
            let source = record
                .into_builder(&self.conventions)
                .calibration_on(calibration_date)
                .build()
                .inspect_err(|e| warn!("Built-in preset '{}' rejected: {}", name, e))?;
            debug!("Registered built-in source '{}'", source.name());
            self.sources.insert(source.name().to_string(), source);
        }
        Ok(())
    }
}
