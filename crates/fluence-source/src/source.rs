//! Source module - a calibrated radionuclide neutron source
//!
//! A [`Source`] owns its seven quantity-valued attributes. Every assignment,
//! whether during construction or later, goes through the same consistency
//! check, and stored quantities are only handed out as shared references, so
//! an attribute can never be changed without being validated again.

use crate::attribute::Attribute;
use crate::conventions::Conventions;
use crate::date::{days_between, AsDate};
use crate::error::{Result, SourceError};
use chrono::NaiveDate;
use fluence_magnitude::{MagnitudeError, Measurement, Quantity, QuantitySpec, Unit};
use std::f64::consts::{LN_2, PI};
use std::fmt;
use tracing::{debug, warn};

/// Unit expected for distance arguments
pub const DISTANCE_UNIT: &str = "cm";

/// Unit of a strength
pub const STRENGTH_UNIT: &str = "1/s";

/// Unit of a fluence rate
pub const FLUENCE_RATE_UNIT: &str = "1/cm²s";

/// Unit of an ambient dose equivalent rate
pub const DOSE_RATE_UNIT: &str = "uSv/h";

/// Check that a measurement may be assigned to `attribute`
///
/// Rules are checked in order (value, uncertainty, relative uncertainty,
/// unit) and the first violation is returned:
/// - value must not be negative ([`SourceError::NegativeValue`])
/// - neither uncertainty form may be negative
///   ([`SourceError::NegativeUncertainty`])
/// - the unit must be the attribute's standard unit
///   ([`SourceError::NonStandardUnit`])
pub fn check_consistency<M>(attribute: Attribute, measurement: &M) -> Result<()>
where
    M: Measurement + ?Sized,
{
    let value = measurement.value();
    if value < 0.0 {
        return Err(SourceError::NegativeValue {
            attribute: attribute.name().to_string(),
            value,
        });
    }

    if let Some(uncertainty) = measurement.uncertainty() {
        if uncertainty < 0.0 {
            return Err(SourceError::NegativeUncertainty {
                attribute: attribute.name().to_string(),
                form: "uncertainty",
                value: uncertainty,
            });
        }
    }

    if let Some(relative) = measurement.relative_uncertainty() {
        if relative < 0.0 {
            return Err(SourceError::NegativeUncertainty {
                attribute: attribute.name().to_string(),
                form: "relative uncertainty",
                value: relative,
            });
        }
    }

    let unit = measurement.unit();
    if unit.as_str() != attribute.standard_unit() {
        return Err(SourceError::NonStandardUnit {
            attribute: attribute.name().to_string(),
            expected: attribute.standard_unit().to_string(),
            actual: unit.to_string(),
        });
    }

    Ok(())
}

/// A calibration radionuclide neutron source
///
/// Holds the name, the calibration date and the seven intrinsic
/// characteristics, and derives the time- and distance-dependent quantities
/// from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    name: String,
    calibration_date: NaiveDate,
    // One quantity per attribute, indexed by declaration order
    attributes: [Quantity; Attribute::COUNT],
    conventions: Conventions,
}

impl Source {
    /// Start building a source
    pub fn builder(name: impl Into<String>) -> SourceBuilder {
        SourceBuilder::new(name)
    }

    /// Name of the source
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calibration date
    pub fn calibration_date(&self) -> NaiveDate {
        self.calibration_date
    }

    /// Conventions used by the derived quantities
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Quantity stored for `attribute`
    pub fn attribute(&self, attribute: Attribute) -> &Quantity {
        &self.attributes[attribute.index()]
    }

    /// Strength at the calibration date (1/s)
    pub fn calibration_strength(&self) -> &Quantity {
        self.attribute(Attribute::CalibrationStrength)
    }

    /// Half-life (y)
    pub fn half_life(&self) -> &Quantity {
        self.attribute(Attribute::HalfLife)
    }

    /// Anisotropy factor (non-dimensional)
    pub fn anisotropy_factor(&self) -> &Quantity {
        self.attribute(Attribute::AnisotropyFactor)
    }

    /// Linear attenuation coefficient (1/cm)
    pub fn linear_attenuation_coefficient(&self) -> &Quantity {
        self.attribute(Attribute::LinearAttenuationCoefficient)
    }

    /// Fluence-to-dose conversion factor (pSv·cm²)
    pub fn fluence_to_dose_conversion_factor(&self) -> &Quantity {
        self.attribute(Attribute::FluenceToDoseConversionFactor)
    }

    /// Neutron effectiveness (non-dimensional)
    pub fn neutron_effectiveness(&self) -> &Quantity {
        self.attribute(Attribute::NeutronEffectiveness)
    }

    /// Total air scatter component (1/cm)
    pub fn total_air_scatter_component(&self) -> &Quantity {
        self.attribute(Attribute::TotalAirScatterComponent)
    }

    /// The quantity-valued attributes in declaration order
    ///
    /// Name and calibration date are not included. The view is read-only;
    /// changes go through [`Source::set_attribute`].
    pub fn numeric_attributes(&self) -> impl Iterator<Item = (Attribute, &Quantity)> + '_ {
        Attribute::ALL.into_iter().zip(self.attributes.iter())
    }

    /// Assign a quantity to an attribute
    ///
    /// This is the single entry point for attribute changes: the quantity is
    /// checked with [`check_consistency`] and the previous value is kept when
    /// the check fails.
    pub fn set_attribute(&mut self, attribute: Attribute, quantity: Quantity) -> Result<()> {
        check_consistency(attribute, &quantity).inspect_err(|e| {
            warn!("Rejected {} for source '{}': {}", attribute, self.name, e);
        })?;
        debug!("Source '{}': {} = {}", self.name, attribute, quantity);
        self.attributes[attribute.index()] = quantity;
        Ok(())
    }

    /// Set the calibration strength
    pub fn set_calibration_strength(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::CalibrationStrength, quantity)
    }

    /// Set the half-life
    pub fn set_half_life(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::HalfLife, quantity)
    }

    /// Set the anisotropy factor
    pub fn set_anisotropy_factor(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::AnisotropyFactor, quantity)
    }

    /// Set the linear attenuation coefficient
    pub fn set_linear_attenuation_coefficient(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::LinearAttenuationCoefficient, quantity)
    }

    /// Set the fluence-to-dose conversion factor
    pub fn set_fluence_to_dose_conversion_factor(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::FluenceToDoseConversionFactor, quantity)
    }

    /// Set the neutron effectiveness
    pub fn set_neutron_effectiveness(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::NeutronEffectiveness, quantity)
    }

    /// Set the total air scatter component
    pub fn set_total_air_scatter_component(&mut self, quantity: Quantity) -> Result<()> {
        self.set_attribute(Attribute::TotalAirScatterComponent, quantity)
    }

    /// Rename the source
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Move the calibration date
    pub fn set_calibration_date<D: AsDate + ?Sized>(&mut self, date: &D) -> Result<()> {
        self.calibration_date = self.resolve(date)?;
        Ok(())
    }

    /// Re-run the consistency check on a stored attribute
    pub fn check_consistency(&self, attribute: Attribute) -> Result<()> {
        check_consistency(attribute, self.attribute(attribute))
    }

    /// Decay time from the calibration date to `date`, in days ± 1 day
    ///
    /// Fails when `date` is not after the calibration date.
    pub fn decay_time<D: AsDate + ?Sized>(&self, date: &D) -> Result<Quantity> {
        let date = self.resolve(date)?;
        days_between(&self.conventions, self.calibration_date, date)
    }

    /// Fraction of the calibration strength left on `date`
    ///
    /// `f = exp(−ln2·t/t½)` with
    /// `u_r(f) = sqrt((ln2·t/t½)² · (u_r(t)² + u_r(t½)²))`, where the half-life
    /// is converted to days with an exact year length. On the calibration
    /// date the factor is exactly 1 with no uncertainty.
    pub fn decay_factor<D: AsDate + ?Sized>(&self, date: &D) -> Result<Quantity> {
        let date = self.resolve(date)?;
        if date == self.calibration_date {
            return Ok(Quantity::exact(1.0, Unit::non_dimensional())?);
        }

        let t = days_between(&self.conventions, self.calibration_date, date)?;
        let t12 = self
            .half_life()
            .scale(self.conventions.days_per_year)?
            .with_unit("d");
        if t12.value() == 0.0 {
            return Err(MagnitudeError::InvalidMagnitude(format!(
                "source '{}' has a zero half-life",
                self.name
            ))
            .into());
        }

        let exponent = LN_2 * t.value() / t12.value();
        let value = (-exponent).exp();
        let relative = (exponent.powi(2)
            * (t.relative_uncertainty().powi(2) + t12.relative_uncertainty().powi(2)))
        .sqrt();

        let f = Quantity::relative(value, Unit::non_dimensional(), relative)?;
        debug!("Source '{}': decay factor on {} = {}", self.name, date, f);
        Ok(f)
    }

    /// Strength on `date` (1/s)
    ///
    /// `B = B0 · f`. On the calibration date the calibration strength is
    /// returned unchanged.
    pub fn strength<D: AsDate + ?Sized>(&self, date: &D) -> Result<Quantity> {
        let date = self.resolve(date)?;
        if date == self.calibration_date {
            return Ok(self.calibration_strength().clone());
        }

        let f = self.decay_factor(&date)?;
        let b = self.calibration_strength().product(&f)?.with_unit(STRENGTH_UNIT);
        debug!("Source '{}': strength on {} = {}", self.name, date, b);
        Ok(b)
    }

    /// Fluence rate on `date` at `distance` from the source (1/cm²s)
    ///
    /// `φ = B · f_I / (4π l²)`, with 4 and π exact. `distance` must be given in
    /// cm and be positive.
    pub fn fluence_rate<D: AsDate + ?Sized>(&self, date: &D, distance: &Quantity) -> Result<Quantity> {
        if distance.unit().as_str() != DISTANCE_UNIT {
            return Err(SourceError::NonStandardUnit {
                attribute: "distance".to_string(),
                expected: DISTANCE_UNIT.to_string(),
                actual: distance.unit().to_string(),
            });
        }

        let b = self.strength(date)?;
        let four = Quantity::exact(4.0, Unit::non_dimensional())?;
        let pi = Quantity::exact(PI, Unit::non_dimensional())?;

        // Distance enters once per power, each as an independent factor
        let phi = b
            .product(self.anisotropy_factor())?
            .quotient(&four)?
            .quotient(&pi)?
            .quotient(distance)?
            .quotient(distance)?
            .with_unit(FLUENCE_RATE_UNIT);
        debug!("Source '{}': fluence rate at {} = {}", self.name, distance, phi);
        Ok(phi)
    }

    /// Ambient dose equivalent rate on `date` at `distance` (uSv/h)
    ///
    /// `H = h_Φ · φ · 0.0036`, the last factor converting pSv/s to uSv/h
    /// exactly.
    pub fn ambient_dose_equivalent_rate<D: AsDate + ?Sized>(
        &self,
        date: &D,
        distance: &Quantity,
    ) -> Result<Quantity> {
        let phi = self.fluence_rate(date, distance)?;
        let conversion = Quantity::exact(self.conventions.psv_s_to_usv_h, "uSv·s/(pSv·h)")?;

        let h = self
            .fluence_to_dose_conversion_factor()
            .product(&phi)?
            .product(&conversion)?
            .with_unit(DOSE_RATE_UNIT);
        debug!(
            "Source '{}': ambient dose equivalent rate at {} = {}",
            self.name, distance, h
        );
        Ok(h)
    }

    /// Multi-line report of the name, calibration date and every attribute
    pub fn source_information(&self) -> String {
        let mut lines = vec![
            format!("Name: {}", self.name),
            format!(
                "Calibration date: {}",
                self.calibration_date.format(&self.conventions.date_format)
            ),
        ];
        lines.extend(
            self.numeric_attributes()
                .map(|(attribute, quantity)| format!("{}: {}", attribute.label(), quantity)),
        );
        lines.join("\n")
    }

    fn resolve<D: AsDate + ?Sized>(&self, date: &D) -> Result<NaiveDate> {
        date.to_date(&self.conventions.date_format)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} radionuclide neutron source", self.name)
    }
}

/// Calibration date as given to the builder
#[derive(Debug, Clone)]
enum PendingDate {
    Text(String),
    Date(NaiveDate),
}

/// Builder for [`Source`]
///
/// Every attribute must be supplied. [`SourceBuilder::build`] checks each one
/// with [`check_consistency`] before it is converted to a [`Quantity`], so raw
/// input with a negative value is reported as such rather than as a malformed
/// quantity.
///
/// # Examples
///
/// ```
/// use fluence_magnitude::QuantitySpec;
/// use fluence_source::Source;
///
/// let source = Source::builder("252-Cf")
///     .calibration_date("2012/05/20")
///     .calibration_strength(QuantitySpec::relative(5.471e8, "1/s", 0.013))
///     .half_life(QuantitySpec::absolute(2.6470, "y", 0.0026))
///     .anisotropy_factor(QuantitySpec::absolute(1.051, "ND", 0.019))
///     .linear_attenuation_coefficient(QuantitySpec::relative(1055e-7, "1/cm", 0.015))
///     .fluence_to_dose_conversion_factor(QuantitySpec::relative(385.0, "pSv·cm²", 0.01))
///     .neutron_effectiveness(QuantitySpec::absolute(0.5, "ND", 0.1))
///     .total_air_scatter_component(QuantitySpec::relative(0.00012, "1/cm", 0.15))
///     .build()
///     .unwrap();
///
/// assert_eq!(source.to_string(), "252-Cf radionuclide neutron source");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    name: String,
    calibration_date: Option<PendingDate>,
    attributes: [Option<QuantitySpec>; Attribute::COUNT],
    conventions: Conventions,
}

impl SourceBuilder {
    /// Create a builder for a source called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Calibration date as text in the conventions' format
    pub fn calibration_date(mut self, date: impl Into<String>) -> Self {
        self.calibration_date = Some(PendingDate::Text(date.into()));
        self
    }

    /// Calibration date as a calendar date
    pub fn calibration_on(mut self, date: NaiveDate) -> Self {
        self.calibration_date = Some(PendingDate::Date(date));
        self
    }

    /// Conventions for the source's computations
    pub fn conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Supply any attribute
    pub fn attribute(mut self, attribute: Attribute, quantity: impl Into<QuantitySpec>) -> Self {
        self.attributes[attribute.index()] = Some(quantity.into());
        self
    }

    /// Supply the calibration strength
    pub fn calibration_strength(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::CalibrationStrength, quantity)
    }

    /// Supply the half-life
    pub fn half_life(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::HalfLife, quantity)
    }

    /// Supply the anisotropy factor
    pub fn anisotropy_factor(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::AnisotropyFactor, quantity)
    }

    /// Supply the linear attenuation coefficient
    pub fn linear_attenuation_coefficient(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::LinearAttenuationCoefficient, quantity)
    }

    /// Supply the fluence-to-dose conversion factor
    pub fn fluence_to_dose_conversion_factor(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::FluenceToDoseConversionFactor, quantity)
    }

    /// Supply the neutron effectiveness
    pub fn neutron_effectiveness(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::NeutronEffectiveness, quantity)
    }

    /// Supply the total air scatter component
    pub fn total_air_scatter_component(self, quantity: impl Into<QuantitySpec>) -> Self {
        self.attribute(Attribute::TotalAirScatterComponent, quantity)
    }

    /// Validate everything and build the source
    pub fn build(self) -> Result<Source> {
        self.conventions.validate()?;

        let calibration_date = match &self.calibration_date {
            Some(PendingDate::Text(text)) => text.to_date(&self.conventions.date_format)?,
            Some(PendingDate::Date(date)) => *date,
            None => return Err(SourceError::MissingAttribute("calibration_date".to_string())),
        };

        let mut quantities = Vec::with_capacity(Attribute::COUNT);
        for (attribute, spec) in Attribute::ALL.into_iter().zip(self.attributes) {
            let spec =
                spec.ok_or_else(|| SourceError::MissingAttribute(attribute.name().to_string()))?;
            check_consistency(attribute, &spec).inspect_err(|e| {
                warn!("Rejected {} for source '{}': {}", attribute, self.name, e);
            })?;
            quantities.push(Quantity::try_from(spec)?);
        }
        let attributes: [Quantity; Attribute::COUNT] =
            quantities.try_into().map_err(|rest: Vec<Quantity>| {
                SourceError::MissingAttribute(format!(
                    "expected {} attributes, got {}",
                    Attribute::COUNT,
                    rest.len()
                ))
            })?;

        debug!("Built source '{}' calibrated on {}", self.name, calibration_date);
        Ok(Source {
            name: self.name,
            calibration_date,
            attributes,
            conventions: self.conventions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_builder() -> SourceBuilder {
        Source::builder("252-Cf")
            .calibration_date("2012/05/20")
            .calibration_strength(QuantitySpec::relative(5.471e8, "1/s", 0.013))
            .half_life(QuantitySpec::absolute(2.6470, "y", 0.0026))
            .anisotropy_factor(QuantitySpec::absolute(1.051, "ND", 0.019))
            .linear_attenuation_coefficient(QuantitySpec::relative(1055e-7, "1/cm", 0.015))
            .fluence_to_dose_conversion_factor(QuantitySpec::relative(385.0, "pSv·cm²", 0.01))
            .neutron_effectiveness(QuantitySpec::absolute(0.5, "ND", 0.1))
            .total_air_scatter_component(QuantitySpec::relative(0.00012, "1/cm", 0.15))
    }

    fn reference_source() -> Source {
        reference_builder().build().unwrap()
    }

    #[test]
    fn test_build_valid_source() {
        let source = reference_source();
        assert_eq!(source.name(), "252-Cf");
        assert_eq!(
            source.calibration_date(),
            NaiveDate::from_ymd_opt(2012, 5, 20).unwrap()
        );
        assert_eq!(
            *source.half_life(),
            Quantity::absolute(2.6470, "y", 0.0026).unwrap()
        );
        assert_eq!(
            *source.calibration_strength(),
            Quantity::relative(5.471e8, "1/s", 0.013).unwrap()
        );
    }

    #[test]
    fn test_every_attribute_retrievable_unchanged() {
        for attribute in Attribute::ALL {
            let quantity = Quantity::absolute(3.0, attribute.standard_unit(), 0.3).unwrap();
            let source = reference_builder()
                .attribute(attribute, quantity.clone())
                .build()
                .unwrap();
            assert_eq!(*source.attribute(attribute), quantity);
        }
    }

    #[test]
    fn test_missing_attribute() {
        let builder = Source::builder("incomplete")
            .calibration_date("2012/05/20")
            .calibration_strength(QuantitySpec::relative(5.471e8, "1/s", 0.013));
        match builder.build().unwrap_err() {
            SourceError::MissingAttribute(name) => assert_eq!(name, "half_life"),
            other => panic!("Expected MissingAttribute, got {:?}", other),
        }

        let no_date = Source::builder("undated").build().unwrap_err();
        assert!(matches!(no_date, SourceError::MissingAttribute(ref name) if name == "calibration_date"));
    }

    #[test]
    fn test_negative_value_rejected_for_every_attribute() {
        for attribute in Attribute::ALL {
            let spec = QuantitySpec::absolute(-1.0, attribute.standard_unit(), 0.1);
            match reference_builder().attribute(attribute, spec).build().unwrap_err() {
                SourceError::NegativeValue { attribute: name, value } => {
                    assert_eq!(name, attribute.name());
                    assert_eq!(value, -1.0);
                }
                other => panic!("Expected NegativeValue for {}, got {:?}", attribute, other),
            }
        }
    }

    #[test]
    fn test_negative_uncertainty_rejected_for_every_attribute() {
        for attribute in Attribute::ALL {
            let spec = QuantitySpec::absolute(1.0, attribute.standard_unit(), -0.1);
            match reference_builder().attribute(attribute, spec).build().unwrap_err() {
                SourceError::NegativeUncertainty { attribute: name, form, .. } => {
                    assert_eq!(name, attribute.name());
                    assert_eq!(form, "uncertainty");
                }
                other => panic!("Expected NegativeUncertainty for {}, got {:?}", attribute, other),
            }

            let spec = QuantitySpec::relative(1.0, attribute.standard_unit(), -0.1);
            match reference_builder().attribute(attribute, spec).build().unwrap_err() {
                SourceError::NegativeUncertainty { form, .. } => {
                    assert_eq!(form, "relative uncertainty");
                }
                other => panic!("Expected NegativeUncertainty for {}, got {:?}", attribute, other),
            }
        }
    }

    #[test]
    fn test_non_standard_unit_rejected_for_every_attribute() {
        for attribute in Attribute::ALL {
            let spec = QuantitySpec::absolute(1.0, "furlong", 0.1);
            match reference_builder().attribute(attribute, spec).build().unwrap_err() {
                SourceError::NonStandardUnit { attribute: name, expected, actual } => {
                    assert_eq!(name, attribute.name());
                    assert_eq!(expected, attribute.standard_unit());
                    assert_eq!(actual, "furlong");
                }
                other => panic!("Expected NonStandardUnit for {}, got {:?}", attribute, other),
            }
        }
    }

    #[test]
    fn test_first_violation_reported() {
        // Negative value, negative uncertainty and wrong unit at once
        let spec = QuantitySpec::absolute(-1.0, "s", -0.1);
        let err = reference_builder()
            .calibration_strength(spec)
            .build()
            .unwrap_err();
        assert!(matches!(err, SourceError::NegativeValue { .. }));

        // Negative uncertainty and wrong unit
        let spec = QuantitySpec::absolute(1.0, "s", -0.1);
        let err = reference_builder()
            .calibration_strength(spec)
            .build()
            .unwrap_err();
        assert!(matches!(err, SourceError::NegativeUncertainty { .. }));
    }

    #[test]
    fn test_malformed_spec_rejected() {
        let spec = QuantitySpec {
            value: 1.0,
            unit: "1/s".into(),
            uncertainty: Some(0.1),
            relative_uncertainty: Some(0.1),
        };
        let err = reference_builder()
            .calibration_strength(spec)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::Magnitude(MagnitudeError::InvalidMagnitude(_))
        ));
    }

    #[test]
    fn test_set_attribute_validates_replacement() {
        let mut source = reference_source();
        let original = source.calibration_strength().clone();

        let updated = original.with_value(5.471e7).unwrap();
        source.set_calibration_strength(updated.clone()).unwrap();
        assert_eq!(*source.calibration_strength(), updated);
        assert!((source.calibration_strength().uncertainty() - 5.471e7 * 0.013).abs() < 1e-6);

        let wrong_unit = source.calibration_strength().with_unit("s");
        let err = source.set_calibration_strength(wrong_unit).unwrap_err();
        assert!(matches!(err, SourceError::NonStandardUnit { .. }));
        // The previous value survives a rejected assignment
        assert_eq!(*source.calibration_strength(), updated);
    }

    #[test]
    fn test_typed_setters_target_their_attribute() {
        let mut source = reference_source();
        let nd = Quantity::absolute(0.7, "ND", 0.07).unwrap();
        source.set_neutron_effectiveness(nd.clone()).unwrap();
        assert_eq!(*source.neutron_effectiveness(), nd);

        let nd_in_cm = Quantity::absolute(0.7, "ND", 0.07).unwrap();
        assert!(source.set_total_air_scatter_component(nd_in_cm).is_err());

        let years = Quantity::absolute(5.27, "y", 0.01).unwrap();
        source.set_half_life(years.clone()).unwrap();
        assert_eq!(*source.half_life(), years);
        assert!(source.check_consistency(Attribute::HalfLife).is_ok());
    }

    #[test]
    fn test_numeric_attributes_in_declaration_order() {
        let source = reference_source();
        let names: Vec<&str> = source
            .numeric_attributes()
            .map(|(attribute, _)| attribute.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "calibration_strength",
                "half_life",
                "anisotropy_factor",
                "linear_attenuation_coefficient",
                "fluence_to_dose_conversion_factor",
                "neutron_effectiveness",
                "total_air_scatter_component",
            ]
        );
        for (attribute, quantity) in source.numeric_attributes() {
            assert_eq!(quantity.unit().as_str(), attribute.standard_unit());
        }
    }

    #[test]
    fn test_decay_factor_on_calibration_date_is_exact() {
        let source = reference_source();
        let f = source.decay_factor("2012/05/20").unwrap();
        assert_eq!(f.value(), 1.0);
        assert_eq!(f.uncertainty(), 0.0);
        assert!(f.is_non_dimensional());
    }

    #[test]
    fn test_strength_on_calibration_date_is_passthrough() {
        let source = reference_source();
        let b = source.strength("2012/05/20").unwrap();
        assert_eq!(b, *source.calibration_strength());

        let date = NaiveDate::from_ymd_opt(2012, 5, 20).unwrap();
        assert_eq!(source.strength(&date).unwrap(), *source.calibration_strength());
    }

    #[test]
    fn test_decay_time_needs_later_date() {
        let source = reference_source();
        assert!(source.decay_time("2012/05/20").is_err());
        assert!(source.decay_time("2010/01/01").is_err());
        assert!(source.strength("2010/01/01").is_err());
        assert!(matches!(
            source.decay_time("20/05/2020"),
            Err(SourceError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_distance_must_be_positive_centimetres() {
        let source = reference_source();

        let metres = Quantity::absolute(1.0, "m", 0.01).unwrap();
        match source.fluence_rate("2020/05/20", &metres).unwrap_err() {
            SourceError::NonStandardUnit { attribute, expected, .. } => {
                assert_eq!(attribute, "distance");
                assert_eq!(expected, "cm");
            }
            other => panic!("Expected NonStandardUnit, got {:?}", other),
        }

        let zero = Quantity::exact(0.0, "cm").unwrap();
        assert!(matches!(
            source.fluence_rate("2020/05/20", &zero),
            Err(SourceError::Magnitude(MagnitudeError::InvalidMagnitude(_)))
        ));
    }

    #[test]
    fn test_derived_units() {
        let source = reference_source();
        let distance = Quantity::absolute(100.0, "cm", 1.0).unwrap();
        assert_eq!(source.decay_time("2020/05/20").unwrap().unit(), "d");
        assert_eq!(source.decay_factor("2020/05/20").unwrap().unit(), "ND");
        assert_eq!(source.strength("2020/05/20").unwrap().unit(), "1/s");
        assert_eq!(
            source.fluence_rate("2020/05/20", &distance).unwrap().unit(),
            "1/cm²s"
        );
        assert_eq!(
            source
                .ambient_dose_equivalent_rate("2020/05/20", &distance)
                .unwrap()
                .unit(),
            "uSv/h"
        );
    }

    #[test]
    fn test_zero_half_life_rejected_in_decay_factor() {
        let source = reference_builder()
            .half_life(QuantitySpec::absolute(0.0, "y", 0.0))
            .build()
            .unwrap();
        assert!(matches!(
            source.decay_factor("2020/05/20"),
            Err(SourceError::Magnitude(MagnitudeError::InvalidMagnitude(_)))
        ));
        // Passthrough on the calibration date does not need the half-life
        assert!(source.strength("2012/05/20").is_ok());
    }

    #[test]
    fn test_source_information() {
        let source = reference_source();
        let info = source.source_information();
        let lines: Vec<&str> = info.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "Name: 252-Cf");
        assert_eq!(lines[1], "Calibration date: 2012/05/20");
        assert!(lines[2].starts_with("Calibration strength: 547100000 ± "));
        assert!(lines[2].contains(" 1/s "));
        assert_eq!(
            lines[4],
            format!("Anisotropy factor: {}", source.anisotropy_factor())
        );
        assert!(lines[4].starts_with("Anisotropy factor: 1.051 ± 0.019 ("));
        assert!(lines[8].starts_with("Total air scatter component: 0.00012 ± "));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            reference_source().to_string(),
            "252-Cf radionuclide neutron source"
        );
    }

    #[test]
    fn test_custom_date_format() {
        let conventions = Conventions {
            date_format: "%d.%m.%Y".into(),
            ..Conventions::default()
        };
        let source = reference_builder()
            .calibration_date("20.05.2012")
            .conventions(conventions)
            .build()
            .unwrap();
        assert_eq!(source.decay_time("20.05.2020").unwrap().value(), 2922.0);
        assert!(source.decay_time("2020/05/20").is_err());
    }

    #[test]
    fn test_set_name() {
        let mut source = reference_source();
        source.set_name("252-Cf (spare)");
        assert_eq!(source.name(), "252-Cf (spare)");
        assert_eq!(
            source.to_string(),
            "252-Cf (spare) radionuclide neutron source"
        );
    }

    #[test]
    fn test_set_calibration_date() {
        let mut source = reference_source();
        source.set_calibration_date("2016/05/20").unwrap();
        assert_eq!(
            source.calibration_date(),
            NaiveDate::from_ymd_opt(2016, 5, 20).unwrap()
        );
        assert_eq!(source.decay_time("2020/05/20").unwrap().value(), 1461.0);

        let date = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
        source.set_calibration_date(&date).unwrap();
        assert_eq!(source.calibration_date(), date);
    }

    #[test]
    fn test_invalid_calibration_date_keeps_previous() {
        let mut source = reference_source();
        let before = source.calibration_date();

        assert!(matches!(
            source.set_calibration_date("2016-05-20"),
            Err(SourceError::InvalidDate { .. })
        ));
        assert!(source.set_calibration_date("2016/02/30").is_err());
        assert_eq!(source.calibration_date(), before);
    }

    #[test]
    fn test_builder_calibration_on() {
        let date = NaiveDate::from_ymd_opt(2012, 5, 20).unwrap();
        let source = reference_builder().calibration_on(date).build().unwrap();
        assert_eq!(source, reference_source());

        let invalid = reference_builder()
            .calibration_date("May 20th")
            .build()
            .unwrap_err();
        assert!(matches!(invalid, SourceError::InvalidDate { .. }));
    }
}
