//! Date handling and elapsed time

use crate::conventions::Conventions;
use crate::error::{Result, SourceError};
use chrono::NaiveDate;
use fluence_magnitude::{MagnitudeError, Quantity};

/// Anything that can be read as a calendar date
///
/// Text is parsed with the conventions' date format (`YYYY/MM/DD` by
/// default); a [`NaiveDate`] is taken as-is.
pub trait AsDate {
    /// Resolve to a calendar date using `format` for text input
    fn to_date(&self, format: &str) -> Result<NaiveDate>;
}

impl AsDate for str {
    fn to_date(&self, format: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.trim(), format).map_err(|_| SourceError::InvalidDate {
            input: self.to_string(),
            format: format.to_string(),
        })
    }
}

impl AsDate for String {
    fn to_date(&self, format: &str) -> Result<NaiveDate> {
        self.as_str().to_date(format)
    }
}

impl AsDate for NaiveDate {
    fn to_date(&self, _format: &str) -> Result<NaiveDate> {
        Ok(*self)
    }
}

/// Elapsed time between two dates, with the default conventions
///
/// See [`elapsed_time_with`].
pub fn elapsed_time<A, B>(initial_date: &A, final_date: &B) -> Result<Quantity>
where
    A: AsDate + ?Sized,
    B: AsDate + ?Sized,
{
    elapsed_time_with(&Conventions::default(), initial_date, final_date)
}

/// Elapsed time between two dates in whole days
///
/// The result is in unit `d` with an absolute uncertainty of
/// `conventions.time_uncertainty_days`. The final date must come strictly
/// after the initial one: a zero duration has no relative uncertainty.
///
/// # Examples
///
/// ```
/// use fluence_source::elapsed_time;
///
/// let t = elapsed_time("2012/05/20", "2020/05/20").unwrap();
/// assert_eq!(t.value(), 2922.0);
/// assert_eq!(t.uncertainty(), 1.0);
/// assert_eq!(t.unit(), "d");
/// ```
pub fn elapsed_time_with<A, B>(
    conventions: &Conventions,
    initial_date: &A,
    final_date: &B,
) -> Result<Quantity>
where
    A: AsDate + ?Sized,
    B: AsDate + ?Sized,
{
    let initial = initial_date.to_date(&conventions.date_format)?;
    let final_ = final_date.to_date(&conventions.date_format)?;
    days_between(conventions, initial, final_)
}

pub(crate) fn days_between(
    conventions: &Conventions,
    initial: NaiveDate,
    final_: NaiveDate,
) -> Result<Quantity> {
    let days = (final_ - initial).num_days();
    if days < 0 {
        return Err(MagnitudeError::InvalidMagnitude(format!(
            "final date {} precedes initial date {}",
            final_, initial
        ))
        .into());
    }
    Ok(Quantity::absolute(
        days as f64,
        "d",
        conventions.time_uncertainty_days,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_time_whole_days() {
        let t = elapsed_time("2012/01/01", "2012/12/31").unwrap();
        assert_eq!(t.value(), 365.0);
        assert_eq!(t.uncertainty(), 1.0);
        assert!((t.relative_uncertainty() - 1.0 / 365.0).abs() < 1e-15);
    }

    #[test]
    fn test_elapsed_time_accepts_naive_dates() {
        let initial = NaiveDate::from_ymd_opt(2012, 5, 20).unwrap();
        let t = elapsed_time(&initial, "2012/05/21").unwrap();
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn test_invalid_date_format() {
        match elapsed_time("2012-05-20", "2020/05/20").unwrap_err() {
            SourceError::InvalidDate { input, format } => {
                assert_eq!(input, "2012-05-20");
                assert_eq!(format, "%Y/%m/%d");
            }
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
        assert!(elapsed_time("2012/02/30", "2020/05/20").is_err());
    }

    #[test]
    fn test_final_before_initial_rejected() {
        let err = elapsed_time("2020/05/20", "2012/05/20").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Magnitude(MagnitudeError::InvalidMagnitude(ref msg)) if msg.contains("precedes")
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = elapsed_time("2020/05/20", "2020/05/20").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Magnitude(MagnitudeError::InvalidMagnitude(_))
        ));
    }

    #[test]
    fn test_custom_conventions() {
        let conventions = Conventions {
            date_format: "%Y-%m-%d".into(),
            time_uncertainty_days: 0.5,
            ..Conventions::default()
        };
        let t = elapsed_time_with(&conventions, "2012-05-20", "2012-05-30").unwrap();
        assert_eq!(t.value(), 10.0);
        assert_eq!(t.uncertainty(), 0.5);
        assert_eq!(t.relative_uncertainty(), 0.05);
    }
}
