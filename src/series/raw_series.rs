//! The raw daily series as delivered by the archive: one entry per calendar day,
//! possibly with missing measurements.

use crate::series::error::SeriesError;
use chrono::NaiveDate;
use serde::Serialize;

/// One day of a raw series. `value` is `None` when the archive has no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A chronological daily series for one location and one variable.
///
/// # Examples
///
/// ```
/// use climate_archive::RawSeries;
///
/// let series = RawSeries::from_labels(
///     &["2020-02-28", "2020-02-29", "2020-03-01"],
///     &[Some(4.5), None, Some(6.0)],
/// )?;
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.entries()[1].value, None);
/// # Ok::<(), climate_archive::SeriesError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawSeries {
    entries: Vec<DailyValue>,
}

impl RawSeries {
    pub fn new(entries: Vec<DailyValue>) -> Self {
        Self { entries }
    }

    /// Zips `YYYY-MM-DD` labels with their values.
    ///
    /// # Errors
    ///
    /// [`SeriesError::LengthMismatch`] when the two arrays differ in length,
    /// [`SeriesError::InvalidDate`] for the first label that does not parse.
    pub fn from_labels<S: AsRef<str>>(
        labels: &[S],
        values: &[Option<f64>],
    ) -> Result<Self, SeriesError> {
        if labels.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }

        let entries = labels
            .iter()
            .zip(values)
            .map(|(label, value)| {
                let label = label.as_ref();
                NaiveDate::parse_from_str(label, "%Y-%m-%d")
                    .map(|date| DailyValue {
                        date,
                        value: *value,
                    })
                    .map_err(|source| SeriesError::InvalidDate {
                        label: label.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[DailyValue] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying a measurement.
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }
}

impl FromIterator<DailyValue> for RawSeries {
    fn from_iter<T: IntoIterator<Item = DailyValue>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
