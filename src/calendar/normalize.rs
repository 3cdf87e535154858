//! Folds a raw daily series into a year-indexed calendar of 365 slots per year.

use crate::series::raw_series::{DailyValue, RawSeries};
use crate::types::day_of_year::{DayOfYearIndex, MonthDay, DAYS_PER_YEAR};
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::collections::BTreeMap;

/// What the archive holds for one day slot of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// The day is part of the series but has no measurement.
    Missing,
    Value(f64),
}

impl Sample {
    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Missing => None,
            Sample::Value(v) => Some(v),
        }
    }
}

/// The 365 slots of one year. A slot is `None` when the raw series has no entry for it
/// (the archive starts or ends inside this year).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarYear {
    year: i32,
    slots: Vec<Option<Sample>>,
}

impl CalendarYear {
    fn new(year: i32) -> Self {
        Self {
            year,
            slots: vec![None; DAYS_PER_YEAR],
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn sample(&self, slot: usize) -> Option<Sample> {
        self.slots.get(slot).copied().flatten()
    }

    /// Measured value at `slot`, `None` when absent or missing.
    pub fn value(&self, slot: usize) -> Option<f64> {
        self.sample(slot).and_then(Sample::value)
    }

    /// Measured values of every slot, in slot order.
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.slots.iter().map(|s| s.and_then(Sample::value))
    }

    /// Number of slots holding a measurement.
    pub fn valid_count(&self) -> usize {
        self.values().filter(Option::is_some).count()
    }

    /// Number of slots the raw series had an entry for, measured or not.
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Year → day slot → sample. Built once per raw series and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCalendar {
    years: BTreeMap<i32, CalendarYear>,
}

impl NormalizedCalendar {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn year(&self, year: i32) -> Option<&CalendarYear> {
        self.years.get(&year)
    }

    /// Years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = &CalendarYear> {
        self.years.values()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }

    /// Sample stored for a calendar date. Always `None` for February 29th.
    pub fn get(&self, year: i32, month: u32, day: u32) -> Option<Sample> {
        let slot = DayOfYearIndex::slot_of(month, day)?;
        self.years.get(&year)?.sample(slot)
    }

    /// Every stored entry, in year then day-of-year order.
    pub fn flatten(&self) -> Vec<DailyValue> {
        let index = DayOfYearIndex::new();
        self.years
            .values()
            .flat_map(|year| {
                index.iter().filter_map(move |(slot, MonthDay { month, day })| {
                    let sample = year.sample(slot)?;
                    let date = NaiveDate::from_ymd_opt(year.year, month, day)?;
                    Some(DailyValue {
                        date,
                        value: sample.value(),
                    })
                })
            })
            .collect()
    }
}

/// Builds the calendar of a raw series.
///
/// February 29th entries are dropped. Entries without a value are kept as
/// [`Sample::Missing`]. When a date appears twice the later entry wins.
///
/// # Examples
///
/// ```
/// use climate_archive::{normalize, RawSeries, Sample};
///
/// let series = RawSeries::from_labels(
///     &["2024-02-28", "2024-02-29", "2024-03-01"],
///     &[Some(3.0), Some(4.0), None],
/// )?;
/// let calendar = normalize(&series);
/// assert_eq!(calendar.get(2024, 2, 28), Some(Sample::Value(3.0)));
/// assert_eq!(calendar.get(2024, 2, 29), None);
/// assert_eq!(calendar.get(2024, 3, 1), Some(Sample::Missing));
/// # Ok::<(), climate_archive::SeriesError>(())
/// ```
pub fn normalize(series: &RawSeries) -> NormalizedCalendar {
    let mut years: BTreeMap<i32, CalendarYear> = BTreeMap::new();
    let mut leap_days = 0usize;

    for entry in series.iter() {
        let Some(slot) = DayOfYearIndex::slot_of(entry.date.month(), entry.date.day()) else {
            leap_days += 1;
            continue;
        };
        let year = entry.date.year();
        let sample = match entry.value {
            Some(v) => Sample::Value(v),
            None => Sample::Missing,
        };
        years
            .entry(year)
            .or_insert_with(|| CalendarYear::new(year))
            .slots[slot] = Some(sample);
    }

    debug!(
        "Normalized {} entries into {} years ({} leap days dropped)",
        series.len(),
        years.len(),
        leap_days
    );

    NormalizedCalendar { years }
}
