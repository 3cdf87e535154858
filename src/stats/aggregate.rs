//! Computes the historical envelope of a normalized calendar and overlays the selected
//! year on it.
//!
//! Two modes, chosen by the variable:
//!
//! * instantaneous (temperature): for each day slot the lowest and highest value ever
//!   recorded, each with the year it was recorded in;
//! * cumulative (rainfall): the running yearly totals of the driest and the wettest
//!   complete years.
//!
//! In both modes the months are rolled up per year (averages or totals) and the
//! per-month envelope is taken across years. Slots and months without any sample are
//! absent, never zero.

use crate::calendar::normalize::{CalendarYear, NormalizedCalendar};
use crate::stats::error::StatsError;
use crate::stats::monthly::monthly_rollup;
use crate::stats::rank::rank_positions;
use crate::stats::year_stats::{Extremum, PerDayStats, PerMonthStats, YearStats};
use crate::types::day_of_year::{DayOfYearIndex, MONTHS_PER_YEAR};
use log::{debug, warn};
use std::collections::BTreeMap;

/// A year takes part in the cumulative min/max selection only with more valid days than
/// this. Keeps an unfinished current year or a partial first year out of the extremes.
pub const QUALIFYING_VALID_DAYS: usize = 360;

/// Computes per-day and per-month statistics of `calendar` for `selected_year`.
///
/// # Errors
///
/// * [`StatsError::NoHistory`] if the calendar has no year, no measurement at all, or
///   (for cumulative variables) no year with more than [`QUALIFYING_VALID_DAYS`] values.
/// * [`StatsError::EmptyYear`] if `selected_year` has no measurement. The error carries
///   the envelope so it can still be charted.
///
/// # Examples
///
/// ```
/// use climate_archive::{compute_stats, normalize, DayOfYearIndex, RawSeries};
///
/// let series = RawSeries::from_labels(
///     &["2000-01-01", "2001-01-01", "2002-01-01"],
///     &[Some(4.0), Some(-2.0), Some(1.0)],
/// )?;
/// let stats = compute_stats(&normalize(&series), &DayOfYearIndex::new(), 2002, false)?;
///
/// assert_eq!(stats.per_day.min[0].map(|e| (e.value, e.year)), Some((-2.0, 2001)));
/// assert_eq!(stats.per_day.max[0].map(|e| (e.value, e.year)), Some((4.0, 2000)));
/// assert_eq!(stats.per_day.selected_year[0], Some(1.0));
/// assert_eq!(stats.per_day.rank[0].map(|r| r.to_string()), Some("2/3".to_string()));
/// assert_eq!(stats.per_day.min[1], None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_stats(
    calendar: &NormalizedCalendar,
    index: &DayOfYearIndex,
    selected_year: i32,
    cumulative: bool,
) -> Result<YearStats, StatsError> {
    if calendar.is_empty() {
        return Err(StatsError::NoHistory);
    }

    let slots = index.len();
    let per_day = if cumulative {
        cumulative_per_day(calendar, slots, selected_year)?
    } else {
        instantaneous_per_day(calendar, slots, selected_year)?
    };
    let per_month = per_month(calendar, selected_year, cumulative);

    let stats = YearStats {
        selected_year,
        cumulative,
        per_day,
        per_month,
    };

    let selected_count = calendar
        .year(selected_year)
        .map_or(0, CalendarYear::valid_count);
    if selected_count == 0 {
        warn!("No measurement for selected year {selected_year}, charting history only");
        return Err(StatsError::EmptyYear {
            year: selected_year,
            history: Box::new(stats),
        });
    }

    debug!(
        "Computed {} statistics for {} over {} years ({} days measured in {})",
        if cumulative { "cumulative" } else { "daily" },
        selected_year,
        calendar.year_count(),
        selected_count,
        selected_year
    );
    Ok(stats)
}

fn instantaneous_per_day(
    calendar: &NormalizedCalendar,
    slots: usize,
    selected_year: i32,
) -> Result<PerDayStats, StatsError> {
    let curves: BTreeMap<i32, Vec<Option<f64>>> = calendar
        .years()
        .map(|year| (year.year(), year.values().take(slots).collect()))
        .collect();

    let (min, max) = envelope(&curves, slots);
    if min.iter().all(Option::is_none) {
        return Err(StatsError::NoHistory);
    }

    Ok(PerDayStats {
        min,
        max,
        selected_year: selected_curve(&curves, selected_year, slots),
        rank: rank_positions(&curves, selected_year, slots),
        min_year: None,
        max_year: None,
    })
}

fn cumulative_per_day(
    calendar: &NormalizedCalendar,
    slots: usize,
    selected_year: i32,
) -> Result<PerDayStats, StatsError> {
    let curves: BTreeMap<i32, Vec<Option<f64>>> = calendar
        .years()
        .map(|year| (year.year(), running_total(year, slots)))
        .collect();

    let mut driest: Option<Extremum> = None;
    let mut wettest: Option<Extremum> = None;
    for year in calendar.years() {
        if year.valid_count() <= QUALIFYING_VALID_DAYS {
            continue;
        }
        let total = Extremum {
            value: year.values().take(slots).flatten().sum(),
            year: year.year(),
        };
        driest = Extremum::lower(driest, total);
        wettest = Extremum::higher(wettest, total);
    }

    let (Some(driest), Some(wettest)) = (driest, wettest) else {
        return Err(StatsError::NoHistory);
    };
    debug!(
        "Driest complete year {} ({}), wettest {} ({})",
        driest.year, driest.value, wettest.year, wettest.value
    );

    let curve_of = |year: i32| -> Vec<Option<Extremum>> {
        curves
            .get(&year)
            .map(|curve| {
                curve
                    .iter()
                    .map(|v| v.map(|value| Extremum { value, year }))
                    .collect()
            })
            .unwrap_or_else(|| vec![None; slots])
    };

    Ok(PerDayStats {
        min: curve_of(driest.year),
        max: curve_of(wettest.year),
        selected_year: selected_curve(&curves, selected_year, slots),
        rank: rank_positions(&curves, selected_year, slots),
        min_year: Some(driest.year),
        max_year: Some(wettest.year),
    })
}

fn per_month(calendar: &NormalizedCalendar, selected_year: i32, cumulative: bool) -> PerMonthStats {
    let rollups: BTreeMap<i32, Vec<Option<f64>>> = calendar
        .years()
        .map(|year| (year.year(), monthly_rollup(year, cumulative)))
        .collect();

    let (min, max) = envelope(&rollups, MONTHS_PER_YEAR);
    PerMonthStats {
        min,
        max,
        selected_year: selected_curve(&rollups, selected_year, MONTHS_PER_YEAR),
        rank: rank_positions(&rollups, selected_year, MONTHS_PER_YEAR),
    }
}

/// Lowest and highest value at each position across years, years visited in ascending
/// order so ties keep the earliest year.
fn envelope(
    series: &BTreeMap<i32, Vec<Option<f64>>>,
    len: usize,
) -> (Vec<Option<Extremum>>, Vec<Option<Extremum>>) {
    let mut min: Vec<Option<Extremum>> = vec![None; len];
    let mut max: Vec<Option<Extremum>> = vec![None; len];

    for (&year, values) in series {
        for (pos, value) in values.iter().take(len).enumerate() {
            if let Some(value) = *value {
                let candidate = Extremum { value, year };
                min[pos] = Extremum::lower(min[pos], candidate);
                max[pos] = Extremum::higher(max[pos], candidate);
            }
        }
    }
    (min, max)
}

fn selected_curve(
    series: &BTreeMap<i32, Vec<Option<f64>>>,
    selected_year: i32,
    len: usize,
) -> Vec<Option<f64>> {
    series
        .get(&selected_year)
        .cloned()
        .unwrap_or_else(|| vec![None; len])
}

/// Running total of a year. Defined from the first measured slot to the last slot the
/// series has an entry for; missing days add nothing, so a year ending on nulls keeps
/// its total to December 31st while an unfinished year stops at its last entry.
fn running_total(year: &CalendarYear, slots: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = year.values().take(slots).collect();
    let first = values.iter().position(Option::is_some);
    let last = (0..values.len()).rev().find(|&slot| year.sample(slot).is_some());
    let (Some(first), Some(last)) = (first, last) else {
        return vec![None; slots];
    };

    let mut total = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(slot, value)| {
            if let Some(v) = value {
                total += v;
            }
            (first..=last).contains(&slot).then_some(total)
        })
        .collect()
}
