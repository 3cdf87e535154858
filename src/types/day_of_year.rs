//! The fixed 365-slot calendar shared by every year of an archive.
//!
//! February 29th has no slot: leap years are folded onto the same positions as common
//! years so that slot `i` denotes the same `(month, day)` in every year.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Number of day slots in a normalized year.
pub const DAYS_PER_YEAR: usize = 365;

/// Number of months in a year.
pub const MONTHS_PER_YEAR: usize = 12;

const DAYS_IN_MONTH: [u32; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A calendar position without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Chart label for this position, e.g. `"03-07"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Ordered list of the 365 canonical `(month, day)` pairs, January 1st to December 31st.
///
/// # Examples
///
/// ```
/// use climate_archive::DayOfYearIndex;
///
/// let index = DayOfYearIndex::new();
/// assert_eq!(index.len(), 365);
/// assert_eq!(DayOfYearIndex::slot_of(3, 1), Some(59));
/// assert_eq!(DayOfYearIndex::slot_of(2, 29), None);
/// assert_eq!(index.month_day(364).map(|md| md.label()), Some("12-31".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOfYearIndex {
    slots: Vec<MonthDay>,
}

impl DayOfYearIndex {
    pub fn new() -> Self {
        let slots = (1..=MONTHS_PER_YEAR as u32)
            .flat_map(|month| {
                (1..=DAYS_IN_MONTH[month as usize - 1]).map(move |day| MonthDay { month, day })
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn month_day(&self, slot: usize) -> Option<MonthDay> {
        self.slots.get(slot).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, MonthDay)> + '_ {
        self.slots.iter().copied().enumerate()
    }

    /// `"MM-DD"` labels for every slot, in slot order.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(MonthDay::label).collect()
    }

    /// Slot of a `(month, day)` pair. `None` for February 29th and for invalid dates.
    pub fn slot_of(month: u32, day: u32) -> Option<usize> {
        if !(1..=MONTHS_PER_YEAR as u32).contains(&month) {
            return None;
        }
        let month_index = month as usize - 1;
        if day == 0 || day > DAYS_IN_MONTH[month_index] {
            return None;
        }
        let month_start: u32 = DAYS_IN_MONTH[..month_index].iter().sum();
        Some((month_start + day - 1) as usize)
    }

    /// Slots covered by `month` (1-12). Empty for an out-of-range month.
    pub fn month_slots(month: u32) -> Range<usize> {
        if !(1..=MONTHS_PER_YEAR as u32).contains(&month) {
            return 0..0;
        }
        let month_index = month as usize - 1;
        let start: u32 = DAYS_IN_MONTH[..month_index].iter().sum();
        start as usize..(start + DAYS_IN_MONTH[month_index]) as usize
    }

    /// `"01"`..`"12"`, the x labels of a per-month chart.
    pub fn month_labels() -> Vec<String> {
        (1..=MONTHS_PER_YEAR).map(|m| format!("{m:02}")).collect()
    }
}

impl Default for DayOfYearIndex {
    fn default() -> Self {
        Self::new()
    }
}
