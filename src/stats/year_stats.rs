//! Output types of the aggregator.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::fmt;

/// A historical extreme and the year it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub value: f64,
    pub year: i32,
}

impl Extremum {
    /// Keeps the smaller of `current` and `candidate`. Ties keep `current`, so feeding
    /// years in ascending order keeps the earliest one.
    pub(crate) fn lower(current: Option<Extremum>, candidate: Extremum) -> Option<Extremum> {
        match current {
            Some(c) if OrderedFloat(c.value) <= OrderedFloat(candidate.value) => Some(c),
            _ => Some(candidate),
        }
    }

    pub(crate) fn higher(current: Option<Extremum>, candidate: Extremum) -> Option<Extremum> {
        match current {
            Some(c) if OrderedFloat(c.value) >= OrderedFloat(candidate.value) => Some(c),
            _ => Some(candidate),
        }
    }
}

/// Position of the selected year among all years with a value at the same slot.
/// `position` 1 means no other year was higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub position: usize,
    pub out_of: usize,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.out_of)
    }
}

/// Statistics for each of the 365 day slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerDayStats {
    pub min: Vec<Option<Extremum>>,
    pub max: Vec<Option<Extremum>>,
    pub selected_year: Vec<Option<f64>>,
    pub rank: Vec<Option<Rank>>,
    /// For cumulative variables, the year whose running total forms the `min` curve.
    pub min_year: Option<i32>,
    /// For cumulative variables, the year whose running total forms the `max` curve.
    pub max_year: Option<i32>,
}

/// Statistics for each of the 12 months (index 0 is January).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerMonthStats {
    pub min: Vec<Option<Extremum>>,
    pub max: Vec<Option<Extremum>>,
    pub selected_year: Vec<Option<f64>>,
    pub rank: Vec<Option<Rank>>,
}

/// Everything needed to chart one year of one variable against its history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearStats {
    pub selected_year: i32,
    pub cumulative: bool,
    pub per_day: PerDayStats,
    pub per_month: PerMonthStats,
}

impl YearStats {
    /// `true` when at least one slot of the selected year has a value.
    pub fn has_selected_year(&self) -> bool {
        self.per_day.selected_year.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_keeps_first_on_tie() {
        let first = Extremum { value: 1.0, year: 1990 };
        let second = Extremum { value: 1.0, year: 1991 };
        assert_eq!(Extremum::lower(Some(first), second), Some(first));
        assert_eq!(Extremum::higher(Some(first), second), Some(first));
        assert_eq!(Extremum::lower(None, second), Some(second));
    }

    #[test]
    fn test_rank_display() {
        assert_eq!(Rank { position: 3, out_of: 64 }.to_string(), "3/64");
    }
}
