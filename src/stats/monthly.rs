//! Per-month rollups of a calendar year.

use crate::calendar::normalize::CalendarYear;
use crate::types::day_of_year::{DayOfYearIndex, MONTHS_PER_YEAR};

/// One value per month: the total of the month's measurements when `cumulative`,
/// their average otherwise. A month without any measurement is `None`.
pub(crate) fn monthly_rollup(year: &CalendarYear, cumulative: bool) -> Vec<Option<f64>> {
    (1..=MONTHS_PER_YEAR as u32)
        .map(|month| {
            let (count, sum) = DayOfYearIndex::month_slots(month)
                .filter_map(|slot| year.value(slot))
                .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));
            match (count, cumulative) {
                (0, _) => None,
                (_, true) => Some(sum),
                (n, false) => Some(sum / n as f64),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::normalize::normalize;
    use crate::series::raw_series::RawSeries;

    #[test]
    fn test_average_ignores_missing_days() {
        let series = RawSeries::from_labels(
            &["2015-01-01", "2015-01-02", "2015-01-03", "2015-02-01"],
            &[Some(2.0), None, Some(4.0), None],
        )
        .unwrap();
        let calendar = normalize(&series);
        let year = calendar.year(2015).unwrap();

        let averages = monthly_rollup(year, false);
        assert_eq!(averages.len(), 12);
        assert_eq!(averages[0], Some(3.0));
        assert_eq!(averages[1], None);
        assert_eq!(averages[2], None);

        let totals = monthly_rollup(year, true);
        assert_eq!(totals[0], Some(6.0));
        assert_eq!(totals[1], None);
    }

    #[test]
    fn test_zero_rainfall_month_is_a_value() {
        let series =
            RawSeries::from_labels(&["2015-07-01", "2015-07-02"], &[Some(0.0), Some(0.0)]).unwrap();
        let calendar = normalize(&series);
        let totals = monthly_rollup(calendar.year(2015).unwrap(), true);
        assert_eq!(totals[6], Some(0.0));
    }
}
