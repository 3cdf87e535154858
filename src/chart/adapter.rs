//! Turns aggregated statistics into labelled line series for a chart renderer.

use crate::stats::year_stats::{Extremum, Rank, YearStats};
use crate::types::day_of_year::DayOfYearIndex;
use crate::types::variable::VariableSpec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesColor {
    Blue,
    Green,
    Red,
}

/// One line of a chart. `data` and `extra_tooltip` have one entry per x label; absent
/// values are not drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub color: SeriesColor,
    pub data: Vec<Option<f64>>,
    pub extra_tooltip: Vec<Option<String>>,
}

/// A chart panel: x labels and the min, selected year and max lines, in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub x_labels: Vec<String>,
    pub datasets: Vec<LineSeries>,
}

impl ChartPanel {
    pub fn min(&self) -> &LineSeries {
        &self.datasets[0]
    }

    pub fn selected_year(&self) -> &LineSeries {
        &self.datasets[1]
    }

    pub fn max(&self) -> &LineSeries {
        &self.datasets[2]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    /// Suffix the renderer appends to y-axis ticks, see [`VariableSpec::format_tick`].
    pub unit_suffix: String,
    pub per_day: ChartPanel,
    pub per_month: ChartPanel,
}

/// Builds the per-day and per-month panels for `stats`.
///
/// Extremes carry the year they were recorded in as tooltip. For cumulative variables
/// the per-day extremes are whole curves of a single year, so the year goes into the
/// label instead (`"Min (1976)"`). The selected year carries its rank.
///
/// ```
/// use climate_archive::{compute_stats, normalize, to_chart_series, DayOfYearIndex, RawSeries, Variable};
///
/// let series = RawSeries::from_labels(
///     &["2022-01-01", "2023-01-01"],
///     &[Some(-1.0), Some(3.0)],
/// )?;
/// let stats = compute_stats(&normalize(&series), &DayOfYearIndex::new(), 2023, false).unwrap();
/// let chart = to_chart_series(&stats, &Variable::TemperatureMin.spec());
///
/// assert_eq!(chart.title, "Température Min");
/// assert_eq!(chart.per_day.x_labels[0], "01-01");
/// assert_eq!(chart.per_day.selected_year().label, "2023");
/// assert_eq!(chart.per_day.min().data[0], Some(-1.0));
/// # Ok::<(), climate_archive::SeriesError>(())
/// ```
pub fn to_chart_series(stats: &YearStats, variable: &VariableSpec) -> ChartSeries {
    let selected_year = stats.selected_year;
    let index = DayOfYearIndex::new();
    let day = &stats.per_day;
    let month = &stats.per_month;

    let (min_label, max_label) = if stats.cumulative {
        (curve_label("Min", day.min_year), curve_label("Max", day.max_year))
    } else {
        ("Min".to_string(), "Max".to_string())
    };
    let day_year_tooltips = !stats.cumulative;

    let per_day = ChartPanel {
        x_labels: index.labels(),
        datasets: vec![
            extremum_line(min_label, SeriesColor::Blue, &day.min, day_year_tooltips),
            selected_line(selected_year, &day.selected_year, &day.rank),
            extremum_line(max_label, SeriesColor::Red, &day.max, day_year_tooltips),
        ],
    };

    let per_month = ChartPanel {
        x_labels: DayOfYearIndex::month_labels(),
        datasets: vec![
            extremum_line("Min".to_string(), SeriesColor::Blue, &month.min, true),
            selected_line(selected_year, &month.selected_year, &month.rank),
            extremum_line("Max".to_string(), SeriesColor::Red, &month.max, true),
        ],
    };

    ChartSeries {
        title: variable.description.to_string(),
        unit_suffix: variable.unit_suffix.to_string(),
        per_day,
        per_month,
    }
}

fn curve_label(base: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{base} ({year})"),
        None => base.to_string(),
    }
}

fn extremum_line(
    label: String,
    color: SeriesColor,
    extremes: &[Option<Extremum>],
    year_tooltips: bool,
) -> LineSeries {
    LineSeries {
        label,
        color,
        data: extremes.iter().map(|e| e.map(|e| e.value)).collect(),
        extra_tooltip: extremes
            .iter()
            .map(|e| e.filter(|_| year_tooltips).map(|e| e.year.to_string()))
            .collect(),
    }
}

fn selected_line(year: i32, values: &[Option<f64>], ranks: &[Option<Rank>]) -> LineSeries {
    LineSeries {
        label: year.to_string(),
        color: SeriesColor::Green,
        data: values.to_vec(),
        extra_tooltip: ranks
            .iter()
            .map(|rank| rank.map(|rank| format!("Rang: {rank}")))
            .collect(),
    }
}
