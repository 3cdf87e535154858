use crate::stats::year_stats::YearStats;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// Nothing to build a historical envelope from: the calendar is empty, or no year
    /// holds enough data.
    #[error("No historical data to compute statistics from")]
    NoHistory,

    /// The selected year has no measurement. `history` still holds the min/max envelope,
    /// with every selected-year value absent.
    #[error("No data for selected year {year}")]
    EmptyYear { year: i32, history: Box<YearStats> },
}
