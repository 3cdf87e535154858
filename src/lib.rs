mod archive;
mod archive_data;
mod calendar;
mod chart;
mod config;
mod error;
mod series;
mod stations;
mod stats;
mod types;

pub use archive::*;
pub use config::*;
pub use error::ArchiveError;

pub use archive_data::error::FetchError;
pub use archive_data::fetcher::{OpenMeteoFetcher, SeriesSource};
pub use archive_data::series_cache::{SeriesCache, SeriesKey};

pub use series::error::SeriesError;
pub use series::raw_series::{DailyValue, RawSeries};

pub use calendar::normalize::{normalize, CalendarYear, NormalizedCalendar, Sample};

pub use stats::aggregate::{compute_stats, QUALIFYING_VALID_DAYS};
pub use stats::error::StatsError;
pub use stats::year_stats::*;

pub use chart::adapter::*;

pub use types::day_of_year::*;
pub use types::location::*;
pub use types::variable::*;

pub use stations::error::StationError;
pub use stations::hubeau::HubeauClient;
pub use stations::station::*;
