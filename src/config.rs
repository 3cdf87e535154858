//! Client configuration.

use bon::Builder;
use chrono::{Datelike, Local, NaiveDate};
use std::time::Duration;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_HUBEAU_URL: &str = "https://hubeau.eaufrance.fr/api";
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";
/// First year of the reanalysis archive.
pub const DEFAULT_FIRST_YEAR: i32 = 1959;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings shared by the archive fetcher, the series cache and the station client.
///
/// # Examples
///
/// ```
/// use climate_archive::ArchiveConfig;
/// use std::time::Duration;
///
/// let config = ArchiveConfig::builder()
///     .first_year(1990)
///     .fetch_timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.first_year, 1990);
/// assert_eq!(config.timezone, "Europe/Berlin");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ArchiveConfig {
    /// Base URL of the historical weather API.
    #[builder(into, default = DEFAULT_ARCHIVE_URL.to_string())]
    pub archive_url: String,
    /// Base URL of the Hub'Eau API.
    #[builder(into, default = DEFAULT_HUBEAU_URL.to_string())]
    pub hubeau_url: String,
    /// IANA timezone the daily values are aggregated in.
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    pub timezone: String,
    /// Series are requested from January 1st of this year.
    #[builder(default = DEFAULT_FIRST_YEAR)]
    pub first_year: i32,
    /// Last day requested. Today when unset.
    pub end_date: Option<NaiveDate>,
    /// Upper bound on a single fetch, including download and decoding.
    #[builder(default = DEFAULT_FETCH_TIMEOUT)]
    pub fetch_timeout: Duration,
}

impl ArchiveConfig {
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn last_year(&self) -> i32 {
        self.end_date().year()
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Years that can be selected, most recent first.
///
/// ```
/// use climate_archive::{selectable_years, ArchiveConfig};
/// use chrono::NaiveDate;
///
/// let config = ArchiveConfig::builder()
///     .first_year(2020)
///     .end_date(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())
///     .build();
/// assert_eq!(selectable_years(&config), vec![2023, 2022, 2021, 2020]);
/// ```
pub fn selectable_years(config: &ArchiveConfig) -> Vec<i32> {
    (config.first_year..=config.last_year()).rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArchiveConfig::default();
        assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
        assert_eq!(config.first_year, 1959);
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
        assert_eq!(config.end_date, None);
        assert!(config.last_year() >= 2024);
    }

    #[test]
    fn test_selectable_years_empty_when_reversed() {
        let config = ArchiveConfig::builder()
            .first_year(2030)
            .end_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .build();
        assert!(selectable_years(&config).is_empty());
    }
}
