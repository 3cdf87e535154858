//! Downloads daily series from the historical weather archive.

use crate::archive_data::error::FetchError;
use crate::config::ArchiveConfig;
use crate::series::raw_series::RawSeries;
use crate::types::location::Town;
use crate::types::variable::Variable;
use log::{info, warn};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;

/// Anything that can produce the raw daily series of a variable at a town.
///
/// [`OpenMeteoFetcher`] is the network implementation; tests and offline tools can
/// provide their own.
pub trait SeriesSource {
    fn fetch_series(
        &self,
        town: &Town,
        variable: Variable,
    ) -> impl Future<Output = Result<RawSeries, FetchError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: ArchiveDaily,
}

/// `daily.time` plus one array per requested variable, all of equal length.
#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Vec<String>,
    #[serde(flatten)]
    fields: HashMap<String, Vec<Option<f64>>>,
}

pub struct OpenMeteoFetcher {
    config: ArchiveConfig,
    download_client: Client,
}

impl OpenMeteoFetcher {
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            config,
            download_client: Client::new(),
        }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Request URL for one town and one variable over the configured archive range.
    pub fn series_url(&self, town: &Town, variable: Variable) -> Result<Url, FetchError> {
        let start_date = format!("{:04}-01-01", self.config.first_year);
        let end_date = self.config.end_date().format("%Y-%m-%d").to_string();
        let params = [
            ("timezone", self.config.timezone.clone()),
            ("latitude", town.latitude.to_string()),
            ("longitude", town.longitude.to_string()),
            ("start_date", start_date),
            ("end_date", end_date),
            ("daily", variable.spec().api_field.to_string()),
        ];
        Url::parse_with_params(&self.config.archive_url, &params).map_err(|e| {
            FetchError::InvalidUrl {
                url: self.config.archive_url.clone(),
                reason: e.to_string(),
            }
        })
    }

    async fn download(&self, url: Url) -> Result<ArchiveResponse, FetchError> {
        info!("Downloading archive series from {}", url);
        let url_string = url.to_string();

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url_string.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url_string, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url_string,
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(url_string, e),
                });
            }
        };

        response
            .json::<ArchiveResponse>()
            .await
            .map_err(|e| FetchError::Decode(url_string, e))
    }
}

impl SeriesSource for OpenMeteoFetcher {
    async fn fetch_series(&self, town: &Town, variable: Variable) -> Result<RawSeries, FetchError> {
        let url = self.series_url(town, variable)?;
        let url_string = url.to_string();
        let response = self.download(url).await?;
        let series = series_from_response(response, variable, &url_string)?;
        info!(
            "Fetched {} days of {} for {} ({} measured)",
            series.len(),
            variable,
            town.key(),
            series.valid_count()
        );
        Ok(series)
    }
}

fn series_from_response(
    mut response: ArchiveResponse,
    variable: Variable,
    url: &str,
) -> Result<RawSeries, FetchError> {
    let field = variable.spec().api_field;
    let values = response
        .daily
        .fields
        .remove(field)
        .ok_or_else(|| FetchError::MissingField {
            url: url.to_string(),
            field: field.to_string(),
        })?;

    RawSeries::from_labels(&response.daily.time, &values).map_err(|source| {
        FetchError::MalformedSeries {
            url: url.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::error::SeriesError;
    use crate::types::location::LatLon;
    use chrono::NaiveDate;

    fn parse(body: &str, variable: Variable) -> Result<RawSeries, FetchError> {
        let response: ArchiveResponse = serde_json::from_str(body).unwrap();
        series_from_response(response, variable, "test://archive")
    }

    fn bordeaux() -> Town {
        Town::new("Bordeaux", "Gironde", LatLon(44.84, -0.58))
    }

    #[test]
    fn test_series_from_response() {
        let body = r#"{
            "latitude": 44.8,
            "longitude": -0.6,
            "daily_units": {"time": "iso8601", "precipitation_sum": "mm"},
            "daily": {
                "time": ["2023-01-01", "2023-01-02", "2023-01-03"],
                "precipitation_sum": [0.0, null, 12.4]
            }
        }"#;
        let series = parse(body, Variable::Precipitation).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.entries()[0].value, Some(0.0));
        assert_eq!(series.entries()[1].value, None);
        assert_eq!(
            series.entries()[2].date,
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_missing_field() {
        let body = r#"{"daily": {"time": ["2023-01-01"], "temperature_2m_max": [3.2]}}"#;
        match parse(body, Variable::TemperatureMin) {
            Err(FetchError::MissingField { field, .. }) => assert_eq!(field, "temperature_2m_min"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_unequal_arrays() {
        let body = r#"{"daily": {"time": ["2023-01-01", "2023-01-02"], "temperature_2m_min": [3.2]}}"#;
        assert!(matches!(
            parse(body, Variable::TemperatureMin),
            Err(FetchError::MalformedSeries {
                source: SeriesError::LengthMismatch { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_series_url() {
        let config = ArchiveConfig::builder()
            .first_year(1959)
            .end_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .build();
        let fetcher = OpenMeteoFetcher::new(config);
        let url = fetcher
            .series_url(&bordeaux(), Variable::TemperatureMin)
            .unwrap();

        assert_eq!(url.host_str(), Some("archive-api.open-meteo.com"));
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(query["timezone"], "Europe/Berlin");
        assert_eq!(query["latitude"], "44.84");
        assert_eq!(query["longitude"], "-0.58");
        assert_eq!(query["start_date"], "1959-01-01");
        assert_eq!(query["end_date"], "2024-03-09");
        assert_eq!(query["daily"], "temperature_2m_min");
    }

    #[test]
    fn test_invalid_base_url() {
        let fetcher = OpenMeteoFetcher::new(ArchiveConfig::builder().archive_url("not a url").build());
        assert!(matches!(
            fetcher.series_url(&bordeaux(), Variable::Precipitation),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    #[ignore = "hits the Open-Meteo archive"]
    async fn test_fetch_live_series() -> Result<(), FetchError> {
        let config = ArchiveConfig::builder()
            .first_year(2020)
            .end_date(NaiveDate::from_ymd_opt(2021, 12, 31).unwrap())
            .build();
        let series = OpenMeteoFetcher::new(config)
            .fetch_series(&bordeaux(), Variable::TemperatureMax)
            .await?;
        assert_eq!(series.len(), 731);
        Ok(())
    }
}
