//! Client for the Hub'Eau station APIs.

use crate::config::ArchiveConfig;
use crate::stations::error::StationError;
use crate::stations::station::{endpoint_url, StationRecord};
use crate::types::location::BoundingBox;
use log::{info, warn};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Every Hub'Eau listing wraps its records in `{"data": [...]}`.
#[derive(Debug, Deserialize)]
struct HubeauResponse<T> {
    data: Vec<T>,
}

pub struct HubeauClient {
    base_url: String,
    download_client: Client,
}

impl HubeauClient {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self::with_base_url(config.hubeau_url.clone())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            download_client: Client::new(),
        }
    }

    pub fn stations_url<S: StationRecord>(&self, bbox: &BoundingBox) -> Result<Url, StationError> {
        endpoint_url(
            &self.base_url,
            S::STATIONS_PATH,
            &[("bbox", bbox.to_query()), ("format", "json".to_string())],
        )
    }

    /// Stations of network `S` inside `bbox`, active or not.
    pub async fn stations<S: StationRecord>(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<S>, StationError> {
        let url = self.stations_url::<S>(bbox)?;
        let stations: Vec<S> = self.download(url).await?;
        info!("Found {} stations in {}", stations.len(), bbox.to_query());
        Ok(stations)
    }

    /// Latest observations of `station`, most recent first.
    pub async fn observations<S: StationRecord>(
        &self,
        station: &S,
    ) -> Result<Vec<S::Observation>, StationError> {
        let url = station.observation_url(&self.base_url)?;
        self.download(url).await
    }

    /// Popup text for `station`, see [`StationRecord::summarize`].
    pub async fn observation_summary<S: StationRecord>(
        &self,
        station: &S,
    ) -> Result<String, StationError> {
        let observations = self.observations(station).await?;
        Ok(S::summarize(&observations))
    }

    async fn download<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, StationError> {
        info!("Requesting {}", url);
        let url_string = url.to_string();

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| StationError::NetworkRequest(url_string.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url_string, e);
                return Err(match e.status() {
                    Some(status) => StationError::HttpStatus {
                        url: url_string,
                        status,
                        source: e,
                    },
                    None => StationError::NetworkRequest(url_string, e),
                });
            }
        };

        let body = response
            .json::<HubeauResponse<T>>()
            .await
            .map_err(|e| StationError::Decode(url_string, e))?;
        Ok(body.data)
    }
}
